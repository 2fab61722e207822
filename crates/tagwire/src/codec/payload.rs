// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message payload strategies.
//!
//! A [`PayloadCodec`] turns one message into the bytes that follow its type
//! name in the envelope. [`PayloadCodecs`] selects the codec per type name:
//! a default strategy plus explicit overrides fixed at construction.

use super::{Decoder, Encoder, PayloadError};
use crate::types::Message;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Serializes message payloads in place.
pub trait PayloadCodec: Send + Sync {
    /// Write the payload of `msg` at the encoder's cursor.
    fn marshal(&self, msg: &Message, enc: &mut Encoder) -> Result<(), PayloadError>;

    /// Fill `msg` from a decoder bounded to exactly the payload bytes.
    fn unmarshal(&self, dec: &mut Decoder<'_>, msg: &mut Message) -> Result<(), PayloadError>;
}

/// Default payload codec.
///
/// Writes `[field number:i32][envelope value]` for every set field, in
/// descriptor order; nil fields are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldPayloadCodec;

impl PayloadCodec for FieldPayloadCodec {
    fn marshal(&self, msg: &Message, enc: &mut Encoder) -> Result<(), PayloadError> {
        for field in msg.descriptor().fields() {
            let Some(value) = msg.field(&field.name) else {
                continue;
            };
            if value.is_nil() {
                continue;
            }
            if !field.ty.accepts(value) {
                return Err(PayloadError::Field {
                    name: field.name.clone(),
                    reason: format!("value does not match declared type {}", field.ty),
                });
            }
            enc.buffer().put_i32(field.number);
            enc.add(value)?;
        }
        Ok(())
    }

    fn unmarshal(&self, dec: &mut Decoder<'_>, msg: &mut Message) -> Result<(), PayloadError> {
        while !dec.is_eof() {
            let number = dec.cursor().get_i32()?;
            let descriptor = Arc::clone(msg.descriptor());
            let field = descriptor
                .field_by_number(number)
                .ok_or(PayloadError::UnknownField(number))?;
            let name = field.name.clone();
            let value = dec.get_as(&field.ty)?;
            msg.set(&name, value).map_err(|e| PayloadError::Field {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Payload codec table: one default plus per-type overrides.
#[derive(Clone)]
pub struct PayloadCodecs {
    default: Arc<dyn PayloadCodec>,
    overrides: HashMap<String, Arc<dyn PayloadCodec>>,
}

impl PayloadCodecs {
    pub fn builder() -> PayloadCodecsBuilder {
        PayloadCodecsBuilder::default()
    }

    /// Codec used for messages of `type_name`.
    pub fn codec_for(&self, type_name: &str) -> &Arc<dyn PayloadCodec> {
        self.overrides.get(type_name).unwrap_or(&self.default)
    }

    pub fn has_override(&self, type_name: &str) -> bool {
        self.overrides.contains_key(type_name)
    }
}

impl Default for PayloadCodecs {
    fn default() -> Self {
        Self {
            default: Arc::new(FieldPayloadCodec),
            overrides: HashMap::new(),
        }
    }
}

impl fmt::Debug for PayloadCodecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.overrides.keys().collect();
        names.sort();
        f.debug_struct("PayloadCodecs")
            .field("overrides", &names)
            .finish()
    }
}

/// Builder for [`PayloadCodecs`].
#[derive(Default)]
pub struct PayloadCodecsBuilder {
    codecs: PayloadCodecs,
}

impl PayloadCodecsBuilder {
    /// Replace the default strategy.
    pub fn default_codec(mut self, codec: Arc<dyn PayloadCodec>) -> Self {
        self.codecs.default = codec;
        self
    }

    /// Route messages of `type_name` to `codec`.
    pub fn with_override(mut self, type_name: impl Into<String>, codec: Arc<dyn PayloadCodec>) -> Self {
        self.codecs.overrides.insert(type_name.into(), codec);
        self
    }

    pub fn build(self) -> Arc<PayloadCodecs> {
        Arc::new(self.codecs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::config::CodecConfig;
    use crate::registry::{Registry, TypeRegistry};
    use crate::types::{ListValue, MapValue, MessageDescriptorBuilder, Value, ValueType};

    /// Writes the `Memo` field as raw UTF-8, without field numbers.
    struct RawMemoCodec;

    impl PayloadCodec for RawMemoCodec {
        fn marshal(&self, msg: &Message, enc: &mut Encoder) -> Result<(), PayloadError> {
            if let Some(memo) = msg.field("Memo").and_then(Value::as_str) {
                enc.buffer().put_bytes(memo.as_bytes());
            }
            Ok(())
        }

        fn unmarshal(&self, dec: &mut Decoder<'_>, msg: &mut Message) -> Result<(), PayloadError> {
            let len = dec.remaining();
            let bytes = dec.cursor().get_bytes(len)?;
            let memo = String::from_utf8(bytes.to_vec()).map_err(|e| PayloadError::Field {
                name: "Memo".into(),
                reason: e.to_string(),
            })?;
            msg.set("Memo", memo).map_err(|e| PayloadError::Field {
                name: "Memo".into(),
                reason: e.to_string(),
            })
        }
    }

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry.register(
            MessageDescriptorBuilder::new("Transaction")
                .string_field("Memo")
                .build(),
        );
        registry.register(
            MessageDescriptorBuilder::new("Account")
                .string_field("Owner")
                .field_with_number("Balance", 7, crate::types::ValueType::Int64)
                .build(),
        );
        registry
    }

    #[test]
    fn test_field_codec_layout() {
        let registry = registry();
        let mut account = registry.new_instance("Account").expect("account");
        account.set("Balance", 5i64).expect("balance");
        let mut enc = Encoder::new();
        enc.add(&Value::from(account)).expect("encode");
        let data = enc.data();
        // kind, sentinel, name "Account", then field 7 as an int64 envelope
        let payload = &data[4 + 4 + 4 + 7..];
        assert_eq!(&payload[..4], &7i32.to_be_bytes());
        assert_eq!(&payload[4..8], &6i32.to_be_bytes());
        assert_eq!(&payload[8..], &5i64.to_be_bytes());
    }

    #[test]
    fn test_override_routes_by_type_name() {
        let registry = registry();
        let codecs = PayloadCodecs::builder()
            .with_override("Transaction", Arc::new(RawMemoCodec))
            .build();
        assert!(codecs.has_override("Transaction"));
        assert!(!codecs.has_override("Account"));

        let mut tx = registry.new_instance("Transaction").expect("tx");
        tx.set("Memo", "pay").expect("memo");
        let value = Value::from(tx);

        let mut enc = Encoder::with_config(CodecConfig::default(), Arc::clone(&codecs));
        enc.add(&value).expect("encode");
        let data = enc.into_bytes();
        assert!(data.ends_with(b"Transactionpay"));

        let mut dec = Decoder::with_codecs(&data, 0, &registry, codecs);
        assert_eq!(dec.get().expect("decode"), value);
        assert!(dec.is_eof());
    }

    #[test]
    fn test_unknown_field_number_is_payload_error() {
        let registry = registry();
        let mut enc = Encoder::new();
        enc.buffer().put_i32(22);
        let slot = enc.buffer().reserve_i32();
        enc.buffer().put_str("Account").expect("name");
        enc.buffer().put_i32(42);
        enc.add(&Value::Int32(1)).expect("value");
        enc.buffer().patch_i32(slot, 12);
        let data = enc.into_bytes();

        match Decoder::new(&data, 0, &registry).get().unwrap_err() {
            CodecError::Payload { type_name, reason } => {
                assert_eq!(type_name, "Account");
                assert_eq!(reason, "unknown field number 42");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_field_type_mismatch_on_decode() {
        let registry = registry();
        let mut enc = Encoder::new();
        enc.buffer().put_i32(22);
        let slot = enc.buffer().reserve_i32();
        enc.buffer().put_str("Account").expect("name");
        enc.buffer().put_i32(7);
        enc.add(&Value::from("not a number")).expect("value");
        let len = enc.location() - 8 - 4 - 7;
        enc.buffer().patch_i32(slot, len as i32);
        let data = enc.into_bytes();

        assert!(matches!(
            Decoder::new(&data, 0, &registry).get(),
            Err(CodecError::Payload { .. })
        ));
    }

    #[test]
    fn test_payload_consumed_exactly() {
        let registry = registry();
        let mut account = registry.new_instance("Account").expect("account");
        account.set("Owner", "ann").expect("owner");
        let mut enc = Encoder::new();
        enc.add(&Value::from(account)).expect("first");
        enc.add(&Value::Int32(9)).expect("second");
        let data = enc.into_bytes();

        let mut dec = Decoder::new(&data, 0, &registry);
        dec.get().expect("account");
        assert_eq!(dec.get().expect("int"), Value::Int32(9));
    }

    #[test]
    fn test_all_nil_collection_fields_roundtrip() {
        let registry = registry();
        registry.register(MessageDescriptorBuilder::new("P").int32_field("X").build());
        registry.register(
            MessageDescriptorBuilder::new("Holder")
                .list_field("Items", ValueType::message("P"))
                .map_field("Slots", ValueType::String, ValueType::message("P"))
                .build(),
        );

        let mut holder = registry.new_instance("Holder").expect("holder");
        holder
            .set(
                "Items",
                Value::List(ListValue::from_items(ValueType::message("P"), vec![Value::Nil])),
            )
            .expect("items");
        let mut slots = MapValue::new(ValueType::String, ValueType::message("P"));
        slots.insert(Value::from("empty"), Value::Nil);
        holder.set("Slots", Value::Map(slots)).expect("slots");
        let value = Value::from(holder);

        let mut enc = Encoder::new();
        enc.add(&value).expect("encode");
        let data = enc.into_bytes();
        let mut dec = Decoder::new(&data, 0, &registry);
        assert_eq!(dec.get().expect("decode"), value);
        assert!(dec.is_eof());
    }
}
