// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Slice and map payloads.
//!
//! Nil and empty collections share the `-1` sentinel and decode to
//! [`Value::Nil`]. Decoded collections take their element types from the
//! first entry that is not nil.

use super::{CodecError, Decoder, Encoder};
use crate::config::{ELEMENT_WISE, NIL_SENTINEL, RAW_BYTES};
use crate::types::{ListValue, MapValue, Value, ValueType};
use std::collections::HashMap;

pub(crate) fn encode_bytes(enc: &mut Encoder, bytes: &[u8]) -> Result<(), CodecError> {
    let buf = enc.buffer();
    if bytes.is_empty() {
        buf.put_i32(NIL_SENTINEL);
        return Ok(());
    }
    buf.put_len(bytes.len())?;
    buf.put_u8(RAW_BYTES);
    buf.put_bytes(bytes);
    Ok(())
}

pub(crate) fn encode_list(enc: &mut Encoder, list: &ListValue) -> Result<(), CodecError> {
    if list.is_empty() {
        enc.buffer().put_i32(NIL_SENTINEL);
        return Ok(());
    }
    enc.buffer().put_len(list.len())?;
    enc.buffer().put_u8(ELEMENT_WISE);
    for item in list.items() {
        check_entry(list.elem_type(), item)?;
        enc.add(item)?;
    }
    Ok(())
}

pub(crate) fn encode_map(enc: &mut Encoder, map: &MapValue) -> Result<(), CodecError> {
    if map.is_empty() {
        enc.buffer().put_i32(NIL_SENTINEL);
        return Ok(());
    }
    enc.buffer().put_len(map.len())?;
    for (key, value) in map.iter() {
        check_entry(map.key_type(), key)?;
        check_entry(map.value_type(), value)?;
        enc.add(key)?;
        enc.add(value)?;
    }
    Ok(())
}

fn check_entry(expected: &ValueType, value: &Value) -> Result<(), CodecError> {
    if expected.accepts(value) {
        return Ok(());
    }
    Err(CodecError::TypeMismatch {
        expected: expected.to_string(),
        found: describe(value),
    })
}

fn describe(value: &Value) -> String {
    value
        .value_type()
        .map_or_else(|| "nil".to_string(), |ty| ty.to_string())
}

/// Read a collection length; `None` for the nil/empty sentinels.
fn read_len(dec: &mut Decoder<'_>) -> Result<Option<usize>, CodecError> {
    let offset = dec.location();
    let len = dec.cursor().get_i32()?;
    if len == NIL_SENTINEL || len == 0 {
        return Ok(None);
    }
    usize::try_from(len)
        .map(Some)
        .map_err(|_| CodecError::InvalidData {
            offset,
            reason: format!("negative collection length {}", len),
        })
}

pub(crate) fn decode_slice(
    dec: &mut Decoder<'_>,
    hint: Option<&ValueType>,
) -> Result<Value, CodecError> {
    let Some(len) = read_len(dec)? else {
        return Ok(Value::Nil);
    };
    let declared = match hint {
        Some(ValueType::List(elem)) => Some(elem.as_ref()),
        _ => None,
    };
    let offset = dec.location();
    match dec.cursor().get_u8()? {
        RAW_BYTES => Ok(Value::Bytes(dec.cursor().get_bytes(len)?.to_vec())),
        ELEMENT_WISE => {
            let mut items = Vec::with_capacity(len.min(dec.remaining()));
            for _ in 0..len {
                items.push(dec.read(declared)?);
            }
            let elem = infer(items.iter(), declared, "list")?;
            for item in &mut items {
                settle(&elem, item)?;
            }
            Ok(Value::List(ListValue::from_items(elem, items)))
        }
        other => Err(CodecError::InvalidData {
            offset,
            reason: format!("unknown slice discriminator {}", other),
        }),
    }
}

pub(crate) fn decode_map(
    dec: &mut Decoder<'_>,
    hint: Option<&ValueType>,
) -> Result<Value, CodecError> {
    let Some(count) = read_len(dec)? else {
        return Ok(Value::Nil);
    };
    let (key_hint, value_hint) = match hint {
        Some(ValueType::Map(key, value)) => (Some(key.as_ref()), Some(value.as_ref())),
        _ => (None, None),
    };
    let mut pairs = Vec::with_capacity(count.min(dec.remaining()));
    for _ in 0..count {
        let key = dec.read(key_hint)?;
        let value = dec.read(value_hint)?;
        pairs.push((key, value));
    }
    let inferred = pairs
        .iter()
        .find(|(k, v)| !k.is_nil() && !v.is_nil())
        .and_then(|(k, v)| Some((k.value_type()?, v.value_type()?)));
    let (key_type, value_type) = match (inferred, key_hint, value_hint) {
        (Some(types), _, _) => types,
        (None, Some(key), Some(value)) => (key.clone(), value.clone()),
        (None, _, _) => return Err(CodecError::UninferableType("map")),
    };

    let mut entries = HashMap::with_capacity(pairs.len());
    for (mut key, mut value) in pairs {
        settle(&key_type, &mut key)?;
        settle(&value_type, &mut value)?;
        entries.insert(key, value);
    }
    Ok(Value::Map(MapValue::from_entries(key_type, value_type, entries)))
}

/// Type of the first non-nil item, else the declared type.
fn infer<'v>(
    mut items: impl Iterator<Item = &'v Value>,
    declared: Option<&ValueType>,
    what: &'static str,
) -> Result<ValueType, CodecError> {
    items
        .find_map(Value::value_type)
        .or_else(|| declared.cloned())
        .ok_or(CodecError::UninferableType(what))
}

/// Replace nil by the zero value of `ty` and check everything else matches it.
fn settle(ty: &ValueType, value: &mut Value) -> Result<(), CodecError> {
    if value.is_nil() {
        *value = ty.zero();
        return Ok(());
    }
    check_entry(ty, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::elem_of;
    use crate::registry::TypeRegistry;

    fn encode(value: &Value) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.add(value).expect("encode");
        enc.into_bytes()
    }

    fn decode(data: &[u8]) -> Result<Value, CodecError> {
        elem_of(data, &TypeRegistry::new())
    }

    #[test]
    fn test_bytes_use_raw_path() {
        let data = encode(&Value::Bytes(b"Hello".to_vec()));
        assert_eq!(&data[..4], &23i32.to_be_bytes());
        assert_eq!(&data[4..8], &5i32.to_be_bytes());
        assert_eq!(data[8], RAW_BYTES);
        assert_eq!(&data[9..], b"Hello");
        assert_eq!(decode(&data).expect("decode"), Value::Bytes(b"Hello".to_vec()));
    }

    #[test]
    fn test_empty_collections_write_nil_sentinel() {
        let empty_list = Value::List(ListValue::new(ValueType::Int32));
        let empty_map = Value::Map(MapValue::new(ValueType::Int32, ValueType::String));
        for value in [Value::Bytes(Vec::new()), empty_list, empty_map] {
            let data = encode(&value);
            assert_eq!(data.len(), 8);
            assert_eq!(&data[4..], &NIL_SENTINEL.to_be_bytes());
            assert_eq!(decode(&data).expect("decode"), Value::Nil);
        }
    }

    #[test]
    fn test_zero_length_decodes_as_nil() {
        let mut data = 23i32.to_be_bytes().to_vec();
        data.extend_from_slice(&0i32.to_be_bytes());
        assert_eq!(decode(&data).expect("decode"), Value::Nil);
    }

    #[test]
    fn test_list_element_wise() {
        let value = Value::from(vec![3i32, -4]);
        let data = encode(&value);
        assert_eq!(data[8], ELEMENT_WISE);
        assert_eq!(decode(&data).expect("decode"), value);
    }

    #[test]
    fn test_list_of_strings_keeps_order() {
        let value = Value::from(vec!["b".to_string(), "a".to_string(), String::new()]);
        assert_eq!(decode(&encode(&value)).expect("decode"), value);
    }

    #[test]
    fn test_all_nil_list_is_uninferable() {
        let list = ListValue::from_items(ValueType::message("P"), vec![Value::Nil, Value::Nil]);
        let data = encode(&Value::List(list));
        assert_eq!(
            decode(&data).unwrap_err(),
            CodecError::UninferableType("list")
        );
    }

    #[test]
    fn test_declared_type_resolves_all_nil_collections() {
        let registry = TypeRegistry::new();
        let list_type = ValueType::list(ValueType::message("P"));
        let list = ListValue::from_items(ValueType::message("P"), vec![Value::Nil, Value::Nil]);
        let data = encode(&Value::List(list.clone()));
        let decoded = Decoder::new(&data, 0, &registry)
            .get_as(&list_type)
            .expect("decode");
        assert_eq!(decoded, Value::List(list));

        let map_type = ValueType::map(ValueType::String, ValueType::message("P"));
        let mut map = MapValue::new(ValueType::String, ValueType::message("P"));
        map.insert(Value::from("a"), Value::Nil);
        let data = encode(&Value::Map(map.clone()));
        let decoded = Decoder::new(&data, 0, &registry)
            .get_as(&map_type)
            .expect("decode");
        assert_eq!(decoded, Value::Map(map));
    }

    #[test]
    fn test_declared_type_reaches_nested_lists() {
        let registry = TypeRegistry::new();
        let inner = ValueType::list(ValueType::message("P"));
        let outer = ListValue::from_items(
            inner.clone(),
            vec![Value::List(ListValue::from_items(
                ValueType::message("P"),
                vec![Value::Nil],
            ))],
        );
        let data = encode(&Value::List(outer.clone()));
        assert_eq!(
            decode(&data).unwrap_err(),
            CodecError::UninferableType("list")
        );
        let decoded = Decoder::new(&data, 0, &registry)
            .get_as(&ValueType::list(inner))
            .expect("decode");
        assert_eq!(decoded, Value::List(outer));
    }

    #[test]
    fn test_list_encode_rejects_foreign_items() {
        let list = ListValue::from_items(ValueType::Int32, vec![Value::Int64(1)]);
        let mut enc = Encoder::new();
        assert!(matches!(
            enc.add(&Value::List(list)),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_map_roundtrip() {
        let mut map = HashMap::new();
        map.insert(1i32, "one".to_string());
        map.insert(2i32, "two".to_string());
        let value = Value::from(map);
        assert_eq!(decode(&encode(&value)).expect("decode"), value);
    }

    #[test]
    fn test_map_nil_values_become_zero() {
        let mut map = MapValue::new(ValueType::String, ValueType::list(ValueType::Int32));
        map.insert(Value::from("full"), Value::from(vec![1i32]));
        map.insert(Value::from("empty"), Value::Nil);
        let decoded = decode(&encode(&Value::Map(map))).expect("decode");
        let decoded = decoded.as_map().expect("map");
        assert_eq!(decoded.value_type(), &ValueType::list(ValueType::Int32));
        assert_eq!(decoded.get(&Value::from("empty")), Some(&Value::Nil));
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_map_without_typed_entry_is_uninferable() {
        let mut map = MapValue::new(ValueType::String, ValueType::message("P"));
        map.insert(Value::from("a"), Value::Nil);
        assert_eq!(
            decode(&encode(&Value::Map(map))).unwrap_err(),
            CodecError::UninferableType("map")
        );
    }

    #[test]
    fn test_negative_length_is_invalid() {
        let mut data = 23i32.to_be_bytes().to_vec();
        data.extend_from_slice(&(-7i32).to_be_bytes());
        assert!(matches!(
            decode(&data),
            Err(CodecError::InvalidData { offset: 4, .. })
        ));
    }

    #[test]
    fn test_unknown_discriminator() {
        let mut data = 23i32.to_be_bytes().to_vec();
        data.extend_from_slice(&1i32.to_be_bytes());
        data.push(9);
        assert!(matches!(
            decode(&data),
            Err(CodecError::InvalidData { offset: 8, .. })
        ));
    }

    #[test]
    fn test_huge_length_fails_without_allocating() {
        let mut data = 23i32.to_be_bytes().to_vec();
        data.extend_from_slice(&i32::MAX.to_be_bytes());
        data.push(ELEMENT_WISE);
        assert!(matches!(decode(&data), Err(CodecError::ReadFailed { .. })));
    }
}
