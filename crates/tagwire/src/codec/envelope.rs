// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kind-tagged envelope: the top-level encode/decode dispatcher.
//!
//! Every value is written as `[kind:i32][payload]`. Collections and message
//! payloads re-enter the envelope for their entries, sharing one buffer.

use super::{collection, message, primitive};
use super::{CodecError, Kind, PayloadCodecs, ReadCursor, WriteBuffer};
use crate::config::CodecConfig;
use crate::registry::Registry;
use crate::types::{Value, ValueType};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;

/// Encodes values into one growable buffer.
///
/// Not meant to be shared between threads; each concurrent caller builds its
/// own encoder.
#[derive(Debug)]
pub struct Encoder {
    buf: WriteBuffer,
    codecs: Arc<PayloadCodecs>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default(), Arc::new(PayloadCodecs::default()))
    }

    pub fn with_config(config: CodecConfig, codecs: Arc<PayloadCodecs>) -> Self {
        Self {
            buf: WriteBuffer::with_config(config),
            codecs,
        }
    }

    /// Append one kind-tagged value.
    ///
    /// On error the buffer may hold a partial value; discard the encoder.
    pub fn add(&mut self, value: &Value) -> Result<(), CodecError> {
        self.buf.put_i32(value.kind().tag());
        if primitive::encode(&mut self.buf, value)? {
            return Ok(());
        }
        match value {
            Value::Nil => {
                message::encode_nil(self);
                Ok(())
            }
            Value::Bytes(bytes) => collection::encode_bytes(self, bytes),
            Value::List(list) => collection::encode_list(self, list),
            Value::Map(map) => collection::encode_map(self, map),
            Value::Message(msg) => message::encode_message(self, msg),
            scalar => Err(CodecError::UnsupportedKind(scalar.kind().tag())),
        }
    }

    /// Raw buffer access for payload codecs.
    pub fn buffer(&mut self) -> &mut WriteBuffer {
        &mut self.buf
    }

    pub(crate) fn codecs(&self) -> &Arc<PayloadCodecs> {
        &self.codecs
    }

    /// Bytes written so far.
    pub fn data(&self) -> &[u8] {
        self.buf.data()
    }

    pub fn location(&self) -> usize {
        self.buf.location()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_bytes()
    }

    /// Standard Base64 of the bytes written so far.
    pub fn base64(&self) -> String {
        STANDARD.encode(self.buf.data())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes kind-tagged values from a borrowed buffer.
///
/// Message payloads are resolved through the registry.
pub struct Decoder<'a> {
    cursor: ReadCursor<'a>,
    registry: &'a dyn Registry,
    codecs: Arc<PayloadCodecs>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    /// Decoder starting at `location`, with the default payload codecs.
    pub fn new(data: &'a [u8], location: usize, registry: &'a dyn Registry) -> Self {
        Self::with_codecs(data, location, registry, Arc::new(PayloadCodecs::default()))
    }

    pub fn with_codecs(
        data: &'a [u8],
        location: usize,
        registry: &'a dyn Registry,
        codecs: Arc<PayloadCodecs>,
    ) -> Self {
        Self::with_config(data, location, registry, CodecConfig::default(), codecs)
    }

    /// Decoder honoring the limits of `config`.
    pub fn with_config(
        data: &'a [u8],
        location: usize,
        registry: &'a dyn Registry,
        config: CodecConfig,
        codecs: Arc<PayloadCodecs>,
    ) -> Self {
        Self {
            cursor: ReadCursor::at(data, location),
            registry,
            codecs,
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    /// Decoder over a sub-range, sharing registry, codecs and nesting depth.
    pub(crate) fn nested(&self, cursor: ReadCursor<'a>) -> Decoder<'a> {
        Decoder {
            cursor,
            registry: self.registry,
            codecs: Arc::clone(&self.codecs),
            depth: self.depth,
            max_depth: self.max_depth,
        }
    }

    /// Read one kind-tagged value.
    pub fn get(&mut self) -> Result<Value, CodecError> {
        self.read(None)
    }

    /// Read one kind-tagged value declared as `ty`.
    ///
    /// Collections whose entries are all nil take their element types from
    /// `ty` instead of failing with [`CodecError::UninferableType`].
    pub fn get_as(&mut self, ty: &ValueType) -> Result<Value, CodecError> {
        self.read(Some(ty))
    }

    pub(crate) fn read(&mut self, hint: Option<&ValueType>) -> Result<Value, CodecError> {
        let offset = self.cursor.location();
        let tag = self.cursor.get_i32()?;
        let kind = Kind::from_tag(tag).ok_or(CodecError::UnsupportedKind(tag))?;
        if let Some(value) = primitive::decode(&mut self.cursor, kind)? {
            return Ok(value);
        }
        if self.depth >= self.max_depth {
            return Err(CodecError::InvalidData {
                offset,
                reason: format!("nesting deeper than {}", self.max_depth),
            });
        }
        self.depth += 1;
        let result = match kind {
            Kind::Invalid | Kind::Ptr => message::decode_message(self),
            Kind::Slice => collection::decode_slice(self, hint),
            Kind::Map => collection::decode_map(self, hint),
            scalar => Err(CodecError::UnsupportedKind(scalar.tag())),
        };
        self.depth -= 1;
        result
    }

    /// Raw cursor access for payload codecs.
    pub fn cursor(&mut self) -> &mut ReadCursor<'a> {
        &mut self.cursor
    }

    pub fn registry(&self) -> &'a dyn Registry {
        self.registry
    }

    pub(crate) fn codecs(&self) -> &Arc<PayloadCodecs> {
        &self.codecs
    }

    pub fn location(&self) -> usize {
        self.cursor.location()
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }
}

/// Encode a single value; `Nil` yields `None` without touching the codec.
pub fn data_of(value: &Value) -> Result<Option<Vec<u8>>, CodecError> {
    if value.is_nil() {
        return Ok(None);
    }
    let mut encoder = Encoder::new();
    encoder.add(value)?;
    Ok(Some(encoder.into_bytes()))
}

/// Decode a single value; empty input yields `Nil`.
pub fn elem_of(data: &[u8], registry: &dyn Registry) -> Result<Value, CodecError> {
    if data.is_empty() {
        return Ok(Value::Nil);
    }
    Decoder::new(data, 0, registry).get()
}

/// Decode standard Base64 transport text back to envelope bytes.
pub fn from_base64(text: &str) -> Result<Vec<u8>, CodecError> {
    Ok(STANDARD.decode(text)?)
}
