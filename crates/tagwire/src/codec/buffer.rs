// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Growable write buffer and bounds-checked read cursor.
//!
//! All multi-byte numerics are big-endian. The write side owns its buffer and
//! grows it; the read side borrows the input and never grows or copies it.

use super::CodecError;
use crate::config::CodecConfig;

/// Generate big-endian write methods for fixed-width numerics.
///
/// Each generated method:
/// 1. Ensures capacity for the value
/// 2. Copies `to_be_bytes()` at the cursor
/// 3. Advances the cursor
macro_rules! impl_write_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, value: $type) {
            self.ensure_capacity($size);
            self.data[self.location..self.location + $size].copy_from_slice(&value.to_be_bytes());
            self.location += $size;
        }
    };
}

/// Generate big-endian read methods for fixed-width numerics.
///
/// Each generated method:
/// 1. Checks bounds (returns `CodecError::ReadFailed` on overflow)
/// 2. Reads N bytes and converts via `from_be_bytes()`
/// 3. Advances the cursor
macro_rules! impl_read_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> Result<$type, CodecError> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.get_bytes($size)?);
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

/// Encode-side buffer with a write cursor.
///
/// Nested encoders borrow this mutably, so a reallocation at any nesting
/// depth is seen by every enclosing writer.
#[derive(Debug, Clone)]
pub struct WriteBuffer {
    data: Vec<u8>,
    location: usize,
    growth_margin: usize,
}

impl WriteBuffer {
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            data: vec![0; config.initial_capacity],
            location: 0,
            growth_margin: config.growth_margin,
        }
    }

    /// Make room for `need` more bytes at the cursor.
    ///
    /// The buffer at least doubles; when doubling is not enough it grows to
    /// `location + need + growth_margin`. It never shrinks.
    pub fn ensure_capacity(&mut self, need: usize) {
        let required = self.location + need;
        if required <= self.data.len() {
            return;
        }
        let mut new_len = self.data.len() * 2;
        if new_len < required + self.growth_margin {
            new_len = required + self.growth_margin;
        }
        self.data.resize(new_len, 0);
    }

    impl_write_be!(put_i32, i32, 4);
    impl_write_be!(put_u32, u32, 4);
    impl_write_be!(put_i64, i64, 8);
    impl_write_be!(put_u64, u64, 8);

    pub fn put_u8(&mut self, value: u8) {
        self.ensure_capacity(1);
        self.data[self.location] = value;
        self.location += 1;
    }

    pub fn put_bool(&mut self, value: bool) {
        self.put_u8(u8::from(value));
    }

    pub fn put_f32(&mut self, value: f32) {
        self.put_u32(value.to_bits());
    }

    pub fn put_f64(&mut self, value: f64) {
        self.put_u64(value.to_bits());
    }

    /// Write a collection or string length as an int32.
    pub fn put_len(&mut self, len: usize) -> Result<(), CodecError> {
        let len = i32::try_from(len).map_err(|_| CodecError::InvalidData {
            offset: self.location,
            reason: format!("length {} does not fit in an int32", len),
        })?;
        self.put_i32(len);
        Ok(())
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.ensure_capacity(bytes.len());
        self.data[self.location..self.location + bytes.len()].copy_from_slice(bytes);
        self.location += bytes.len();
    }

    /// `[len:i32][utf8 bytes]`, no terminator.
    pub fn put_str(&mut self, value: &str) -> Result<(), CodecError> {
        self.put_len(value.len())?;
        self.put_bytes(value.as_bytes());
        Ok(())
    }

    /// Skip an int32 slot to be filled by [`patch_i32`](Self::patch_i32).
    pub fn reserve_i32(&mut self) -> usize {
        let slot = self.location;
        self.put_i32(0);
        slot
    }

    /// Overwrite a previously reserved int32 slot.
    pub fn patch_i32(&mut self, slot: usize, value: i32) {
        self.data[slot..slot + 4].copy_from_slice(&value.to_be_bytes());
    }

    /// Bytes written so far.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.location]
    }

    pub fn location(&self) -> usize {
        self.location
    }

    /// Current allocated length, written or not.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.data.truncate(self.location);
        self.data
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode-side cursor over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct ReadCursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Start reading at `offset`.
    pub fn at(buffer: &'a [u8], offset: usize) -> Self {
        Self { buffer, offset }
    }

    impl_read_be!(get_i32, i32, 4);
    impl_read_be!(get_u32, u32, 4);
    impl_read_be!(get_i64, i64, 8);
    impl_read_be!(get_u64, u64, 8);

    pub fn get_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.get_bytes(1)?[0])
    }

    /// Only `1` decodes as `true`.
    pub fn get_bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.get_u8()? == 1)
    }

    pub fn get_f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_bits(self.get_u32()?))
    }

    pub fn get_f64(&mut self) -> Result<f64, CodecError> {
        Ok(f64::from_bits(self.get_u64()?))
    }

    pub fn get_bytes(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if len > self.remaining() {
            return Err(CodecError::ReadFailed {
                offset: self.offset,
                reason: "unexpected end of buffer".into(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Split off the next `len` bytes as a cursor of their own.
    ///
    /// The returned cursor keeps absolute offsets and cannot read past the
    /// split; `self` advances by exactly `len`.
    pub fn bounded(&mut self, len: usize) -> Result<ReadCursor<'a>, CodecError> {
        let start = self.offset;
        let end = start + self.get_bytes(len)?.len();
        let buffer: &'a [u8] = self.buffer;
        Ok(ReadCursor::at(&buffer[..end], start))
    }

    pub fn get_string(&mut self) -> Result<String, CodecError> {
        let start = self.offset;
        let len = self.get_i32()?;
        let len = usize::try_from(len).map_err(|_| CodecError::InvalidData {
            offset: start,
            reason: format!("negative string length {}", len),
        })?;
        let bytes = self.get_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::InvalidData {
            offset: start,
            reason: e.to_string(),
        })
    }

    pub fn location(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}
