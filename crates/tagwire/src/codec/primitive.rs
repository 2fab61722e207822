// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-width and length-prefixed scalar payloads.

use super::{CodecError, Kind, ReadCursor, WriteBuffer};
use crate::types::Value;

/// Write the payload of a scalar or string value.
///
/// Returns `Ok(false)` without writing when `value` is not a scalar.
pub(crate) fn encode(buf: &mut WriteBuffer, value: &Value) -> Result<bool, CodecError> {
    match value {
        Value::Bool(v) => buf.put_bool(*v),
        Value::Int(v) | Value::Int64(v) => buf.put_i64(*v),
        Value::Int32(v) => buf.put_i32(*v),
        Value::UInt32(v) => buf.put_u32(*v),
        Value::UInt64(v) => buf.put_u64(*v),
        Value::Float32(v) => buf.put_f32(*v),
        Value::Float64(v) => buf.put_f64(*v),
        Value::String(v) => buf.put_str(v)?,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Read the payload of a scalar kind.
///
/// Returns `Ok(None)` for kinds that are not scalars.
pub(crate) fn decode(cursor: &mut ReadCursor<'_>, kind: Kind) -> Result<Option<Value>, CodecError> {
    let value = match kind {
        Kind::Bool => Value::Bool(cursor.get_bool()?),
        Kind::Int => Value::Int(cursor.get_i64()?),
        Kind::Int32 => Value::Int32(cursor.get_i32()?),
        Kind::Int64 => Value::Int64(cursor.get_i64()?),
        Kind::UInt32 => Value::UInt32(cursor.get_u32()?),
        Kind::UInt64 => Value::UInt64(cursor.get_u64()?),
        Kind::Float32 => Value::Float32(cursor.get_f32()?),
        Kind::Float64 => Value::Float64(cursor.get_f64()?),
        Kind::String => Value::String(cursor.get_string()?),
        Kind::Invalid | Kind::Map | Kind::Ptr | Kind::Slice => return Ok(None),
    };
    Ok(Some(value))
}
