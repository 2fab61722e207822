// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed key text embedded in instance ids as `<{tag}text>`.
//!
//! A decimal tag is the byte length of a string key, so `{5}abcde` is the
//! string `abcde` and string keys may contain `.`, `<` and `>`. Other
//! scalars use a type tag (`{i32}42`, `{bool}true`); anything else is its
//! Base64 envelope under `{b64}`.

use crate::codec::{elem_of, from_base64, CodecError, Encoder};
use crate::registry::Registry;
use crate::types::Value;

/// Key text of `value`, without the surrounding brackets.
pub fn format_key(value: &Value) -> Result<String, CodecError> {
    let text = match value {
        Value::String(s) => format!("{{{}}}{}", s.len(), s),
        Value::Bool(v) => format!("{{bool}}{}", v),
        Value::Int(v) => format!("{{int}}{}", v),
        Value::Int32(v) => format!("{{i32}}{}", v),
        Value::Int64(v) => format!("{{i64}}{}", v),
        Value::UInt32(v) => format!("{{u32}}{}", v),
        Value::UInt64(v) => format!("{{u64}}{}", v),
        Value::Float32(v) => format!("{{f32}}{}", v),
        Value::Float64(v) => format!("{{f64}}{}", v),
        other => {
            let mut enc = Encoder::new();
            enc.add(other)?;
            format!("{{b64}}{}", enc.base64())
        }
    };
    Ok(text)
}

/// Byte length of the key text at the start of `input`, up to but not
/// including the closing `>`. `None` when the text is malformed.
pub(crate) fn scan(input: &str) -> Option<usize> {
    let tag_end = input.strip_prefix('{')?.find('}')? + 1;
    let body_start = tag_end + 1;
    let tag = &input[1..tag_end];
    let body_end = match string_len(tag) {
        Some(len) => {
            let end = body_start.checked_add(len)?;
            input.get(body_start..end)?;
            end
        }
        None => body_start + input[body_start..].find('>')?,
    };
    input[body_end..].starts_with('>').then_some(body_end)
}

/// Parse key text produced by [`format_key`]. Malformed text yields `None`.
pub fn parse_key(text: &str, registry: &dyn Registry) -> Option<Value> {
    let tag_end = text.strip_prefix('{')?.find('}')? + 1;
    let tag = &text[1..tag_end];
    let body = &text[tag_end + 1..];
    if let Some(len) = string_len(tag) {
        return (body.len() == len).then(|| Value::String(body.to_string()));
    }
    let value = match tag {
        "bool" => Value::Bool(body.parse().ok()?),
        "int" => Value::Int(body.parse().ok()?),
        "i32" => Value::Int32(body.parse().ok()?),
        "i64" => Value::Int64(body.parse().ok()?),
        "u32" => Value::UInt32(body.parse().ok()?),
        "u64" => Value::UInt64(body.parse().ok()?),
        "f32" => Value::Float32(body.parse().ok()?),
        "f64" => Value::Float64(body.parse().ok()?),
        "b64" => {
            let data = from_base64(body).ok()?;
            elem_of(&data, registry).ok()?
        }
        _ => return None,
    };
    Some(value)
}

fn string_len(tag: &str) -> Option<usize> {
    if tag.is_empty() || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tag.parse().ok()
}
