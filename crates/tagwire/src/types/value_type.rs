// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static type of a value: collection element types, field types, zero values.

use crate::codec::Kind;
use crate::types::Value;
use std::fmt;

/// Closed set of types the codec can carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Bytes,
    List(Box<ValueType>),
    Map(Box<ValueType>, Box<ValueType>),
    /// Registered message, referenced by type name.
    Message(String),
}

impl ValueType {
    /// List of `elem`.
    pub fn list(elem: ValueType) -> Self {
        Self::List(Box::new(elem))
    }

    /// Map from `key` to `value`.
    pub fn map(key: ValueType, value: ValueType) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Message referenced by name.
    pub fn message(name: impl Into<String>) -> Self {
        Self::Message(name.into())
    }

    /// Type of a value, `None` for [`Value::Nil`].
    pub fn of(value: &Value) -> Option<Self> {
        let ty = match value {
            Value::Nil => return None,
            Value::Bool(_) => Self::Bool,
            Value::Int(_) => Self::Int,
            Value::Int32(_) => Self::Int32,
            Value::Int64(_) => Self::Int64,
            Value::UInt32(_) => Self::UInt32,
            Value::UInt64(_) => Self::UInt64,
            Value::Float32(_) => Self::Float32,
            Value::Float64(_) => Self::Float64,
            Value::String(_) => Self::String,
            Value::Bytes(_) => Self::Bytes,
            Value::List(list) => Self::list(list.elem_type().clone()),
            Value::Map(map) => Self::map(map.key_type().clone(), map.value_type().clone()),
            Value::Message(msg) => Self::Message(msg.type_name().to_string()),
        };
        Some(ty)
    }

    /// Zero value. Collections, bytes and messages are absent ([`Value::Nil`]).
    pub fn zero(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Int32 => Value::Int32(0),
            Self::Int64 => Value::Int64(0),
            Self::UInt32 => Value::UInt32(0),
            Self::UInt64 => Value::UInt64(0),
            Self::Float32 => Value::Float32(0.0),
            Self::Float64 => Value::Float64(0.0),
            Self::String => Value::String(String::new()),
            Self::Bytes | Self::List(_) | Self::Map(..) | Self::Message(_) => Value::Nil,
        }
    }

    /// Whether `value` can be stored where this type is declared.
    ///
    /// Nil fits every type.
    pub fn accepts(&self, value: &Value) -> bool {
        match Self::of(value) {
            None => true,
            Some(actual) => &actual == self,
        }
    }

    /// Wire kind that carries values of this type.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool => Kind::Bool,
            Self::Int => Kind::Int,
            Self::Int32 => Kind::Int32,
            Self::Int64 => Kind::Int64,
            Self::UInt32 => Kind::UInt32,
            Self::UInt64 => Kind::UInt64,
            Self::Float32 => Kind::Float32,
            Self::Float64 => Kind::Float64,
            Self::String => Kind::String,
            Self::Bytes | Self::List(_) => Kind::Slice,
            Self::Map(..) => Kind::Map,
            Self::Message(_) => Kind::Ptr,
        }
    }

    /// Scalars and bytes; anything that is not a list, map or message.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(..) | Self::Message(_))
    }

    /// Message type name, when this is a message.
    pub fn message_name(&self) -> Option<&str> {
        match self {
            Self::Message(name) => Some(name),
            _ => None,
        }
    }

    /// Name used for schema nodes: the message name or the scalar kind name.
    pub fn type_name(&self) -> String {
        match self {
            Self::Message(name) => name.clone(),
            Self::Bytes => "bytes".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes => f.write_str("bytes"),
            Self::List(elem) => write!(f, "[]{}", elem),
            Self::Map(key, value) => write!(f, "map[{}]{}", key, value),
            Self::Message(name) => write!(f, "*{}", name),
            scalar => f.write_str(scalar.kind().name()),
        }
    }
}
