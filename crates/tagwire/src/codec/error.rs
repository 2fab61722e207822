// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types of the kind-tagged codec.

use crate::registry::RegistryError;
use std::fmt;

/// Errors surfaced by [`Encoder`](super::Encoder) and [`Decoder`](super::Decoder).
///
/// A failed call aborts that single operation. On the encode side the shared
/// buffer may already hold the bytes written before the failure; callers
/// discard the encoder rather than expect a rollback.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// The kind tag read from the wire has no codec.
    UnsupportedKind(i32),
    /// A message type name is absent from the registry.
    UnknownType(String),
    /// The registry knows the type but could not build an instance.
    Instantiation { type_name: String, reason: String },
    /// The message payload could not be written or parsed.
    Payload { type_name: String, reason: String },
    /// Input ended before a value was complete.
    ReadFailed { offset: usize, reason: String },
    /// Bytes were present but do not form a valid value.
    InvalidData { offset: usize, reason: String },
    /// A collection entry does not match the collection's declared type.
    TypeMismatch { expected: String, found: String },
    /// No entry of a decoded collection carries a concrete type.
    UninferableType(&'static str),
    /// Transport text is not valid Base64.
    Base64(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedKind(kind) => write!(f, "no codec for kind {}", kind),
            Self::UnknownType(name) => {
                write!(f, "unknown type {}, must be registered", name)
            }
            Self::Instantiation { type_name, reason } => {
                write!(f, "cannot instantiate {}: {}", type_name, reason)
            }
            Self::Payload { type_name, reason } => {
                write!(f, "payload of {} is invalid: {}", type_name, reason)
            }
            Self::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            Self::InvalidData { offset, reason } => {
                write!(f, "invalid data at offset {}: {}", offset, reason)
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Self::UninferableType(what) => write!(
                f,
                "cannot infer {} type: no entry carries a non-nil value",
                what
            ),
            Self::Base64(reason) => write!(f, "base64: {}", reason),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<RegistryError> for CodecError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(name) => Self::UnknownType(name),
            RegistryError::Instantiation { type_name, reason } => {
                Self::Instantiation { type_name, reason }
            }
        }
    }
}

impl From<base64::DecodeError> for CodecError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64(err.to_string())
    }
}

/// Errors raised by a [`PayloadCodec`](super::PayloadCodec).
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadError {
    /// The payload names a field number the descriptor does not declare.
    UnknownField(i32),
    /// A field value does not fit the declared field.
    Field { name: String, reason: String },
    /// A nested envelope value failed.
    Codec(Box<CodecError>),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(number) => write!(f, "unknown field number {}", number),
            Self::Field { name, reason } => write!(f, "field {}: {}", name, reason),
            Self::Codec(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PayloadError {}

impl From<CodecError> for PayloadError {
    fn from(err: CodecError) -> Self {
        Self::Codec(Box::new(err))
    }
}
