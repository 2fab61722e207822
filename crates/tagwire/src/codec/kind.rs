// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kind tags written in front of every envelope value.

use std::fmt;

/// Enumerated type discriminator of the wire format.
///
/// The numeric values are part of the format and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Kind {
    /// Untyped nil. Only ever read; decoded like [`Kind::Ptr`].
    Invalid = 0,
    Bool = 1,
    /// Platform integer, always 8 bytes on the wire.
    Int = 2,
    Int32 = 5,
    Int64 = 6,
    UInt32 = 10,
    UInt64 = 11,
    Float32 = 13,
    Float64 = 14,
    Map = 21,
    /// Message reference, nil included.
    Ptr = 22,
    Slice = 23,
    String = 24,
}

impl Kind {
    /// Tag value as written on the wire.
    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Resolve a wire tag.
    pub fn from_tag(tag: i32) -> Option<Self> {
        let kind = match tag {
            0 => Self::Invalid,
            1 => Self::Bool,
            2 => Self::Int,
            5 => Self::Int32,
            6 => Self::Int64,
            10 => Self::UInt32,
            11 => Self::UInt64,
            13 => Self::Float32,
            14 => Self::Float64,
            21 => Self::Map,
            22 => Self::Ptr,
            23 => Self::Slice,
            24 => Self::String,
            _ => return None,
        };
        Some(kind)
    }

    /// Fixed payload width, `None` for variable-width kinds.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Bool => Some(1),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int | Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            _ => None,
        }
    }

    /// Lowercase name, also used as the type name of scalar schema leaves.
    pub fn name(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Map => "map",
            Self::Ptr => "ptr",
            Self::Slice => "slice",
            Self::String => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
