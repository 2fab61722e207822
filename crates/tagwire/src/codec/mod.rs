// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Self-describing binary codec.
//!
//! # Wire format
//!
//! Every value is `[kind:i32][payload]`, all integers big-endian:
//!
//! | Kind | Payload |
//! |------|---------|
//! | bool | 1 byte |
//! | int32, uint32, float32 | 4 bytes |
//! | int, int64, uint64, float64 | 8 bytes |
//! | string | `[len:i32][utf8]` |
//! | slice | `[len:i32]`, `-1` for nil/empty, else `[1][raw bytes]` or `[0][len x value]` |
//! | map | `[count:i32]`, `-1` for nil/empty, else `count x (key, value)` |
//! | ptr | `[sentinel:i32]` (`-1` nil, `-2` empty, else length) `[type name][payload]` |
//!
//! # Example
//!
//! ```
//! use tagwire::codec::{Decoder, Encoder};
//! use tagwire::{TypeRegistry, Value};
//!
//! let mut enc = Encoder::new();
//! enc.add(&Value::from(vec![1i32, 2, 3])).unwrap();
//! let bytes = enc.into_bytes();
//!
//! let registry = TypeRegistry::new();
//! let value = Decoder::new(&bytes, 0, &registry).get().unwrap();
//! assert_eq!(value, Value::from(vec![1i32, 2, 3]));
//! ```

mod buffer;
mod collection;
mod envelope;
mod error;
mod kind;
mod message;
mod payload;
mod primitive;

pub use buffer::{ReadCursor, WriteBuffer};
pub use envelope::{data_of, elem_of, from_base64, Decoder, Encoder};
pub use error::{CodecError, PayloadError};
pub use kind::Kind;
pub use payload::{FieldPayloadCodec, PayloadCodec, PayloadCodecs, PayloadCodecsBuilder};
