// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message framing: `[len sentinel:i32][type name][payload]`.
//!
//! The sentinel is `-1` for nil, `-2` for an empty payload and the payload
//! length otherwise. The payload itself is written by the [`PayloadCodec`]
//! registered for the type.
//!
//! [`PayloadCodec`]: super::PayloadCodec

use super::{CodecError, Decoder, Encoder, PayloadError};
use crate::config::{EMPTY_SENTINEL, NIL_SENTINEL};
use crate::types::{Message, Value};
use std::sync::Arc;

pub(crate) fn encode_nil(enc: &mut Encoder) {
    enc.buffer().put_i32(NIL_SENTINEL);
}

pub(crate) fn encode_message(enc: &mut Encoder, msg: &Message) -> Result<(), CodecError> {
    let slot = enc.buffer().reserve_i32();
    enc.buffer().put_str(msg.type_name())?;
    let start = enc.location();

    let codec = Arc::clone(enc.codecs().codec_for(msg.type_name()));
    codec
        .marshal(msg, enc)
        .map_err(|e| payload_error(msg.type_name(), e))?;

    let written = enc.location() - start;
    let sentinel = if written == 0 {
        EMPTY_SENTINEL
    } else {
        i32::try_from(written).map_err(|_| CodecError::Payload {
            type_name: msg.type_name().to_string(),
            reason: format!("payload of {} bytes does not fit in an int32", written),
        })?
    };
    enc.buffer().patch_i32(slot, sentinel);
    Ok(())
}

pub(crate) fn decode_message(dec: &mut Decoder<'_>) -> Result<Value, CodecError> {
    let offset = dec.location();
    let sentinel = dec.cursor().get_i32()?;
    if sentinel == NIL_SENTINEL || sentinel == 0 {
        return Ok(Value::Nil);
    }
    if sentinel < EMPTY_SENTINEL {
        return Err(CodecError::InvalidData {
            offset,
            reason: format!("invalid message length {}", sentinel),
        });
    }
    let type_name = dec.cursor().get_string()?;
    let info = dec.registry().info(&type_name)?;
    let mut msg = info.new_instance()?;
    if sentinel == EMPTY_SENTINEL {
        return Ok(Value::from(msg));
    }

    // sentinel > 0 here
    let len = sentinel.unsigned_abs() as usize;
    let payload = dec.cursor().bounded(len)?;
    let mut nested = dec.nested(payload);
    let codec = Arc::clone(dec.codecs().codec_for(&type_name));
    codec
        .unmarshal(&mut nested, &mut msg)
        .map_err(|e| payload_error(&type_name, e))?;
    Ok(Value::from(msg))
}

/// Codec failures inside a payload surface unchanged; format problems are
/// reported against the message type.
fn payload_error(type_name: &str, err: PayloadError) -> CodecError {
    match err {
        PayloadError::Codec(inner) => *inner,
        other => CodecError::Payload {
            type_name: type_name.to_string(),
            reason: other.to_string(),
        },
    }
}
