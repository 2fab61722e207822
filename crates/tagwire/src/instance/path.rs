// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instance id tokenizer: `root<key>.field.field<key>`.

use super::key_text;
use crate::registry::Registry;
use crate::types::Value;

/// One `name<key>` step of an instance id.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Segment {
    pub name: String,
    pub key: Option<Value>,
}

/// Split an instance id into segments, decoding embedded keys.
///
/// Malformed or undecodable keys are dropped; the segment keeps its name.
pub(crate) fn parse(id: &str, registry: &dyn Registry) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = id;
    loop {
        let end = rest.find(['.', '<']).unwrap_or(rest.len());
        let name = rest[..end].to_string();
        rest = &rest[end..];

        let mut key = None;
        if let Some(body) = rest.strip_prefix('<') {
            match key_text::scan(body) {
                Some(len) => {
                    key = key_text::parse_key(&body[..len], registry);
                    rest = &body[len + 1..];
                }
                None => {
                    let skip = rest.find('>').map_or_else(
                        || rest.find('.').unwrap_or(rest.len()),
                        |close| close + 1,
                    );
                    rest = &rest[skip..];
                }
            }
            // text between the key and the next separator is ignored
            rest = &rest[rest.find('.').unwrap_or(rest.len())..];
        }

        segments.push(Segment { name, key });
        match rest.strip_prefix('.') {
            Some(next) => rest = next,
            None => break,
        }
    }
    segments
}
