// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire constants and codec configuration.
//!
//! All framing constants of the kind-tagged format live here.
//! **Never hardcode a sentinel elsewhere.**
//!
//! # Wire layout
//!
//! ```text
//! value   := [kind:i32 BE][payload]
//! string  := [len:i32][utf8 bytes]
//! slice   := [len:i32] ( len == -1 | [disc:u8] (raw bytes | len x value) )
//! map     := [count:i32] ( count == -1 | count x (value value) )
//! message := [sentinel:i32][type name:string][payload if sentinel > 0]
//! ```

/// Length sentinel for nil or empty slices/maps and nil messages.
pub const NIL_SENTINEL: i32 = -1;

/// Length sentinel for a message whose payload is zero bytes long.
pub const EMPTY_SENTINEL: i32 = -2;

/// Slice discriminator: raw byte payload follows.
pub const RAW_BYTES: u8 = 1;

/// Slice discriminator: `len` kind-tagged elements follow.
pub const ELEMENT_WISE: u8 = 0;

/// Initial encode buffer size.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Flat margin added when doubling alone cannot fit a write.
pub const DEFAULT_GROWTH_MARGIN: usize = 512;

/// Deepest value nesting a decoder accepts.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Encode buffer sizing and decode limits.
///
/// Growth never shrinks: when `location + need` exceeds the buffer, the new
/// length is `max(2 * len, location + need + growth_margin)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Bytes allocated by a fresh encoder.
    pub initial_capacity: usize,
    /// Safety margin used when doubling is insufficient.
    pub growth_margin: usize,
    /// Nesting limit for decoded lists, maps and messages.
    pub max_depth: usize,
}

impl CodecConfig {
    /// Config with an explicit initial capacity and the default margin.
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_margin: DEFAULT_GROWTH_MARGIN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = CodecConfig::default();
        assert_eq!(config.initial_capacity, 1024);
        assert_eq!(config.growth_margin, 512);
        assert_eq!(config.max_depth, 128);
    }

    #[test]
    fn test_with_initial_capacity_keeps_margin() {
        let config = CodecConfig::with_initial_capacity(16);
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.growth_margin, DEFAULT_GROWTH_MARGIN);
    }

    #[test]
    fn test_sentinels_are_distinct_and_negative() {
        assert!(NIL_SENTINEL < 0);
        assert!(EMPTY_SENTINEL < 0);
        assert_ne!(NIL_SENTINEL, EMPTY_SENTINEL);
        assert_ne!(RAW_BYTES, ELEMENT_WISE);
    }
}
