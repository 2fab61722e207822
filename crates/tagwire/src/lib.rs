// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # tagwire
//!
//! Kind-tagged binary serialization and schema introspection for message
//! types described at runtime.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tagwire::{
//!     Decoder, Encoder, Instance, Introspector, MessageDescriptorBuilder, Registry,
//!     TypeRegistry, Value, ValueType,
//! };
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry.register(MessageDescriptorBuilder::new("Sensor").string_field("Name").build());
//! registry.register(
//!     MessageDescriptorBuilder::new("Fleet")
//!         .list_field("Sensors", ValueType::message("Sensor"))
//!         .build(),
//! );
//!
//! // Encode a message and read it back.
//! let mut sensor = registry.new_instance("Sensor").unwrap();
//! sensor.set("Name", "lidar").unwrap();
//! let mut enc = Encoder::new();
//! enc.add(&Value::from(sensor.clone())).unwrap();
//! let bytes = enc.into_bytes();
//! let decoded = Decoder::new(&bytes, 0, registry.as_ref()).get().unwrap();
//! assert_eq!(decoded, Value::from(sensor));
//!
//! // Walk the schema and address a value by path.
//! let introspector = Introspector::new(registry.clone());
//! let fleet_desc = registry.info("Fleet").unwrap().descriptor().clone();
//! introspector.inspect_descriptor(&fleet_desc).unwrap();
//! let name = Instance::of("fleet.sensors<{i32}0>.name", &introspector).unwrap();
//! let mut fleet = Value::Nil;
//! name.set(&mut fleet, Value::from("radar")).unwrap();
//! assert_eq!(name.get(Some(&fleet)).unwrap(), Value::from("radar"));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Values, value types, message descriptors and messages |
//! | [`registry`] | Type name to descriptor/factory lookup |
//! | [`codec`] | Envelope encoder/decoder and per-type payload codecs |
//! | [`introspect`] | Schema node graph, table views, decorators |
//! | [`instance`] | Path-addressed reads and writes into values |
//! | [`config`] | Wire constants and buffer sizing |

pub mod codec;
pub mod config;
pub mod instance;
pub mod introspect;
pub mod registry;
pub mod types;

pub use codec::{
    data_of, elem_of, from_base64, CodecError, Decoder, Encoder, FieldPayloadCodec, Kind,
    PayloadCodec, PayloadCodecs, PayloadError,
};
pub use config::CodecConfig;
pub use instance::{format_key, parse_key, Instance, PathError};
pub use introspect::{DecoratorKind, IntrospectError, Introspector, Node, TableView};
pub use registry::{Registry, RegistryError, TypeInfo, TypeRegistry};
pub use types::{
    FieldDescriptor, FieldError, FromValue, ListValue, MapValue, Message, MessageDescriptor,
    MessageDescriptorBuilder, TypedValue, Value, ValueType,
};
