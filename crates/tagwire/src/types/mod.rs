// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value model: dynamic values, their static types and message descriptors.

mod builder;
mod descriptor;
mod message;
mod value;
mod value_type;

pub use builder::MessageDescriptorBuilder;
pub use descriptor::{is_ignored_name, FieldDescriptor, MessageDescriptor};
pub use message::{FieldError, Message};
pub use value::{FromValue, ListValue, MapValue, TypedValue, Value};
pub use value_type::ValueType;
