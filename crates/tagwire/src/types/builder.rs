// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for MessageDescriptor.

use crate::types::{FieldDescriptor, MessageDescriptor, ValueType};
use std::sync::Arc;

/// Builder for creating MessageDescriptor instances.
///
/// Fields without an explicit number get the next number after the highest
/// one assigned so far, starting at 1.
#[derive(Debug)]
pub struct MessageDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    next_number: i32,
}

impl MessageDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            next_number: 1,
        }
    }

    /// Add a field with an automatically assigned number.
    pub fn field(self, name: impl Into<String>, ty: ValueType) -> Self {
        let number = self.next_number;
        self.field_with_number(name, number, ty)
    }

    /// Add a field with an explicit wire number.
    pub fn field_with_number(mut self, name: impl Into<String>, number: i32, ty: ValueType) -> Self {
        self.fields.push(FieldDescriptor::new(name, number, ty));
        self.next_number = self.next_number.max(number.saturating_add(1));
        self
    }

    pub fn bool_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::Bool)
    }

    pub fn int_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::Int)
    }

    pub fn int32_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::Int32)
    }

    pub fn int64_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::Int64)
    }

    pub fn uint32_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::UInt32)
    }

    pub fn uint64_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::UInt64)
    }

    pub fn float32_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::Float32)
    }

    pub fn float64_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::Float64)
    }

    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::String)
    }

    pub fn bytes_field(self, name: impl Into<String>) -> Self {
        self.field(name, ValueType::Bytes)
    }

    /// Add a list field.
    pub fn list_field(self, name: impl Into<String>, elem: ValueType) -> Self {
        self.field(name, ValueType::list(elem))
    }

    /// Add a map field.
    pub fn map_field(self, name: impl Into<String>, key: ValueType, value: ValueType) -> Self {
        self.field(name, ValueType::map(key, value))
    }

    /// Add a field referencing another registered message by name.
    pub fn message_field(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.field(name, ValueType::message(type_name))
    }

    pub fn build(self) -> Arc<MessageDescriptor> {
        Arc::new(MessageDescriptor::new(self.name, self.fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_assigns_numbers_in_order() {
        let desc = MessageDescriptorBuilder::new("Point")
            .int32_field("X")
            .int32_field("Y")
            .build();
        assert_eq!(desc.name(), "Point");
        assert_eq!(desc.fields().len(), 2);
        assert_eq!(desc.field("X").map(|f| f.number), Some(1));
        assert_eq!(desc.field("Y").map(|f| f.number), Some(2));
    }

    #[test]
    fn test_builder_explicit_numbers_advance_counter() {
        let desc = MessageDescriptorBuilder::new("Sparse")
            .field_with_number("A", 10, ValueType::String)
            .bool_field("B")
            .build();
        assert_eq!(desc.field("B").map(|f| f.number), Some(11));
    }

    #[test]
    fn test_builder_composite_fields() {
        let desc = MessageDescriptorBuilder::new("Node")
            .list_field("Children", ValueType::message("Node"))
            .map_field("Tags", ValueType::String, ValueType::Int64)
            .message_field("Parent", "Node")
            .build();
        assert_eq!(
            desc.field("Children").map(|f| f.ty.clone()),
            Some(ValueType::list(ValueType::message("Node")))
        );
        assert_eq!(
            desc.field("Parent").map(|f| f.ty.clone()),
            Some(ValueType::message("Node"))
        );
    }
}
