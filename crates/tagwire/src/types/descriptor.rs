// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime description of message types.

use crate::types::ValueType;

/// Description of a message type: its name and ordered fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Bare type name, as written on the wire.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_number(&self, number: i32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// Field matched case-insensitively, as instance paths are lowercased.
    pub fn field_ignore_case(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field(name)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }

    /// Fields introspection walks, bookkeeping fields excluded.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !is_ignored_name(&f.name))
    }
}

/// One field of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Wire identifier used by the field payload codec.
    pub number: i32,
    pub ty: ValueType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, number: i32, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            number,
            ty,
        }
    }
}

/// Bookkeeping field names skipped by introspection.
///
/// Covers `DoNotCompare`, `DoNotCopy`, generated `XXX*` fields and any name
/// that does not start with an uppercase letter.
pub fn is_ignored_name(name: &str) -> bool {
    if name == "DoNotCompare" || name == "DoNotCopy" {
        return true;
    }
    if name.len() > 3 && name.starts_with("XXX") {
        return true;
    }
    name.chars().next().map_or(true, |c| !c.is_uppercase())
}
