// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic message instances.

use crate::types::{FromValue, MessageDescriptor, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Errors for message field access.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    NotFound { type_name: String, field: String },
    TypeMismatch { field: String, expected: String, got: String },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { type_name, field } => {
                write!(f, "field {} not found in {}", field, type_name)
            }
            Self::TypeMismatch {
                field,
                expected,
                got,
            } => write!(
                f,
                "type mismatch for field {}: expected {}, got {}",
                field, expected, got
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Instance of a registered message type.
///
/// Unset fields read as absent; setting a field to [`Value::Nil`] unsets it.
#[derive(Debug, Clone)]
pub struct Message {
    descriptor: Arc<MessageDescriptor>,
    fields: BTreeMap<String, Value>,
}

impl Message {
    /// Empty instance with no field set.
    pub fn new(descriptor: &Arc<MessageDescriptor>) -> Self {
        Self {
            descriptor: descriptor.clone(),
            fields: BTreeMap::new(),
        }
    }

    pub fn descriptor(&self) -> &Arc<MessageDescriptor> {
        &self.descriptor
    }

    pub fn type_name(&self) -> &str {
        self.descriptor.name()
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of a set field, `None` when unset or undeclared.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Typed read of a set field.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, FieldError> {
        let desc = self.declared(name)?;
        let value = self.fields.get(name).unwrap_or(&Value::Nil);
        T::from_value(value).ok_or_else(|| FieldError::TypeMismatch {
            field: name.to_string(),
            expected: desc.ty.to_string(),
            got: describe(value),
        })
    }

    /// Set a declared field, checking the value against its type.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FieldError> {
        let value = value.into();
        let desc = self.declared(name)?;
        if !desc.ty.accepts(&value) {
            return Err(FieldError::TypeMismatch {
                field: name.to_string(),
                expected: desc.ty.to_string(),
                got: describe(&value),
            });
        }
        if value.is_nil() {
            self.fields.remove(name);
        } else {
            self.fields.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Mutable access to a declared field, set to its zero value first when unset.
    ///
    /// Composite fields start out as [`Value::Nil`]; callers replace them.
    pub fn field_mut(&mut self, name: &str) -> Result<&mut Value, FieldError> {
        let zero = self.declared(name)?.ty.zero();
        Ok(self.fields.entry(name.to_string()).or_insert(zero))
    }

    /// Unset a field, returning its previous value.
    pub fn clear(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Set fields in descriptor order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.descriptor
            .fields()
            .iter()
            .filter_map(|f| self.fields.get(&f.name).map(|v| (f.name.as_str(), v)))
    }

    fn declared(&self, name: &str) -> Result<&crate::types::FieldDescriptor, FieldError> {
        self.descriptor
            .field(name)
            .ok_or_else(|| FieldError::NotFound {
                type_name: self.descriptor.name().to_string(),
                field: name.to_string(),
            })
    }
}

fn describe(value: &Value) -> String {
    value
        .value_type()
        .map_or_else(|| "nil".to_string(), |ty| ty.to_string())
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name() == other.descriptor.name() && self.fields == other.fields
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor.name().hash(state);
        self.fields.hash(state);
    }
}
