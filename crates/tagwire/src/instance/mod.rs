// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instances: concrete positions inside a value graph, addressed by id.
//!
//! An instance id is a schema path with optional collection keys, such as
//! `widget<{5}abcde>.parts<{i32}0>.label`. [`Instance::of`] resolves it
//! against an [`Introspector`]; [`Instance::get`] and [`Instance::set`] then
//! read or write the addressed value in a root message.

mod key_text;
mod path;

pub use key_text::{format_key, parse_key};

use crate::codec::CodecError;
use crate::introspect::{IntrospectError, Introspector, Node};
use crate::registry::{Registry, RegistryError};
use crate::types::{FieldError, ListValue, MapValue, Message, Value, ValueType};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Errors for instance resolution and access.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// A path segment names no attribute of its parent node.
    UnknownAttribute(String),
    /// A value on the path is not a message.
    NotAMessage { path: String, found: String },
    /// A keyed segment addresses a node that is neither a map nor a list.
    NotACollection(String),
    /// A value does not fit the node it is written to or read from.
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
    /// A keyed root was requested but its type declares no primary key.
    NoPrimaryKey(String),
    Registry(RegistryError),
    Field(FieldError),
    Introspect(IntrospectError),
    Codec(CodecError),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAttribute(path) => write!(f, "unknown attribute {}", path),
            Self::NotAMessage { path, found } => {
                write!(f, "value at {} is not a message: {}", path, found)
            }
            Self::NotACollection(path) => write!(f, "{} is neither a map nor a list", path),
            Self::TypeMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "type mismatch at {}: expected {}, found {}",
                path, expected, found
            ),
            Self::IndexOutOfRange { path, index, len } => {
                write!(f, "index {} out of range for {} of length {}", index, path, len)
            }
            Self::NoPrimaryKey(type_name) => write!(f, "{} has no primary key", type_name),
            Self::Registry(err) => write!(f, "{}", err),
            Self::Field(err) => write!(f, "{}", err),
            Self::Introspect(err) => write!(f, "{}", err),
            Self::Codec(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PathError {}

impl From<RegistryError> for PathError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<FieldError> for PathError {
    fn from(err: FieldError) -> Self {
        Self::Field(err)
    }
}

impl From<IntrospectError> for PathError {
    fn from(err: IntrospectError) -> Self {
        Self::Introspect(err)
    }
}

impl From<CodecError> for PathError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

/// A value position: a schema node, its parent instance and an optional
/// collection key.
pub struct Instance<'i> {
    introspector: &'i Introspector,
    node: Arc<Node>,
    parent: Option<Box<Instance<'i>>>,
    key: Option<Value>,
    id: OnceLock<String>,
}

impl<'i> Instance<'i> {
    pub fn new(
        introspector: &'i Introspector,
        node: Arc<Node>,
        parent: Option<Instance<'i>>,
        key: Option<Value>,
    ) -> Self {
        Self {
            introspector,
            node,
            parent: parent.map(Box::new),
            key,
            id: OnceLock::new(),
        }
    }

    /// Resolve an instance id against the schema known to `introspector`.
    ///
    /// The first segment names a root type; each further segment must be an
    /// attribute of the previous node.
    pub fn of(id: &str, introspector: &'i Introspector) -> Result<Self, PathError> {
        let mut segments = path::parse(id, introspector.registry().as_ref()).into_iter();
        let first = segments
            .next()
            .ok_or_else(|| PathError::UnknownAttribute(id.to_string()))?;
        let root = introspector
            .root(&first.name)
            .ok_or_else(|| PathError::UnknownAttribute(first.name.to_lowercase()))?;

        let mut path = root.key().to_string();
        let mut instance = Self::new(introspector, root, None, first.key);
        for segment in segments {
            path.push('.');
            path.push_str(&segment.name.to_lowercase());
            let node = instance
                .node
                .attribute(&segment.name)
                .ok_or_else(|| PathError::UnknownAttribute(path.clone()))?;
            instance = Self::new(introspector, node, Some(instance), segment.key);
        }
        Ok(instance)
    }

    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    pub fn parent(&self) -> Option<&Instance<'i>> {
        self.parent.as_deref()
    }

    pub fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    /// Canonical id of this instance; computed once.
    pub fn instance_id(&self) -> Result<String, PathError> {
        if let Some(id) = self.id.get() {
            return Ok(id.clone());
        }
        let mut id = match &self.parent {
            None => self.node.type_name().to_lowercase(),
            Some(parent) => format!(
                "{}.{}",
                parent.instance_id()?,
                self.node.field_name().to_lowercase()
            ),
        };
        if let Some(key) = &self.key {
            id.push('<');
            id.push_str(&format_key(key)?);
            id.push('>');
        }
        Ok(self.id.get_or_init(|| id).clone())
    }

    /// Read the addressed value from `root`.
    ///
    /// Missing fields, keys and indexes read as [`Value::Nil`]. Without a
    /// root, a keyed root instance builds a fresh message whose primary key
    /// fields are set from the key.
    pub fn get(&self, root: Option<&Value>) -> Result<Value, PathError> {
        match root {
            Some(root) => Ok(self.locate(root)?.cloned().unwrap_or(Value::Nil)),
            None => self.keyed_root(),
        }
    }

    /// Write `value` at the addressed position in `root`, creating missing
    /// messages and collections on the way.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), PathError> {
        let Some(parent) = &self.parent else {
            self.check(self.node.field_type(), &value)?;
            *root = value;
            return Ok(());
        };
        let slot = parent.slot_mut(root)?;
        let msg = parent.message_in(slot)?;
        let field = self.node.field_name();
        let Some(key) = &self.key else {
            return Ok(msg.set(field, value)?);
        };
        self.check(self.node.elem_type(), &value)?;
        let container = msg.field_mut(field)?;
        let target = self.element_mut(container, key)?;
        *target = value;
        Ok(())
    }

    fn keyed_root(&self) -> Result<Value, PathError> {
        let (None, Some(key)) = (&self.parent, &self.key) else {
            return Ok(Value::Nil);
        };
        let type_name = self.node.type_name();
        let fields = self.introspector.primary_keys(&self.node)?;
        if fields.is_empty() {
            return Err(PathError::NoPrimaryKey(type_name.to_string()));
        }
        let mut msg = self.introspector.registry().new_instance(type_name)?;
        match key {
            Value::List(parts) if fields.len() > 1 => {
                for (field, part) in fields.iter().zip(parts.items()) {
                    msg.set(field, part.clone())?;
                }
            }
            single => msg.set(&fields[0], single.clone())?,
        }
        Ok(Value::from(msg))
    }

    fn locate<'v>(&self, root: &'v Value) -> Result<Option<&'v Value>, PathError> {
        let Some(parent) = &self.parent else {
            if let Value::Message(msg) = root {
                if msg.type_name() != self.node.type_name() {
                    return Err(self.mismatch(&ValueType::message(self.node.type_name()), root));
                }
            }
            return Ok((!root.is_nil()).then_some(root));
        };
        let field = match parent.locate(root)? {
            None | Some(Value::Nil) => return Ok(None),
            Some(Value::Message(msg)) => msg.field(self.node.field_name()),
            Some(other) => return Err(self.not_a_message(other)),
        };
        match (&self.key, field) {
            (None, field) | (_, field @ None) => Ok(field),
            (Some(key), Some(container)) => self.element(container, key),
        }
    }

    fn element<'v>(&self, container: &'v Value, key: &Value) -> Result<Option<&'v Value>, PathError> {
        match container {
            Value::Nil => Ok(None),
            Value::Map(map) if self.node.is_map() => Ok(map.get(key)),
            Value::List(list) if self.node.is_slice() => Ok(list.get(self.index(key)?)),
            _ if !self.node.is_map() && !self.node.is_slice() => {
                Err(PathError::NotACollection(self.node.key().to_string()))
            }
            other => Err(self.mismatch(self.node.field_type(), other)),
        }
    }

    /// Mutable slot of this instance, creating what is missing.
    fn slot_mut<'v>(&self, root: &'v mut Value) -> Result<&'v mut Value, PathError> {
        let Some(parent) = &self.parent else {
            if root.is_nil() {
                *root = self.new_message()?;
            }
            self.message_in(root)?;
            return Ok(root);
        };
        let parent_slot = parent.slot_mut(root)?;
        let msg = parent.message_in(parent_slot)?;
        let field = msg.field_mut(self.node.field_name())?;
        let slot = match &self.key {
            None => field,
            Some(key) => self.element_mut(field, key)?,
        };
        if slot.is_nil() {
            *slot = self.new_message()?;
        }
        Ok(slot)
    }

    /// Element of a map or list field. A nil collection is created, a new
    /// map key or the index one past the end gets a zero element.
    fn element_mut<'v>(
        &self,
        container: &'v mut Value,
        key: &Value,
    ) -> Result<&'v mut Value, PathError> {
        match self.node.field_type() {
            ValueType::Map(key_type, value_type) => {
                self.check(key_type, key)?;
                if container.is_nil() {
                    *container =
                        Value::Map(MapValue::new(key_type.as_ref().clone(), value_type.as_ref().clone()));
                }
                let Value::Map(map) = container else {
                    return Err(self.mismatch(self.node.field_type(), container));
                };
                if map.get(key).is_none() {
                    map.insert(key.clone(), value_type.zero());
                }
                map.get_mut(key)
                    .ok_or_else(|| PathError::NotACollection(self.node.key().to_string()))
            }
            ValueType::List(elem) => {
                let index = self.index(key)?;
                if container.is_nil() {
                    *container = Value::List(ListValue::new(elem.as_ref().clone()));
                }
                let Value::List(list) = container else {
                    return Err(self.mismatch(self.node.field_type(), container));
                };
                let len = list.len();
                if index == len {
                    list.push(elem.zero());
                }
                list.items_mut()
                    .get_mut(index)
                    .ok_or_else(|| PathError::IndexOutOfRange {
                        path: self.node.key().to_string(),
                        index,
                        len,
                    })
            }
            _ => Err(PathError::NotACollection(self.node.key().to_string())),
        }
    }

    fn index(&self, key: &Value) -> Result<usize, PathError> {
        key.as_index().ok_or_else(|| PathError::TypeMismatch {
            path: self.node.key().to_string(),
            expected: "list index".to_string(),
            found: describe(key),
        })
    }

    fn new_message(&self) -> Result<Value, PathError> {
        let type_name = self.node.type_name();
        let msg = self.introspector.registry().new_instance(type_name)?;
        Ok(Value::from(msg))
    }

    fn message_in<'v>(&self, slot: &'v mut Value) -> Result<&'v mut Message, PathError> {
        match slot {
            Value::Message(msg) => Ok(msg.as_mut()),
            other => Err(self.not_a_message(other)),
        }
    }

    fn check(&self, expected: &ValueType, value: &Value) -> Result<(), PathError> {
        if expected.accepts(value) {
            Ok(())
        } else {
            Err(self.mismatch(expected, value))
        }
    }

    fn mismatch(&self, expected: &ValueType, found: &Value) -> PathError {
        PathError::TypeMismatch {
            path: self.node.key().to_string(),
            expected: expected.to_string(),
            found: describe(found),
        }
    }

    fn not_a_message(&self, found: &Value) -> PathError {
        PathError::NotAMessage {
            path: self.node.key().to_string(),
            found: describe(found),
        }
    }
}

fn describe(value: &Value) -> String {
    value
        .value_type()
        .map_or_else(|| "nil".to_string(), |ty| ty.to_string())
}

impl fmt::Debug for Instance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("node", &self.node.key())
            .field("key", &self.key)
            .field("parent", &self.parent)
            .finish()
    }
}
