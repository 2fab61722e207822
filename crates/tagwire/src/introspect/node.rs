// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema nodes and table views.

use crate::types::ValueType;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// Child attributes of a node.
///
/// A clone reads the attributes of the node it was cloned from, so it sees
/// children added after the clone was taken.
enum Attributes {
    Own(RwLock<BTreeMap<String, Arc<Node>>>),
    Shared(Weak<Node>),
}

/// One position in a message type's schema.
pub struct Node {
    type_name: String,
    field_name: String,
    parent: Option<Weak<Node>>,
    attributes: Attributes,
    is_map: bool,
    is_slice: bool,
    field_type: ValueType,
    cached_key: OnceLock<String>,
    decorators: Arc<RwLock<BTreeMap<i32, Vec<u8>>>>,
}

impl Node {
    /// Root node of a message type.
    pub(crate) fn root(type_name: &str) -> Arc<Self> {
        Arc::new(Self {
            type_name: type_name.to_string(),
            field_name: String::new(),
            parent: None,
            attributes: Attributes::Own(RwLock::new(BTreeMap::new())),
            is_map: false,
            is_slice: false,
            field_type: ValueType::message(type_name),
            cached_key: OnceLock::new(),
            decorators: Arc::default(),
        })
    }

    /// Child node for a field of `parent`, attached to it.
    pub(crate) fn attach(parent: &Arc<Node>, field_name: &str, field_type: ValueType) -> Arc<Self> {
        let (is_slice, is_map, elem) = split_collection(&field_type);
        let node = Arc::new(Self {
            type_name: elem.type_name(),
            field_name: field_name.to_string(),
            parent: Some(Arc::downgrade(parent)),
            attributes: Attributes::Own(RwLock::new(BTreeMap::new())),
            is_map,
            is_slice,
            field_type,
            cached_key: OnceLock::new(),
            decorators: Arc::default(),
        });
        parent.insert_attribute(&node);
        node
    }

    /// Copy of `source` placed under `parent` as `field_name`.
    ///
    /// The copy shares children and decorators with its source and computes
    /// its own path key.
    pub(crate) fn clone_under(
        source: &Arc<Node>,
        parent: Option<&Arc<Node>>,
        field_name: &str,
        field_type: ValueType,
    ) -> Arc<Self> {
        let (is_slice, is_map, _) = split_collection(&field_type);
        let origin = match &source.attributes {
            Attributes::Shared(origin) => origin.clone(),
            Attributes::Own(_) => Arc::downgrade(source),
        };
        let node = Arc::new(Self {
            type_name: source.type_name.clone(),
            field_name: field_name.to_string(),
            parent: parent.map(Arc::downgrade),
            attributes: Attributes::Shared(origin),
            is_map,
            is_slice,
            field_type,
            cached_key: OnceLock::new(),
            decorators: Arc::clone(&source.decorators),
        });
        if let Some(parent) = parent {
            parent.insert_attribute(&node);
        }
        node
    }

    fn insert_attribute(&self, child: &Arc<Node>) {
        let key = child.field_name.to_lowercase();
        match &self.attributes {
            Attributes::Own(map) => {
                map.write().insert(key, Arc::clone(child));
            }
            Attributes::Shared(origin) => {
                if let Some(origin) = origin.upgrade() {
                    origin.insert_attribute(child);
                }
            }
        }
    }

    fn with_attributes<R>(&self, f: impl FnOnce(&BTreeMap<String, Arc<Node>>) -> R) -> R {
        match &self.attributes {
            Attributes::Own(map) => f(&map.read()),
            Attributes::Shared(origin) => match origin.upgrade() {
                Some(origin) => origin.with_attributes(f),
                None => f(&BTreeMap::new()),
            },
        }
    }

    /// Element type name for collections, message or scalar name otherwise.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Field name as declared; empty for roots.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Declared type of the field this node stands for.
    pub fn field_type(&self) -> &ValueType {
        &self.field_type
    }

    /// Element type for list and map nodes, the field type otherwise.
    pub fn elem_type(&self) -> &ValueType {
        split_collection(&self.field_type).2
    }

    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.with_attributes(BTreeMap::is_empty)
    }

    pub fn is_map(&self) -> bool {
        self.is_map
    }

    pub fn is_slice(&self) -> bool {
        self.is_slice
    }

    /// True for nodes cloned from a memoized node.
    pub fn is_clone(&self) -> bool {
        matches!(self.attributes, Attributes::Shared(_))
    }

    /// Child by field name, matched case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<Arc<Node>> {
        let key = name.to_lowercase();
        self.with_attributes(|map| map.get(&key).cloned())
    }

    /// Children ordered by lowercased field name.
    pub fn attributes(&self) -> Vec<Arc<Node>> {
        self.with_attributes(|map| map.values().cloned().collect())
    }

    /// Canonical path key: the lowercased type name for roots, otherwise the
    /// parent's key, a dot and the lowercased field name.
    pub fn key(&self) -> &str {
        self.cached_key.get_or_init(|| match self.parent() {
            None => self.type_name.to_lowercase(),
            Some(parent) => format!("{}.{}", parent.key(), self.field_name.to_lowercase()),
        })
    }

    pub(crate) fn set_decorator(&self, kind: i32, data: Vec<u8>) {
        self.decorators.write().insert(kind, data);
    }

    pub(crate) fn decorator(&self, kind: i32) -> Option<Vec<u8>> {
        self.decorators.read().get(&kind).cloned()
    }

    /// Decorator kinds set on this node.
    pub fn decorator_kinds(&self) -> Vec<i32> {
        self.decorators.read().keys().copied().collect()
    }
}

/// `(is_slice, is_map, element type)` of a field type.
fn split_collection(ty: &ValueType) -> (bool, bool, &ValueType) {
    match ty {
        ValueType::List(elem) => (true, false, elem),
        ValueType::Map(_, value) => (false, true, value),
        other => (false, false, other),
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key())
            .field("type_name", &self.type_name)
            .field("is_map", &self.is_map)
            .field("is_slice", &self.is_slice)
            .field("leaf", &self.is_leaf())
            .finish()
    }
}

/// Tabular projection of a message node: leaf children are columns,
/// composite children are sub-tables.
#[derive(Debug, Clone)]
pub struct TableView {
    pub table: Arc<Node>,
    pub columns: Vec<Arc<Node>>,
    pub sub_tables: Vec<Arc<Node>>,
}

impl TableView {
    pub(crate) fn of(node: &Arc<Node>) -> Self {
        let (columns, sub_tables) = node.attributes().into_iter().partition(|n| n.is_leaf());
        Self {
            table: Arc::clone(node),
            columns,
            sub_tables,
        }
    }

    /// Column field names, in attribute order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|n| n.field_name()).collect()
    }
}
