// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema introspection.
//!
//! [`Introspector`] walks a message type once and keeps the resulting node
//! graph: one node per field path, a reverse index by type name and a table
//! view per message type. Recursive and shared message types are cut by
//! cloning the node of a type that is already expanded or being expanded.
//!
//! One introspector is meant to be primed at startup and then shared. Lookups
//! read concurrent maps without locking; walks are serialized.

mod decorator;
mod node;

pub use decorator::DecoratorKind;
pub use node::{Node, TableView};

use crate::codec::{CodecError, Kind};
use crate::registry::{Registry, RegistryError};
use crate::types::{FieldDescriptor, Message, MessageDescriptor, Value, ValueType};
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Errors for introspection.
#[derive(Debug, Clone, PartialEq)]
pub enum IntrospectError {
    /// Asked to inspect nil.
    Nil,
    /// Asked to inspect something that is not a message.
    NotAMessage(String),
    /// A message field references a type missing from the registry.
    UnknownType(String),
    /// A decorator could not be stored or read back.
    Codec(CodecError),
    /// A decorator holds a value of the wrong shape.
    InvalidDecorator { kind: i32, reason: String },
}

impl fmt::Display for IntrospectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "cannot introspect a nil value"),
            Self::NotAMessage(ty) => {
                write!(f, "cannot introspect a value that is not a message: {}", ty)
            }
            Self::UnknownType(name) => write!(f, "unknown type {}, must be registered", name),
            Self::Codec(err) => write!(f, "decorator codec: {}", err),
            Self::InvalidDecorator { kind, reason } => {
                write!(f, "invalid decorator {}: {}", kind, reason)
            }
        }
    }
}

impl std::error::Error for IntrospectError {}

impl From<CodecError> for IntrospectError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

impl From<RegistryError> for IntrospectError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(name) => Self::UnknownType(name),
            RegistryError::Instantiation { type_name, .. } => Self::UnknownType(type_name),
        }
    }
}

/// Builds and indexes schema nodes of message types.
pub struct Introspector {
    registry: Arc<dyn Registry>,
    path_nodes: DashMap<String, Arc<Node>>,
    type_nodes: DashMap<String, Arc<Node>>,
    in_progress: DashSet<String>,
    table_views: DashMap<String, Arc<TableView>>,
    walk: Mutex<()>,
}

impl Introspector {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self {
            registry,
            path_nodes: DashMap::new(),
            type_nodes: DashMap::new(),
            in_progress: DashSet::new(),
            table_views: DashMap::new(),
            walk: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.registry
    }

    /// Root node of the message held by `value`.
    pub fn inspect(&self, value: &Value) -> Result<Arc<Node>, IntrospectError> {
        match value {
            Value::Nil => Err(IntrospectError::Nil),
            Value::Message(msg) => self.inspect_message(msg),
            other => Err(IntrospectError::NotAMessage(
                other
                    .value_type()
                    .map_or_else(|| "nil".to_string(), |ty| ty.to_string()),
            )),
        }
    }

    pub fn inspect_message(&self, msg: &Message) -> Result<Arc<Node>, IntrospectError> {
        self.inspect_descriptor(msg.descriptor())
    }

    /// Root node of a message type, walking it on first use.
    ///
    /// The type is registered with the registry; message fields must name
    /// registered types.
    pub fn inspect_descriptor(
        &self,
        desc: &Arc<MessageDescriptor>,
    ) -> Result<Arc<Node>, IntrospectError> {
        let key = desc.name().to_lowercase();
        if let Some(root) = self.root(&key) {
            return Ok(root);
        }
        let _walk = self.walk.lock();
        if let Some(root) = self.root(&key) {
            return Ok(root);
        }
        self.registry.register(Arc::clone(desc));
        log::debug!("[introspect] inspecting {}", desc.name());

        let root = Node::root(desc.name());
        self.path_nodes.insert(key, Arc::clone(&root));
        self.type_nodes
            .entry(desc.name().to_string())
            .or_insert_with(|| Arc::clone(&root));
        if let Err(err) = self.expand(&root, desc) {
            self.discard(&root);
            return Err(err);
        }
        Ok(root)
    }

    /// Drop every index entry pointing into the tree under `root`.
    fn discard(&self, root: &Arc<Node>) {
        let prefix = format!("{}.", root.key());
        let under = |node: &Node| node.key() == root.key() || node.key().starts_with(&prefix);
        self.path_nodes
            .retain(|path, _| path != root.key() && !path.starts_with(&prefix));
        self.type_nodes.retain(|_, node| !under(node.as_ref()));
        self.table_views.retain(|_, view| !under(view.table.as_ref()));
        log::debug!("[introspect] discarded partial walk of {}", root.key());
    }

    /// Walk the fields of `node`, a message of type `desc`.
    fn expand(&self, node: &Arc<Node>, desc: &MessageDescriptor) -> Result<(), IntrospectError> {
        self.in_progress.insert(desc.name().to_string());
        let result = desc
            .visible_fields()
            .try_for_each(|field| self.add_field(node, field).map(|_| ()));
        self.in_progress.remove(desc.name());
        result?;
        self.table_views
            .entry(desc.name().to_string())
            .or_insert_with(|| Arc::new(TableView::of(node)));
        Ok(())
    }

    fn add_field(
        &self,
        parent: &Arc<Node>,
        field: &FieldDescriptor,
    ) -> Result<Arc<Node>, IntrospectError> {
        let path = format!("{}.{}", parent.key(), field.name.to_lowercase());
        if let Some(existing) = parent.attribute(&field.name) {
            if self
                .path_nodes
                .get(&path)
                .is_some_and(|indexed| Arc::ptr_eq(indexed.value(), &existing))
            {
                return Ok(existing);
            }
        }

        let elem = match &field.ty {
            ValueType::List(elem) | ValueType::Map(_, elem) => elem.as_ref(),
            other => other,
        };
        let Some(type_name) = elem.message_name() else {
            let leaf = Node::attach(parent, &field.name, field.ty.clone());
            self.path_nodes.insert(path, Arc::clone(&leaf));
            return Ok(leaf);
        };

        if let Some(memo) = self.memoized(type_name) {
            let clone = Node::clone_under(&memo, Some(parent), &field.name, field.ty.clone());
            log::trace!("[introspect] {} reuses {}", path, memo.key());
            self.path_nodes.insert(path, Arc::clone(&clone));
            return Ok(clone);
        }

        let info = self.registry.info(type_name)?;
        let child = Node::attach(parent, &field.name, field.ty.clone());
        self.path_nodes.insert(path, Arc::clone(&child));
        self.type_nodes
            .entry(type_name.to_string())
            .or_insert_with(|| Arc::clone(&child));
        self.expand(&child, info.descriptor())?;
        Ok(child)
    }

    /// Node of a message type that is being expanded or was expanded with
    /// at least one field.
    fn memoized(&self, type_name: &str) -> Option<Arc<Node>> {
        let node = Arc::clone(self.type_nodes.get(type_name)?.value());
        if self.in_progress.contains(type_name) || !node.is_leaf() {
            Some(node)
        } else {
            None
        }
    }

    /// Node at a path key such as `widget.sub.label`, case-insensitive.
    ///
    /// Paths that run through a cloned subtree are resolved by walking the
    /// attributes from the root.
    pub fn node(&self, path: &str) -> Option<Arc<Node>> {
        let path = path.to_lowercase();
        if let Some(node) = self.path_nodes.get(&path) {
            return Some(Arc::clone(node.value()));
        }
        let mut segments = path.split('.');
        let root = self.root(segments.next()?)?;
        segments.try_fold(root, |node, name| node.attribute(name))
    }

    /// Root node of a message type by its lowercased name.
    pub fn root(&self, name: &str) -> Option<Arc<Node>> {
        self.path_nodes
            .get(&name.to_lowercase())
            .map(|n| Arc::clone(n.value()))
            .filter(|n| n.is_root())
    }

    /// First node built for a message type.
    pub fn node_by_type_name(&self, name: &str) -> Option<Arc<Node>> {
        self.type_nodes.get(name).map(|n| Arc::clone(n.value()))
    }

    pub fn node_by_value(&self, value: &Value) -> Option<Arc<Node>> {
        self.node_by_type_name(value.as_message()?.type_name())
    }

    pub fn node_by_descriptor(&self, desc: &MessageDescriptor) -> Option<Arc<Node>> {
        self.node_by_type_name(desc.name())
    }

    /// Every indexed node, sorted by path key.
    pub fn nodes(&self, only_leaves: bool, only_roots: bool) -> Vec<Arc<Node>> {
        let mut nodes: Vec<(String, Arc<Node>)> = self
            .path_nodes
            .iter()
            .filter(|entry| !only_leaves || entry.value().is_leaf())
            .filter(|entry| !only_roots || entry.value().is_root())
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        nodes.sort_by(|a, b| a.0.cmp(&b.0));
        nodes.into_iter().map(|(_, node)| node).collect()
    }

    /// Table view of a message type.
    pub fn table_view(&self, type_name: &str) -> Option<Arc<TableView>> {
        self.table_views.get(type_name).map(|v| Arc::clone(v.value()))
    }

    /// All table views, sorted by type name.
    pub fn table_views(&self) -> Vec<Arc<TableView>> {
        let mut views: Vec<Arc<TableView>> = self
            .table_views
            .iter()
            .map(|v| Arc::clone(v.value()))
            .collect();
        views.sort_by(|a, b| a.table.type_name().cmp(b.table.type_name()));
        views
    }

    /// Clone `node` under `parent` as `field_name` and index it.
    ///
    /// Without a parent the clone becomes a root keyed by its type name.
    pub fn clone_node(
        &self,
        node: &Arc<Node>,
        parent: Option<&Arc<Node>>,
        field_name: &str,
    ) -> Arc<Node> {
        let clone = Node::clone_under(node, parent, field_name, node.field_type().clone());
        self.path_nodes
            .entry(clone.key().to_string())
            .or_insert_with(|| Arc::clone(&clone));
        clone
    }

    /// Wire kind of a node's element type.
    ///
    /// Message elements must still be registered.
    pub fn kind_of(&self, node: &Node) -> Result<Kind, IntrospectError> {
        let elem = node.elem_type();
        if let Some(name) = elem.message_name() {
            self.registry.info(name)?;
        }
        Ok(elem.kind())
    }

    /// Dump every node at debug level.
    pub fn print(&self) {
        for node in self.nodes(false, false) {
            log::debug!(
                "[introspect] {} - {}, map={}, slice={}, leaf={}",
                node.key(),
                node.type_name(),
                node.is_map(),
                node.is_slice(),
                node.is_leaf()
            );
        }
    }
}

impl fmt::Debug for Introspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Introspector")
            .field("nodes", &self.path_nodes.len())
            .field("types", &self.type_nodes.len())
            .field("table_views", &self.table_views.len())
            .finish()
    }
}
