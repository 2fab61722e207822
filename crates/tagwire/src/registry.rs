// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: maps wire type names to constructible message types.
//!
//! Decoding a message needs a registry to turn the type name read from the
//! wire into an instance. Registries are passed explicitly to every decoder
//! and introspector, so independent registries can coexist.
//!
//! ```
//! use tagwire::{MessageDescriptorBuilder, Registry, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! registry.register(MessageDescriptorBuilder::new("Point").int32_field("X").build());
//! let point = registry.info("Point").unwrap().new_instance().unwrap();
//! assert!(point.is_empty());
//! ```

use crate::types::{Message, MessageDescriptor};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Errors for registry lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No type registered under this name.
    NotFound(String),
    /// The type is registered but its factory failed.
    Instantiation { type_name: String, reason: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "type {} is not registered", name),
            Self::Instantiation { type_name, reason } => {
                write!(f, "cannot instantiate {}: {}", type_name, reason)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Builds a zero instance of a registered type.
pub type Factory = Arc<dyn Fn(&Arc<MessageDescriptor>) -> Result<Message, String> + Send + Sync>;

/// Metadata of one registered type.
#[derive(Clone)]
pub struct TypeInfo {
    descriptor: Arc<MessageDescriptor>,
    factory: Option<Factory>,
}

impl TypeInfo {
    pub fn new(descriptor: Arc<MessageDescriptor>) -> Self {
        Self {
            descriptor,
            factory: None,
        }
    }

    pub fn with_factory(descriptor: Arc<MessageDescriptor>, factory: Factory) -> Self {
        Self {
            descriptor,
            factory: Some(factory),
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &Arc<MessageDescriptor> {
        &self.descriptor
    }

    /// Zero instance of this type.
    pub fn new_instance(&self) -> Result<Message, RegistryError> {
        match &self.factory {
            None => Ok(Message::new(&self.descriptor)),
            Some(factory) => {
                factory(&self.descriptor).map_err(|reason| RegistryError::Instantiation {
                    type_name: self.name().to_string(),
                    reason,
                })
            }
        }
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("descriptor", &self.descriptor)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

/// Directory of message types, resolved by bare type name.
pub trait Registry: Send + Sync {
    /// Register a type. Returns `true` if the name was not registered yet;
    /// an existing registration is kept.
    fn register(&self, descriptor: Arc<MessageDescriptor>) -> bool;

    /// Register a type whose instances come from `factory`.
    fn register_with_factory(&self, descriptor: Arc<MessageDescriptor>, factory: Factory) -> bool;

    /// Look up a type by name.
    fn info(&self, name: &str) -> Result<Arc<TypeInfo>, RegistryError>;

    fn contains(&self, name: &str) -> bool {
        self.info(name).is_ok()
    }

    /// Zero instance of the named type.
    fn new_instance(&self, name: &str) -> Result<Message, RegistryError> {
        self.info(name)?.new_instance()
    }
}

/// Default concurrent [`Registry`].
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<String, Arc<TypeInfo>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    fn insert(&self, info: TypeInfo) -> bool {
        let name = info.name().to_string();
        match self.types.entry(name) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                log::trace!("[registry] {} already registered", entry.key());
                false
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                log::debug!("[registry] registered {}", entry.key());
                entry.insert(Arc::new(info));
                true
            }
        }
    }
}

impl Registry for TypeRegistry {
    fn register(&self, descriptor: Arc<MessageDescriptor>) -> bool {
        self.insert(TypeInfo::new(descriptor))
    }

    fn register_with_factory(&self, descriptor: Arc<MessageDescriptor>, factory: Factory) -> bool {
        self.insert(TypeInfo::with_factory(descriptor, factory))
    }

    fn info(&self, name: &str) -> Result<Arc<TypeInfo>, RegistryError> {
        self.types
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageDescriptorBuilder;

    #[test]
    fn test_register_and_lookup() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        let desc = MessageDescriptorBuilder::new("Point").int32_field("X").build();
        assert!(registry.register(desc.clone()));
        assert!(!registry.register(desc));
        assert_eq!(registry.len(), 1);

        let info = registry.info("Point").expect("registered");
        assert_eq!(info.name(), "Point");
        let msg = info.new_instance().expect("instance");
        assert_eq!(msg.type_name(), "Point");
        assert!(msg.is_empty());
    }

    #[test]
    fn test_lookup_unknown_type() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.info("Ghost").unwrap_err(),
            RegistryError::NotFound("Ghost".into())
        );
        assert!(!registry.contains("Ghost"));
    }

    #[test]
    fn test_factory_populates_instances() {
        let registry = TypeRegistry::new();
        let desc = MessageDescriptorBuilder::new("Counter")
            .int32_field("Start")
            .build();
        registry.register_with_factory(
            desc,
            Arc::new(|d| {
                let mut msg = Message::new(d);
                msg.set("Start", 10i32).map_err(|e| e.to_string())?;
                Ok(msg)
            }),
        );
        let msg = registry.new_instance("Counter").expect("instance");
        assert_eq!(msg.get::<i32>("Start").expect("start"), 10);
    }

    #[test]
    fn test_factory_failure_is_instantiation_error() {
        let registry = TypeRegistry::new();
        let desc = MessageDescriptorBuilder::new("Abstract").build();
        registry.register_with_factory(desc, Arc::new(|_| Err("no concrete type".into())));
        match registry.new_instance("Abstract").unwrap_err() {
            RegistryError::Instantiation { type_name, reason } => {
                assert_eq!(type_name, "Abstract");
                assert_eq!(reason, "no concrete type");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(TypeRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let name = format!("T{}", i % 4);
                    registry.register(MessageDescriptorBuilder::new(name).build());
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }
        assert_eq!(registry.names(), vec!["T0", "T1", "T2", "T3"]);
    }
}
