// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed metadata attached to schema nodes.

use super::{IntrospectError, Introspector, Node};
use crate::codec::{data_of, elem_of};
use crate::types::Value;

/// Decorator kinds. The numeric value is the storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoratorKind {
    /// Field names forming the primary key of a message type.
    Primary,
    Unique,
    NonUnique,
    AlwaysOverwrite,
    /// Application-defined kind. Codes 1 to 4 belong to the built-in kinds
    /// and are rejected.
    Custom(i32),
}

impl DecoratorKind {
    pub fn code(self) -> i32 {
        match self {
            Self::Primary => 1,
            Self::Unique => 2,
            Self::NonUnique => 3,
            Self::AlwaysOverwrite => 4,
            Self::Custom(code) => code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Primary,
            2 => Self::Unique,
            3 => Self::NonUnique,
            4 => Self::AlwaysOverwrite,
            other => Self::Custom(other),
        }
    }

    /// Storage key, refusing custom codes that alias a built-in kind.
    fn checked_code(self) -> Result<i32, IntrospectError> {
        let code = self.code();
        if matches!(self, Self::Custom(_)) && !matches!(Self::from_code(code), Self::Custom(_)) {
            return Err(IntrospectError::InvalidDecorator {
                kind: code,
                reason: "custom code collides with a built-in decorator".into(),
            });
        }
        Ok(code)
    }
}

impl Introspector {
    /// Store `value` on `node` under `kind`, replacing any previous value.
    ///
    /// The value is kept in envelope form and shared with clones of the node.
    pub fn add_decorator(
        &self,
        kind: DecoratorKind,
        value: &Value,
        node: &Node,
    ) -> Result<(), IntrospectError> {
        let code = kind.checked_code()?;
        let data = data_of(value)?.unwrap_or_default();
        log::trace!("[introspect] decorator {:?} on {}", kind, node.key());
        node.set_decorator(code, data);
        Ok(())
    }

    /// Decorator value of `kind`, `None` when unset.
    pub fn decorator_of(
        &self,
        kind: DecoratorKind,
        node: &Node,
    ) -> Result<Option<Value>, IntrospectError> {
        match node.decorator(kind.checked_code()?) {
            None => Ok(None),
            Some(data) => Ok(Some(elem_of(&data, self.registry().as_ref())?)),
        }
    }

    /// Field names of the `Primary` decorator, empty when unset.
    ///
    /// Accepts a list of strings or a single string.
    pub fn primary_keys(&self, node: &Node) -> Result<Vec<String>, IntrospectError> {
        let names = match self.decorator_of(DecoratorKind::Primary, node)? {
            None | Some(Value::Nil) => Vec::new(),
            Some(Value::String(name)) => vec![name],
            Some(Value::List(list)) => list
                .items()
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(other) => {
                return Err(IntrospectError::InvalidDecorator {
                    kind: DecoratorKind::Primary.code(),
                    reason: format!("expected field names, found {:?}", other.value_type()),
                })
            }
        };
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use crate::types::MessageDescriptorBuilder;
    use std::sync::Arc;

    fn introspector() -> (Introspector, Arc<Node>) {
        let introspector = Introspector::new(Arc::new(TypeRegistry::new()));
        let desc = MessageDescriptorBuilder::new("Device")
            .string_field("Serial")
            .int32_field("Slot")
            .build();
        let node = introspector.inspect_descriptor(&desc).expect("inspect");
        (introspector, node)
    }

    #[test]
    fn test_kind_codes_roundtrip() {
        for kind in [
            DecoratorKind::Primary,
            DecoratorKind::Unique,
            DecoratorKind::NonUnique,
            DecoratorKind::AlwaysOverwrite,
            DecoratorKind::Custom(77),
        ] {
            assert_eq!(DecoratorKind::from_code(kind.code()), kind);
        }
    }

    #[test]
    fn test_custom_code_cannot_alias_builtin() {
        let (introspector, node) = introspector();
        introspector
            .add_decorator(DecoratorKind::Primary, &Value::from("Id"), &node)
            .expect("primary");
        let err = introspector
            .add_decorator(DecoratorKind::Custom(1), &Value::from("Other"), &node)
            .unwrap_err();
        assert!(matches!(err, IntrospectError::InvalidDecorator { kind: 1, .. }));
        assert!(introspector.decorator_of(DecoratorKind::Custom(4), &node).is_err());
        assert_eq!(
            introspector.primary_keys(&node).expect("keys"),
            vec!["Id".to_string()]
        );
        introspector
            .add_decorator(DecoratorKind::Custom(5), &Value::Int32(9), &node)
            .expect("custom");
        assert_eq!(
            introspector
                .decorator_of(DecoratorKind::Custom(5), &node)
                .expect("read"),
            Some(Value::Int32(9))
        );
    }

    #[test]
    fn test_add_and_read_decorator() {
        let (introspector, node) = introspector();
        assert_eq!(
            introspector
                .decorator_of(DecoratorKind::Unique, &node)
                .expect("read"),
            None
        );
        introspector
            .add_decorator(DecoratorKind::Unique, &Value::from("Serial"), &node)
            .expect("add");
        assert_eq!(
            introspector
                .decorator_of(DecoratorKind::Unique, &node)
                .expect("read"),
            Some(Value::from("Serial"))
        );
    }

    #[test]
    fn test_primary_keys() {
        let (introspector, node) = introspector();
        assert!(introspector.primary_keys(&node).expect("empty").is_empty());
        introspector
            .add_decorator(
                DecoratorKind::Primary,
                &Value::from(vec!["Serial".to_string(), "Slot".to_string()]),
                &node,
            )
            .expect("add");
        assert_eq!(
            introspector.primary_keys(&node).expect("keys"),
            vec!["Serial", "Slot"]
        );
    }

    #[test]
    fn test_primary_keys_rejects_other_values() {
        let (introspector, node) = introspector();
        introspector
            .add_decorator(DecoratorKind::Primary, &Value::Int32(3), &node)
            .expect("add");
        assert!(matches!(
            introspector.primary_keys(&node),
            Err(IntrospectError::InvalidDecorator { kind: 1, .. })
        ));
    }
}
