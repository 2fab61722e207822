// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values carried by the codec.

use crate::codec::Kind;
use crate::types::{Message, ValueType};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A value of any encodable kind.
///
/// Floats compare and hash by bit pattern, so every value can serve as a
/// map key and round trips are checked bit-for-bit.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value: nil message, nil or empty collection.
    Nil,
    Bool(bool),
    /// Platform integer, 8 bytes on the wire.
    Int(i64),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    /// Raw byte slice, encoded through the fast path.
    Bytes(Vec<u8>),
    List(ListValue),
    Map(MapValue),
    Message(Box<Message>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Wire kind used for this value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Nil | Self::Message(_) => Kind::Ptr,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Int32(_) => Kind::Int32,
            Self::Int64(_) => Kind::Int64,
            Self::UInt32(_) => Kind::UInt32,
            Self::UInt64(_) => Kind::UInt64,
            Self::Float32(_) => Kind::Float32,
            Self::Float64(_) => Kind::Float64,
            Self::String(_) => Kind::String,
            Self::Bytes(_) | Self::List(_) => Kind::Slice,
            Self::Map(_) => Kind::Map,
        }
    }

    /// Static type, `None` for nil.
    pub fn value_type(&self) -> Option<ValueType> {
        ValueType::of(self)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Platform integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message_mut(&mut self) -> Option<&mut Message> {
        match self {
            Self::Message(v) => Some(v),
            _ => None,
        }
    }

    /// Signed integer view of any integer kind, used for list indexing.
    pub fn as_index(&self) -> Option<usize> {
        let index = match self {
            Self::Int(v) | Self::Int64(v) => usize::try_from(*v).ok()?,
            Self::Int32(v) => usize::try_from(*v).ok()?,
            Self::UInt32(v) => usize::try_from(*v).ok()?,
            Self::UInt64(v) => usize::try_from(*v).ok()?,
            _ => return None,
        };
        Some(index)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) | (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::UInt32(a), Self::UInt32(b)) => a == b,
            (Self::UInt64(a), Self::UInt64(b)) => a == b,
            (Self::Float32(a), Self::Float32(b)) => a.to_bits() == b.to_bits(),
            (Self::Float64(a), Self::Float64(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Message(a), Self::Message(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Nil => {}
            Self::Bool(v) => v.hash(state),
            Self::Int(v) | Self::Int64(v) => v.hash(state),
            Self::Int32(v) => v.hash(state),
            Self::UInt32(v) => v.hash(state),
            Self::UInt64(v) => v.hash(state),
            Self::Float32(v) => v.to_bits().hash(state),
            Self::Float64(v) => v.to_bits().hash(state),
            Self::String(v) => v.hash(state),
            Self::Bytes(v) => v.hash(state),
            Self::List(v) => v.hash(state),
            Self::Map(v) => v.hash(state),
            Self::Message(v) => v.hash(state),
        }
    }
}

/// Homogeneous list with its element type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListValue {
    elem: ValueType,
    items: Vec<Value>,
}

impl ListValue {
    pub fn new(elem: ValueType) -> Self {
        Self {
            elem,
            items: Vec::new(),
        }
    }

    pub fn from_items(elem: ValueType, items: Vec<Value>) -> Self {
        Self { elem, items }
    }

    pub fn elem_type(&self) -> &ValueType {
        &self.elem
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<Value> {
        &mut self.items
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

/// Unordered map with its key and value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapValue {
    key: ValueType,
    value: ValueType,
    entries: HashMap<Value, Value>,
}

impl MapValue {
    pub fn new(key: ValueType, value: ValueType) -> Self {
        Self {
            key,
            value,
            entries: HashMap::new(),
        }
    }

    pub fn from_entries(key: ValueType, value: ValueType, entries: HashMap<Value, Value>) -> Self {
        Self {
            key,
            value,
            entries,
        }
    }

    pub fn key_type(&self) -> &ValueType {
        &self.key
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value
    }

    pub fn entries(&self) -> &HashMap<Value, Value> {
        &self.entries
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }
}

// Entry order is unspecified, so only the order-independent parts are hashed.
impl Hash for MapValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.hash(state);
        self.entries.len().hash(state);
    }
}

/// Rust types with a fixed [`ValueType`].
pub trait TypedValue: Into<Value> {
    fn value_type() -> ValueType;
}

/// Typed extraction out of a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_scalar {
    ($ty:ty, $variant:ident, $accessor:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }

        impl TypedValue for $ty {
            fn value_type() -> ValueType {
                ValueType::$variant
            }
        }

        impl FromValue for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                value.$accessor()
            }
        }
    };
}

impl_scalar!(bool, Bool, as_bool);
impl_scalar!(i32, Int32, as_i32);
impl_scalar!(i64, Int64, as_i64);
impl_scalar!(u32, UInt32, as_u32);
impl_scalar!(u64, UInt64, as_u64);
impl_scalar!(f32, Float32, as_f32);
impl_scalar!(f64, Float64, as_f64);

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl TypedValue for String {
    fn value_type() -> ValueType {
        ValueType::String
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl TypedValue for Vec<u8> {
    fn value_type() -> ValueType {
        ValueType::Bytes
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }
}

impl<T: TypedValue> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(ListValue::from_items(
            T::value_type(),
            items.into_iter().map(Into::into).collect(),
        ))
    }
}

impl<T: TypedValue> TypedValue for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::list(T::value_type())
    }
}

impl<K: TypedValue, V: TypedValue> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        let entries = map
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::Map(MapValue::from_entries(
            K::value_type(),
            V::value_type(),
            entries,
        ))
    }
}

impl<K: TypedValue, V: TypedValue> TypedValue for HashMap<K, V> {
    fn value_type() -> ValueType {
        ValueType::map(K::value_type(), V::value_type())
    }
}

impl From<Message> for Value {
    fn from(v: Message) -> Self {
        Self::Message(Box::new(v))
    }
}

impl From<ListValue> for Value {
    fn from(v: ListValue) -> Self {
        Self::List(v)
    }
}

impl From<MapValue> for Value {
    fn from(v: MapValue) -> Self {
        Self::Map(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_values() {
        let v = Value::from(42u32);
        assert_eq!(v.as_u32(), Some(42));
        assert_eq!(v.as_i32(), None);
        assert_eq!(v.kind(), Kind::UInt32);

        let v = Value::from(std::f64::consts::PI);
        assert_eq!(v.as_f64(), Some(std::f64::consts::PI));

        let v = Value::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert_eq!(v.kind(), Kind::String);
    }

    #[test]
    fn test_floats_compare_bitwise() {
        assert_eq!(Value::Float64(f64::NAN), Value::Float64(f64::NAN));
        assert_ne!(Value::Float32(0.0), Value::Float32(-0.0));
    }

    #[test]
    fn test_int_and_int64_are_distinct() {
        assert_ne!(Value::Int(5), Value::Int64(5));
    }

    #[test]
    fn test_typed_list_conversion() {
        let v = Value::from(vec![1i32, 2, 3]);
        let list = v.as_list().expect("list");
        assert_eq!(list.elem_type(), &ValueType::Int32);
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(1), Some(&Value::Int32(2)));
    }

    #[test]
    fn test_byte_vec_becomes_bytes() {
        let v = Value::from(vec![0x48u8, 0x69]);
        assert_eq!(v.as_bytes(), Some(&[0x48u8, 0x69][..]));
        assert_eq!(v.kind(), Kind::Slice);
    }

    #[test]
    fn test_nested_list_type() {
        let v = Value::from(vec![vec![1u64], vec![2, 3]]);
        assert_eq!(
            v.value_type(),
            Some(ValueType::list(ValueType::list(ValueType::UInt64)))
        );
    }

    #[test]
    fn test_typed_map_conversion() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), 1i64);
        map.insert("b".to_string(), 2i64);
        let v = Value::from(map);
        let m = v.as_map().expect("map");
        assert_eq!(m.key_type(), &ValueType::String);
        assert_eq!(m.value_type(), &ValueType::Int64);
        assert_eq!(m.get(&Value::from("b")), Some(&Value::Int64(2)));
    }

    #[test]
    fn test_values_usable_as_map_keys() {
        let mut map = HashMap::new();
        map.insert(Value::Float32(1.5), "x");
        map.insert(Value::from(vec![1i32]), "y");
        assert_eq!(map.get(&Value::Float32(1.5)), Some(&"x"));
        assert_eq!(map.get(&Value::from(vec![1i32])), Some(&"y"));
    }

    #[test]
    fn test_as_index() {
        assert_eq!(Value::Int32(3).as_index(), Some(3));
        assert_eq!(Value::Int(-1).as_index(), None);
        assert_eq!(Value::from("3").as_index(), None);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(i32::from_value(&Value::Int32(7)), Some(7));
        assert_eq!(String::from_value(&Value::from("s")), Some("s".to_string()));
        assert_eq!(u64::from_value(&Value::Int32(7)), None);
    }
}
