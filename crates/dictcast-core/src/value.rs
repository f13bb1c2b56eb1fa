//! Dynamic value tree consumed and produced by the conversion engine
//!
//! Source data arrives as a loosely typed tree (usually parsed JSON). The engine
//! reads it through [`Value`], and produces converted values in the same
//! representation: scalars, sequences, ordered mappings with arbitrary keys, and
//! [`Record`]s for converted object types. Typed structs are then assembled from
//! records through [`FromValue`].
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

use crate::conversion::builder::Buildable;
use crate::conversion::descriptor::MappingKind;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use std::any::TypeId;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A node of a loosely typed data tree
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Unique elements in first-seen order
    Set(Vec<Value>),
    Map(Mapping),
    Record(Record),
}

impl Value {
    /// Short name of the runtime shape, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "mapping",
            Value::Record(_) => "record",
        }
    }

    /// Parse JSON text into a value tree
    pub fn from_json_str(text: &str) -> Result<Value> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(Value::from(json))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for lists and tuples, the shapes path segments can project across
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::List(_) | Value::Tuple(_))
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Truthiness of a value: empty containers, zero, empty strings and null are false
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::DateTime(_) => true,
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Record(_) => true,
        }
    }

    /// Iterate the elements of an iterable value.
    ///
    /// Sequences and sets yield their elements, mappings yield their keys.
    /// Strings are deliberately not iterable.
    pub fn into_elements(self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => Some(items),
            Value::Map(map) => Some(map.into_iter().map(|(k, _)| k).collect()),
            _ => None,
        }
    }

    /// Build a set, dropping duplicates while keeping first-seen order
    pub fn set_from(items: Vec<Value>) -> Value {
        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        let mut index = KeyIndex::default();
        for item in items {
            let hash = fingerprint(&item);
            if index.position(hash, |i| unique[i] == item).is_none() {
                index.push(hash, unique.len());
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Lossy conversion back into JSON, for serialization of converted trees
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(n) => Json::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Str(s) => Json::String(s.clone()),
            Value::DateTime(dt) => Json::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Value::Record(record) => Json::Object(
                record
                    .fields()
                    .map(|(name, v)| (name.to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "'{}'", s),
            other => write!(f, "{}", other),
        }
    }
}

fn fmt_items(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        item.fmt_nested(f)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                // whole floats keep a trailing ".0" so they read back as floats
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::List(items) => fmt_items(f, "[", items, "]"),
            Value::Tuple(items) => fmt_items(f, "(", items, ")"),
            Value::Set(items) => fmt_items(f, "{", items, "}"),
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    k.fmt_nested(f)?;
                    write!(f, ": ")?;
                    v.fmt_nested(f)?;
                }
                write!(f, "}}")
            }
            Value::Record(record) => {
                write!(f, "{}(", record.type_name())?;
                for (i, (name, v)) in record.fields().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}=", name)?;
                    v.fmt_nested(f)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            // sets compare without regard to order
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

/// Hashing agrees with `==`: equal values hash equally.
///
/// Sets and mappings compare without regard to order, so only their length
/// goes into the hash.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Int(n) => {
                2u8.hash(state);
                n.hash(state);
            }
            Value::Float(n) => {
                3u8.hash(state);
                // 0.0 and -0.0 are equal
                let bits = if *n == 0.0 { 0 } else { n.to_bits() };
                bits.hash(state);
            }
            Value::Str(s) => hash_str(s, state),
            Value::DateTime(dt) => {
                5u8.hash(state);
                dt.hash(state);
            }
            Value::List(items) => {
                6u8.hash(state);
                items.hash(state);
            }
            Value::Tuple(items) => {
                7u8.hash(state);
                items.hash(state);
            }
            Value::Set(items) => {
                8u8.hash(state);
                items.len().hash(state);
            }
            Value::Map(map) => {
                9u8.hash(state);
                map.len().hash(state);
            }
            Value::Record(record) => {
                10u8.hash(state);
                record.type_name().hash(state);
                record.len().hash(state);
            }
        }
    }
}

fn hash_str<H: Hasher>(s: &str, state: &mut H) {
    4u8.hash(state);
    s.hash(state);
}

fn fingerprint(key: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn str_fingerprint(key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_str(key, &mut hasher);
    hasher.finish()
}

/// Entry positions grouped by key hash
#[derive(Debug, Clone, Default)]
struct KeyIndex {
    buckets: HashMap<u64, Vec<usize>>,
}

impl KeyIndex {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(capacity),
        }
    }

    fn position(&self, hash: u64, mut matches: impl FnMut(usize) -> bool) -> Option<usize> {
        self.buckets.get(&hash)?.iter().copied().find(|&i| matches(i))
    }

    fn push(&mut self, hash: u64, position: usize) {
        self.buckets.entry(hash).or_default().push(position);
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Ordered mapping with arbitrary value keys
///
/// Insertion order is preserved; inserting a key equal to an existing one
/// replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    kind: MappingKind,
    entries: Vec<(Value, Value)>,
    index: KeyIndex,
}

impl Mapping {
    pub fn new(kind: MappingKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            index: KeyIndex::default(),
        }
    }

    pub fn with_capacity(kind: MappingKind, capacity: usize) -> Self {
        Self {
            kind,
            entries: Vec::with_capacity(capacity),
            index: KeyIndex::with_capacity(capacity),
        }
    }

    pub fn kind(&self) -> MappingKind {
        self.kind
    }

    /// Return the same entries under a different container kind
    pub fn into_kind(mut self, kind: MappingKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Lookup by string key, the common case for parsed JSON objects
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.index
            .position(str_fingerprint(key), |i| {
                matches!(&self.entries[i].0, Value::Str(s) if s == key)
            })
            .map(|i| &self.entries[i].1)
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.index.position(fingerprint(key), |i| self.entries[i].0 == *key)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// Insert a pair, returning the previous value of an equal key
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let hash = fingerprint(&key);
        let entries = &self.entries;
        match self.index.position(hash, |i| entries[i].0 == key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.push(hash, self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl IntoIterator for Mapping {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(Value, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Mapping::with_capacity(MappingKind::default(), iter.size_hint().0);
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Converted form of an object type: its resolved fields in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    type_id: TypeId,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(type_name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            type_name: type_name.into(),
            type_id,
            fields: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Remove a field and return its raw value
    pub fn take_value(&mut self, name: &str) -> Result<Value> {
        let position = self
            .fields
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| Error::MissingField {
                type_name: self.type_name.clone(),
                field: name.to_string(),
            })?;
        Ok(self.fields.remove(position).1)
    }

    /// Remove a field and extract it as a typed value
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T> {
        let value = self.take_value(name)?;
        T::from_value(value).map_err(|e| match e {
            Error::TypeMismatch { expected, found, .. } => Error::TypeMismatch {
                expected,
                found,
                context: Some(format!("field '{}' of {}", name, self.type_name)),
            },
            other => other,
        })
    }

    /// Remove a nested object field and construct it
    pub fn take_object<T: Buildable>(&mut self, name: &str) -> Result<T> {
        let value = self.take_value(name)?;
        construct_from_value(value)
    }

    /// Remove an optional nested object field, `null` yields `None`
    pub fn take_optional_object<T: Buildable>(&mut self, name: &str) -> Result<Option<T>> {
        match self.take_value(name)? {
            Value::Null => Ok(None),
            value => construct_from_value(value).map(Some),
        }
    }

    /// Remove a field holding a sequence of nested objects and construct each one
    pub fn take_objects<T: Buildable>(&mut self, name: &str) -> Result<Vec<T>> {
        let value = self.take_value(name)?;
        let found = value.type_name();
        value
            .into_elements()
            .ok_or_else(|| Error::type_mismatch("sequence of records", found))?
            .into_iter()
            .map(construct_from_value)
            .collect()
    }
}

fn construct_from_value<T: Buildable>(value: Value) -> Result<T> {
    match value {
        Value::Record(record) => T::construct(record),
        other => Err(Error::type_mismatch("record", other.type_name())),
    }
}

/// Typed extraction out of a converted value
///
/// Extraction is strict: it only unwraps values that already have the right
/// shape. Coercion is the engine's job.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::type_mismatch("bool", other.type_name())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(Error::type_mismatch("int", other.type_name())),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        let n = i64::from_value(value)?;
        i32::try_from(n).map_err(|e| Error::conversion("i32", n, e.to_string()))
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self> {
        let n = i64::from_value(value)?;
        u64::try_from(n).map_err(|e| Error::conversion("u64", n, e.to_string()))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(n) => Ok(n),
            other => Err(Error::type_mismatch("float", other.type_name())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(Error::type_mismatch("str", other.type_name())),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => Err(Error::type_mismatch("datetime", other.type_name())),
        }
    }
}

impl FromValue for Mapping {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(map) => Ok(map),
            other => Err(Error::type_mismatch("mapping", other.type_name())),
        }
    }
}

impl FromValue for Record {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Record(record) => Ok(record),
            other => Err(Error::type_mismatch("record", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            other => Err(Error::type_mismatch("sequence", other.type_name())),
        }
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self> {
        let map = Mapping::from_value(value)?;
        map.into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect()
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: Value) -> Result<Self> {
        let map = Mapping::from_value(value)?;
        map.into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect()
    }
}

fn exact_items(value: Value, arity: usize) -> Result<Vec<Value>> {
    match value {
        Value::Tuple(items) | Value::List(items) if items.len() == arity => Ok(items),
        Value::Tuple(items) | Value::List(items) => Err(Error::type_mismatch(
            format!("sequence of {} elements", arity),
            format!("sequence of {} elements", items.len()),
        )),
        other => Err(Error::type_mismatch("tuple", other.type_name())),
    }
}

impl<A: FromValue, B: FromValue> FromValue for (A, B) {
    fn from_value(value: Value) -> Result<Self> {
        let mut items = exact_items(value, 2)?.into_iter();
        match (items.next(), items.next()) {
            (Some(a), Some(b)) => Ok((A::from_value(a)?, B::from_value(b)?)),
            _ => Err(Error::type_mismatch("tuple of 2 elements", "shorter sequence")),
        }
    }
}

impl<A: FromValue, B: FromValue, C: FromValue> FromValue for (A, B, C) {
    fn from_value(value: Value) -> Result<Self> {
        let mut items = exact_items(value, 3)?.into_iter();
        match (items.next(), items.next(), items.next()) {
            (Some(a), Some(b), Some(c)) => {
                Ok((A::from_value(a)?, B::from_value(b)?, C::from_value(c)?))
            }
            _ => Err(Error::type_mismatch("tuple of 3 elements", "shorter sequence")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_numbers_and_nesting() {
        let value = Value::from(json!({"b": 1, "a": 2.5, "c": [true, null]}));
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.kind(), MappingKind::Dict);
        assert_eq!(map.get_str("b"), Some(&Value::Int(1)));
        assert_eq!(map.get_str("a"), Some(&Value::Float(2.5)));
        assert_eq!(
            map.get_str("c"),
            Some(&Value::List(vec![Value::Bool(true), Value::Null]))
        );
    }

    #[test]
    fn test_wide_mapping_and_set() {
        let size = 20_000;
        let map: Mapping = (0..size)
            .map(|i| (Value::from(format!("k{}", i)), Value::Int(i)))
            .collect();
        assert_eq!(map.len(), size as usize);
        assert_eq!(map.get_str("k19999"), Some(&Value::Int(19_999)));
        assert_eq!(map.keys().next(), Some(&Value::from("k0")));

        let items = (0..size).chain(0..size).map(|i| Value::Int(i % 5_000)).collect();
        match Value::set_from(items) {
            Value::Set(unique) => {
                assert_eq!(unique.len(), 5_000);
                assert_eq!(unique[4_999], Value::Int(4_999));
            }
            other => panic!("expected a set, got {:?}", other),
        }
    }

    #[test]
    fn test_mapping_keys_follow_value_equality() {
        let mut map = Mapping::default();
        map.insert(Value::Float(0.0), Value::from("zero"));
        map.insert(Value::Float(-0.0), Value::from("negative zero"));
        map.insert(Value::Int(0), Value::from("int"));
        map.insert(Value::Float(f64::NAN), Value::Null);
        map.insert(Value::Float(f64::NAN), Value::Null);
        map.insert(
            Value::Set(vec![Value::Int(1), Value::Int(2)]),
            Value::from("a"),
        );
        map.insert(
            Value::Set(vec![Value::Int(2), Value::Int(1)]),
            Value::from("b"),
        );

        // NaN never equals itself, so both NaN keys are kept
        assert_eq!(map.len(), 5);
        assert_eq!(map.get(&Value::Float(0.0)), Some(&Value::from("negative zero")));
        assert_eq!(map.get(&Value::Int(0)), Some(&Value::from("int")));
        assert_eq!(
            map.get(&Value::Set(vec![Value::Int(1), Value::Int(2)])),
            Some(&Value::from("b"))
        );
        assert_eq!(map.get_str("zero"), None);
    }

    #[test]
    fn test_mapping_insert_replaces_in_place() {
        let mut map = Mapping::default();
        map.insert(Value::from("x"), Value::Int(1));
        map.insert(Value::Int(4), Value::Int(2));
        let previous = map.insert(Value::from("x"), Value::Int(3));
        assert_eq!(previous, Some(Value::Int(1)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().next(), Some(&Value::from("x")));
        assert_eq!(map.get(&Value::Int(4)), Some(&Value::Int(2)));
    }

    #[test]
    fn test_mapping_equality_ignores_order() {
        let a: Mapping = vec![(Value::from("a"), Value::Int(1)), (Value::from("b"), Value::Int(2))]
            .into_iter()
            .collect();
        let b: Mapping = vec![(Value::from("b"), Value::Int(2)), (Value::from("a"), Value::Int(1))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_dedup_and_equality() {
        let set = Value::set_from(vec![Value::from("7"), Value::from("8"), Value::from("7")]);
        assert_eq!(set, Value::Set(vec![Value::from("8"), Value::from("7")]));
        assert_ne!(set, Value::List(vec![Value::from("7"), Value::from("8")]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float(4.0).to_string(), "4.0");
        assert_eq!(Value::Float(3.4).to_string(), "3.4");
        assert_eq!(Value::Int(30).to_string(), "30");
        let tuple = Value::Tuple(vec![Value::Float(3.4), Value::from("7"), Value::Int(8)]);
        assert_eq!(tuple.to_string(), "(3.4, '7', 8)");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("no").is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::Int(-1).is_truthy());
    }

    #[test]
    fn test_strings_are_not_iterable() {
        assert!(Value::from("abc").into_elements().is_none());
        let keys = Value::from(json!({"a": 1, "b": 2})).into_elements().unwrap();
        assert_eq!(keys, vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_from_value_extraction() {
        let items: Vec<i64> =
            FromValue::from_value(Value::List(vec![Value::Int(1), Value::Int(2)])).unwrap();
        assert_eq!(items, vec![1, 2]);

        let pair: (f64, String) =
            FromValue::from_value(Value::Tuple(vec![Value::Float(1.5), Value::from("x")])).unwrap();
        assert_eq!(pair, (1.5, "x".to_string()));

        let missing: Option<i64> = FromValue::from_value(Value::Null).unwrap();
        assert_eq!(missing, None);

        let err = i64::from_value(Value::from("3")).unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_record_take() {
        let mut record = Record::new("Point", TypeId::of::<()>());
        record.push("x", Value::Int(1));
        record.push("y", Value::from("two"));
        assert_eq!(record.take::<i64>("x").unwrap(), 1);
        let err = record.take::<i64>("y").unwrap_err();
        match err {
            Error::TypeMismatch { context, .. } => {
                assert_eq!(context.as_deref(), Some("field 'y' of Point"))
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(
            record.take::<i64>("x"),
            Err(Error::MissingField { .. })
        ));
    }

    #[test]
    fn test_to_json_roundtrip_of_plain_data() {
        let source = json!({"a": [1, 2.5, "x"], "b": {"c": null}});
        assert_eq!(Value::from(source.clone()).to_json(), source);
    }
}
