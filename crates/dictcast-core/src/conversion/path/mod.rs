//! Slash-delimited path extraction over dictionary/list trees
//!
//! A [`Path`] locates the source value for a target field. Segments are
//! evaluated left to right against a cursor that starts at the root:
//!
//! - a literal key indexes a mapping cursor, or is projected across every
//!   element of a sequence cursor (elements lacking the key are skipped);
//! - `*` requires a sequence cursor, and `*{field=value}` additionally keeps only
//!   the elements whose `field` renders as `value`;
//! - an empty segment leaves the cursor untouched, so `""` is the identity path.
//!
//! When flattening is enabled (the default), a projection that produces a list
//! of lists is concatenated one level.
//!
//! ```
//! use dictcast_core::conversion::path::Path;
//! use dictcast_core::Value;
//! use serde_json::json;
//!
//! let data = Value::from(json!({"a": {"b": 4}}));
//! let path = Path::parse("a/b").unwrap();
//! assert_eq!(path.extract(&data).unwrap(), Value::Int(4));
//! ```
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod segment;

pub use error::PathError;
pub use segment::{Predicate, Segment};

use crate::{Result, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Function applied to the value found at the end of a path
pub type ExtractorFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// A parsed path expression with its extraction options
#[derive(Clone)]
pub struct Path {
    expression: String,
    segments: Vec<Segment>,
    extractor: Option<ExtractorFn>,
    flatten: bool,
}

impl Path {
    /// Parse a path expression such as `details/votes` or `e/*{f=30}/g`
    pub fn parse(expression: &str) -> Result<Self> {
        let segments = expression
            .split('/')
            .map(|raw| Segment::parse(raw, expression))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            expression: expression.to_string(),
            segments,
            extractor: None,
            flatten: true,
        })
    }

    /// The identity path, hands the whole structure to the target
    pub fn identity() -> Self {
        Self {
            expression: String::new(),
            segments: vec![Segment::Empty],
            extractor: None,
            flatten: true,
        }
    }

    /// Attach an extractor applied to the located value
    pub fn with_extractor<F>(mut self, extractor: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Enable or disable one-level flattening of projected lists
    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn flatten(&self) -> bool {
        self.flatten
    }

    pub fn has_extractor(&self) -> bool {
        self.extractor.is_some()
    }

    /// Extract the value this path points at.
    ///
    /// Fails with [`PathError::KeyNotFound`] when a literal key misses on a
    /// mapping cursor.
    pub fn extract(&self, root: &Value) -> Result<Value> {
        let mut cursor: Cow<'_, Value> = Cow::Borrowed(root);

        for segment in &self.segments {
            cursor = match segment {
                Segment::Empty => cursor,
                Segment::Wildcard(predicate) => {
                    let items = cursor.as_sequence().ok_or_else(|| PathError::NotASequence {
                        segment: segment.to_string(),
                        found: cursor.type_name().to_string(),
                        path: self.expression.clone(),
                    })?;
                    match predicate {
                        Some(predicate) => Cow::Owned(Value::List(filter(items, predicate))),
                        None => cursor,
                    }
                }
                Segment::Key(key) => {
                    if let Some(items) = cursor.as_sequence() {
                        Cow::Owned(Value::List(self.project(items, key)))
                    } else {
                        match cursor {
                            Cow::Borrowed(value) => Cow::Borrowed(self.lookup(value, key)?),
                            Cow::Owned(value) => Cow::Owned(self.lookup(&value, key)?.clone()),
                        }
                    }
                }
            };
        }

        let value = cursor.into_owned();
        match &self.extractor {
            Some(extractor) => extractor(value),
            None => Ok(value),
        }
    }

    /// Like [`Path::extract`], but a missing key yields `None`.
    ///
    /// Only [`PathError::KeyNotFound`] is absorbed; shape errors still fail.
    pub fn extract_optional(&self, root: &Value) -> Result<Option<Value>> {
        match self.extract(root) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_key_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `extract` with a fallback value when a key is missing
    pub fn get_or_default(&self, root: &Value, default: Value) -> Result<Value> {
        Ok(self.extract_optional(root)?.unwrap_or(default))
    }

    fn lookup<'a>(&self, value: &'a Value, key: &str) -> std::result::Result<&'a Value, PathError> {
        match value {
            Value::Map(map) => map.get_str(key).ok_or_else(|| PathError::KeyNotFound {
                key: key.to_string(),
                path: self.expression.clone(),
            }),
            Value::Record(record) => record.get(key).ok_or_else(|| PathError::KeyNotFound {
                key: key.to_string(),
                path: self.expression.clone(),
            }),
            other => Err(PathError::NotAMapping {
                key: key.to_string(),
                found: other.type_name().to_string(),
                path: self.expression.clone(),
            }),
        }
    }

    fn project(&self, items: &[Value], key: &str) -> Vec<Value> {
        let projected: Vec<Value> = items
            .iter()
            .filter_map(|item| item.as_map().and_then(|map| map.get_str(key)))
            .cloned()
            .collect();

        if self.flatten {
            flatten_once(projected)
        } else {
            projected
        }
    }
}

fn filter(items: &[Value], predicate: &Predicate) -> Vec<Value> {
    items
        .iter()
        .filter(|item| {
            item.as_map()
                .and_then(|map| map.get_str(&predicate.field))
                .is_some_and(|field| field.to_string() == predicate.literal)
        })
        .cloned()
        .collect()
}

/// Concatenate one level when the first element is itself a sequence
fn flatten_once(items: Vec<Value>) -> Vec<Value> {
    if !items.first().is_some_and(Value::is_sequence) {
        return items;
    }
    let mut out = Vec::new();
    for item in items {
        match item {
            Value::List(inner) | Value::Tuple(inner) => out.extend(inner),
            other => out.push(other),
        }
    }
    out
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("expression", &self.expression)
            .field("segments", &self.segments)
            .field("extractor", &self.extractor.is_some())
            .field("flatten", &self.flatten)
            .finish()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// Parse `expression` and extract it from `root`
pub fn extract(root: &Value, expression: &str) -> Result<Value> {
    Path::parse(expression)?.extract(root)
}

/// Parse `expression` and extract it from `root`, falling back to `default` on a missing key
pub fn get_or_default(root: &Value, expression: &str, default: Value) -> Result<Value> {
    Path::parse(expression)?.get_or_default(root, default)
}
