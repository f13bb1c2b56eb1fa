//! Field tables for constructible target types
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

use crate::conversion::descriptor::{short_type_name, TypeDescriptor};
use crate::conversion::path::Path;
use crate::conversion::routes::IntoPath;
use crate::{Error, Record, Result, Value};
use std::any::TypeId;
use std::collections::HashSet;

/// A type that can be built from a dictionary tree
///
/// `schema` lists the constructor parameters in declaration order; `construct`
/// receives the resolved and converted fields as a [`Record`].
///
/// ```
/// use dictcast_core::{Buildable, ObjectSchema, Record, Result, TypeDescriptor};
///
/// struct Reading {
///     sensor: String,
///     value: f64,
/// }
///
/// impl Buildable for Reading {
///     fn schema() -> Result<ObjectSchema> {
///         Ok(ObjectSchema::of::<Self>()
///             .field("sensor", TypeDescriptor::string())
///             .field_with_default("value", TypeDescriptor::float(), 0.0))
///     }
///
///     fn construct(mut record: Record) -> Result<Self> {
///         Ok(Reading {
///             sensor: record.take("sensor")?,
///             value: record.take("value")?,
///         })
///     }
/// }
/// ```
pub trait Buildable: Sized + 'static {
    fn schema() -> Result<ObjectSchema>;

    fn construct(record: Record) -> Result<Self>;
}

/// One constructor parameter of a target type
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub descriptor: TypeDescriptor,
    /// Value used when the source has nothing for this field
    pub default: Option<Value>,
    /// Path embedded in the field declaration itself
    pub path: Option<Path>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
            default: None,
            path: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn at(mut self, path: impl IntoPath) -> Result<Self> {
        self.path = Some(path.into_path()?);
        Ok(self)
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Ordered field table of a target type
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    type_name: String,
    type_id: TypeId,
    fields: Vec<FieldSpec>,
}

impl ObjectSchema {
    pub fn new(type_name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            type_name: type_name.into(),
            type_id,
            fields: Vec::new(),
        }
    }

    /// Empty schema named after `T`
    pub fn of<T: 'static>() -> Self {
        Self::new(short_type_name(std::any::type_name::<T>()), TypeId::of::<T>())
    }

    /// Add a required field
    pub fn field(self, name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.push(FieldSpec::new(name, descriptor))
    }

    /// Add a field with a default value
    pub fn field_with_default(
        self,
        name: impl Into<String>,
        descriptor: TypeDescriptor,
        default: impl Into<Value>,
    ) -> Self {
        self.push(FieldSpec::new(name, descriptor).with_default(default))
    }

    /// Add a required field read from its own path
    pub fn field_at(
        self,
        name: impl Into<String>,
        descriptor: TypeDescriptor,
        path: impl IntoPath,
    ) -> Result<Self> {
        Ok(self.push(FieldSpec::new(name, descriptor).at(path)?))
    }

    pub fn push(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Reject duplicate field names and malformed descriptors
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidDescriptor {
                    message: format!("{} declares field '{}' twice", self.type_name, field.name),
                });
            }
            field.descriptor.validate()?;
        }
        Ok(())
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> + Clone {
        self.fields.iter().map(|f| f.name.as_str())
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
}
