//! Type descriptors: what a located value should be converted into
//!
//! A [`TypeDescriptor`] is the explicit, statically built stand-in for a type
//! annotation. Exactly one variant is active; container variants nest
//! arbitrarily.
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

use super::builder::{Buildable, ObjectSchema};
use crate::{Error, Result, Value};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Scalar target types with a native single-argument construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int,
    Float,
    Str,
    DateTime,
}

impl ScalarType {
    /// True when `value` already is an instance of this scalar type
    pub fn is_instance(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ScalarType::Bool, Value::Bool(_))
                | (ScalarType::Int, Value::Int(_))
                | (ScalarType::Float, Value::Float(_))
                | (ScalarType::Str, Value::Str(_))
                | (ScalarType::DateTime, Value::DateTime(_))
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Str => "str",
            ScalarType::DateTime => "datetime",
        }
    }
}

/// Sequence containers a list of converted elements can be collected into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    List,
    Tuple,
    Set,
}

impl SequenceKind {
    /// Construct the container from converted elements
    pub fn construct(&self, items: Vec<Value>) -> Value {
        match self {
            SequenceKind::List => Value::List(items),
            SequenceKind::Tuple => Value::Tuple(items),
            SequenceKind::Set => Value::set_from(items),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SequenceKind::List => "list",
            SequenceKind::Tuple => "tuple",
            SequenceKind::Set => "set",
        }
    }
}

/// Mapping containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MappingKind {
    /// Insertion ordered dictionary
    #[default]
    Dict,
    /// Immutable mapping; it cannot be started empty and filled in
    Frozen,
}

impl MappingKind {
    /// Whether an empty instance can be created and filled pair by pair
    pub fn constructs_empty(&self) -> bool {
        match self {
            MappingKind::Dict => true,
            MappingKind::Frozen => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MappingKind::Dict => "dict",
            MappingKind::Frozen => "frozendict",
        }
    }
}

/// Handle to a user-defined constructible type
///
/// The schema is produced on demand, so recursive types do not recurse while
/// their descriptors are being built. Identity is the Rust `TypeId`.
#[derive(Clone, Copy)]
pub struct ObjectHandle {
    type_id: TypeId,
    type_name: &'static str,
    schema: fn() -> Result<ObjectSchema>,
}

impl ObjectHandle {
    pub fn of<T: Buildable>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: short_type_name(std::any::type_name::<T>()),
            schema: T::schema,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Build the field table of the target type
    pub fn schema(&self) -> Result<ObjectSchema> {
        (self.schema)()
    }

    /// True when `value` is a record already built for this type
    pub fn is_instance(&self, value: &Value) -> bool {
        value.as_record().is_some_and(|r| r.type_id() == self.type_id)
    }
}

pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    // generic arguments may contain paths themselves, only strip the outer one
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ObjectHandle {}

impl Hash for ObjectHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHandle({})", self.type_name)
    }
}

/// Target type of a conversion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Unspecified: values pass through unchanged
    Any,
    Scalar(ScalarType),
    /// `null` passes through, anything else converts against the inner type
    Optional(Box<TypeDescriptor>),
    /// One element type for every element
    Homogeneous {
        element: Box<TypeDescriptor>,
        kind: SequenceKind,
    },
    /// One type per position; arity must match the input exactly
    Heterogeneous {
        elements: Vec<TypeDescriptor>,
        kind: SequenceKind,
    },
    Mapping {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
        kind: MappingKind,
    },
    Object(ObjectHandle),
}

impl TypeDescriptor {
    pub fn any() -> Self {
        TypeDescriptor::Any
    }

    pub fn bool() -> Self {
        TypeDescriptor::Scalar(ScalarType::Bool)
    }

    pub fn int() -> Self {
        TypeDescriptor::Scalar(ScalarType::Int)
    }

    pub fn float() -> Self {
        TypeDescriptor::Scalar(ScalarType::Float)
    }

    pub fn string() -> Self {
        TypeDescriptor::Scalar(ScalarType::Str)
    }

    pub fn datetime() -> Self {
        TypeDescriptor::Scalar(ScalarType::DateTime)
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Optional(Box::new(inner))
    }

    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::Homogeneous {
            element: Box::new(element),
            kind: SequenceKind::List,
        }
    }

    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::Homogeneous {
            element: Box::new(element),
            kind: SequenceKind::Set,
        }
    }

    /// Variable-length tuple with a single element type
    pub fn tuple_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Homogeneous {
            element: Box::new(element),
            kind: SequenceKind::Tuple,
        }
    }

    /// Fixed-arity tuple with one type per position
    pub fn tuple(elements: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Heterogeneous {
            elements,
            kind: SequenceKind::Tuple,
        }
    }

    /// Container of the given kind with unconverted elements
    pub fn bare(kind: SequenceKind) -> Self {
        TypeDescriptor::Homogeneous {
            element: Box::new(TypeDescriptor::Any),
            kind,
        }
    }

    pub fn dict(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Mapping {
            key: Box::new(key),
            value: Box::new(value),
            kind: MappingKind::Dict,
        }
    }

    pub fn frozen_dict(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Mapping {
            key: Box::new(key),
            value: Box::new(value),
            kind: MappingKind::Frozen,
        }
    }

    pub fn object<T: Buildable>() -> Self {
        TypeDescriptor::Object(ObjectHandle::of::<T>())
    }

    /// Structural check of the descriptor itself
    pub fn validate(&self) -> Result<()> {
        match self {
            TypeDescriptor::Any | TypeDescriptor::Scalar(_) | TypeDescriptor::Object(_) => Ok(()),
            TypeDescriptor::Optional(inner) => inner.validate(),
            TypeDescriptor::Homogeneous { element, .. } => element.validate(),
            TypeDescriptor::Heterogeneous { elements, .. } => {
                if elements.is_empty() {
                    return Err(Error::InvalidDescriptor {
                        message: format!("{} needs at least one element type", self),
                    });
                }
                elements.iter().try_for_each(TypeDescriptor::validate)
            }
            TypeDescriptor::Mapping { key, value, .. } => {
                if matches!(**key, TypeDescriptor::Homogeneous { kind: SequenceKind::List, .. }) {
                    return Err(Error::InvalidDescriptor {
                        message: format!("{} uses a list as mapping key", self),
                    });
                }
                key.validate()?;
                value.validate()
            }
        }
    }
}

impl From<ScalarType> for TypeDescriptor {
    fn from(scalar: ScalarType) -> Self {
        TypeDescriptor::Scalar(scalar)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Any => write!(f, "any"),
            TypeDescriptor::Scalar(scalar) => write!(f, "{}", scalar.name()),
            TypeDescriptor::Optional(inner) => write!(f, "Optional[{}]", inner),
            TypeDescriptor::Homogeneous { element, kind } => match **element {
                TypeDescriptor::Any => write!(f, "{}", kind.name()),
                _ => write!(f, "{}[{}]", kind.name(), element),
            },
            TypeDescriptor::Heterogeneous { elements, kind } => {
                write!(f, "{}[", kind.name())?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            TypeDescriptor::Mapping { key, value, kind } => {
                write!(f, "{}[{}, {}]", kind.name(), key, value)
            }
            TypeDescriptor::Object(handle) => write!(f, "{}", handle.type_name()),
        }
    }
}
