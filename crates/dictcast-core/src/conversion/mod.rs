//! Conversion engine: from dictionary trees to typed objects
//!
//! The object builder is the entry point. Per field it asks the path
//! extractor (or a plain key lookup) for a raw value, then hands that value and
//! the field's descriptor to the coercion engine, which consults the converter
//! registry and may come back to the builder for nested object types.
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

pub mod builder;
pub mod coercion;
pub mod descriptor;
pub mod path;
pub mod registry;
pub mod routes;

pub use builder::{build, Buildable, FieldSpec, ObjectBuilder, ObjectSchema};
pub use coercion::{convert, convert_with, Coercer};
pub use descriptor::{MappingKind, ObjectHandle, ScalarType, SequenceKind, TypeDescriptor};
pub use path::{extract, get_or_default, Path, PathError};
pub use registry::{default_registry, ConverterFn, ConverterRegistry};
pub use routes::{Chart, IntoPath, Route, Routing};
