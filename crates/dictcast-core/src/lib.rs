//! Dictcast Core - typed objects out of loosely typed dictionary trees
//!
//! This crate converts nested dictionary/list data, such as parsed JSON, into
//! strongly typed objects. It locates the source value of every target field,
//! possibly through a rerouting path, and coerces it to the field's declared
//! type, recursively for containers and nested object types.
//!
//! # Main Components
//!
//! - **Path Extraction**: slash-delimited paths with projection, wildcards and predicates
//! - **Converter Registry**: per-type overrides of the coercion rules
//! - **Routing**: per-type field to path tables (`Route`, `Chart`)
//! - **Type Coercion**: recursive conversion driven by a `TypeDescriptor`
//! - **Object Builder**: field resolution and construction of `Buildable` types
//!
//! # Example
//!
//! ```
//! use dictcast_core::{convert, extract, Result, TypeDescriptor, Value};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let data = Value::from(json!({"e": [{"f": 30, "g": "100"}, {"f": 20, "g": "14"}]}));
//!     let raw = extract(&data, "e/*{f=30}/g")?;
//!     let typed = convert(raw, &TypeDescriptor::list(TypeDescriptor::int()))?;
//!     assert_eq!(typed, Value::from(json!([100])));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod config;
pub mod conversion;
pub mod error;
pub mod value;

#[cfg(test)]
mod proptest_strategies;


// Re-export main types for convenience
pub use config::ConversionOptions;
pub use error::{Error, Result, StrictMode};
pub use value::{FromValue, Mapping, Record, Value};

pub use conversion::{
    // Entry points
    build, convert, convert_with, extract, get_or_default,

    // Builder
    Buildable, FieldSpec, ObjectBuilder, ObjectSchema,

    // Descriptors
    MappingKind, ObjectHandle, ScalarType, SequenceKind, TypeDescriptor,

    // Paths and routing
    Chart, IntoPath, Path, PathError, Route, Routing,

    // Registry
    default_registry, ConverterRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
