//! Converter registry: per-type overrides of the coercion engine
//!
//! A [`ConverterRegistry`] maps an exact [`TypeDescriptor`] to a one-argument
//! conversion function. Lookup is exact, with no matching on related types.
//! When no converter is registered the engine falls back to the type's native
//! construction.
//!
//! The process-wide default ([`default_registry`]) ships the boolean and
//! timestamp converters from [`built_in`]. It is immutable; callers that want
//! to override it start from [`ConverterRegistry::with_defaults`] and register
//! on their own copy before any conversion starts.
//!
//! ```
//! use dictcast_core::conversion::registry::ConverterRegistry;
//! use dictcast_core::conversion::descriptor::TypeDescriptor;
//! use dictcast_core::Value;
//!
//! let mut registry = ConverterRegistry::with_defaults();
//! let fallback = registry.get_converter(&TypeDescriptor::bool());
//! registry.register(TypeDescriptor::bool(), move |value| match value.as_str() {
//!     Some("oups") => Ok(Value::Bool(false)),
//!     _ => fallback(value),
//! });
//!
//! let value = registry.convert(Value::from("oups"), &TypeDescriptor::bool()).unwrap();
//! assert_eq!(value, Value::Bool(false));
//! ```
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

pub mod built_in;

use super::coercion::{construct_scalar, Coercer};
use super::descriptor::TypeDescriptor;
use crate::{Result, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A one-argument conversion function
pub type ConverterFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

static DEFAULT_REGISTRY: OnceLock<ConverterRegistry> = OnceLock::new();

/// The process-wide default registry
pub fn default_registry() -> &'static ConverterRegistry {
    DEFAULT_REGISTRY.get_or_init(ConverterRegistry::with_defaults)
}

/// Mapping from target descriptor to conversion function
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeDescriptor, ConverterFn>,
}

impl ConverterRegistry {
    /// An empty registry: every conversion uses native construction
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in boolean and timestamp converters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TypeDescriptor::bool(), built_in::bool_converter);
        registry.register(TypeDescriptor::datetime(), built_in::datetime_converter);
        registry
    }

    /// Register a converter, replacing and returning any previous one
    pub fn register<F>(&mut self, descriptor: TypeDescriptor, converter: F) -> Option<ConverterFn>
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_shared(descriptor, Arc::new(converter))
    }

    /// Register an already shared converter
    pub fn register_shared(
        &mut self,
        descriptor: TypeDescriptor,
        converter: ConverterFn,
    ) -> Option<ConverterFn> {
        log::debug!("Registering converter for {}", descriptor);
        self.converters.insert(descriptor, converter)
    }

    /// Remove a registered converter
    pub fn unregister(&mut self, descriptor: &TypeDescriptor) -> Option<ConverterFn> {
        self.converters.remove(descriptor)
    }

    /// The converter registered for exactly this descriptor
    pub fn lookup(&self, descriptor: &TypeDescriptor) -> Option<ConverterFn> {
        self.converters.get(descriptor).cloned()
    }

    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.converters.contains_key(descriptor)
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.converters.keys()
    }

    /// The registered converter, or the type's own construction as a last resort.
    ///
    /// Useful to wrap an existing converter before registering a replacement.
    pub fn get_converter(&self, descriptor: &TypeDescriptor) -> ConverterFn {
        if let Some(converter) = self.lookup(descriptor) {
            return converter;
        }
        match descriptor {
            TypeDescriptor::Scalar(scalar) => {
                let scalar = *scalar;
                Arc::new(move |value| construct_scalar(scalar, value))
            }
            other => {
                // nested elements still go through this registry's converters
                let registry = self.clone();
                let descriptor = other.clone();
                Arc::new(move |value| Coercer::new(&registry).convert(value, &descriptor))
            }
        }
    }

    /// Convert with the registered converter, or fall back to the coercion engine
    pub fn convert(&self, value: Value, descriptor: &TypeDescriptor) -> Result<Value> {
        match self.converters.get(descriptor) {
            Some(converter) => converter(value),
            None => Coercer::new(self).convert(value, descriptor),
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.converters.keys().map(|d| d.to_string()).collect();
        names.sort();
        f.debug_struct("ConverterRegistry")
            .field("converters", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_default_registry_contents() {
        let registry = default_registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&TypeDescriptor::bool()));
        assert!(registry.contains(&TypeDescriptor::datetime()));
        assert!(!registry.contains(&TypeDescriptor::int()));
    }

    #[test]
    fn test_register_overrides() {
        let mut registry = ConverterRegistry::new();
        assert!(registry.is_empty());

        let previous = registry.register(TypeDescriptor::int(), |v| {
            Ok(Value::from(format!("i{}", v)))
        });
        assert!(previous.is_none());
        let previous = registry.register(TypeDescriptor::int(), |v| {
            Ok(Value::from(format!("j{}", v)))
        });
        assert!(previous.is_some());
        assert_eq!(registry.len(), 1);

        let converted = registry.convert(Value::Float(3.4), &TypeDescriptor::int()).unwrap();
        assert_eq!(converted, Value::from("j3.4"));
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut registry = ConverterRegistry::new();
        registry.register(TypeDescriptor::list(TypeDescriptor::int()), |_| Ok(Value::Null));
        assert!(registry.lookup(&TypeDescriptor::list(TypeDescriptor::int())).is_some());
        assert!(registry.lookup(&TypeDescriptor::list(TypeDescriptor::float())).is_none());
        assert!(registry.lookup(&TypeDescriptor::int()).is_none());
    }

    #[test]
    fn test_get_converter_falls_back_to_construction() {
        let registry = ConverterRegistry::new();
        let to_int = registry.get_converter(&TypeDescriptor::int());
        assert_eq!(to_int(Value::from("7")).unwrap(), Value::Int(7));
        assert!(matches!(to_int(Value::from("x")), Err(Error::Conversion { .. })));

        let to_list = registry.get_converter(&TypeDescriptor::list(TypeDescriptor::int()));
        assert_eq!(
            to_list(Value::List(vec![Value::Float(1.9), Value::from("2")])).unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_get_converter_keeps_nested_converters() {
        let registry = ConverterRegistry::with_defaults();
        let descriptor = TypeDescriptor::list(TypeDescriptor::bool());
        let to_flags = registry.get_converter(&descriptor);

        let input = Value::List(vec![Value::from("no"), Value::from("yes")]);
        let expected = Value::List(vec![Value::Bool(false), Value::Bool(true)]);
        assert_eq!(to_flags(input.clone()).unwrap(), expected);
        assert_eq!(registry.convert(input, &descriptor).unwrap(), expected);
    }

    #[test]
    fn test_composed_override() {
        let mut registry = ConverterRegistry::with_defaults();
        let default_bool = registry.get_converter(&TypeDescriptor::bool());
        registry.register(TypeDescriptor::bool(), move |value| {
            if value.as_str() == Some("lol") {
                return Ok(Value::Bool(true));
            }
            default_bool(value)
        });

        let lol = registry.convert(Value::from("lol"), &TypeDescriptor::bool()).unwrap();
        assert_eq!(lol, Value::Bool(true));
        let no = registry.convert(Value::from("no"), &TypeDescriptor::bool()).unwrap();
        assert_eq!(no, Value::Bool(false));

        // the process-wide default is untouched
        assert!(default_registry()
            .convert(Value::from("lol"), &TypeDescriptor::bool())
            .is_err());
    }

    #[test]
    fn test_debug_lists_descriptors() {
        let rendered = format!("{:?}", ConverterRegistry::with_defaults());
        assert!(rendered.contains("bool"));
        assert!(rendered.contains("datetime"));
    }
}
