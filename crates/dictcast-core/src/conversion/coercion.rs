//! Type coercion engine
//!
//! Converts a located raw value into the shape a [`TypeDescriptor`] asks for.
//! The decision order, first match wins:
//!
//! 1. `Any` returns the value unchanged.
//! 2. A scalar or object descriptor the value is already an instance of returns
//!    the value unchanged, without reconstruction.
//! 3. A converter registered for exactly this descriptor is invoked.
//! 4. Scalars use their native construction; object types are built from the
//!    value by the object builder, with the chart's route for that type.
//! 5. Mappings convert every key and value. When the target mapping cannot be
//!    started empty, a source of the same kind is copied; otherwise the result
//!    widens to a plain dictionary according to the [`StrictMode`].
//! 6. Homogeneous containers convert every element against one type.
//! 7. Heterogeneous containers convert position by position; arity must match.
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

use super::builder;
use super::descriptor::{MappingKind, ObjectHandle, ScalarType, SequenceKind, TypeDescriptor};
use super::registry::ConverterRegistry;
use super::routes::Chart;
use crate::{ConversionOptions, Error, Mapping, Result, StrictMode, Value};

/// Recursive converter bound to a registry and an optional chart
#[derive(Debug, Clone, Copy)]
pub struct Coercer<'a> {
    registry: &'a ConverterRegistry,
    chart: Option<&'a Chart>,
    options: ConversionOptions,
}

impl<'a> Coercer<'a> {
    pub fn new(registry: &'a ConverterRegistry) -> Self {
        Self {
            registry,
            chart: None,
            options: ConversionOptions::default(),
        }
    }

    /// Route nested object conversions through `chart`
    pub fn with_chart(mut self, chart: &'a Chart) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &'a ConverterRegistry {
        self.registry
    }

    pub fn chart(&self) -> Option<&'a Chart> {
        self.chart
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert `value` to the shape described by `descriptor`
    pub fn convert(&self, value: Value, descriptor: &TypeDescriptor) -> Result<Value> {
        self.convert_at(value, descriptor, 0)
    }

    pub(crate) fn convert_at(
        &self,
        value: Value,
        descriptor: &TypeDescriptor,
        depth: usize,
    ) -> Result<Value> {
        if depth > self.options.max_depth {
            return Err(Error::DepthExceeded {
                max_depth: self.options.max_depth,
            });
        }

        match descriptor {
            TypeDescriptor::Any => return Ok(value),
            TypeDescriptor::Scalar(scalar) if scalar.is_instance(&value) => return Ok(value),
            TypeDescriptor::Object(handle) if handle.is_instance(&value) => return Ok(value),
            _ => {}
        }

        if let Some(converter) = self.registry.lookup(descriptor) {
            log::debug!("Using registered converter for {}", descriptor);
            return converter(value);
        }

        match descriptor {
            TypeDescriptor::Any => Ok(value),
            TypeDescriptor::Scalar(scalar) => construct_scalar(*scalar, value),
            TypeDescriptor::Optional(inner) => match value {
                Value::Null => Ok(Value::Null),
                other => self.convert_at(other, inner, depth + 1),
            },
            TypeDescriptor::Object(handle) => self.convert_object(handle, value, depth),
            TypeDescriptor::Mapping { key, value: value_type, kind } => {
                self.convert_mapping(value, descriptor, key, value_type, *kind, depth)
            }
            TypeDescriptor::Homogeneous { element, kind } => {
                self.convert_homogeneous(value, descriptor, element, *kind, depth)
            }
            TypeDescriptor::Heterogeneous { elements, kind } => {
                self.convert_heterogeneous(value, descriptor, elements, *kind, depth)
            }
        }
    }

    fn convert_object(&self, handle: &ObjectHandle, value: Value, depth: usize) -> Result<Value> {
        let route = self.chart.and_then(|chart| chart.route_for(handle));
        builder::resolve_record(handle, &value, self, route, depth + 1).map(Value::Record)
    }

    fn convert_mapping(
        &self,
        value: Value,
        descriptor: &TypeDescriptor,
        key_type: &TypeDescriptor,
        value_type: &TypeDescriptor,
        kind: MappingKind,
        depth: usize,
    ) -> Result<Value> {
        let source = match value {
            Value::Map(map) => map,
            other => {
                return Err(Error::TypeMismatch {
                    expected: descriptor.to_string(),
                    found: other.type_name().to_string(),
                    context: Some("mapping conversion needs a mapping".to_string()),
                })
            }
        };

        let mut result = if kind.constructs_empty() {
            Mapping::with_capacity(kind, source.len())
        } else if source.kind() == kind {
            log::debug!("Cannot construct an empty {}, copying the source", kind.name());
            source.clone()
        } else {
            self.widen_mapping(descriptor, &source)?
        };

        for (k, v) in source {
            let k = self.convert_at(k, key_type, depth + 1)?;
            let v = self.convert_at(v, value_type, depth + 1)?;
            result.insert(k, v);
        }

        Ok(Value::Map(result))
    }

    /// Last resort for mapping kinds that cannot be built generically
    fn widen_mapping(&self, descriptor: &TypeDescriptor, source: &Mapping) -> Result<Mapping> {
        match self.options.strict_mode {
            StrictMode::Strict => Err(Error::conversion(
                descriptor.to_string(),
                Value::Map(source.clone()),
                format!(
                    "{} cannot be constructed empty and the source is a {}",
                    descriptor,
                    source.kind().name()
                ),
            )),
            StrictMode::Warn => {
                log::warn!(
                    "Cannot construct {}, falling back to a plain dict",
                    descriptor
                );
                Ok(Mapping::with_capacity(MappingKind::Dict, source.len()))
            }
            StrictMode::Coerce => {
                log::debug!("Coercing {} to a plain dict", descriptor);
                Ok(Mapping::with_capacity(MappingKind::Dict, source.len()))
            }
        }
    }

    fn convert_homogeneous(
        &self,
        value: Value,
        descriptor: &TypeDescriptor,
        element: &TypeDescriptor,
        kind: SequenceKind,
        depth: usize,
    ) -> Result<Value> {
        let found = value.type_name();
        let items = value.into_elements().ok_or_else(|| Error::TypeMismatch {
            expected: descriptor.to_string(),
            found: found.to_string(),
            context: Some("container conversion needs an iterable".to_string()),
        })?;

        let converted = items
            .into_iter()
            .map(|item| self.convert_at(item, element, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(kind.construct(converted))
    }

    fn convert_heterogeneous(
        &self,
        value: Value,
        descriptor: &TypeDescriptor,
        elements: &[TypeDescriptor],
        kind: SequenceKind,
        depth: usize,
    ) -> Result<Value> {
        if elements.is_empty() {
            return Err(Error::InvalidDescriptor {
                message: format!("{} needs at least one element type", descriptor),
            });
        }

        let found = value.type_name();
        let items = value.into_elements().ok_or_else(|| Error::TypeMismatch {
            expected: descriptor.to_string(),
            found: found.to_string(),
            context: Some("container conversion needs an iterable".to_string()),
        })?;

        if items.len() != elements.len() {
            return Err(Error::TypeMismatch {
                expected: format!("{} elements for {}", elements.len(), descriptor),
                found: format!("{} elements", items.len()),
                context: Some("heterogeneous containers need an exact arity".to_string()),
            });
        }

        let converted = items
            .into_iter()
            .zip(elements)
            .map(|(item, element)| self.convert_at(item, element, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(kind.construct(converted))
    }
}

/// Native single-argument construction of a scalar type
pub fn construct_scalar(scalar: ScalarType, value: Value) -> Result<Value> {
    if scalar.is_instance(&value) {
        return Ok(value);
    }

    match scalar {
        ScalarType::Int => match &value {
            Value::Bool(b) => Ok(Value::Int(*b as i64)),
            Value::Float(n) => {
                let truncated = n.trunc();
                if truncated.is_finite()
                    && truncated >= i64::MIN as f64
                    && truncated < i64::MAX as f64
                {
                    Ok(Value::Int(truncated as i64))
                } else {
                    Err(Error::conversion("int", &value, "float is out of the integer range"))
                }
            }
            Value::Str(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| Error::conversion("int", &value, e.to_string())),
            _ => Err(Error::conversion(
                "int",
                &value,
                format!("cannot build int from {}", value.type_name()),
            )),
        },
        ScalarType::Float => match &value {
            Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Int(n) => Ok(Value::Float(*n as f64)),
            Value::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| Error::conversion("float", &value, e.to_string())),
            _ => Err(Error::conversion(
                "float",
                &value,
                format!("cannot build float from {}", value.type_name()),
            )),
        },
        ScalarType::Str => Ok(Value::Str(value.to_string())),
        ScalarType::Bool => Ok(Value::Bool(value.is_truthy())),
        ScalarType::DateTime => Err(Error::conversion(
            "datetime",
            &value,
            "timestamps need a registered converter",
        )),
    }
}

/// Convert with the process-wide default registry
pub fn convert(value: Value, descriptor: &TypeDescriptor) -> Result<Value> {
    Coercer::new(super::registry::default_registry()).convert(value, descriptor)
}

/// Convert with an explicit registry and optional chart
pub fn convert_with(
    value: Value,
    descriptor: &TypeDescriptor,
    registry: &ConverterRegistry,
    chart: Option<&Chart>,
) -> Result<Value> {
    let coercer = Coercer::new(registry);
    match chart {
        Some(chart) => coercer.with_chart(chart).convert(value, descriptor),
        None => coercer.convert(value, descriptor),
    }
}
