//! Object builder: the entry point of a conversion
//!
//! For every declared field of the target type, in declaration order, the
//! builder locates a raw value (own path, route override, or direct key
//! lookup), falls back to the field default, and converts the result to the
//! field's descriptor. Nested object fields are built by the coercion engine,
//! which comes back here with the chart's route for the nested type.
//!
//! A single [`Route`] only applies to the top-level type. Use a [`Chart`] to
//! route nested types.
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

mod schema;


pub use schema::{Buildable, FieldSpec, ObjectSchema};

use super::coercion::Coercer;
use super::descriptor::ObjectHandle;
use super::registry::{default_registry, ConverterRegistry};
use super::routes::{Chart, Route, Routing};
use crate::{ConversionOptions, Error, Record, Result, StrictMode, Value};

/// Resolve and convert every field of `handle`'s type out of `data`
pub(crate) fn resolve_record(
    handle: &ObjectHandle,
    data: &Value,
    coercer: &Coercer<'_>,
    route: Option<&Route>,
    depth: usize,
) -> Result<Record> {
    let schema = handle.schema()?;
    schema.validate()?;

    let mut record = Record::new(handle.type_name(), handle.type_id());

    for field in schema.fields() {
        let routed = route.and_then(|r| r.get(&field.name));
        let path = match (&field.path, routed) {
            (Some(_), Some(_)) => {
                return Err(Error::RouteConflict {
                    type_name: handle.type_name().to_string(),
                    field: field.name.clone(),
                })
            }
            (Some(path), None) | (None, Some(path)) => Some(path),
            (None, None) => None,
        };

        let located = match path {
            Some(path) => path.extract_optional(data)?,
            None => lookup_field(handle, data, &field.name)?,
        };

        let value = match located.or_else(|| field.default.clone()) {
            Some(value) => value,
            None => {
                return Err(Error::MissingField {
                    type_name: handle.type_name().to_string(),
                    field: field.name.clone(),
                })
            }
        };

        log::trace!(
            "{}.{} resolved via {}",
            handle.type_name(),
            field.name,
            path.map(|p| p.expression()).unwrap_or("key lookup")
        );

        let value = if coercer.options().convert_types {
            coercer.convert_at(value, &field.descriptor, depth)?
        } else {
            value
        };
        record.push(field.name.clone(), value);
    }

    Ok(record)
}

fn lookup_field(handle: &ObjectHandle, data: &Value, name: &str) -> Result<Option<Value>> {
    match data {
        Value::Map(map) => Ok(map.get_str(name).cloned()),
        Value::Record(record) => Ok(record.get(name).cloned()),
        other => Err(Error::TypeMismatch {
            expected: "mapping".to_string(),
            found: other.type_name().to_string(),
            context: Some(format!("building {}", handle.type_name())),
        }),
    }
}

/// Builder for a conversion call
///
/// ```
/// use dictcast_core::{
///     Buildable, ObjectBuilder, ObjectSchema, Record, Result, Route, TypeDescriptor, Value,
/// };
/// use serde_json::json;
///
/// struct Article {
///     title: String,
///     votes: i64,
/// }
///
/// impl Buildable for Article {
///     fn schema() -> Result<ObjectSchema> {
///         Ok(ObjectSchema::of::<Self>()
///             .field("title", TypeDescriptor::string())
///             .field("votes", TypeDescriptor::int()))
///     }
///
///     fn construct(mut record: Record) -> Result<Self> {
///         Ok(Article { title: record.take("title")?, votes: record.take("votes")? })
///     }
/// }
///
/// let data = Value::from(json!({"headline": "Hi", "votes": "12"}));
/// let route = Route::new().field("title", "headline").unwrap();
/// let article: Article = ObjectBuilder::new().with_route(&route).build(&data).unwrap();
/// assert_eq!(article.title, "Hi");
/// assert_eq!(article.votes, 12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectBuilder<'a> {
    registry: &'a ConverterRegistry,
    routing: Option<Routing<'a>>,
    options: ConversionOptions,
}

impl Default for ObjectBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ObjectBuilder<'a> {
    /// A builder using the default registry and no routing
    pub fn new() -> Self {
        Self {
            registry: default_registry(),
            routing: None,
            options: ConversionOptions::default(),
        }
    }

    pub fn with_registry(mut self, registry: &'a ConverterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Route fields of the top-level type only
    pub fn with_route(mut self, route: &'a Route) -> Self {
        self.routing = Some(Routing::Route(route));
        self
    }

    /// Route fields of every type the chart knows, nested ones included
    pub fn with_chart(mut self, chart: &'a Chart) -> Self {
        self.routing = Some(Routing::Chart(chart));
        self
    }

    pub fn with_routing(mut self, routing: Routing<'a>) -> Self {
        self.routing = Some(routing);
        self
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    /// Place resolved values as found instead of converting them
    pub fn convert_types(mut self, convert_types: bool) -> Self {
        self.options.convert_types = convert_types;
        self
    }

    pub fn strict_mode(mut self, strict_mode: StrictMode) -> Self {
        self.options.strict_mode = strict_mode;
        self
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Build a `T` out of `data`
    pub fn build<T: Buildable>(&self, data: &Value) -> Result<T> {
        let record = self.build_record(ObjectHandle::of::<T>(), data)?;
        T::construct(record)
    }

    /// Resolve and convert the fields of `handle`'s type without constructing it
    pub fn build_record(&self, handle: ObjectHandle, data: &Value) -> Result<Record> {
        let span = tracing::debug_span!("build", target = handle.type_name());
        let _enter = span.enter();

        let coercer = Coercer::new(self.registry).with_options(self.options);
        match self.routing {
            None => resolve_record(&handle, data, &coercer, None, 0),
            Some(Routing::Route(route)) => {
                route.check_schema(&handle.schema()?)?;
                resolve_record(&handle, data, &coercer, Some(route), 0)
            }
            Some(Routing::Chart(chart)) => {
                let coercer = coercer.with_chart(chart);
                resolve_record(&handle, data, &coercer, chart.route_for(&handle), 0)
            }
        }
    }
}

/// Build a `T` out of `data` with the default registry and no routing
pub fn build<T: Buildable>(data: &Value) -> Result<T> {
    ObjectBuilder::new().build(data)
}
