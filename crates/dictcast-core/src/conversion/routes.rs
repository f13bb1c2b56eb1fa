//! Routing tables: per-type field to path overrides
//!
//! A [`Route`] redirects fields of one target type to other places in the
//! source tree, independent of the fields' own declarations. A [`Chart`] keys
//! routes by target type so a structure holding several nested object types
//! can route each of them. Routes are checked against the target's field names
//! when a chart is built, never later.
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

use super::builder::{Buildable, ObjectSchema};
use super::descriptor::ObjectHandle;
use super::path::Path;
use crate::{Error, Result};
use std::collections::HashMap;

/// Anything a route can turn into a [`Path`]
pub trait IntoPath {
    fn into_path(self) -> Result<Path>;
}

impl IntoPath for Path {
    fn into_path(self) -> Result<Path> {
        Ok(self)
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Result<Path> {
        Path::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> Result<Path> {
        Path::parse(&self)
    }
}

/// Field name to path overrides for one target type
#[derive(Debug, Clone, Default)]
pub struct Route {
    fields: Vec<(String, Path)>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `name` to `path`, replacing an earlier entry for the same field
    pub fn field(mut self, name: impl Into<String>, path: impl IntoPath) -> Result<Self> {
        let name = name.into();
        let path = path.into_path()?;
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = path,
            None => self.fields.push((name, path)),
        }
        Ok(self)
    }

    /// Build a route from `(field, path)` pairs; at least one pair is needed
    pub fn from_pairs<I, N, P>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: IntoPath,
    {
        let route = pairs
            .into_iter()
            .try_fold(Route::new(), |route, (name, path)| route.field(name, path))?;

        if route.is_empty() {
            return Err(Error::RouteValidation {
                type_name: "<unbound>".to_string(),
                field: None,
                message: "a route needs at least one field".to_string(),
            });
        }
        Ok(route)
    }

    /// The path routed to `field`, if any
    pub fn get(&self, field: &str) -> Option<&Path> {
        self.fields.iter().find(|(n, _)| n == field).map(|(_, p)| p)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.fields.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check every routed field against the parameter names of `type_name`
    pub fn check_params<'p>(
        &self,
        type_name: &str,
        params: impl IntoIterator<Item = &'p str> + Clone,
    ) -> Result<()> {
        if self.is_empty() {
            return Err(Error::RouteValidation {
                type_name: type_name.to_string(),
                field: None,
                message: "a route needs at least one field".to_string(),
            });
        }

        for (name, _) in &self.fields {
            if !params.clone().into_iter().any(|p| p == name) {
                let known: Vec<&str> = params.clone().into_iter().collect();
                return Err(Error::RouteValidation {
                    type_name: type_name.to_string(),
                    field: Some(name.clone()),
                    message: format!(
                        "'{}' is not a parameter (expected one of: {})",
                        name,
                        known.join(", ")
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn check_schema(&self, schema: &ObjectSchema) -> Result<()> {
        self.check_params(schema.type_name(), schema.param_names())
    }

    pub fn check_type<T: Buildable>(&self) -> Result<()> {
        self.check_schema(&T::schema()?)
    }
}

/// Routes keyed by target type
#[derive(Debug, Clone, Default)]
pub struct Chart {
    routes: HashMap<ObjectHandle, Route>,
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the route for `T`, checked against `T`'s fields
    pub fn with_route<T: Buildable>(mut self, route: Route) -> Result<Self> {
        self.insert(ObjectHandle::of::<T>(), route)?;
        Ok(self)
    }

    /// Add a route for the type behind `handle`, replacing any previous one
    pub fn insert(&mut self, handle: ObjectHandle, route: Route) -> Result<Option<Route>> {
        route.check_schema(&handle.schema()?)?;
        log::debug!(
            "Chart routes {} field(s) of {}",
            route.len(),
            handle.type_name()
        );
        Ok(self.routes.insert(handle, route))
    }

    /// Build a chart from `(handle, route)` pairs, validating each one
    pub fn from_routes(routes: impl IntoIterator<Item = (ObjectHandle, Route)>) -> Result<Self> {
        let mut chart = Chart::new();
        for (handle, route) in routes {
            chart.insert(handle, route)?;
        }
        Ok(chart)
    }

    pub fn contains(&self, handle: &ObjectHandle) -> bool {
        self.routes.contains_key(handle)
    }

    pub fn contains_type<T: Buildable>(&self) -> bool {
        self.contains(&ObjectHandle::of::<T>())
    }

    pub fn route_for(&self, handle: &ObjectHandle) -> Option<&Route> {
        self.routes.get(handle)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Routing handed to a build: one route for the top-level type, or a chart
#[derive(Debug, Clone, Copy)]
pub enum Routing<'a> {
    Route(&'a Route),
    Chart(&'a Chart),
}

impl<'a> From<&'a Route> for Routing<'a> {
    fn from(route: &'a Route) -> Self {
        Routing::Route(route)
    }
}

impl<'a> From<&'a Chart> for Routing<'a> {
    fn from(chart: &'a Chart) -> Self {
        Routing::Chart(chart)
    }
}
