//! Named route table.
//!
//! This module provides [`RouteTable`], the registry of named routes used for
//! reverse URL generation, and [`Route`], a single named pattern.

use std::collections::HashMap;
use std::fmt;

use urlfor_core::{UrlError, UrlResult};

use super::pattern::RoutePattern;

/// A named route.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    pattern: RoutePattern,
}

impl Route {
    /// Returns the route name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parsed pattern.
    pub const fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}

/// A registry of named routes sharing a base path.
///
/// The base path is the prefix the application is mounted under. It is
/// prepended by [`url_for`](super::reverse::RouteResolver::url_for) but not by
/// [`relative_url_for`](super::reverse::RouteResolver::relative_url_for).
#[derive(Clone, Default)]
pub struct RouteTable {
    /// Prefix prepended to every generated URL
    base_path: String,
    /// Routes in registration order
    routes: Vec<Route>,
    /// Route name to index into `routes`
    index: HashMap<String, usize>,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("base_path", &self.base_path)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl RouteTable {
    /// Creates an empty route table with no base path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base path prepended to generated URLs.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Registers a route and returns the table, for chained construction.
    ///
    /// # Errors
    ///
    /// See [`map`](Self::map).
    pub fn with_route(mut self, name: &str, pattern: &str) -> UrlResult<Self> {
        self.map(name, pattern)?;
        Ok(self)
    }

    /// Registers a named route.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::InvalidRoutePattern`] if the pattern is malformed or
    /// a route with the same name already exists.
    pub fn map(&mut self, name: &str, pattern: &str) -> UrlResult<&Route> {
        if self.index.contains_key(name) {
            return Err(UrlError::InvalidRoutePattern(format!(
                "a route named '{name}' is already registered"
            )));
        }

        let pattern = RoutePattern::parse(pattern)?;
        tracing::trace!(route = name, pattern = pattern.as_str(), "registered route");

        let idx = self.routes.len();
        self.routes.push(Route {
            name: name.to_string(),
            pattern,
        });
        self.index.insert(name.to_string(), idx);
        Ok(&self.routes[idx])
    }

    /// Returns the base path.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Looks up a route by name.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::UnknownRoute`] if no route has that name.
    pub fn route(&self, name: &str) -> UrlResult<&Route> {
        self.index
            .get(name)
            .map(|&idx| &self.routes[idx])
            .ok_or_else(|| UrlError::UnknownRoute(name.to_string()))
    }

    /// Returns `true` if a route with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns all route names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.routes.iter().map(Route::name).collect()
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
