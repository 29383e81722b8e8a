//! Template functions for Tera.
//!
//! [`UrlExtension`] registers the [`UrlComposer`] operations as Tera functions:
//!
//! | Function | Arguments | Returns |
//! |---|---|---|
//! | `path_for` | `name`, `data`, `query_params`, `app_name` | path of the named route |
//! | `full_url_for` | `name`, `data`, `query_params`, `app_name` | fully qualified URL |
//! | `base_url` | | base URL |
//! | `is_current_path` | `name`, `data` | whether the route is the current path |
//! | `current_path` | `with_query_string` | current path |
//!
//! `data` and `query_params` are objects whose values are strings, numbers or
//! booleans. `app_name` is accepted and ignored.
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use urlfor_http::{RouteTable, Uri};
//! use urlfor_template::composer::UrlComposer;
//! use urlfor_template::extension::UrlExtension;
//!
//! let routes = RouteTable::new().with_route("home", "/").unwrap();
//! let extension = UrlExtension::new(UrlComposer::new(Arc::new(routes), Uri::default(), ""));
//! extension.set_base_url(Uri::new("https", "example.com").with_path("/"));
//!
//! let html = extension
//!     .render_str(r#"<a href="{{ full_url_for(name="home") }}">home</a>"#, &tera::Context::new())
//!     .unwrap();
//! assert_eq!(html, r#"<a href="https://example.com/">home</a>"#);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use tera::{Context, Tera, Value};

use urlfor_core::logging::render_span;
use urlfor_core::{Settings, UrlError, UrlResult};
use urlfor_http::RouteResolver;

use crate::composer::{BaseUrl, UrlComposer};

/// A composer shared between the registered functions and the host.
pub type SharedComposer = Arc<RwLock<UrlComposer>>;

/// Registers URL helper functions on a Tera instance.
#[derive(Debug, Clone)]
pub struct UrlExtension {
    composer: SharedComposer,
    app_name: String,
}

impl UrlExtension {
    /// The extension name.
    pub const NAME: &'static str = "urlfor";

    /// Names of the functions installed by [`register`](Self::register).
    pub const FUNCTIONS: [&'static str; 5] = [
        "path_for",
        "full_url_for",
        "base_url",
        "is_current_path",
        "current_path",
    ];

    /// Wraps a composer.
    pub fn new(composer: UrlComposer) -> Self {
        Self {
            composer: Arc::new(RwLock::new(composer)),
            app_name: "default".to_string(),
        }
    }

    /// Builds the composer from settings and wraps it.
    pub fn from_settings(resolver: Arc<dyn RouteResolver>, settings: &Settings) -> Self {
        Self {
            composer: Arc::new(RwLock::new(UrlComposer::from_settings(resolver, settings))),
            app_name: settings.app_name.clone(),
        }
    }

    /// Returns the extension name.
    pub const fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Returns the names of the installed functions.
    pub const fn function_names() -> &'static [&'static str] {
        &Self::FUNCTIONS
    }

    /// Returns the application name used when a template omits `app_name`.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Returns the shared composer.
    pub fn composer(&self) -> SharedComposer {
        Arc::clone(&self.composer)
    }

    /// Replaces the base reference seen by every registered function.
    ///
    /// # Panics
    ///
    /// Panics if the composer lock is poisoned.
    pub fn set_base_url(&self, base_url: impl Into<BaseUrl>) {
        let mut composer = self.composer.write().expect("url composer lock poisoned");
        composer.set_base_url(base_url);
    }

    /// Installs the URL helper functions on `tera`.
    pub fn register(&self, tera: &mut Tera) {
        tera.register_function("path_for", PathFor(self.function()));
        tera.register_function("full_url_for", FullUrlFor(self.function()));
        tera.register_function("base_url", BaseUrlFunction(self.function()));
        tera.register_function("is_current_path", IsCurrentPath(self.function()));
        tera.register_function("current_path", CurrentPath(self.function()));
        tracing::debug!(extension = Self::NAME, "registered template functions");
    }

    /// Renders a template registered on `tera` inside a render span.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::TemplateError`] carrying the full error chain.
    pub fn render(&self, tera: &Tera, template: &str, context: &Context) -> UrlResult<String> {
        let span = render_span(template);
        let _guard = span.enter();
        tera.render(template, context)
            .map_err(|e| UrlError::TemplateError(error_chain(&e)))
    }

    /// Renders a template string with only this extension's functions installed.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::TemplateError`] carrying the full error chain.
    pub fn render_str(&self, source: &str, context: &Context) -> UrlResult<String> {
        let mut tera = Tera::default();
        self.register(&mut tera);

        let span = render_span("<string>");
        let _guard = span.enter();
        tera.render_str(source, context)
            .map_err(|e| UrlError::TemplateError(error_chain(&e)))
    }

    fn function(&self) -> BoundFunction {
        BoundFunction {
            composer: Arc::clone(&self.composer),
            app_name: self.app_name.clone(),
        }
    }
}

/// State captured by each registered function.
struct BoundFunction {
    composer: SharedComposer,
    app_name: String,
}

impl BoundFunction {
    fn read(&self) -> tera::Result<RwLockReadGuard<'_, UrlComposer>> {
        self.composer
            .read()
            .map_err(|_| tera::Error::msg("url composer lock poisoned"))
    }
}

struct PathFor(BoundFunction);
struct FullUrlFor(BoundFunction);
struct BaseUrlFunction(BoundFunction);
struct IsCurrentPath(BoundFunction);
struct CurrentPath(BoundFunction);

impl tera::Function for PathFor {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let route = RouteArgs::parse("path_for", args, &self.0.app_name)?;
        let path = self
            .0
            .read()?
            .path_for(route.name, &route.data, &route.query_params, route.app_name)
            .map_err(|e| function_error("path_for", e))?;
        Ok(Value::String(path))
    }
}

impl tera::Function for FullUrlFor {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let route = RouteArgs::parse("full_url_for", args, &self.0.app_name)?;
        let url = self
            .0
            .read()?
            .full_url_for(route.name, &route.data, &route.query_params, route.app_name)
            .map_err(|e| function_error("full_url_for", e))?;
        Ok(Value::String(url))
    }
}

impl tera::Function for BaseUrlFunction {
    fn call(&self, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        Ok(Value::String(self.0.read()?.base_url()))
    }
}

impl tera::Function for IsCurrentPath {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let name = required_str("is_current_path", args, "name")?;
        let data = optional_map("is_current_path", args, "data")?;
        let current = self
            .0
            .read()?
            .is_current_path(name, &data)
            .map_err(|e| function_error("is_current_path", e))?;
        Ok(Value::Bool(current))
    }
}

impl tera::Function for CurrentPath {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let with_query_string = optional_bool("current_path", args, "with_query_string")?;
        Ok(Value::String(self.0.read()?.current_path(with_query_string)))
    }
}

// ============================================================
// Argument handling
// ============================================================

struct RouteArgs<'a> {
    name: &'a str,
    data: BTreeMap<String, String>,
    query_params: BTreeMap<String, String>,
    app_name: &'a str,
}

impl<'a> RouteArgs<'a> {
    fn parse(
        function: &str,
        args: &'a HashMap<String, Value>,
        default_app: &'a str,
    ) -> tera::Result<Self> {
        let app_name = match args.get("app_name") {
            None => default_app,
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(argument_error(function, "app_name", "a string", other));
            }
        };

        Ok(Self {
            name: required_str(function, args, "name")?,
            data: optional_map(function, args, "data")?,
            query_params: optional_map(function, args, "query_params")?,
            app_name,
        })
    }
}

fn required_str<'a>(
    function: &str,
    args: &'a HashMap<String, Value>,
    key: &str,
) -> tera::Result<&'a str> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(argument_error(function, key, "a string", other)),
        None => Err(tera::Error::msg(format!(
            "Function `{function}` requires a `{key}` argument"
        ))),
    }
}

fn optional_map(
    function: &str,
    args: &HashMap<String, Value>,
    key: &str,
) -> tera::Result<BTreeMap<String, String>> {
    match args.get(key) {
        None => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| {
                scalar_to_string(v)
                    .map(|s| (k.clone(), s))
                    .ok_or_else(|| argument_error(function, &format!("{key}.{k}"), "a scalar", v))
            })
            .collect(),
        Some(other) => Err(argument_error(function, key, "an object", other)),
    }
}

fn optional_bool(function: &str, args: &HashMap<String, Value>, key: &str) -> tera::Result<bool> {
    match args.get(key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(argument_error(function, key, "a boolean", other)),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn argument_error(function: &str, key: &str, expected: &str, got: &Value) -> tera::Error {
    tera::Error::msg(format!(
        "Function `{function}` expected `{key}` to be {expected}, got {got}"
    ))
}

fn function_error(function: &str, err: UrlError) -> tera::Error {
    tracing::debug!(function, error = %err, "template function failed");
    tera::Error::msg(err)
}

/// Joins an error and its sources into one message.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
