//! URL composition for templates.
//!
//! [`UrlComposer`] turns resolved route paths and the current base reference
//! into the strings templates print: relative paths, fully qualified URLs, the
//! base URL, and the current path.
//!
//! The base reference is a [`BaseUrl`]: either a literal string that is used
//! verbatim, or a structured [`Uri`] whose components are combined.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use urlfor_http::{QueryParams, RouteData, RouteTable, Uri};
//! use urlfor_template::composer::UrlComposer;
//!
//! let routes = RouteTable::new().with_route("post", "/blog/{slug}").unwrap();
//! let uri = Uri::new("https", "example.com").with_path("/blog/hello");
//! let composer = UrlComposer::new(Arc::new(routes), uri, "");
//!
//! let mut data = RouteData::new();
//! data.insert("slug".to_string(), "hello".to_string());
//!
//! let url = composer.full_url_for("post", &data, &QueryParams::new(), "default").unwrap();
//! assert_eq!(url, "https://example.com/blog/hello");
//! assert!(composer.is_current_path("post", &data).unwrap());
//! assert_eq!(composer.base_url(), "https://example.com");
//! ```

use std::fmt;
use std::sync::Arc;

use urlfor_core::{Settings, UrlError, UrlResult};
use urlfor_http::{QueryParams, RouteData, RouteResolver, Uri};

/// The composer's base reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrl {
    /// An already-final base URL, returned verbatim by `base_url` and
    /// `current_path`.
    Literal(String),
    /// A structured URI, usually the current request's.
    Uri(Uri),
}

impl From<String> for BaseUrl {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for BaseUrl {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<Uri> for BaseUrl {
    fn from(value: Uri) -> Self {
        Self::Uri(value)
    }
}

/// How `base_url` treats a base path without a leading `/` when the base
/// reference has an authority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BasePathPolicy {
    /// Repeat the prefix: `app` becomes `app/app`.
    #[default]
    Legacy,
    /// Prepend a single slash: `app` becomes `/app`.
    LeadingSlash,
}

/// Builds URLs and paths for templates from a route resolver and a base
/// reference.
///
/// The resolver and base path are fixed at construction; the base reference
/// can be replaced with [`set_base_url`](Self::set_base_url).
pub struct UrlComposer {
    resolver: Arc<dyn RouteResolver>,
    base_url: BaseUrl,
    base_path: String,
    policy: BasePathPolicy,
}

impl fmt::Debug for UrlComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlComposer")
            .field("base_url", &self.base_url)
            .field("base_path", &self.base_path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl UrlComposer {
    /// Creates a composer.
    pub fn new(
        resolver: Arc<dyn RouteResolver>,
        base_url: impl Into<BaseUrl>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            base_url: base_url.into(),
            base_path: base_path.into(),
            policy: BasePathPolicy::default(),
        }
    }

    /// Creates a composer from settings.
    ///
    /// `settings.base_url`, when set, becomes a literal base reference;
    /// otherwise the base reference is an empty URI until
    /// [`set_base_url`](Self::set_base_url) binds the current request.
    pub fn from_settings(resolver: Arc<dyn RouteResolver>, settings: &Settings) -> Self {
        let base_url = settings
            .base_url
            .clone()
            .map_or_else(|| BaseUrl::Uri(Uri::default()), BaseUrl::Literal);
        let policy = if settings.normalize_base_path {
            BasePathPolicy::LeadingSlash
        } else {
            BasePathPolicy::Legacy
        };
        Self::new(resolver, base_url, settings.base_path.clone()).with_policy(policy)
    }

    /// Sets the base path policy.
    #[must_use]
    pub fn with_policy(mut self, policy: BasePathPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the current base reference.
    pub const fn base_reference(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the base path prefix.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the base path policy.
    pub const fn policy(&self) -> BasePathPolicy {
        self.policy
    }

    /// Replaces the base reference. The value is not validated.
    pub fn set_base_url(&mut self, base_url: impl Into<BaseUrl>) {
        self.base_url = base_url.into();
        tracing::trace!(base_url = ?self.base_url, "base url replaced");
    }

    /// Returns the path of the named route.
    ///
    /// `_app_name` is reserved and has no effect.
    pub fn path_for(
        &self,
        name: &str,
        data: &RouteData,
        query_params: &QueryParams,
        _app_name: &str,
    ) -> UrlResult<String> {
        let path = self.resolver.url_for(name, data, query_params)?;
        tracing::debug!(route = name, path = %path, "resolved path");
        Ok(path)
    }

    /// Returns the fully qualified URL of the named route.
    ///
    /// The origin comes from the base reference; a literal base reference is
    /// parsed first.
    ///
    /// # Errors
    ///
    /// Propagates resolver errors, and returns [`UrlError::UriParse`] if a
    /// literal base reference is not a valid URI.
    pub fn full_url_for(
        &self,
        name: &str,
        data: &RouteData,
        query_params: &QueryParams,
        app_name: &str,
    ) -> UrlResult<String> {
        let path = self.path_for(name, data, query_params, app_name)?;

        let origin = match &self.base_url {
            BaseUrl::Literal(literal) => Uri::parse(literal)?.origin(),
            BaseUrl::Uri(uri) => uri.origin(),
        };

        Ok(format!("{origin}{path}"))
    }

    /// Returns the base URL.
    ///
    /// A literal base reference is returned verbatim. For a structured URI
    /// the result is origin plus base path and never ends with `/`.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            BaseUrl::Literal(literal) => literal.clone(),
            BaseUrl::Uri(uri) => {
                let base_path = self.effective_base_path(uri);
                format!("{}{}", uri.origin(), base_path.trim_end_matches('/'))
            }
        }
    }

    fn effective_base_path(&self, uri: &Uri) -> String {
        if uri.authority().is_empty() || self.base_path.starts_with('/') {
            return self.base_path.clone();
        }

        match self.policy {
            BasePathPolicy::Legacy => format!("{}/{}", self.base_path, self.base_path),
            BasePathPolicy::LeadingSlash if self.base_path.is_empty() => String::new(),
            BasePathPolicy::LeadingSlash => format!("/{}", self.base_path),
        }
    }

    /// Returns `true` if the named route resolves to the current path.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::LiteralBaseUrl`] when the base reference is a
    /// literal string, and propagates resolver errors.
    pub fn is_current_path(&self, name: &str, data: &RouteData) -> UrlResult<bool> {
        let BaseUrl::Uri(uri) = &self.base_url else {
            return Err(UrlError::LiteralBaseUrl("is_current_path"));
        };

        let path = self.resolver.url_for(name, data, &QueryParams::new())?;
        Ok(path == self.join_base_path(uri.path()))
    }

    /// Returns the current path, optionally with its query string.
    ///
    /// A literal base reference is returned verbatim.
    pub fn current_path(&self, with_query_string: bool) -> String {
        match &self.base_url {
            BaseUrl::Literal(literal) => literal.clone(),
            BaseUrl::Uri(uri) => {
                let mut path = self.join_base_path(uri.path());
                if with_query_string && !uri.query().is_empty() {
                    path.push('?');
                    path.push_str(uri.query());
                }
                path
            }
        }
    }

    fn join_base_path(&self, path: &str) -> String {
        format!("{}/{}", self.base_path, path.trim_start_matches('/'))
    }
}
