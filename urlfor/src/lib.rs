//! # urlfor
//!
//! Route-based URL helpers for Tera templates.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `urlfor` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use urlfor::prelude::*;
//!
//! let routes = RouteTable::new()
//!     .with_route("hello", "/hello/{name}")
//!     .unwrap();
//! let extension = UrlExtension::new(UrlComposer::new(Arc::new(routes), Uri::default(), ""));
//! extension.set_base_url(Uri::new("https", "example.com").with_path("/hello/josh"));
//!
//! let mut context = urlfor::tera::Context::new();
//! context.insert("who", &urlfor::serde_json::json!({"name": "josh"}));
//! let out = extension
//!     .render_str(r#"{{ full_url_for(name="hello", data=who) }}"#, &context)
//!     .unwrap();
//! assert_eq!(out, "https://example.com/hello/josh");
//! ```

/// Core types: settings, logging and error types.
pub use urlfor_core as core;

/// HTTP layer: URI value object and named route table.
#[cfg(feature = "http")]
pub use urlfor_http as http;

/// Template layer: URL composer and Tera functions.
#[cfg(feature = "template")]
pub use urlfor_template as template;

/// Re-exported for hosts registering the extension.
#[cfg(feature = "template")]
pub use tera;

pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The most commonly used items.
pub mod prelude {
    pub use urlfor_core::logging::setup_logging;
    pub use urlfor_core::settings_loader;
    pub use urlfor_core::{Settings, UrlError, UrlResult, SETTINGS};

    #[cfg(feature = "http")]
    pub use urlfor_http::{QueryParams, RouteData, RouteResolver, RouteTable, Uri};

    #[cfg(feature = "template")]
    pub use urlfor_template::{BasePathPolicy, BaseUrl, UrlComposer, UrlExtension};
}
