//! Named routes and reverse URL generation.
//!
//! This module provides:
//!
//! - [`pattern`]: Route patterns with `{placeholder}` and optional `[...]` segments
//! - [`resolver`]: The [`RouteTable`](resolver::RouteTable) of named routes
//! - [`reverse`]: The [`RouteResolver`](reverse::RouteResolver) trait and query encoding
//!
//! # Examples
//!
//! ```
//! use urlfor_http::urls::resolver::RouteTable;
//! use urlfor_http::urls::reverse::{QueryParams, RouteData, RouteResolver};
//!
//! let mut routes = RouteTable::new().with_base_path("/app");
//! routes.map("post", "/blog/{slug}[/{page:[0-9]+}]").unwrap();
//!
//! let mut data = RouteData::new();
//! data.insert("slug".to_string(), "hello-world".to_string());
//! let mut query = QueryParams::new();
//! query.insert("ref".to_string(), "home page".to_string());
//!
//! let url = routes.url_for("post", &data, &query).unwrap();
//! assert_eq!(url, "/app/blog/hello-world?ref=home+page");
//! ```

pub mod pattern;
pub mod resolver;
pub mod reverse;
