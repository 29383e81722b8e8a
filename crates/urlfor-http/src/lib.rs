//! # urlfor-http
//!
//! HTTP layer for urlfor. Provides the [`Uri`] value object used as the base
//! reference when composing URLs, and named route reversal through the
//! [`RouteResolver`](urls::reverse::RouteResolver) trait.

pub mod uri;
pub mod urls;

pub use uri::Uri;
pub use urls::resolver::{Route, RouteTable};
pub use urls::reverse::{build_query, QueryParams, RouteData, RouteResolver};
