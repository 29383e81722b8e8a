//! Reverse URL generation.
//!
//! This module provides the [`RouteResolver`] trait, the contract between the
//! URL composer and whatever knows the application's named routes, and its
//! implementation for [`RouteTable`].

use std::collections::BTreeMap;

use urlfor_core::UrlResult;

use super::resolver::RouteTable;
use crate::uri::Uri;

/// Placeholder values for a route, keyed by placeholder name.
pub type RouteData = BTreeMap<String, String>;

/// Query string parameters, encoded in key order.
pub type QueryParams = BTreeMap<String, String>;

/// Generates paths for named routes.
///
/// Implementors provide [`relative_url_for`](Self::relative_url_for) and,
/// when mounted under a prefix, [`base_path`](Self::base_path). The remaining
/// methods are derived from those two.
///
/// # Errors
///
/// Every method fails with [`UrlError::UnknownRoute`](urlfor_core::UrlError::UnknownRoute)
/// for an unregistered name and [`UrlError::MissingRouteData`](urlfor_core::UrlError::MissingRouteData)
/// when required placeholder data is absent.
pub trait RouteResolver: Send + Sync {
    /// Returns the path for the named route without the base path.
    fn relative_url_for(
        &self,
        name: &str,
        data: &RouteData,
        query_params: &QueryParams,
    ) -> UrlResult<String>;

    /// Returns the prefix the application is mounted under.
    fn base_path(&self) -> &str {
        ""
    }

    /// Returns the path for the named route, prefixed with the base path.
    fn url_for(
        &self,
        name: &str,
        data: &RouteData,
        query_params: &QueryParams,
    ) -> UrlResult<String> {
        let path = self.relative_url_for(name, data, query_params)?;
        Ok(format!("{}{path}", self.base_path()))
    }

    /// Returns the fully qualified URL for the named route, using the origin
    /// of `uri`.
    fn full_url_for(
        &self,
        uri: &Uri,
        name: &str,
        data: &RouteData,
        query_params: &QueryParams,
    ) -> UrlResult<String> {
        let path = self.url_for(name, data, query_params)?;
        Ok(format!("{}{path}", uri.origin()))
    }
}

impl RouteResolver for RouteTable {
    fn relative_url_for(
        &self,
        name: &str,
        data: &RouteData,
        query_params: &QueryParams,
    ) -> UrlResult<String> {
        let route = self.route(name)?;
        let mut url = route.pattern().reverse(data)?;

        if !query_params.is_empty() {
            url.push('?');
            url.push_str(&build_query(query_params));
        }

        tracing::trace!(route = name, url = %url, "reversed route");
        Ok(url)
    }

    fn base_path(&self) -> &str {
        Self::base_path(self)
    }
}

/// Encodes query parameters as `application/x-www-form-urlencoded`.
///
/// # Examples
///
/// ```
/// use urlfor_http::urls::reverse::{build_query, QueryParams};
///
/// let mut params = QueryParams::new();
/// params.insert("q".to_string(), "rust & tera".to_string());
/// params.insert("page".to_string(), "2".to_string());
/// assert_eq!(build_query(&params), "page=2&q=rust+%26+tera");
/// ```
pub fn build_query(params: &QueryParams) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
