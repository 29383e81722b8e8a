//! Core error types for urlfor.
//!
//! This module provides the error enum [`UrlError`] shared by every crate in the
//! workspace: route reversal failures, URI parsing failures, template binding
//! errors, and configuration errors.

use thiserror::Error;

/// The primary error type for urlfor.
///
/// Route errors (`UnknownRoute`, `MissingRouteData`) come from the route
/// resolver and are surfaced to the caller unchanged. Use
/// [`UrlError::is_route_error`] to test for either.
#[derive(Error, Debug)]
pub enum UrlError {
    // ── Routing ──────────────────────────────────────────────────────

    /// No route is registered under the requested name.
    #[error("Named route does not exist for name: {0}")]
    UnknownRoute(String),

    /// A placeholder of the route pattern has no value in the supplied data.
    #[error("Missing data for URL segment: {0}")]
    MissingRouteData(String),

    /// A route pattern is malformed or a route name is registered twice.
    #[error("Invalid route pattern: {0}")]
    InvalidRoutePattern(String),

    // ── URIs ─────────────────────────────────────────────────────────

    /// A literal string could not be parsed into a URI.
    #[error("Unable to parse URI: {0}")]
    UriParse(String),

    /// An operation that needs a structured URI was called while the base URL
    /// is a literal string.
    #[error("Base URL is a literal string; {0} requires a structured URI")]
    LiteralBaseUrl(&'static str),

    // ── Templates ────────────────────────────────────────────────────

    /// A template function received bad arguments or rendering failed.
    #[error("Template error: {0}")]
    TemplateError(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl UrlError {
    /// Returns `true` if the route resolver could not produce a path, either
    /// because the name is unknown or because placeholder data is missing.
    pub const fn is_route_error(&self) -> bool {
        matches!(self, Self::UnknownRoute(_) | Self::MissingRouteData(_))
    }
}

/// A convenience type alias for `Result<T, UrlError>`.
pub type UrlResult<T> = Result<T, UrlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_errors() {
        assert!(UrlError::UnknownRoute("home".into()).is_route_error());
        assert!(UrlError::MissingRouteData("id".into()).is_route_error());
        assert!(!UrlError::UriParse("x".into()).is_route_error());
        assert!(!UrlError::LiteralBaseUrl("is_current_path").is_route_error());
        assert!(!UrlError::InvalidRoutePattern("x".into()).is_route_error());
    }

    #[test]
    fn test_url_error_display() {
        let err = UrlError::UnknownRoute("missing".into());
        assert_eq!(err.to_string(), "Named route does not exist for name: missing");

        let err = UrlError::MissingRouteData("slug".into());
        assert_eq!(err.to_string(), "Missing data for URL segment: slug");

        let err = UrlError::LiteralBaseUrl("is_current_path");
        assert!(err.to_string().contains("is_current_path"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let url_err: UrlError = io_err.into();
        assert!(matches!(url_err, UrlError::IoError(_)));
        assert!(url_err.to_string().contains("file missing"));
    }
}
