//! URI value object.
//!
//! [`Uri`] holds the components of a URI (scheme, user info, host, port, path,
//! query, fragment) as plain strings and exposes the accessors URL composition
//! needs, most importantly [`Uri::authority`] and [`Uri::origin`].
//!
//! # Examples
//!
//! ```
//! use urlfor_http::Uri;
//!
//! let uri = Uri::parse("https://example.com:8443/blog/post?page=2").unwrap();
//! assert_eq!(uri.scheme(), "https");
//! assert_eq!(uri.authority(), "example.com:8443");
//! assert_eq!(uri.path(), "/blog/post");
//! assert_eq!(uri.query(), "page=2");
//! assert_eq!(uri.origin(), "https://example.com:8443");
//! ```

use std::fmt;
use std::str::FromStr;

use urlfor_core::{UrlError, UrlResult};

/// An immutable URI with independently accessible components.
///
/// Scheme and host are stored lowercased. The port is omitted from
/// [`authority`](Self::authority) when it is the default port of the scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uri {
    scheme: String,
    user_info: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: String,
    fragment: String,
}

impl Uri {
    /// Creates a URI with the given scheme and host and empty path.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into().to_ascii_lowercase(),
            host: host.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Parses a URI from a literal string.
    ///
    /// Absolute URIs are parsed with the [`url`] crate. Scheme-relative
    /// references (`//host/path`) keep the authority, including any explicit
    /// port, with an empty scheme. A bare `host:port` (`localhost:8080`) is
    /// read as a scheme-relative authority. Relative references
    /// (`/path?query#fragment`) have an empty scheme and authority. The empty
    /// string parses to the empty URI.
    ///
    /// Hosts are normalised the way the [`url`] crate does it: ASCII hosts
    /// are lowercased and internationalised hosts are converted to punycode,
    /// so `https://Bücher.de` has the host `xn--bcher-kva.de`.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::UriParse`] if the input is not a valid URI (for
    /// example an invalid port or host).
    pub fn parse(input: &str) -> UrlResult<Self> {
        if let Some(rest) = input.strip_prefix("//") {
            let url = url::Url::parse(&format!("http://{rest}"))
                .map_err(|e| parse_error(input, &e))?;
            let mut uri = Self::from(&url);
            uri.scheme.clear();
            // The port of the placeholder scheme was dropped as its default.
            let authority_end = rest
                .find(|c: char| matches!(c, '/' | '?' | '#'))
                .unwrap_or(rest.len());
            let (_, _, port) = split_authority(&rest[..authority_end]);
            uri.port = port;
            return Ok(uri);
        }

        if is_host_port(input) {
            return Self::parse(&format!("//{input}"));
        }

        match url::Url::parse(input) {
            Ok(url) => Ok(Self::from(&url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::parse_relative(input)),
            Err(e) => Err(parse_error(input, &e)),
        }
    }

    /// Builds the URI of an incoming HTTP request.
    ///
    /// The scheme comes from the request URI, then the `X-Forwarded-Proto`
    /// header, and defaults to `http`. The authority comes from the request URI
    /// and falls back to the `Host` header.
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        let uri = request.uri();
        let headers = request.headers();

        let scheme = uri
            .scheme_str()
            .map(str::to_string)
            .or_else(|| {
                headers
                    .get("x-forwarded-proto")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.split(',').next())
                    .map(|v| v.trim().to_string())
            })
            .unwrap_or_else(|| "http".to_string());

        let authority = uri
            .authority()
            .map(|a| a.as_str().to_string())
            .or_else(|| {
                headers
                    .get(http::header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .unwrap_or_default();

        let (user_info, host, port) = split_authority(&authority);

        Self {
            scheme: scheme.to_ascii_lowercase(),
            user_info,
            host: host.to_ascii_lowercase(),
            port,
            path: uri.path().to_string(),
            query: uri.query().unwrap_or_default().to_string(),
            fragment: String::new(),
        }
    }

    fn parse_relative(input: &str) -> Self {
        let (rest, fragment) = input.split_once('#').unwrap_or((input, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self {
            path: path.to_string(),
            query: query.to_string(),
            fragment: fragment.to_string(),
            ..Self::default()
        }
    }

    /// Returns the scheme without the trailing `:`, or an empty string.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the `user[:password]` part of the authority, or an empty string.
    pub fn user_info(&self) -> &str {
        &self.user_info
    }

    /// Returns the host, or an empty string.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port, or `None` if it is absent or the scheme's default.
    pub fn port(&self) -> Option<u16> {
        self.port.filter(|p| Some(*p) != default_port(&self.scheme))
    }

    /// Returns the path, or an empty string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query string without the leading `?`, or an empty string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the fragment without the leading `#`, or an empty string.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Returns `[user_info@]host[:port]`, or an empty string without a host.
    pub fn authority(&self) -> String {
        if self.host.is_empty() {
            return String::new();
        }

        let mut authority = String::new();
        if !self.user_info.is_empty() {
            authority.push_str(&self.user_info);
            authority.push('@');
        }
        authority.push_str(&self.host);
        if let Some(port) = self.port() {
            authority.push(':');
            authority.push_str(&port.to_string());
        }
        authority
    }

    /// Returns the scheme and authority portion (`https://example.com`).
    ///
    /// Each part is included only when non-empty, so a relative URI has an
    /// empty origin.
    pub fn origin(&self) -> String {
        let authority = self.authority();
        let mut origin = String::new();
        if !self.scheme.is_empty() {
            origin.push_str(&self.scheme);
            origin.push(':');
        }
        if !authority.is_empty() {
            origin.push_str("//");
            origin.push_str(&authority);
        }
        origin
    }

    /// Returns a copy with the given scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into().to_ascii_lowercase();
        self
    }

    /// Returns a copy with the given user and optional password.
    #[must_use]
    pub fn with_user_info(mut self, user: &str, password: Option<&str>) -> Self {
        self.user_info = match password {
            Some(password) if !user.is_empty() => format!("{user}:{password}"),
            _ => user.to_string(),
        };
        self
    }

    /// Returns a copy with the given host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().to_ascii_lowercase();
        self
    }

    /// Returns a copy with the given port.
    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Returns a copy with the given path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Returns a copy with the given query string (without `?`).
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Returns a copy with the given fragment (without `#`).
    #[must_use]
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }
}

impl From<&url::Url> for Uri {
    fn from(url: &url::Url) -> Self {
        let user_info = match url.password() {
            Some(password) => format!("{}:{password}", url.username()),
            None => url.username().to_string(),
        };

        Self {
            scheme: url.scheme().to_string(),
            user_info,
            host: url.host_str().unwrap_or_default().to_string(),
            port: url.port(),
            path: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
            fragment: url.fragment().unwrap_or_default().to_string(),
        }
    }
}

impl FromStr for Uri {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authority = self.authority();
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !authority.is_empty() {
            write!(f, "//{authority}")?;
            if !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_str("/")?;
            }
        }
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

fn parse_error(input: &str, err: &url::ParseError) -> UrlError {
    UrlError::UriParse(format!("'{input}': {err}"))
}

/// Returns `true` for `host:port[/...]`, where `url` would read the host as
/// a scheme.
fn is_host_port(input: &str) -> bool {
    let Some((host, rest)) = input.split_once(':') else {
        return false;
    };
    let port_end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let port = &rest[..port_end];

    !host.is_empty()
        && !host.contains(|c: char| matches!(c, '/' | '?' | '#'))
        && !port.is_empty()
        && port.bytes().all(|b| b.is_ascii_digit())
}

/// Default ports that are dropped from the authority.
fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        "ftp" => Some(21),
        _ => None,
    }
}

/// Splits a raw `[user@]host[:port]` authority. A non-numeric port is kept as
/// part of the host.
fn split_authority(authority: &str) -> (String, String, Option<u16>) {
    let (user_info, host_port) = authority
        .rsplit_once('@')
        .unwrap_or(("", authority));

    if host_port.ends_with(']') {
        return (user_info.to_string(), host_port.to_string(), None);
    }

    match host_port.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (user_info.to_string(), host.to_string(), Some(port)),
            Err(_) => (user_info.to_string(), host_port.to_string(), None),
        },
        None => (user_info.to_string(), host_port.to_string(), None),
    }
}
