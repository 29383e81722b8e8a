//! Route pattern parsing and reverse rendering.
//!
//! This module provides [`RoutePattern`] for route templates written with
//! `{placeholder}` syntax:
//!
//! - `/hello/{name}`: a placeholder matching any segment
//! - `/archive/{year:\d{4}}`: a placeholder with a regex constraint
//! - `/users[/{id}[/{slug}]]`: optional trailing segments, nestable
//!
//! A pattern expands into *variants*, one per optional level, shortest first.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use urlfor_core::{UrlError, UrlResult};

use super::reverse::RouteData;

/// A piece of a route variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text copied into the URL as-is.
    Literal(String),
    /// A named placeholder filled from the route data.
    Placeholder {
        /// The placeholder name.
        name: String,
        /// The regex constraint, if one was given.
        regex: Option<String>,
    },
}

/// A parsed route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    /// The original pattern string
    pattern: String,
    /// One segment list per optional level, shortest first
    variants: Vec<Vec<Segment>>,
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl RoutePattern {
    /// Parses a route pattern.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::InvalidRoutePattern`] if brackets are unbalanced,
    /// an optional segment is not at the end, an optional segment is empty, a
    /// placeholder is unclosed, has an invalid name, repeats a name, or has a
    /// regex that does not compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlfor_http::urls::pattern::RoutePattern;
    ///
    /// let pattern = RoutePattern::parse("/users[/{id:[0-9]+}]").unwrap();
    /// assert_eq!(pattern.variants().len(), 2);
    /// assert_eq!(pattern.placeholder_names(), vec!["id"]);
    /// ```
    pub fn parse(pattern: &str) -> UrlResult<Self> {
        let without_closing = pattern.trim_end_matches(']');
        let num_optionals = pattern.len() - without_closing.len();

        let parts = split_optionals(pattern, without_closing)?;
        if num_optionals != parts.len() - 1 {
            return Err(invalid(
                pattern,
                "number of opening '[' and closing ']' does not match",
            ));
        }

        let mut variants = Vec::with_capacity(parts.len());
        let mut current = String::new();
        for (n, part) in parts.iter().enumerate() {
            if part.is_empty() && n != 0 {
                return Err(invalid(pattern, "empty optional part"));
            }
            current.push_str(part);
            variants.push(parse_placeholders(pattern, &current)?);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            variants,
        })
    }

    /// Returns the original pattern string.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns the variants, shortest first.
    pub fn variants(&self) -> &[Vec<Segment>] {
        &self.variants
    }

    /// Returns the placeholder names of the longest variant, in order.
    pub fn placeholder_names(&self) -> Vec<&str> {
        self.variants
            .last()
            .map(|segments| {
                segments
                    .iter()
                    .filter_map(|segment| match segment {
                        Segment::Placeholder { name, .. } => Some(name.as_str()),
                        Segment::Literal(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Renders the longest variant whose placeholders are all present in `data`.
    ///
    /// Values are inserted verbatim; they are not checked against the
    /// placeholder regex.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::MissingRouteData`] naming the first missing
    /// placeholder of the shortest variant if no variant can be rendered.
    pub fn reverse(&self, data: &RouteData) -> UrlResult<String> {
        let mut missing = String::new();

        for variant in self.variants.iter().rev() {
            match render_variant(variant, data) {
                Ok(url) => return Ok(url),
                Err(name) => missing = name.to_string(),
            }
        }

        Err(UrlError::MissingRouteData(missing))
    }
}

fn render_variant<'a>(segments: &'a [Segment], data: &RouteData) -> Result<String, &'a str> {
    let mut url = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => url.push_str(text),
            Segment::Placeholder { name, .. } => {
                let value = data.get(name).ok_or(name.as_str())?;
                url.push_str(value);
            }
        }
    }
    Ok(url)
}

fn invalid(pattern: &str, reason: &str) -> UrlError {
    UrlError::InvalidRoutePattern(format!("{reason} in route '{pattern}'"))
}

fn placeholder_name_regex() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("placeholder name regex is valid")
    })
}

/// Splits the pattern (with its closing brackets already trimmed) at every
/// `[` that is not inside a placeholder.
fn split_optionals<'a>(pattern: &str, route: &'a str) -> UrlResult<Vec<&'a str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in route.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '[' if depth == 0 => {
                parts.push(&route[start..i]);
                start = i + 1;
            }
            ']' if depth == 0 => {
                return Err(invalid(
                    pattern,
                    "optional segments can only occur at the end of a route",
                ));
            }
            _ => {}
        }
    }
    parts.push(&route[start..]);
    Ok(parts)
}

/// Parses `{name}` and `{name:regex}` placeholders out of one variant.
fn parse_placeholders(pattern: &str, route: &str) -> UrlResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut seen = HashSet::new();
    let mut remaining = route;

    while let Some(start) = remaining.find('{') {
        if start > 0 {
            segments.push(Segment::Literal(remaining[..start].to_string()));
        }

        // Find the matching close brace, allowing balanced braces in the regex.
        let mut depth = 0usize;
        let mut end = None;
        for (i, c) in remaining[start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(start + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let end = end.ok_or_else(|| invalid(pattern, "unclosed placeholder"))?;

        let inner = &remaining[start + 1..end];
        let (name, regex) = match inner.split_once(':') {
            Some((name, regex)) => (name.trim(), Some(regex.trim())),
            None => (inner.trim(), None),
        };

        if !placeholder_name_regex().is_match(name) {
            return Err(invalid(pattern, &format!("invalid placeholder name '{name}'")));
        }
        if !seen.insert(name.to_string()) {
            return Err(invalid(pattern, &format!("placeholder '{name}' used twice")));
        }
        if let Some(regex) = regex {
            Regex::new(&format!("^(?:{regex})$")).map_err(|e| {
                invalid(pattern, &format!("invalid regex for placeholder '{name}': {e}"))
            })?;
        }

        segments.push(Segment::Placeholder {
            name: name.to_string(),
            regex: regex.map(String::from),
        });
        remaining = &remaining[end + 1..];
    }

    if !remaining.is_empty() {
        segments.push(Segment::Literal(remaining.to_string()));
    }
    Ok(segments)
}
