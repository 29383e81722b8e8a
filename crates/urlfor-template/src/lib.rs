//! # urlfor-template
//!
//! Template layer for urlfor. Provides [`UrlComposer`], which combines a route
//! resolver with a base reference and base path, and [`UrlExtension`], which
//! exposes the composer to Tera templates as functions.
//!
//! ## Modules
//!
//! - [`composer`] - Path, URL and current-path composition
//! - [`extension`] - Tera function registration

pub mod composer;
pub mod extension;

pub use composer::{BasePathPolicy, BaseUrl, UrlComposer};
pub use extension::{SharedComposer, UrlExtension};
