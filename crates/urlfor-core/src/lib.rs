//! # urlfor-core
//!
//! Core types, settings, and error types for urlfor.
//! This crate has no dependency on the other workspace crates and provides the
//! foundation for all of them.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{UrlError, UrlResult};
pub use settings::{Settings, SETTINGS};
