//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `URLFOR_DEBUG` | `debug` |
//! | `URLFOR_LOG_LEVEL` | `log_level` |
//! | `URLFOR_BASE_PATH` | `base_path` |
//! | `URLFOR_BASE_URL` | `base_url` (empty value clears it) |
//! | `URLFOR_NORMALIZE_BASE_PATH` | `normalize_base_path` |
//! | `URLFOR_APP_NAME` | `app_name` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use urlfor_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/urlfor.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/urlfor.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::UrlError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, UrlError> {
    // Deserialize into a JSON value first so it can be merged over the defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| UrlError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns [`UrlError::IoError`] if the file cannot be read and
/// [`UrlError::ConfigurationError`] if the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, UrlError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, UrlError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, UrlError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| UrlError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns [`UrlError::IoError`] if the file cannot be read and
/// [`UrlError::ConfigurationError`] if the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, UrlError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `URLFOR_*` environment variable overrides to a settings struct.
///
/// Boolean values accept "true"/"1"/"yes" (case-insensitive); anything else is false.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("URLFOR_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Ok(val) = std::env::var("URLFOR_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("URLFOR_BASE_PATH") {
        settings.base_path = val;
    }

    if let Ok(val) = std::env::var("URLFOR_BASE_URL") {
        settings.base_url = if val.is_empty() { None } else { Some(val) };
    }

    if let Ok(val) = std::env::var("URLFOR_NORMALIZE_BASE_PATH") {
        settings.normalize_base_path = parse_flag(&val);
    }

    if let Ok(val) = std::env::var("URLFOR_APP_NAME") {
        settings.app_name = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_flag(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, UrlError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        UrlError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        UrlError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            base_path = "/app"
            base_url = "https://example.com/app"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.base_path, "/app");
        assert_eq!(settings.base_url.as_deref(), Some("https://example.com/app"));
        // Defaults preserved
        assert_eq!(settings.app_name, "default");
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_toml_str_extra() {
        let toml = r#"
            [extra]
            cdn = "https://cdn.example.com"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.extra["cdn"], "https://cdn.example.com");
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert!(settings.base_url.is_none());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(UrlError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("normalize_base_path = \"sometimes\"");
        assert!(result.is_err());
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "normalize_base_path": true,
            "log_level": "debug"
        }"#;

        let settings = from_json_str(json).unwrap();
        assert!(settings.normalize_base_path);
        assert_eq!(settings.log_level, "debug");
        assert!(settings.base_path.is_empty());
    }

    #[test]
    fn test_from_json_str_null_base_url() {
        let settings = from_json_str(r#"{"base_url": null}"#).unwrap();
        assert!(settings.base_url.is_none());
    }

    #[test]
    fn test_from_json_str_invalid() {
        let result = from_json_str("{invalid json");
        assert!(result.is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = std::env::temp_dir().join("urlfor_test_toml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test_settings.toml");

        std::fs::write(&path, "base_path = \"/blog\"\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.base_path, "/blog");

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_json_file() {
        let dir = std::env::temp_dir().join("urlfor_test_json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test_settings.json");

        std::fs::write(&path, r#"{"app_name": "admin"}"#).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert_eq!(settings.app_name, "admin");

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/path/urlfor.toml");
        assert!(matches!(result, Err(UrlError::IoError(_))));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = from_json_file("/nonexistent/path/urlfor.json");
        assert!(matches!(result, Err(UrlError::IoError(_))));
    }

    // ── Environment variable overrides ──────────────────────────────
    //
    // Each test uses its own variables so parallel tests don't race.

    #[test]
    fn test_apply_env_overrides_base_path() {
        let mut settings = Settings::default();
        std::env::set_var("URLFOR_BASE_PATH", "/env-app");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.base_path, "/env-app");
        std::env::remove_var("URLFOR_BASE_PATH");
    }

    #[test]
    fn test_apply_env_overrides_base_url() {
        let mut settings = Settings::default();
        std::env::set_var("URLFOR_BASE_URL", "https://env.example.com");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.base_url.as_deref(), Some("https://env.example.com"));

        std::env::set_var("URLFOR_BASE_URL", "");
        apply_env_overrides(&mut settings);
        assert!(settings.base_url.is_none());
        std::env::remove_var("URLFOR_BASE_URL");
    }

    #[test]
    fn test_apply_env_overrides_flags() {
        let mut settings = Settings::default();
        std::env::set_var("URLFOR_NORMALIZE_BASE_PATH", "YES");
        std::env::set_var("URLFOR_DEBUG", "0");
        apply_env_overrides(&mut settings);
        assert!(settings.normalize_base_path);
        assert!(!settings.debug);
        std::env::remove_var("URLFOR_NORMALIZE_BASE_PATH");
        std::env::remove_var("URLFOR_DEBUG");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag("Yes"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("nope"));
    }

    // ── merge_json helper ───────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"outer": {"a": 1, "b": 2}, "c": 3});
        let over = serde_json::json!({"outer": {"b": 4}});
        let merged = merge_json(base, over);
        assert_eq!(merged["outer"]["a"], 1);
        assert_eq!(merged["outer"]["b"], 4);
        assert_eq!(merged["c"], 3);
    }

    #[test]
    fn test_toml_to_json() {
        let toml_val: toml::Value = toml::from_str(
            r#"
            name = "test"
            count = 42
            flag = true
            items = [1, 2, 3]
            [nested]
            key = "value"
        "#,
        )
        .unwrap();

        let json = toml_to_json(toml_val);
        assert_eq!(json["name"], "test");
        assert_eq!(json["count"], 42);
        assert_eq!(json["flag"], true);
        assert_eq!(json["items"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["nested"]["key"], "value");
    }
}
