// File: src/table/source.rs
// Purpose: Lazily loaded route configuration data

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use once_cell::sync::OnceCell;
use serde_json::Value as JsonValue;

use crate::error::{Result, RouteError};

type Loader = Box<dyn Fn() -> anyhow::Result<JsonValue> + Send + Sync>;

/// Route configuration produced by a loader on first use
///
/// The loader runs until it succeeds once; the result is then cached for the
/// lifetime of the config. A result that is neither a map nor a list is a
/// configuration error.
///
/// # Examples
///
/// ```
/// use switchboard::RouteConfig;
///
/// let config = RouteConfig::from_json_str(r#"{"users": ["Users", "index"]}"#);
/// assert!(config.get().unwrap().is_object());
///
/// let bad = RouteConfig::from_json_str("42");
/// assert!(bad.get().unwrap_err().is_configuration());
/// ```
pub struct RouteConfig {
    loader: Loader,
    cache: OnceCell<JsonValue>,
}

impl RouteConfig {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> anyhow::Result<JsonValue> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            cache: OnceCell::new(),
        }
    }

    /// Config holding an already parsed value
    pub fn from_value(value: JsonValue) -> Self {
        Self::new(move || Ok(value.clone()))
    }

    pub fn from_json_str(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move || serde_json::from_str(&text).context("Failed to parse route configuration JSON"))
    }

    pub fn from_toml_str(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move || toml::from_str(&text).context("Failed to parse route configuration TOML"))
    }

    /// Config read from a `.json` or `.toml` file when first needed
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(move || load_file(&path))
    }

    /// The configuration data, loading it on first call
    pub fn get(&self) -> Result<&JsonValue> {
        self.cache.get_or_try_init(|| {
            let value = (self.loader)()
                .map_err(|e| RouteError::configuration(format!("{:#}", e)))?;

            match value {
                JsonValue::Object(_) | JsonValue::Array(_) => Ok(value),
                other => Err(RouteError::configuration(format!(
                    "Route configuration loader must return a map or a list. Got {}",
                    json_kind(&other)
                ))),
            }
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }
}

impl fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteConfig")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

fn load_file(path: &Path) -> anyhow::Result<JsonValue> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read route configuration: {:?}", path))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse route configuration: {:?}", path)),
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Failed to parse route configuration: {:?}", path)),
        _ => bail!("Unsupported route configuration format: {:?}", path),
    }
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "map",
    }
}
