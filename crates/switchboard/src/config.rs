// File: src/config.rs
// Purpose: Router settings loaded from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::table::ConfigDialect;

/// Router behaviour switches
///
/// Read from the `[router]` table of a TOML file:
///
/// ```toml
/// [router]
/// strict = false
/// add_context_to_named_arguments = true
/// dialect = "suffixed"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Whether a route listing an unknown option is an error (default: true)
    #[serde(default = "default_true")]
    pub strict: bool,

    /// Whether function endpoints with named captures get the route context
    /// under the `context` name
    #[serde(default = "default_false")]
    pub add_context_to_named_arguments: bool,

    /// How nested route configuration lists several routes under one path
    #[serde(default)]
    pub dialect: ConfigDialect,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    router: RouterSettings,
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            strict: true,
            add_context_to_named_arguments: false,
            dialect: ConfigDialect::default(),
        }
    }
}

impl RouterSettings {
    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: SettingsFile =
            toml::from_str(content).context("Failed to parse router settings")?;
        Ok(file.router)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read router settings: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse router settings: {:?}", path))
    }
}
