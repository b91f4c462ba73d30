use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::node::ConfigNode;

/// Well-known location of the configuration document, relative to the
/// working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_ENV_VAR: &str = "MOTOR_CONFIG";

/// Name of the mandatory top-level table.
const ROOT_TABLE: &str = "config";

/// Name of the table carrying application identity.
const APP_TABLE: &str = "app";

/// Resolve the configuration path.
///
/// Precedence: `MOTOR_CONFIG` env var > `config.toml`.
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// A parsed configuration document.
///
/// Holds the contents of the `[config]` table. The document is immutable once
/// parsed; modules only ever receive borrowed [`ConfigNode`] views of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    root: toml::Table,
}

impl Config {
    /// Parse a configuration document.
    ///
    /// The document must contain a `[config]` table; anything else is treated
    /// as malformed.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let mut document: toml::Table =
            toml::from_str(input).context("failed to parse configuration TOML")?;

        let root = match document.remove(ROOT_TABLE) {
            Some(toml::Value::Table(table)) => table,
            Some(other) => anyhow::bail!(
                "`{ROOT_TABLE}` must be a table, found {}",
                other.type_str()
            ),
            None => anyhow::bail!("configuration is missing the `[{ROOT_TABLE}]` table"),
        };

        Ok(Self { root })
    }

    /// Load and parse a configuration document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;

        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("invalid configuration at {}", path.display()))?;

        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// The `[config]` table.
    pub fn root(&self) -> ConfigNode<'_> {
        ConfigNode::new(Some(&self.root))
    }

    /// The `[config.app]` table (empty if absent).
    pub fn app(&self) -> ConfigNode<'_> {
        self.root().child(APP_TABLE)
    }

    /// The subtree addressed to the module named `name` (empty if absent).
    pub fn module(&self, name: &str) -> ConfigNode<'_> {
        self.root().child(name)
    }

    /// `app.title`, or an empty string.
    pub fn title(&self) -> &str {
        self.app().text("title")
    }

    /// `app.organization`, or an empty string.
    pub fn organization(&self) -> &str {
        self.app().text("organization")
    }
}
