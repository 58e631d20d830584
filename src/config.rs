//! Checker configuration.
//!
//! Handles loading, validating, and merging `postcheck.toml`. The file lives
//! in the root of the directory being checked and is entirely optional:
//! stock defaults describe a plain Jekyll blog with `post` and `page` layouts.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layouts]
//! known = ["post", "page"]      # Allow-list of layout names
//! title_required = ["post"]     # Layouts that need a non-empty title
//! dated = []                    # Layouts whose file names need a YYYY-MM-DD- prefix
//! require_layout = false        # Report documents with no layout at all
//!
//! [documents]
//! extensions = ["md", "markdown"]
//! exclude = ["_site", "node_modules", "vendor"]
//!
//! [processing]
//! max_processes = 4             # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [layouts]
//! known = ["post", "page", "tutorial"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the source root.
pub const CONFIG_FILENAME: &str = "postcheck.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Checker configuration loaded from `postcheck.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Layout allow-list and per-layout requirements.
    pub layouts: LayoutsConfig,
    /// Which files count as documents.
    pub documents: DocumentsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl CheckConfig {
    /// Validate config values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layouts.known.is_empty() {
            return Err(ConfigError::Validation(
                "layouts.known must not be empty".into(),
            ));
        }
        for list in [&self.layouts.title_required, &self.layouts.dated] {
            if let Some(unknown) = list.iter().find(|l| !self.layouts.known.contains(l)) {
                return Err(ConfigError::Validation(format!(
                    "layout `{unknown}` is not listed in layouts.known"
                )));
            }
        }
        if self.documents.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "documents.extensions must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Layout rules applied by [`crate::validate::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutsConfig {
    /// Layout names the renderer has templates for.
    pub known: Vec<String>,
    /// Layouts that require a non-empty `title`.
    pub title_required: Vec<String>,
    /// Layouts whose file names must carry a `YYYY-MM-DD-` prefix.
    pub dated: Vec<String>,
    /// Report documents that have no `layout` key.
    pub require_layout: bool,
}

impl Default for LayoutsConfig {
    fn default() -> Self {
        Self {
            known: vec!["post".to_string(), "page".to_string()],
            title_required: vec!["post".to_string()],
            dated: Vec::new(),
            require_layout: false,
        }
    }
}

/// Document discovery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentsConfig {
    /// File extensions (without dot, case-insensitive) treated as documents.
    pub extensions: Vec<String>,
    /// Directory names skipped while walking, at any depth.
    pub exclude: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "markdown".to_string()],
            exclude: vec![
                "_site".to_string(),
                "node_modules".to_string(),
                "vendor".to_string(),
            ],
        }
    }
}

impl DocumentsConfig {
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(&ext)))
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude.iter().any(|x| x == name)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Worker count for the scan: `max_processes` clamped to the core count,
/// or every core when unset.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(CheckConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `postcheck.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CheckConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CheckConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `postcheck.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<CheckConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    if overlay.is_some() {
        log::debug!("merging {} from {}", CONFIG_FILENAME, dir.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `postcheck.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# postcheck configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the root of the directory you check.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Layout rules
# ---------------------------------------------------------------------------
[layouts]
# Layout names the site has templates for. Any other `layout:` is reported.
known = ["post", "page"]

# Layouts that must carry a non-empty `title:`.
title_required = ["post"]

# Layouts whose file names must start with a YYYY-MM-DD- date.
# Jekyll ignores undated files under _posts/, so ["post"] is a common choice.
dated = []

# Report documents with no `layout:` key at all.
require_layout = false

# ---------------------------------------------------------------------------
# Document discovery
# ---------------------------------------------------------------------------
[documents]
# File extensions treated as documents (case-insensitive, no dot).
extensions = ["md", "markdown"]

# Directory names skipped at any depth. Hidden entries are always skipped.
exclude = ["_site", "node_modules", "vendor"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
