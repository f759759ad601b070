//! `confbundle.toml` configuration.
//!
//! Every section is optional; missing values fall back to the defaults
//! below. CLI flags override whatever the file says.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use confbundle_ingest::{DEFAULT_NOISE_PATTERN, InventoryOptions};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "confbundle.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Parent of the per-conference input directories.
    pub input_base: PathBuf,
    /// Parent of the per-conference bundle directories.
    pub output_base: PathBuf,
    /// Where audit CSVs are written.
    pub assignments_dir: PathBuf,
    /// When set, logs go to `<log_dir>/<conference>.log` unless `--log-file` is given.
    pub log_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_base: PathBuf::from("input"),
            output_base: PathBuf::from("output"),
            assignments_dir: PathBuf::from("assignments"),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventoryConfig {
    pub noise_pattern: String,
    /// Extra filenames to skip in addition to hidden files.
    pub ignored_files: Vec<String>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            noise_pattern: DEFAULT_NOISE_PATTERN.to_string(),
            ignored_files: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `explicit` when given, else `confbundle.toml` from the working
    /// directory when it exists, else the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::load(local)
                } else {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn inventory_options(&self) -> Result<InventoryOptions> {
        InventoryOptions::new(&self.inventory.noise_pattern, &self.inventory.ignored_files)
            .context("build inventory options")
    }
}
