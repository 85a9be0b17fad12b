//! Server configuration
//!
//! Loaded from `<config_dir>/storefront/config.json` (or an explicit path);
//! a missing file yields defaults. CLI flags and environment variables are
//! applied on top by the caller.

use crate::search::matcher::{DEFAULT_MIN_QUERY_LEN, DEFAULT_THRESHOLD};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "storefront";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog snapshot file
    pub data_file: PathBuf,
    /// Shared admin code; when unset every write is rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_code: Option<String>,
    pub bind: String,
    /// Fixed category set, in display order
    pub categories: Vec<String>,
    /// Categories whose products are search targets
    pub searchable_categories: Vec<String>,
    pub similarity_threshold: f64,
    pub min_query_len: usize,
    /// Number of search results shown when no limit is requested
    pub display_limit: usize,
    /// Messaging link base for product selection hand-off
    pub order_link: String,
    pub order_phone: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            admin_code: None,
            bind: "127.0.0.1:8080".to_string(),
            categories: [
                "fridges",
                "cloth-washers",
                "acs",
                "fans",
                "dish-washers",
                "other",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            searchable_categories: vec!["other".to_string()],
            similarity_threshold: DEFAULT_THRESHOLD,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            display_limit: 5,
            order_link: "https://wa.me/".to_string(),
            order_phone: None,
        }
    }
}

impl Config {
    /// Reject configurations the store and matcher cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            bail!("At least one category must be configured");
        }
        if let Some(blank) = self.categories.iter().find(|c| c.trim().is_empty()) {
            bail!("Category names cannot be blank: {:?}", blank);
        }
        for searchable in &self.searchable_categories {
            if !self.categories.contains(searchable) {
                bail!("Searchable category {} is not a configured category", searchable);
            }
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            bail!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            );
        }
        if self.display_limit == 0 {
            bail!("display_limit must be at least 1");
        }
        url::Url::parse(&self.order_link)
            .with_context(|| format!("Invalid order_link: {}", self.order_link))?;
        Ok(())
    }
}

/// Get the path to the default configuration file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
    Ok(config_dir.join(APP_DIR).join("config.json"))
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("catalog.json")
}

/// Load configuration from `path`, or the default location when `None`
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };

    // If file doesn't exist, return default config
    if !path.exists() {
        return Ok(Config::default());
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: Config = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    Ok(config)
}
