//! Site configuration module.
//!
//! Loads and validates the optional `config.toml` at the content root. All
//! fields have defaults matching the conventional layout, so a site with no
//! config file builds as-is.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Travelogue"          # Site title used by the page templates
//! posts_dir = "_posts"          # Travel directories live here
//! contents_dir = "src"          # Asset tree mapped onto the output root
//! flags_dir = "flags"           # Country flag SVGs, named <cc>.svg
//! stylesheet = "/assets/styles/style.css"
//!
//! # Output entries preserved across builds (photos are *inputs* that live
//! # in the output tree, so cleanup must not touch them)
//! keep = ["assets", "images", "photos", "CNAME"]
//!
//! [sass]
//! style = "expanded"            # or "compressed"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// User config files need only specify the values they want to override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title used by the page templates.
    pub title: String,
    /// Directory of travel directories, relative to the content root.
    pub posts_dir: String,
    /// Asset source tree mapped onto the output root.
    pub contents_dir: String,
    /// Directory of country flag SVGs named `<cc>.svg`.
    pub flags_dir: String,
    /// Stylesheet URL the templates link.
    pub stylesheet: String,
    /// Output entries preserved by the pre-build cleanup.
    pub keep: Vec<String>,
    /// Sass compilation settings.
    pub sass: SassConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Travelogue".to_string(),
            posts_dir: "_posts".to_string(),
            contents_dir: "src".to_string(),
            flags_dir: "flags".to_string(),
            stylesheet: "/assets/styles/style.css".to_string(),
            keep: ["assets", "images", "photos", "CNAME"]
                .map(String::from)
                .to_vec(),
            sass: SassConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("posts_dir", &self.posts_dir),
            ("contents_dir", &self.contents_dir),
            ("flags_dir", &self.flags_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Sass compilation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SassConfig {
    pub style: SassStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SassStyle {
    #[default]
    Expanded,
    Compressed,
}

impl SassStyle {
    pub fn as_grass(self) -> grass::OutputStyle {
        match self {
            SassStyle::Expanded => grass::OutputStyle::Expanded,
            SassStyle::Compressed => grass::OutputStyle::Compressed,
        }
    }
}

/// A documented stock `config.toml` with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# travelogue site configuration
# All options are optional - defaults shown below

# Site title used by the page templates
title = "Travelogue"

# Travel directories live here
posts_dir = "_posts"

# Asset tree mapped onto the output root
contents_dir = "src"

# Country flag SVGs, named <cc>.svg
flags_dir = "flags"

# Stylesheet URL the templates link
stylesheet = "/assets/styles/style.css"

# Output entries preserved across builds. Photos are inputs that live in
# the output tree, so cleanup must not touch them.
keep = ["assets", "images", "photos", "CNAME"]

[sass]
style = "expanded"   # or "compressed"
"#
}

/// Load `config.toml` from the content root, falling back to defaults when
/// the file doesn't exist.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join("config.toml");
    let config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}
