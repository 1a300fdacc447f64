//! Site configuration file handling
//!
//! The CLI reads an optional `mandats.toml`:
//!
//! ```toml
//! [source]
//! owner = "TAA-Mende"
//! repo = "mandats"
//! path = "/export/mandats.json"
//!
//! [select]
//! size = "small"
//! placement = "end"
//! fluid_list_box = false
//! placeholder = "Toutes les organisations"
//!
//! [window]
//! width = 480.0
//! height = 720.0
//! ```
//!
//! Every section and key is optional; a missing file means defaults.

use anyhow::{Context, Result};
use mandats_cn::ListBoxPlacement;
use mandats_theme::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "mandats.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub select: SelectConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

impl SiteConfig {
    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

// =============================================================================
// [source] - where the feed is exported
// =============================================================================

/// GitHub repository holding the exported feed
#[derive(Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_repo")]
    pub repo: String,
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_owner() -> String {
    "TAA-Mende".to_string()
}

fn default_repo() -> String {
    "mandats".to_string()
}

fn default_path() -> String {
    "/export/mandats.json".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            path: default_path(),
        }
    }
}

impl SourceConfig {
    /// GitHub contents API endpoint serving the payload
    pub fn contents_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}",
            self.owner,
            self.repo,
            self.path.trim_start_matches('/')
        )
    }
}

// =============================================================================
// [select] - defaults for the organisation select
// =============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct SelectConfig {
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub placement: ListBoxPlacement,
    #[serde(default)]
    pub fluid_list_box: bool,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_placeholder() -> String {
    "Toutes les organisations".to_string()
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            size: Size::default(),
            placement: ListBoxPlacement::default(),
            fluid_list_box: false,
            placeholder: default_placeholder(),
        }
    }
}

// =============================================================================
// [window] - headless viewport
// =============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    480.0
}

fn default_height() -> f32 {
    720.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = SiteConfig::parse("").unwrap();
        assert_eq!(config.source.owner, "TAA-Mende");
        assert_eq!(config.source.path, "/export/mandats.json");
        assert_eq!(config.select.size, Size::Medium);
        assert_eq!(config.select.placement, ListBoxPlacement::Start);
        assert_eq!(config.window.width, 480.0);
    }

    #[test]
    fn test_partial_sections() {
        let config = SiteConfig::parse(
            r#"
            [select]
            size = "xSmall"
            placement = "end"

            [window]
            height = 400.0
            "#,
        )
        .unwrap();
        assert_eq!(config.select.size, Size::XSmall);
        assert_eq!(config.select.placement, ListBoxPlacement::End);
        assert!(!config.select.fluid_list_box);
        assert_eq!(config.select.placeholder, "Toutes les organisations");
        assert_eq!(config.window.width, 480.0);
        assert_eq!(config.window.height, 400.0);
    }

    #[test]
    fn test_unknown_size_is_an_error() {
        assert!(SiteConfig::parse("[select]\nsize = \"huge\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = SiteConfig::load(Path::new("definitely/not/here/mandats.toml")).unwrap();
        assert_eq!(config.source.repo, "mandats");
    }

    #[test]
    fn test_contents_url() {
        assert_eq!(
            SourceConfig::default().contents_url(),
            "https://api.github.com/repos/TAA-Mende/mandats/contents/export/mandats.json"
        );
    }
}
