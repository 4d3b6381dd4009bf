//! Optional `slipway.toml` configuration.
//!
//! Resolution order: `slipway.toml` in the project directory, then the
//! user config directory (`~/.config/slipway/slipway.toml`), then built-in
//! defaults. Every field is optional; unset fields keep their defaults.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Config file name, shared by the project and user locations.
pub const CONFIG_FILE: &str = "slipway.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlipwayConfig {
    /// Default application name suggested during the naming step
    pub app: Option<String>,
    /// Platform CLI binary (defaults to `heroku`)
    pub platform_bin: Option<String>,
    /// Git CLI binary (defaults to `git`)
    pub git_bin: Option<String>,
    /// Log lines shown after deploy
    pub log_lines: Option<u32>,
    /// Author identity for deploy commits
    pub author: Option<AuthorConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl SlipwayConfig {
    /// Load configuration for the given project directory.
    pub fn load(project_dir: &Path) -> anyhow::Result<Self> {
        let project_path = project_dir.join(CONFIG_FILE);
        if project_path.exists() {
            return Self::load_file(&project_path);
        }
        if let Some(user_path) = dirs::config_dir().map(|d| d.join("slipway").join(CONFIG_FILE))
            && user_path.exists()
        {
            return Self::load_file(&user_path);
        }
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
