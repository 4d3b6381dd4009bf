//! Deploy context and per-run state.
//!
//! `DeployContext` carries the immutable configuration every step reads;
//! `DeployState` holds the two values collected during the run. Both are
//! passed explicitly so steps share no hidden object state.

use std::path::{Path, PathBuf};

use crate::config::SlipwayConfig;
use crate::platform::DEFAULT_PLATFORM_BIN;

/// Application name suggested when nothing is configured.
pub const DEFAULT_APP_NAME: &str = "alert-relay-bot";

const DEFAULT_GIT_BIN: &str = "git";
const DEFAULT_AUTHOR_NAME: &str = "Slipway Deploy";
const DEFAULT_AUTHOR_EMAIL: &str = "deploy@slipway.local";
const DEFAULT_LOG_LINES: u32 = 30;

/// Immutable configuration for one deploy run.
#[derive(Debug, Clone)]
pub struct DeployContext {
    project_dir: PathBuf,
    git_bin: String,
    platform_bin: String,
    default_app_name: String,
    author_name: String,
    author_email: String,
    log_lines: u32,
}

impl DeployContext {
    /// Context with built-in defaults rooted at the given directory.
    pub fn new(project_dir: PathBuf) -> Self {
        Self {
            project_dir,
            git_bin: DEFAULT_GIT_BIN.to_string(),
            platform_bin: DEFAULT_PLATFORM_BIN.to_string(),
            default_app_name: DEFAULT_APP_NAME.to_string(),
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: DEFAULT_AUTHOR_EMAIL.to_string(),
            log_lines: DEFAULT_LOG_LINES,
        }
    }

    /// Context for the current directory with `slipway.toml` overrides
    /// applied.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let project_dir = std::env::current_dir()?;
        let config = SlipwayConfig::load(&project_dir)?;
        Ok(Self::new(project_dir).with_config(config))
    }

    /// Apply configuration file overrides.
    pub fn with_config(mut self, config: SlipwayConfig) -> Self {
        if let Some(app) = config.app {
            self.default_app_name = app;
        }
        if let Some(bin) = config.platform_bin {
            self.platform_bin = bin;
        }
        if let Some(bin) = config.git_bin {
            self.git_bin = bin;
        }
        if let Some(lines) = config.log_lines {
            self.log_lines = lines;
        }
        if let Some(author) = config.author {
            if let Some(name) = author.name {
                self.author_name = name;
            }
            if let Some(email) = author.email {
                self.author_email = email;
            }
        }
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn git_bin(&self) -> &str {
        &self.git_bin
    }

    pub fn platform_bin(&self) -> &str {
        &self.platform_bin
    }

    /// Name of the git remote the platform CLI manages. The platform names
    /// the remote after itself.
    pub fn remote_name(&self) -> &str {
        &self.platform_bin
    }

    pub fn default_app_name(&self) -> &str {
        &self.default_app_name
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn author_email(&self) -> &str {
        &self.author_email
    }

    pub fn log_lines(&self) -> u32 {
        self.log_lines
    }
}

/// Values collected during the run, each set once and read by later steps.
#[derive(Debug, Clone)]
pub struct DeployState {
    /// Target application name on the platform
    pub app_name: String,
    /// Operator contact number pushed as remote configuration
    pub contact_number: String,
}

impl DeployState {
    pub fn new(app_name: String) -> Self {
        Self {
            app_name,
            contact_number: String::new(),
        }
    }
}
