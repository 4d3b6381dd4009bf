//! Version-control operations via the git CLI.
//!
//! Slipway never inspects repository internals itself; everything goes
//! through `git` subprocess invocations so the working tree state stays
//! owned by the tool the operator already uses.

use std::path::Path;

use semver::Version;
use url::Url;

use crate::exec::{CommandRunner, ExecOutput};

/// Branch pushed first during deploy.
pub const PRIMARY_BRANCH: &str = "main";

/// Branch tried once when the primary ref does not exist.
pub const FALLBACK_BRANCH: &str = "master";

/// Git operations scoped to one working directory.
pub struct GitWorkspace<'a, R: CommandRunner> {
    runner: &'a R,
    bin: &'a str,
    root: &'a Path,
}

impl<'a, R: CommandRunner> GitWorkspace<'a, R> {
    pub fn new(runner: &'a R, bin: &'a str, root: &'a Path) -> Self {
        Self { runner, bin, root }
    }

    pub fn version(&self) -> anyhow::Result<ExecOutput> {
        self.runner.run(self.bin, &["--version"], self.root)
    }

    /// Whether the working directory already holds a repository.
    pub fn is_initialized(&self) -> bool {
        self.root.join(".git").exists()
    }

    pub fn init(&self) -> anyhow::Result<ExecOutput> {
        self.runner.run(self.bin, &["init"], self.root)
    }

    /// Set the repository-local author identity used for deploy commits.
    pub fn set_identity(&self, name: &str, email: &str) -> anyhow::Result<()> {
        self.runner
            .run(self.bin, &["config", "user.email", email], self.root)?;
        self.runner
            .run(self.bin, &["config", "user.name", name], self.root)?;
        Ok(())
    }

    pub fn stage_all(&self) -> anyhow::Result<ExecOutput> {
        self.runner.run(self.bin, &["add", "."], self.root)
    }

    /// Whether `git status --porcelain` reports anything to commit.
    pub fn has_pending_changes(&self) -> anyhow::Result<bool> {
        let status = self
            .runner
            .run(self.bin, &["status", "--porcelain"], self.root)?;
        Ok(status.success() && !status.stdout.trim().is_empty())
    }

    pub fn commit(&self, message: &str) -> anyhow::Result<ExecOutput> {
        self.runner
            .run(self.bin, &["commit", "-m", message], self.root)
    }

    /// URL of the named remote, if one is configured.
    pub fn remote_url(&self, remote: &str) -> anyhow::Result<Option<String>> {
        let key = format!("remote.{remote}.url");
        let output = self
            .runner
            .run(self.bin, &["config", "--get", &key], self.root)?;
        let url = output.stdout.trim();
        if output.success() && !url.is_empty() {
            Ok(Some(url.to_string()))
        } else {
            Ok(None)
        }
    }

    pub fn push(&self, remote: &str, branch: &str) -> anyhow::Result<ExecOutput> {
        self.runner.run(self.bin, &["push", remote, branch], self.root)
    }
}

/// Parse the version out of `git --version` output
/// (e.g. `git version 2.39.2`).
///
/// Returns `None` when the output does not look like a version at all;
/// callers treat that as acceptable rather than guessing.
pub fn parse_git_version(stdout: &str) -> Option<Version> {
    let token = stdout.split_whitespace().nth(2)?;
    if let Ok(version) = Version::parse(token) {
        return Some(version);
    }
    // Platform builds append extra components ("2.39.2.windows.1");
    // fall back to major.minor.
    let mut parts = token.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    Some(Version::new(major, minor, 0))
}

/// Minimum git version the workflow supports.
pub fn minimum_git_version() -> Version {
    Version::new(2, 0, 0)
}

/// Derive the application name from a configured remote URL.
///
/// The platform names its git remotes `https://<host>/<app>.git`, so the
/// app name is the last path segment with the `.git` suffix stripped.
pub fn app_name_from_remote_url(remote_url: &str) -> Option<String> {
    let segment = match Url::parse(remote_url) {
        Ok(url) => url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .next_back()?
            .to_string(),
        // scp-style remotes ("git@host:path/app.git") are not URLs;
        // take everything after the last separator.
        Err(_) => remote_url
            .rsplit(['/', ':'])
            .next()
            .unwrap_or(remote_url)
            .to_string(),
    };
    let name = segment.strip_suffix(".git").unwrap_or(&segment).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_version() {
        let version = parse_git_version("git version 2.39.2\n").unwrap();
        assert_eq!(version, Version::new(2, 39, 2));
    }

    #[test]
    fn test_parse_version_with_platform_suffix() {
        let version = parse_git_version("git version 2.41.0.windows.1").unwrap();
        assert_eq!(version, Version::new(2, 41, 0));
    }

    #[test]
    fn test_parse_garbage_returns_none() {
        assert!(parse_git_version("not a version").is_none());
        assert!(parse_git_version("").is_none());
    }

    #[test]
    fn test_parsed_version_orders_against_minimum() {
        let version = parse_git_version("git version 1.8.3").unwrap();
        assert!(version < minimum_git_version());
        let version = parse_git_version("git version 2.25.1").unwrap();
        assert!(version >= minimum_git_version());
    }

    #[test]
    fn test_app_name_from_https_remote() {
        assert_eq!(
            app_name_from_remote_url("https://git.heroku.com/alert-relay-bot.git").as_deref(),
            Some("alert-relay-bot")
        );
    }

    #[test]
    fn test_app_name_without_git_suffix() {
        assert_eq!(
            app_name_from_remote_url("https://git.heroku.com/alert-relay-bot").as_deref(),
            Some("alert-relay-bot")
        );
    }

    #[test]
    fn test_app_name_from_scp_style_remote() {
        assert_eq!(
            app_name_from_remote_url("git@heroku.com:alert-relay-bot.git").as_deref(),
            Some("alert-relay-bot")
        );
    }

    #[test]
    fn test_app_name_from_empty_path() {
        assert_eq!(app_name_from_remote_url("https://git.heroku.com/"), None);
    }
}
