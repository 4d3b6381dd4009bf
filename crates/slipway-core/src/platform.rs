//! Remote platform operations via the platform CLI.
//!
//! All remote interaction is delegated to the platform's own command-line
//! tool; slipway shells out and interprets exit codes plus stderr text.

use std::path::Path;

use crate::exec::{CommandRunner, ExecOutput};

/// Default platform CLI binary.
pub const DEFAULT_PLATFORM_BIN: &str = "heroku";

/// Domain under which deployed apps are reachable.
pub const APP_DOMAIN: &str = "herokuapp.com";

/// Runtime stack requested for the bot (Docker-based builds).
pub const CONTAINER_STACK: &str = "container";

/// Public URL of a deployed application.
pub fn app_url(app: &str) -> String {
    format!("https://{app}.{APP_DOMAIN}")
}

/// Dashboard URL for a deployed application.
pub fn dashboard_url(app: &str) -> String {
    format!("https://dashboard.heroku.com/apps/{app}")
}

/// Platform CLI operations scoped to one working directory.
pub struct PlatformClient<'a, R: CommandRunner> {
    runner: &'a R,
    bin: &'a str,
    cwd: &'a Path,
}

impl<'a, R: CommandRunner> PlatformClient<'a, R> {
    pub fn new(runner: &'a R, bin: &'a str, cwd: &'a Path) -> Self {
        Self { runner, bin, cwd }
    }

    pub fn version(&self) -> anyhow::Result<ExecOutput> {
        self.runner.run(self.bin, &["--version"], self.cwd)
    }

    /// Identity of the currently authenticated account, if any.
    pub fn whoami(&self) -> anyhow::Result<ExecOutput> {
        self.runner.run(self.bin, &["auth:whoami"], self.cwd)
    }

    /// Browser-based login flow. Interactive: the CLI owns the terminal
    /// until the operator finishes or aborts.
    pub fn login(&self) -> anyhow::Result<ExecOutput> {
        self.runner.run_interactive(self.bin, &["login"], self.cwd)
    }

    pub fn create_app(&self, app: &str) -> anyhow::Result<ExecOutput> {
        self.runner.run(self.bin, &["create", app], self.cwd)
    }

    /// Point the local repository's platform remote at an existing app.
    pub fn link_remote(&self, app: &str) -> anyhow::Result<ExecOutput> {
        self.runner
            .run(self.bin, &["git:remote", "-a", app], self.cwd)
    }

    pub fn set_config(&self, app: &str, key: &str, value: &str) -> anyhow::Result<ExecOutput> {
        let pair = format!("{key}={value}");
        self.runner
            .run(self.bin, &["config:set", &pair, "-a", app], self.cwd)
    }

    /// Display the app's full remote configuration.
    pub fn show_config(&self, app: &str) -> anyhow::Result<ExecOutput> {
        self.runner.run(self.bin, &["config", "-a", app], self.cwd)
    }

    pub fn set_stack(&self, app: &str, stack: &str) -> anyhow::Result<ExecOutput> {
        self.runner
            .run(self.bin, &["stack:set", stack, "-a", app], self.cwd)
    }

    pub fn logs(&self, app: &str, lines: u32) -> anyhow::Result<ExecOutput> {
        let lines = lines.to_string();
        self.runner
            .run(self.bin, &["logs", "--lines", &lines, "-a", app], self.cwd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_url() {
        assert_eq!(
            app_url("alert-relay-bot"),
            "https://alert-relay-bot.herokuapp.com"
        );
    }

    #[test]
    fn test_dashboard_url() {
        assert_eq!(
            dashboard_url("alert-relay-bot"),
            "https://dashboard.heroku.com/apps/alert-relay-bot"
        );
    }
}
