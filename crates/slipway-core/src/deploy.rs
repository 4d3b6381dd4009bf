//! Sequential provisioning runner.
//!
//! Walks a fixed, ordered list of steps that take a messaging bot from a
//! bare working directory to a running app on the remote platform. Control
//! flow is strictly linear: the first fatal failure stops the run, warned
//! outcomes are reported and skipped over.

use std::io::{self, Write};

use anyhow::Context;

use crate::classify;
use crate::context::{DeployContext, DeployState};
use crate::error::DeployError;
use crate::exec::CommandRunner;
use crate::git::{self, FALLBACK_BRANCH, GitWorkspace, PRIMARY_BRANCH};
use crate::platform::{CONTAINER_STACK, PlatformClient};
use crate::prompt::Prompter;
use crate::report::{DeployReport, StepRecord};
use crate::validate::{validate_app_name, validate_contact_number};

/// Commit message used when the working tree has pending changes.
pub const DEPLOY_COMMIT_MESSAGE: &str = "Prepare release for platform deployment";

/// Configuration key receiving the operator contact number.
pub const CONTACT_CONFIG_KEY: &str = "ADMIN_NUMBER";

/// Fixed runtime-mode flag pushed alongside the contact number.
pub const RUNTIME_MODE_KEY: &str = "NODE_ENV";
pub const RUNTIME_MODE_VALUE: &str = "production";

/// Non-fatal result of one step.
///
/// Fatal failures are not a variant: steps return them as errors
/// ([`DeployError`] or an unexpected `anyhow::Error`), which stops the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// The step finished but something worth telling the operator happened.
    Warned(String),
}

/// Options for one deploy run.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Application name, skipping the naming prompt
    pub app: Option<String>,
    /// Operator contact number, skipping the contact prompt (still validated)
    pub contact_number: Option<String>,
    /// Accept the suggested application name without asking
    pub accept_defaults: bool,
    /// Log lines shown after deploy, overriding the context default
    pub log_lines: Option<u32>,
}

impl DeployOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn with_contact_number(mut self, number: impl Into<String>) -> Self {
        self.contact_number = Some(number.into());
        self
    }

    pub fn with_accept_defaults(mut self, accept: bool) -> Self {
        self.accept_defaults = accept;
        self
    }

    pub fn with_log_lines(mut self, lines: u32) -> Self {
        self.log_lines = Some(lines);
        self
    }
}

/// The ordered steps of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    Requirements,
    SourceControl,
    Authentication,
    AppName,
    ContactNumber,
    Configuration,
    Stack,
    Push,
    Logs,
}

impl StepKind {
    const ALL: [StepKind; 9] = [
        StepKind::Requirements,
        StepKind::SourceControl,
        StepKind::Authentication,
        StepKind::AppName,
        StepKind::ContactNumber,
        StepKind::Configuration,
        StepKind::Stack,
        StepKind::Push,
        StepKind::Logs,
    ];

    fn title(self) -> &'static str {
        match self {
            StepKind::Requirements => "Check requirements",
            StepKind::SourceControl => "Prepare git repository",
            StepKind::Authentication => "Verify platform login",
            StepKind::AppName => "Select application name",
            StepKind::ContactNumber => "Collect operator contact",
            StepKind::Configuration => "Push configuration",
            StepKind::Stack => "Select runtime stack",
            StepKind::Push => "Deploy code",
            StepKind::Logs => "Show recent logs",
        }
    }
}

/// Deploy command orchestrator.
///
/// Holds the injected capabilities (command runner, prompter, progress
/// writer) for one run; all step state flows through explicit
/// [`DeployState`].
pub struct DeployCommand<'a, R: CommandRunner, P: Prompter, W: Write = io::Stdout> {
    ctx: &'a DeployContext,
    runner: &'a R,
    prompter: &'a mut P,
    out: W,
}

impl<'a, R: CommandRunner, P: Prompter> DeployCommand<'a, R, P> {
    /// Deploy command writing progress to stdout.
    pub fn new(ctx: &'a DeployContext, runner: &'a R, prompter: &'a mut P) -> Self {
        Self {
            ctx,
            runner,
            prompter,
            out: io::stdout(),
        }
    }
}

impl<'a, R: CommandRunner, P: Prompter, W: Write> DeployCommand<'a, R, P, W> {
    /// Deploy command with a custom progress writer.
    pub fn with_writer(
        ctx: &'a DeployContext,
        runner: &'a R,
        prompter: &'a mut P,
        out: W,
    ) -> Self {
        Self {
            ctx,
            runner,
            prompter,
            out,
        }
    }

    /// Run the full workflow, stopping at the first fatal failure.
    pub fn execute(&mut self, options: &DeployOptions) -> anyhow::Result<DeployReport> {
        let initial_name = options
            .app
            .clone()
            .unwrap_or_else(|| self.ctx.default_app_name().to_string());
        let mut state = DeployState::new(initial_name);
        let mut records = Vec::with_capacity(StepKind::ALL.len());

        for kind in StepKind::ALL {
            writeln!(self.out)?;
            writeln!(self.out, "▶ {}", kind.title())?;
            let outcome = self
                .run_step(kind, options, &mut state)
                .with_context(|| format!("step '{}' failed", kind.title()))?;
            match outcome {
                StepOutcome::Completed => records.push(StepRecord::completed(kind.title())),
                StepOutcome::Warned(note) => {
                    writeln!(self.out, "⚠ {note}")?;
                    records.push(StepRecord::warned(kind.title(), note));
                }
            }
        }

        Ok(DeployReport::new(&state, records))
    }

    fn run_step(
        &mut self,
        kind: StepKind,
        options: &DeployOptions,
        state: &mut DeployState,
    ) -> anyhow::Result<StepOutcome> {
        match kind {
            StepKind::Requirements => self.check_requirements(),
            StepKind::SourceControl => self.setup_source_control(),
            StepKind::Authentication => self.check_authentication(),
            StepKind::AppName => self.select_app_name(options, state),
            StepKind::ContactNumber => self.collect_contact_number(options, state),
            StepKind::Configuration => self.push_configuration(state),
            StepKind::Stack => self.select_stack(state),
            StepKind::Push => self.push_code(state),
            StepKind::Logs => self.show_logs(options, state),
        }
    }

    fn git(&self) -> GitWorkspace<'a, R> {
        GitWorkspace::new(self.runner, self.ctx.git_bin(), self.ctx.project_dir())
    }

    fn platform(&self) -> PlatformClient<'a, R> {
        PlatformClient::new(self.runner, self.ctx.platform_bin(), self.ctx.project_dir())
    }

    /// Probe both external tools. Either one being unreachable is fatal.
    fn check_requirements(&mut self) -> anyhow::Result<StepOutcome> {
        match self.git().version() {
            Ok(output) if output.success() => {
                writeln!(self.out, "✓ {}", output.first_line())?;
                if let Some(version) = git::parse_git_version(&output.stdout)
                    && version < git::minimum_git_version()
                {
                    anyhow::bail!(
                        "git {version} is too old; {} or newer is required",
                        git::minimum_git_version()
                    );
                }
            }
            _ => {
                return Err(DeployError::MissingTool {
                    tool: self.ctx.git_bin().to_string(),
                }
                .into());
            }
        }

        match self.platform().version() {
            Ok(output) if output.success() => {
                writeln!(self.out, "✓ {}", output.first_line())?;
            }
            _ => {
                return Err(DeployError::MissingTool {
                    tool: self.ctx.platform_bin().to_string(),
                }
                .into());
            }
        }

        Ok(StepOutcome::Completed)
    }

    /// Initialize the repository when needed, stage everything, and commit
    /// only when the porcelain status reports pending changes. Safe to
    /// re-run on an already-initialized, unchanged tree.
    fn setup_source_control(&mut self) -> anyhow::Result<StepOutcome> {
        let git = self.git();
        if git.is_initialized() {
            writeln!(self.out, "Repository already initialized")?;
        } else {
            writeln!(self.out, "Initializing repository")?;
            let init = git.init()?;
            if !init.success() {
                return Err(remote_failure("repository setup", &init.stderr).into());
            }
            git.set_identity(self.ctx.author_name(), self.ctx.author_email())?;
        }

        let staged = git.stage_all()?;
        if !staged.success() {
            return Err(remote_failure("repository setup", &staged.stderr).into());
        }

        if git.has_pending_changes()? {
            writeln!(self.out, "Committing pending changes")?;
            let commit = git.commit(DEPLOY_COMMIT_MESSAGE)?;
            if !commit.success() {
                return Err(remote_failure("repository setup", &commit.stderr).into());
            }
        } else {
            writeln!(self.out, "Nothing to commit")?;
        }

        Ok(StepOutcome::Completed)
    }

    /// Check the authenticated identity; fall back to the platform's own
    /// interactive login flow when the session is invalid.
    fn check_authentication(&mut self) -> anyhow::Result<StepOutcome> {
        let platform = self.platform();
        let who = platform.whoami()?;
        if who.success() {
            writeln!(self.out, "Logged in as {}", who.first_line())?;
            return Ok(StepOutcome::Completed);
        }

        writeln!(self.out, "Not logged in; starting browser login")?;
        let login = platform.login()?;
        if login.success() {
            Ok(StepOutcome::Completed)
        } else {
            Err(remote_failure("platform login", &login.stderr).into())
        }
    }

    /// Derive the app name from an existing platform remote, or settle on a
    /// name with the operator and create (or link) the app.
    fn select_app_name(
        &mut self,
        options: &DeployOptions,
        state: &mut DeployState,
    ) -> anyhow::Result<StepOutcome> {
        if let Some(url) = self.git().remote_url(self.ctx.remote_name())?
            && let Some(name) = git::app_name_from_remote_url(&url)
        {
            writeln!(self.out, "Using existing app '{name}'")?;
            state.app_name = name;
            return Ok(StepOutcome::Completed);
        }

        if options.app.is_none() {
            writeln!(self.out, "Suggested name: {}", state.app_name)?;
            let accept = options.accept_defaults || self.prompter.confirm("Use this name?", true)?;
            if !accept {
                state.app_name = self.prompter.input("Application name")?.trim().to_string();
            }
        }
        validate_app_name(&state.app_name)?;

        writeln!(self.out, "Creating app '{}'", state.app_name)?;
        let created = self.platform().create_app(&state.app_name)?;
        if created.success() {
            writeln!(self.out, "✓ App '{}' created", state.app_name)?;
            return Ok(StepOutcome::Completed);
        }

        if classify::name_taken(&created.stderr) {
            writeln!(self.out, "Name already taken; linking the existing app")?;
            let linked = self.platform().link_remote(&state.app_name)?;
            if linked.success() {
                return Ok(StepOutcome::Completed);
            }
            return Err(remote_failure("app linking", &linked.stderr).into());
        }

        Err(remote_failure("app creation", &created.stderr).into())
    }

    /// Collect and validate the operator contact number. Validation failure
    /// is fatal and happens before any remote configuration call.
    fn collect_contact_number(
        &mut self,
        options: &DeployOptions,
        state: &mut DeployState,
    ) -> anyhow::Result<StepOutcome> {
        let raw = match &options.contact_number {
            Some(number) => number.clone(),
            None => {
                writeln!(self.out, "Digits only, country code first (e.g. 525512345678)")?;
                self.prompter.input("Operator contact number")?
            }
        };
        state.contact_number = validate_contact_number(&raw)?;
        writeln!(self.out, "✓ Contact number set: {}", state.contact_number)?;
        Ok(StepOutcome::Completed)
    }

    /// Push both configuration entries, then display the result. Only the
    /// display is allowed to fail without stopping the run.
    fn push_configuration(&mut self, state: &DeployState) -> anyhow::Result<StepOutcome> {
        let platform = self.platform();

        writeln!(self.out, "Setting {CONTACT_CONFIG_KEY}")?;
        let set = platform.set_config(&state.app_name, CONTACT_CONFIG_KEY, &state.contact_number)?;
        if !set.success() {
            return Err(remote_failure("configuration", &set.stderr).into());
        }

        writeln!(self.out, "Setting {RUNTIME_MODE_KEY}={RUNTIME_MODE_VALUE}")?;
        let set = platform.set_config(&state.app_name, RUNTIME_MODE_KEY, RUNTIME_MODE_VALUE)?;
        if !set.success() {
            return Err(remote_failure("configuration", &set.stderr).into());
        }

        let shown = platform.show_config(&state.app_name)?;
        if shown.success() {
            writeln!(self.out, "Current configuration:")?;
            write!(self.out, "{}", shown.stdout)?;
            Ok(StepOutcome::Completed)
        } else {
            Ok(StepOutcome::Warned(format!(
                "could not display configuration: {}",
                shown.stderr.trim()
            )))
        }
    }

    /// Request the container stack. This step never halts the run: a
    /// failure mentioning an error becomes a warning, anything else is
    /// treated as the stack already being in place.
    fn select_stack(&mut self, state: &DeployState) -> anyhow::Result<StepOutcome> {
        let result = self.platform().set_stack(&state.app_name, CONTAINER_STACK)?;
        if !result.success() && classify::mentions_error(&result.stderr) {
            return Ok(StepOutcome::Warned(format!(
                "stack selection: {}",
                result.stderr.trim()
            )));
        }
        writeln!(self.out, "✓ Runtime stack set to '{CONTAINER_STACK}'")?;
        Ok(StepOutcome::Completed)
    }

    /// Push the committed code. A missing primary ref gets exactly one
    /// retry against the fallback branch name.
    fn push_code(&mut self, state: &DeployState) -> anyhow::Result<StepOutcome> {
        let git = self.git();
        let remote = self.ctx.remote_name();
        writeln!(
            self.out,
            "Pushing to {remote}/{PRIMARY_BRANCH} (builds can take several minutes)"
        )?;
        let push = git.push(remote, PRIMARY_BRANCH)?;
        if push.success() {
            writeln!(self.out, "✓ Code deployed")?;
            return Ok(StepOutcome::Completed);
        }

        if classify::missing_ref(&push.stderr) {
            writeln!(
                self.out,
                "No {PRIMARY_BRANCH} ref; retrying with {FALLBACK_BRANCH}"
            )?;
            let retry = git.push(remote, FALLBACK_BRANCH)?;
            if retry.success() {
                writeln!(self.out, "✓ Code deployed")?;
                return Ok(StepOutcome::Completed);
            }
            return Err(remote_failure("deploy", &retry.stderr).into());
        }

        Err(remote_failure("deploy", &push.stderr).into())
    }

    /// Show a bounded tail of the app's logs. Never fatal.
    fn show_logs(
        &mut self,
        options: &DeployOptions,
        state: &DeployState,
    ) -> anyhow::Result<StepOutcome> {
        let lines = options.log_lines.unwrap_or(self.ctx.log_lines());
        writeln!(self.out, "Last {lines} log lines:")?;
        let logs = self.platform().logs(&state.app_name, lines)?;
        if logs.success() {
            write!(self.out, "{}", logs.stdout)?;
            Ok(StepOutcome::Completed)
        } else {
            Ok(StepOutcome::Warned(format!(
                "could not fetch logs: {}",
                logs.stderr.trim()
            )))
        }
    }
}

fn remote_failure(step: &'static str, stderr: &str) -> DeployError {
    let detail = stderr.trim();
    let detail = if detail.is_empty() {
        "external tool reported failure".to_string()
    } else {
        detail.to_string()
    };
    DeployError::Remote { step, detail }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_failure_keeps_stderr_detail() {
        let err = remote_failure("deploy", "  push rejected \n");
        assert_eq!(err.to_string(), "deploy failed: push rejected");
    }

    #[test]
    fn test_remote_failure_with_silent_tool() {
        let err = remote_failure("deploy", "   ");
        assert_eq!(
            err.to_string(),
            "deploy failed: external tool reported failure"
        );
    }

    #[test]
    fn test_options_builder() {
        let options = DeployOptions::new()
            .with_app("my-bot")
            .with_contact_number("5215512345678")
            .with_accept_defaults(true)
            .with_log_lines(50);
        assert_eq!(options.app.as_deref(), Some("my-bot"));
        assert_eq!(options.contact_number.as_deref(), Some("5215512345678"));
        assert!(options.accept_defaults);
        assert_eq!(options.log_lines, Some(50));
    }
}
