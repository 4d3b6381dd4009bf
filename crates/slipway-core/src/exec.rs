//! External command execution.
//!
//! Every remote interaction in the deploy flow goes through a subprocess
//! (the git CLI or the platform CLI). `CommandRunner` is the single seam:
//! production code uses [`SystemRunner`], tests substitute a scripted
//! implementation and drive the whole workflow without spawning anything.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context;

/// Captured result of one external command invocation.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Process exit code, if the process exited normally
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
}

impl ExecOutput {
    /// Successful invocation with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed invocation with the given exit code and stderr.
    pub fn fail(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// First non-empty line of stdout, trimmed. Used to echo tool versions
    /// and identities back to the operator.
    pub fn first_line(&self) -> &str {
        self.stdout
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("")
            .trim()
    }
}

/// Runs external commands on behalf of the deploy flow.
pub trait CommandRunner {
    /// Run a command to completion with captured stdout/stderr.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> anyhow::Result<ExecOutput>;

    /// Run a command with inherited stdio.
    ///
    /// Used for subprocesses that interact with the operator themselves,
    /// such as the platform's browser-based login flow. stdout/stderr in
    /// the returned output are empty.
    fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> anyhow::Result<ExecOutput>;
}

/// `CommandRunner` backed by `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> anyhow::Result<ExecOutput> {
        tracing::debug!(program, ?args, "running external command");
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .with_context(|| format!("Failed to invoke {program}"))?;

        Ok(ExecOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> anyhow::Result<ExecOutput> {
        tracing::debug!(program, ?args, "running interactive command");
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("Failed to invoke {program}"))?;

        Ok(ExecOutput {
            code: status.code(),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_output_is_success() {
        let output = ExecOutput::ok("hello\n");
        assert!(output.success());
        assert_eq!(output.stdout, "hello\n");
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_fail_output_is_not_success() {
        let output = ExecOutput::fail(1, "boom");
        assert!(!output.success());
        assert_eq!(output.code, Some(1));
        assert_eq!(output.stderr, "boom");
    }

    #[test]
    fn test_missing_code_is_not_success() {
        let output = ExecOutput {
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(!output.success());
    }

    #[test]
    fn test_first_line_skips_blanks() {
        let output = ExecOutput::ok("\n\n  git version 2.39.2  \nextra\n");
        assert_eq!(output.first_line(), "git version 2.39.2");
    }

    #[test]
    fn test_first_line_of_empty_output() {
        let output = ExecOutput::ok("");
        assert_eq!(output.first_line(), "");
    }

    #[test]
    fn test_system_runner_captures_output() {
        let Some(dir) = std::env::current_dir().ok() else {
            return;
        };
        let runner = SystemRunner;
        // `true` may be absent on exotic systems; skip rather than fail.
        let Ok(output) = runner.run("true", &[], &dir) else {
            return;
        };
        assert!(output.success());
    }
}
