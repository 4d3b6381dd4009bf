//! Slipway - guided bot deployment
//!
//! Usage:
//!   slipway deploy              # run the full deploy workflow
//!   slipway deploy -y -o json   # accept defaults, print a JSON report
//!   slipway logs --lines 50     # fetch recent logs for the deployed app

mod interactive;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slipway_core::context::DeployContext;
use slipway_core::deploy::{DeployCommand, DeployOptions};
use slipway_core::error::DeployError;
use slipway_core::exec::SystemRunner;
use slipway_core::git::{self, GitWorkspace};
use slipway_core::platform::PlatformClient;

use crate::interactive::ConsolePrompter;

#[derive(Parser)]
#[command(name = "slipway")]
#[command(about = "Guided bot deployment to the hosting platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full deploy workflow
    Deploy {
        /// Application name on the platform (skips the naming prompt)
        #[arg(long)]
        app: Option<String>,

        /// Operator contact number pushed as ADMIN_NUMBER (still validated)
        #[arg(long, value_name = "DIGITS")]
        contact_number: Option<String>,

        /// Accept the suggested application name without prompting
        #[arg(short = 'y', long)]
        yes: bool,

        /// Log lines shown after deploy
        #[arg(long, value_name = "N")]
        lines: Option<u32>,

        /// Output format for the final report
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// Fetch recent logs for the deployed app
    Logs {
        /// Application name (derived from the platform remote when omitted)
        #[arg(long)]
        app: Option<String>,

        /// Number of log lines to fetch
        #[arg(long, default_value_t = 30)]
        lines: u32,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable summary
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slipway=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        if matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::Cancelled)
        ) {
            eprintln!("\n⚠ Deployment cancelled");
        } else {
            eprintln!("\n✗ {err:#}");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            app,
            contact_number,
            yes,
            lines,
            format,
        } => run_deploy(app, contact_number, yes, lines, format),
        Commands::Logs { app, lines } => run_logs(app, lines),
    }
}

fn run_deploy(
    app: Option<String>,
    contact_number: Option<String>,
    yes: bool,
    lines: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let ctx = DeployContext::with_defaults()?;
    tracing::debug!(project_dir = %ctx.project_dir().display(), "loaded deploy context");
    let runner = SystemRunner;
    let mut prompter = ConsolePrompter::new();

    interactive::print_banner();

    let mut options = DeployOptions::new().with_accept_defaults(yes);
    if let Some(app) = app {
        options = options.with_app(app);
    }
    if let Some(number) = contact_number {
        options = options.with_contact_number(number);
    }
    if let Some(lines) = lines {
        options = options.with_log_lines(lines);
    }

    let mut command = DeployCommand::new(&ctx, &runner, &mut prompter);
    let report = command.execute(&options)?;

    match format {
        OutputFormat::Table => interactive::print_success(&report, ctx.platform_bin()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_logs(app: Option<String>, lines: u32) -> Result<()> {
    let ctx = DeployContext::with_defaults()?;
    let runner = SystemRunner;

    let app = match app {
        Some(app) => app,
        None => {
            let git = GitWorkspace::new(&runner, ctx.git_bin(), ctx.project_dir());
            git.remote_url(ctx.remote_name())?
                .and_then(|url| git::app_name_from_remote_url(&url))
                .context("No platform remote configured; pass --app <name>")?
        }
    };

    let platform = PlatformClient::new(&runner, ctx.platform_bin(), ctx.project_dir());
    let logs = platform.logs(&app, lines)?;
    if !logs.success() {
        anyhow::bail!("could not fetch logs for '{}': {}", app, logs.stderr.trim());
    }
    print!("{}", logs.stdout);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn deploy_parses_without_options() {
        let cli = Cli::try_parse_from(["slipway", "deploy"]).unwrap();
        assert!(matches!(cli.command, super::Commands::Deploy { .. }));
    }

    #[test]
    fn deploy_with_all_options_parses() {
        let args = [
            "slipway",
            "deploy",
            "--app",
            "my-bot",
            "--contact-number",
            "5215512345678",
            "-y",
            "--lines",
            "50",
            "-o",
            "json",
        ];

        let cli = Cli::try_parse_from(args).unwrap();
        let super::Commands::Deploy {
            app,
            contact_number,
            yes,
            lines,
            ..
        } = cli.command
        else {
            panic!("expected deploy subcommand");
        };
        assert_eq!(app.as_deref(), Some("my-bot"));
        assert_eq!(contact_number.as_deref(), Some("5215512345678"));
        assert!(yes);
        assert_eq!(lines, Some(50));
    }

    #[test]
    fn logs_parses_with_defaults() {
        let cli = Cli::try_parse_from(["slipway", "logs"]).unwrap();
        let super::Commands::Logs { app, lines } = cli.command else {
            panic!("expected logs subcommand");
        };
        assert!(app.is_none());
        assert_eq!(lines, 30);
    }

    #[test]
    fn logs_with_app_and_lines_parses() {
        let cli =
            Cli::try_parse_from(["slipway", "logs", "--app", "my-bot", "--lines", "100"]).unwrap();
        let super::Commands::Logs { app, lines } = cli.command else {
            panic!("expected logs subcommand");
        };
        assert_eq!(app.as_deref(), Some("my-bot"));
        assert_eq!(lines, 100);
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["slipway"]).is_err());
    }

    #[test]
    fn invalid_format_is_an_error() {
        assert!(Cli::try_parse_from(["slipway", "deploy", "-o", "yaml"]).is_err());
    }
}
