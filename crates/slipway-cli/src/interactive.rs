//! Console prompts and summary output for the deploy workflow.
//!
//! Uses dialoguer for terminal prompts and console styling for the banner
//! and final summary. Everything the workflow itself prints goes through
//! its own writer; this module only owns the frame around it.

use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use slipway_core::error::DeployError;
use slipway_core::platform;
use slipway_core::prompt::Prompter;
use slipway_core::report::DeployReport;

/// Dialoguer-backed prompter.
///
/// A prompt read fails when the operator abandons the session (interrupt
/// or closed stdin); both map to cancellation.
#[derive(Default)]
pub struct ConsolePrompter {
    theme: ColorfulTheme,
}

impl ConsolePrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for ConsolePrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, DeployError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|_| DeployError::Cancelled)
    }

    fn input(&mut self, prompt: &str) -> Result<String, DeployError> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_text()
            .map_err(|_| DeployError::Cancelled)
    }
}

/// Banner shown before the first step.
pub fn print_banner() {
    println!();
    println!("{}", style("  Slipway · guided bot deployment").bold().cyan());
}

/// Final summary with operational next steps.
pub fn print_success(report: &DeployReport, platform_bin: &str) {
    println!();
    println!("{}", style("  Deploy complete").bold().green());
    println!("  ───────────────────────────");
    println!("  App:  {}", style(&report.app_name).green());
    println!("  URL:  {}", style(&report.app_url).green());

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        println!();
        for warning in warnings {
            println!("  {} {}", style("⚠").yellow(), warning);
        }
    }

    let app = &report.app_name;
    println!();
    println!("Next steps:");
    println!("  1. Scan the pairing QR code from the logs (it expires quickly):");
    println!("       {platform_bin} logs --tail -a {app}");
    println!("  2. Message the bot to check it responds:");
    println!("       !menu   show commands");
    println!("       !test   verify the bot is alive");
    println!("       !start  subscribe to alerts");
    println!("  3. Monitor and restart when needed:");
    println!("       {platform_bin} logs --tail -a {app}");
    println!("       {platform_bin} dyno:restart -a {app}");
    println!();
    println!("Dashboard: {}", platform::dashboard_url(app));
}
