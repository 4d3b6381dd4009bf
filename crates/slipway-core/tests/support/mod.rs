//! Scripted command runner for driving deploy flows without subprocesses.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;

use slipway_core::exec::{CommandRunner, ExecOutput};

/// `CommandRunner` that records every invocation and replays scripted
/// responses. Commands without a scripted response succeed with empty
/// output.
#[derive(Default)]
pub struct FakeRunner {
    responses: RefCell<HashMap<String, VecDeque<ExecOutput>>>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the given rendered command line.
    pub fn respond(&self, command: &str, output: ExecOutput) {
        self.responses
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(output);
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// How often the exact command line was run.
    pub fn call_count(&self, command: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.as_str() == command)
            .count()
    }

    fn dispatch(&self, program: &str, args: &[&str]) -> ExecOutput {
        let command = render(program, args);
        self.calls.borrow_mut().push(command.clone());
        self.responses
            .borrow_mut()
            .get_mut(&command)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| ExecOutput::ok(""))
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str], _cwd: &Path) -> anyhow::Result<ExecOutput> {
        Ok(self.dispatch(program, args))
    }

    fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        _cwd: &Path,
    ) -> anyhow::Result<ExecOutput> {
        Ok(self.dispatch(program, args))
    }
}

fn render(program: &str, args: &[&str]) -> String {
    let mut command = program.to_string();
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}
