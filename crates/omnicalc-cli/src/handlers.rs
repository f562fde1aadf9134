//! Subcommand handlers
//!
//! Each handler writes to a caller-supplied writer so the output can be
//! checked without spawning the binary.

use std::io::{BufRead, Write};
use std::sync::Arc;

use omnicalc::core::HistoryItem;
use omnicalc::solver::{GeminiSolver, Rejection, SmartSolver, SolveOutcome};
use omnicalc::{CalculatorApp, SolverConfig};
use serde_json::json;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::commands::{PressArgs, SolveArgs};
use crate::error::{CliError, CliResult};
use crate::keys::parse_keys;

/// Writes the expression line (when pending) and the display
pub fn render_state<W: Write>(app: &CalculatorApp, out: &mut W) -> CliResult<()> {
    let expression = app.expression();
    if !expression.is_empty() {
        writeln!(out, "{expression}")?;
    }
    writeln!(out, "{}", app.display())?;
    Ok(())
}

/// One history line: `id  expression = result`, tagged when AI-derived
#[must_use]
pub fn history_line(item: &HistoryItem) -> String {
    let tag = if item.is_ai_derived { "  [AI]" } else { "" };
    format!("{}  {}{tag}", item.id, item.display())
}

fn snapshot(app: &CalculatorApp) -> serde_json::Value {
    json!({
        "display": app.display(),
        "expression": app.expression(),
        "history": app.history().collect::<Vec<_>>(),
    })
}

/// `press`: runs a key sequence on a fresh calculator
pub fn run_press<W: Write>(args: &PressArgs, out: &mut W) -> CliResult<()> {
    let events = parse_keys(&args.keys)?;
    debug!(count = events.len(), "pressing keys");

    let mut app = CalculatorApp::new();
    for event in events {
        app.dispatch(event);
    }

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &snapshot(&app))?;
        writeln!(out)?;
        return Ok(());
    }

    render_state(&app, out)?;
    if args.history {
        for item in app.history() {
            writeln!(out, "{}", history_line(item))?;
        }
    }
    Ok(())
}

/// `solve`: one-shot question to the AI solver
pub fn run_solve<W: Write>(args: &SolveArgs, config: &SolverConfig, out: &mut W) -> CliResult<()> {
    let prompt = args.prompt.join(" ");
    let solver = SmartSolver::new(Arc::new(GeminiSolver::from_config(config)?));
    let runtime = Runtime::new()?;

    info!(model = %config.model, "solving");
    match runtime.block_on(solver.submit(&prompt)) {
        SolveOutcome::Solved { response, .. } => {
            if args.json {
                serde_json::to_writer_pretty(&mut *out, &response)?;
                writeln!(out)?;
            } else {
                writeln!(out, "Result: {}", response.result)?;
                writeln!(out, "Explanation: {}", response.explanation)?;
            }
            Ok(())
        }
        SolveOutcome::Failed(err) => Err(err.into()),
        SolveOutcome::Rejected(Rejection::EmptyPrompt) => {
            Err(CliError::invalid_argument("prompt is empty"))
        }
        SolveOutcome::Rejected(Rejection::Busy) => {
            Err(CliError::invalid_argument("solver is busy"))
        }
    }
}

const REPL_HELP: &str = "\
Keys:      digits . + - * / = Enter Escape Backspace AC neg % mod (e.g. 12+3=)
Commands:  :solve <question>   ask the AI solver
           :history            list past calculations
           :recall <id|#n>     load a past result (#1 = newest)
           :clear-history      forget all calculations
           :help               this text
           :quit               leave";

/// Interactive session state
#[derive(Debug)]
pub struct Session {
    app: CalculatorApp,
    solver: Option<(SmartSolver, Runtime)>,
    unavailable: String,
}

impl Session {
    /// Session without the AI solver; `reason` is shown on `:solve`
    #[must_use]
    pub fn offline(reason: impl Into<String>) -> Self {
        Self {
            app: CalculatorApp::new(),
            solver: None,
            unavailable: reason.into(),
        }
    }

    /// Session with the AI solver
    pub fn with_solver(solver: SmartSolver) -> CliResult<Self> {
        Ok(Self {
            app: CalculatorApp::new(),
            solver: Some((solver, Runtime::new()?)),
            unavailable: String::new(),
        })
    }

    /// Session for a configuration; falls back to offline without an API key
    pub fn from_config(config: &SolverConfig) -> CliResult<Self> {
        match GeminiSolver::from_config(config) {
            Ok(adapter) => Self::with_solver(SmartSolver::new(Arc::new(adapter))),
            Err(err) => Ok(Self::offline(err.to_string())),
        }
    }

    /// The calculator
    #[must_use]
    pub const fn app(&self) -> &CalculatorApp {
        &self.app
    }

    /// Handles one input line; returns false when the session should end
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> CliResult<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }

        let Some(command) = line.strip_prefix(':') else {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match parse_keys(&tokens) {
                Ok(events) => {
                    for event in events {
                        self.app.dispatch(event);
                    }
                    render_state(&self.app, out)?;
                }
                Err(err) => writeln!(out, "error: {err}")?,
            }
            return Ok(true);
        };

        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(n, r)| (n, r.trim()));

        match name {
            "q" | "quit" | "exit" => return Ok(false),
            "help" | "h" => writeln!(out, "{REPL_HELP}")?,
            "history" => self.print_history(out)?,
            "clear-history" => {
                self.app.clear_history();
                writeln!(out, "history cleared")?;
            }
            "recall" => self.recall(rest, out)?,
            "solve" => self.solve(rest, out)?,
            other => writeln!(out, "unknown command ':{other}' (try :help)")?,
        }
        Ok(true)
    }

    fn print_history<W: Write>(&self, out: &mut W) -> CliResult<()> {
        let mut empty = true;
        for (n, item) in self.app.history().enumerate() {
            writeln!(out, "#{}  {}", n + 1, history_line(item))?;
            empty = false;
        }
        if empty {
            writeln!(out, "(no history)")?;
        }
        Ok(())
    }

    fn recall<W: Write>(&mut self, target: &str, out: &mut W) -> CliResult<()> {
        let id = match target.strip_prefix('#') {
            Some(n) => n
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| self.app.state().history().get(i))
                .map(|item| item.id.clone()),
            None => Some(target.to_string()),
        };

        match id {
            Some(id) if self.app.select_history(&id) => render_state(&self.app, out),
            _ => {
                writeln!(out, "no history entry '{target}'")?;
                Ok(())
            }
        }
    }

    fn solve<W: Write>(&mut self, prompt: &str, out: &mut W) -> CliResult<()> {
        let Some((solver, runtime)) = &self.solver else {
            writeln!(out, "solver unavailable: {}", self.unavailable)?;
            return Ok(());
        };
        if prompt.is_empty() {
            writeln!(out, "usage: :solve <question>")?;
            return Ok(());
        }

        if runtime.block_on(self.app.solve(solver, prompt)) {
            render_state(&self.app, out)?;
            if let Some(explanation) = self.app.explanation() {
                writeln!(out, "  {explanation}")?;
            }
        } else if let Some(message) = self.app.solver_error() {
            writeln!(out, "{message}")?;
        }
        Ok(())
    }

    /// Reads lines until EOF or `:quit`
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W, show_prompt: bool) -> CliResult<()> {
        if show_prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        for line in input.lines() {
            if !self.handle_line(&line?, out)? {
                break;
            }
            if show_prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
        }
        Ok(())
    }
}
