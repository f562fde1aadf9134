//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// OmniCalc: a calculator with history and an AI solver
#[derive(Parser, Debug)]
#[command(name = "omnicalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Solver configuration file (YAML)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Solver overrides
    #[command(flatten)]
    pub solver: SolverArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override the solver configuration
#[derive(Args, Debug, Clone, Default)]
pub struct SolverArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// API base URL
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a key sequence and print the display
    ///
    /// Keys are keyboard names (`7`, `.`, `+`, `-`, `*`, `/`, `=`, `Enter`,
    /// `Escape`, `Backspace`) plus `AC`, `neg`, `%` (percent) and `mod`.
    /// Runs of plain characters may be joined: `12+3=`. Flags go before
    /// the keys.
    Press(PressArgs),

    /// Ask the AI solver a question
    Solve(SolveArgs),

    /// Interactive session reading keys and commands from stdin
    Repl(ReplArgs),
}

/// Arguments for the press command
#[derive(Args, Debug)]
pub struct PressArgs {
    /// Keys to press, in order
    #[arg(required = true, allow_hyphen_values = true, num_args = 1..)]
    pub keys: Vec<String>,

    /// Also print the history, newest first
    #[arg(long)]
    pub history: bool,

    /// Print the final state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the solve command
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// The question, e.g. "what is 20% of 85.5"
    #[arg(required = true, num_args = 1..)]
    pub prompt: Vec<String>,

    /// Print the answer as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the repl command
#[derive(Args, Debug)]
pub struct ReplArgs {
    /// Do not print the prompt marker
    #[arg(long)]
    pub no_prompt: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_press_with_hyphen_keys() {
        let cli = Cli::try_parse_from(["omnicalc", "press", "9", "-", "4", "="]).unwrap();
        match cli.command {
            Commands::Press(args) => assert_eq!(args.keys, vec!["9", "-", "4", "="]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "omnicalc",
            "-vv",
            "--log-json",
            "--model",
            "gemini-x",
            "solve",
            "two",
            "plus",
            "two",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        assert_eq!(cli.solver.model.as_deref(), Some("gemini-x"));
        match cli.command {
            Commands::Solve(args) => assert_eq!(args.prompt.join(" "), "two plus two"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_press_flags_before_keys() {
        let cli =
            Cli::try_parse_from(["omnicalc", "press", "--json", "--history", "9", "-", "4", "="])
                .unwrap();
        match cli.command {
            Commands::Press(args) => {
                assert!(args.json);
                assert!(args.history);
                assert_eq!(args.keys, vec!["9", "-", "4", "="]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_press_trailing_flag_is_a_key() {
        let cli = Cli::try_parse_from(["omnicalc", "press", "9", "-", "4", "=", "--json"]).unwrap();
        match cli.command {
            Commands::Press(args) => {
                assert!(!args.json);
                assert_eq!(args.keys.last().map(String::as_str), Some("--json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_press_requires_keys() {
        assert!(Cli::try_parse_from(["omnicalc", "press"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["omnicalc"]).is_err());
    }
}
