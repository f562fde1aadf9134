//! OmniCalc CLI Library
//!
//! Command-line front end for the OmniCalc calculator: one-shot key
//! sequences, AI solver questions and an interactive session.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod keys;
pub mod logging;

pub use commands::{Cli, Commands, PressArgs, ReplArgs, SolveArgs, SolverArgs};
pub use config::{load_config_file, parse_config, resolve_config};
pub use error::{CliError, CliResult};
pub use handlers::{history_line, render_state, run_press, run_solve, Session};
pub use keys::{parse_keys, parse_token};
