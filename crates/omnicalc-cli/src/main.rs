//! OmniCalc CLI
//!
//! Usage:
//!   omnicalc press 12+3=            Run a key sequence
//!   omnicalc press --json 9 - 4 =   Final state as JSON
//!   omnicalc solve what is 15% of 80
//!   omnicalc repl                   Interactive session

use clap::Parser;
use omnicalc_cli::{
    logging, resolve_config, run_press, run_solve, Cli, CliResult, Commands, Session,
};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Press(args) => run_press(&args, &mut out)?,
        Commands::Solve(args) => {
            let config = resolve_config(cli.config.as_deref(), &cli.solver)?;
            run_solve(&args, &config, &mut out)?;
        }
        Commands::Repl(args) => {
            let config = resolve_config(cli.config.as_deref(), &cli.solver)?;
            let mut session = Session::from_config(&config)?;
            session.run(io::stdin().lock(), &mut out, !args.no_prompt)?;
        }
    }
    out.flush()?;
    Ok(())
}
