//! Ember CLI: REPL and file-mode driver on top of `ember-compiler` +
//! `ember-runtime`.

mod error;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ember_runtime::Config;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, IoError};

#[derive(Parser)]
#[command(name = "ember")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bytecode interpreter for the Ember language", long_about = None)]
struct Cli {
    /// Source file to run. Omit to start the REPL.
    paths: Vec<PathBuf>,

    /// Trace each instruction and the value stack as it executes.
    #[arg(long)]
    trace: bool,

    /// Raise the log level from `warn` to `info` (repeat for `debug`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.paths.len() > 1 {
        eprintln!("Usage: ember [path]");
        return ExitCode::from(64);
    }

    let config = Config {
        trace_execution: cli.trace || std::env::var("EMBER_TRACE").as_deref() == Ok("1"),
        print_code: cli.trace,
    };

    let result = match cli.paths.first() {
        Some(path) => run_file(path, &config),
        None => run_repl(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "ember=warn",
        1 => "ember=info",
        _ => "ember=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_directive.parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();
}

fn run_file(path: &PathBuf, config: &Config) -> Result<(), CliError> {
    let source = std::fs::read_to_string(path).map_err(|source| IoError {
        path: path.clone(),
        source,
    })?;
    ember_runtime::interpret(&source, config, &mut io::stdout())?;
    Ok(())
}

fn run_repl(config: &Config) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut line = String::new();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush().ok();

        line.clear();
        let bytes_read = stdin.read_line(&mut line).unwrap_or(0);
        if bytes_read == 0 || line.trim_end().is_empty() {
            return Ok(());
        }

        if let Err(e) = ember_runtime::interpret(&line, config, &mut stdout) {
            eprintln!("{e}");
        }
    }
}
