use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use xeno::{Cli, Output};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = Output::new(cli.verbose, cli.quiet);
    match cli.run(&output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `XENO_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("XENO_LOG").unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
