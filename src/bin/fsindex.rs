//! fsindex CLI Binary

use anyhow::Context;
use clap::Parser;
use fsindex::error::{ApiError, ErrorClass};
use fsindex::logging::init_logging;
use fsindex::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = CliContext::load_config(&cli.workspace, cli.config.as_deref())
        .context("Error loading configuration")?;

    let logging = cli.logging_config(config.logging.clone());
    if let Err(e) = init_logging(Some(&logging), Some(&cli.workspace)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let context = CliContext::with_config(cli.workspace.clone(), config)
        .context("Error initializing workspace")?;
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            // Server-side faults get their own exit status so scripts can alert on them.
            let code = match e.downcast_ref::<ApiError>().map(ApiError::class) {
                Some(ErrorClass::ServerFault) => 2,
                _ => 1,
            };
            process::exit(code);
        }
    }
}
