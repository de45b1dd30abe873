mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let envelope = commands::run(&cli).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    let warning_count = envelope.meta.warnings.len();
    let error_count = envelope.errors.len();

    if cli.strict && warning_count + error_count > 0 {
        return Err(CliError::StrictModeViolation {
            warning_count,
            error_count,
        });
    }

    Ok(if error_count > 0 {
        ExitCode::from(3)
    } else {
        ExitCode::SUCCESS
    })
}
