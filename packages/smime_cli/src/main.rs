//! Main entry point for the cryypt S/MIME command-line tool

mod cli;

use clap::Parser;
use cryypt_smime::LoggingTransformer;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging
    LoggingTransformer::init();

    let cli = cli::Cli::parse();
    cli::run(cli).await
}
