//! CLI definitions and dispatch

mod commands;
mod io;

use clap::{Parser, Subcommand};
use cryypt_smime::{Smime, SmimeConfig, SmimeError, SmimeResult};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Exit code when the CMS tool itself failed; its diagnostic is on stderr
const EXIT_TOOL_FAILURE: u8 = 1;
/// Exit code for usage, configuration and I/O errors
const EXIT_ERROR: u8 = 2;
/// Exit code when verification ran but the signature is not valid
const EXIT_INVALID_SIGNATURE: u8 = 3;

#[derive(Parser)]
#[command(name = "smime")]
#[command(about = "S/MIME decrypt, sign, verify and encrypt through a CMS tool")]
pub struct Cli {
    /// JSON configuration file (default: $XDG_CONFIG_HOME/cryypt/smime.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CMS tool executable (default: cmsutil)
    #[arg(long, global = true)]
    pub program: Option<PathBuf>,

    /// Argument placed before every tool invocation; repeatable
    #[arg(long = "program-arg", global = true, allow_hyphen_values = true)]
    pub program_args: Vec<String>,

    /// Certificate and key database directory
    #[arg(long, short = 'd', global = true)]
    pub database_dir: Option<PathBuf>,

    /// Seconds to wait for the tool (0 waits indefinitely)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Decrypt an enveloped message
    ///
    /// Example usage:
    ///   smime decrypt --input message.p7m --output message.txt
    Decrypt {
        /// Encrypted input (default: stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Decrypted output (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Database password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create a detached signature
    ///
    /// Example usage:
    ///   smime sign --signer alice@example.org --input mail.txt --output mail.p7s
    Sign {
        /// Signing certificate nickname or address; repeatable
        #[arg(long = "signer", short = 'N', required = true)]
        signers: Vec<String>,

        /// Content to sign (default: stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Signature output (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Database password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// Encrypt for one or more recipients
    ///
    /// Example usage:
    ///   smime encrypt --recipient bob@example.org --input mail.txt --output mail.p7m
    Encrypt {
        /// Recipient certificate nickname or address; repeatable
        #[arg(long = "recipient", short = 'r', required = true)]
        recipients: Vec<String>,

        /// Plaintext input (default: stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Encrypted output (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Verify a detached signature
    ///
    /// Exits with status 3 when the tool reports the signature as invalid.
    ///
    /// Example usage:
    ///   smime verify --content mail.txt --signature mail.p7s
    Verify {
        /// Signed content
        #[arg(long, short)]
        content: PathBuf,

        /// Detached signature (default: stdin)
        #[arg(long, short)]
        signature: Option<PathBuf>,
    },
}

/// Run the parsed command line and map the outcome to an exit code
pub async fn run(cli: Cli) -> ExitCode {
    match dispatch(cli).await {
        Ok(code) => code,
        // The diagnostic has already been shown through the stderr sink
        Err(SmimeError::ToolFailure { status, .. }) => {
            log::debug!("CMS tool failed with {status}");
            ExitCode::from(EXIT_TOOL_FAILURE)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn dispatch(cli: Cli) -> SmimeResult<ExitCode> {
    let config = resolve_config(&cli)?;
    let smime = Smime::new(config).with_diagnostic_sink(Arc::new(io::StderrSink));

    match cli.command {
        Commands::Decrypt {
            input,
            output,
            password,
        } => commands::handle_decrypt(&smime, input, output, password).await,
        Commands::Sign {
            signers,
            input,
            output,
            password,
        } => commands::handle_sign(&smime, signers, input, output, password).await,
        Commands::Encrypt {
            recipients,
            input,
            output,
        } => commands::handle_encrypt(&smime, recipients, input, output).await,
        Commands::Verify { content, signature } => {
            commands::handle_verify(&smime, content, signature, cli.json).await
        }
    }
}

/// Configuration file first, then command-line overrides
fn resolve_config(cli: &Cli) -> SmimeResult<SmimeConfig> {
    let mut config = match &cli.config {
        Some(path) => SmimeConfig::from_file(path)?,
        None => match SmimeConfig::default_path().filter(|path| path.is_file()) {
            Some(path) => SmimeConfig::from_file(&path)?,
            None => SmimeConfig::default(),
        },
    };

    if let Some(program) = &cli.program {
        config.program = program.clone();
    }
    if !cli.program_args.is_empty() {
        config.program_args = cli.program_args.clone();
    }
    if let Some(dir) = &cli.database_dir {
        config.database_dir = dir.clone();
    }
    if let Some(seconds) = cli.timeout {
        config.timeout_seconds = seconds;
    }

    config.validate()?;
    Ok(config)
}
