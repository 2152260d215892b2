//! Decrypt, sign, encrypt and verify on top of the CMS tool
//!
//! Every operation runs in its own [`ProcessContext`], which is released on
//! every exit path. Credentials only live inside the argument list of the
//! spawn that needs them and are zeroized right after it.

mod decrypt;
mod encrypt;
mod sign;
mod verify;

use crate::config::SmimeConfig;
use crate::diagnostic::{DiagnosticSink, TracingSink};
use crate::error::{SmimeError, SmimeResult};
use crate::logging::log_security_event;
use crate::process::{ProcessContext, ToolArgs};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// NSS `cmsutil` command-line flags
///
/// Verification is decode mode given the detached content file.
pub(crate) mod flags {
    pub const DECODE: &str = "-D";
    pub const SIGN: &str = "-S";
    pub const ENCRYPT: &str = "-E";
    pub const DATABASE_DIR: &str = "-d";
    pub const PASSWORD: &str = "-p";
    pub const DETACHED: &str = "-T";
    pub const SIGNER: &str = "-N";
    pub const RECIPIENT: &str = "-r";
    pub const CONTENT_FILE: &str = "-c";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OperationKind {
    Decrypt,
    Sign,
    Encrypt,
    Verify,
}

impl OperationKind {
    fn event(self) -> &'static str {
        match self {
            OperationKind::Decrypt => "SMIME_DECRYPT",
            OperationKind::Sign => "SMIME_SIGN",
            OperationKind::Encrypt => "SMIME_ENCRYPT",
            OperationKind::Verify => "SMIME_VERIFY",
        }
    }
}

/// S/MIME operations backed by an external CMS tool
#[derive(Clone)]
pub struct Smime {
    config: Arc<SmimeConfig>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Smime {
    /// Operations using `config`; diagnostics go to [`TracingSink`]
    pub fn new(config: SmimeConfig) -> Self {
        Self {
            config: Arc::new(config),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the surface that receives diagnostics of failed runs
    #[must_use]
    pub fn with_diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &SmimeConfig {
        &self.config
    }

    /// Arguments every operation starts with: mode flag then database dir
    fn base_args(&self, mode: &str) -> SmimeResult<ToolArgs> {
        ToolArgs::new()
            .flag(mode)
            .path(flags::DATABASE_DIR, &self.config.database_dir)
    }

    fn context(&self) -> ProcessContext {
        ProcessContext::new(&self.config.program)
            .with_leading_args(self.config.program_args.clone())
            .with_timeout(self.config.timeout())
    }

    /// Run one tool invocation and return its standard output
    pub(crate) async fn execute(
        &self,
        kind: OperationKind,
        args: ToolArgs,
        input: &[u8],
    ) -> SmimeResult<Vec<u8>> {
        debug!(operation = ?kind, input_len = input.len(), "Running CMS tool");

        let mut context = self.context();
        let result = self.run_in(&mut context, args, input).await;
        context.reset();

        match &result {
            Ok(output) => log_security_event(
                kind.event(),
                &format!("Tool produced {} bytes", output.len()),
                true,
            ),
            Err(SmimeError::ToolFailure { status, .. }) => {
                log_security_event(kind.event(), &format!("Tool failed with {status}"), false)
            }
            Err(e) => log_security_event(kind.event(), &e.to_string(), false),
        }
        result
    }

    async fn run_in(
        &self,
        context: &mut ProcessContext,
        args: ToolArgs,
        input: &[u8],
    ) -> SmimeResult<Vec<u8>> {
        context.start(&args)?;
        drop(args);

        // A tool that exits early stops reading its input; its own failure
        // report takes precedence over the broken pipe.
        let written = match context.write_input(input).await {
            Err(e @ SmimeError::Timeout(_)) => return Err(e),
            other => other,
        };
        context.close_input();

        // The run limit armed at spawn already bounds this wait
        let status = context.wait_for_completion(None).await?;
        if !status.success() {
            let diagnostic = context.diagnostic().to_string();
            self.sink.show(&diagnostic);
            return Err(SmimeError::ToolFailure { status, diagnostic });
        }
        written?;

        Ok(context.take_output())
    }
}

impl fmt::Debug for Smime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Smime")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn require_identifiers<S: AsRef<str>>(identifiers: &[S], role: &str) -> SmimeResult<()> {
    if identifiers.is_empty() {
        return Err(SmimeError::InvalidInput(format!(
            "At least one {role} identifier is required"
        )));
    }
    if let Some(blank) = identifiers.iter().find(|id| id.as_ref().trim().is_empty()) {
        return Err(SmimeError::InvalidInput(format!(
            "Empty {role} identifier: {:?}",
            blank.as_ref()
        )));
    }
    Ok(())
}
