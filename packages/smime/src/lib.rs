//! # Cryypt S/MIME
//!
//! S/MIME decrypt, sign, verify and encrypt performed by an external CMS
//! command-line tool (NSS `cmsutil` style). This crate implements no
//! cryptography; it runs the tool, feeds it data, and interprets its output.
//!
//! ```no_run
//! use cryypt_smime::{Smime, SmimeConfig};
//!
//! # async fn demo() -> cryypt_smime::SmimeResult<()> {
//! let smime = Smime::new(SmimeConfig::default());
//! let cipher = smime.encrypt(b"hello", &["alice@example.org"]).await?;
//! let result = smime.verify(b"signed text", b"...signature...").await?;
//! println!("valid: {}, signers: {}", result.valid, result.signers.len());
//! # let _ = cipher;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod logging;
pub mod operation;
pub mod process;
pub mod report;

pub use config::SmimeConfig;
pub use diagnostic::{DiagnosticSink, LastDiagnostic, TracingSink};
pub use error::{SmimeError, SmimeResult};
pub use logging::{log_security_event, LoggingTransformer};
pub use operation::Smime;
pub use process::{ProcessContext, TerminalStatus, ToolArgs};
pub use report::{
    correlate, CertificateRecord, SignerIdentity, SignerInfoRecord, VerificationReport,
    VerificationResult,
};

/// Re-exported so callers can build credentials without a direct dependency
pub use secrecy::SecretString;
