//! Verification report parsing and signer correlation

mod correlate;
mod parser;
mod types;

pub use correlate::correlate;
pub use parser::VerificationReport;
pub use types::{
    fields, CertificateRecord, SignerIdentity, SignerInfoRecord, VerificationResult,
};
