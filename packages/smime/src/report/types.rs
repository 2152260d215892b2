use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field-path keys read from report records
pub mod fields {
    /// Certificate subject
    pub const CERT_SUBJECT: &str = "data.subject";
    /// Certificate issuer
    pub const CERT_ISSUER: &str = "data.issuerName";
    /// Certificate serial number
    pub const CERT_SERIAL: &str = "data.serialNumber";
    /// Issuer named by a signer-info record
    pub const SIGNER_ISSUER: &str = "issuerName";
    /// Serial number named by a signer-info record
    pub const SIGNER_SERIAL: &str = "serialNumber";
}

/// One `certificate[N].*` group of a verification report
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Bracketed index from the report keys
    pub index: usize,
    /// Field path (e.g. `data.issuerName`) to value
    pub fields: BTreeMap<String, String>,
}

impl CertificateRecord {
    /// Value of a field, if reported
    pub fn field(&self, path: &str) -> Option<&str> {
        self.fields.get(path).map(String::as_str)
    }
}

/// One `signerInformation[N].*` group of a verification report
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInfoRecord {
    /// Bracketed index from the report keys
    pub index: usize,
    /// Field path (e.g. `issuerName`) to value
    pub fields: BTreeMap<String, String>,
}

impl SignerInfoRecord {
    /// Value of a field, if reported
    pub fn field(&self, path: &str) -> Option<&str> {
        self.fields.get(path).map(String::as_str)
    }
}

/// Who produced a signature
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerIdentity {
    /// Subject of the signing certificate
    pub subject: String,
    /// Issuer of the signing certificate
    pub issuer: String,
    /// Serial number of the signing certificate
    pub serial: String,
}

/// Outcome of a signature verification
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the tool reported the signature as valid
    pub valid: bool,
    /// Signers that could be matched to a reported certificate
    pub signers: Vec<SignerIdentity>,
}
