//! Line-oriented `key=value` verification report parser
//!
//! The tool prints one entry per line. Indexed keys such as
//! `certificate[0].data.subject` are grouped by kind and index in a single
//! pass; every unrecognised or malformed line is skipped.

use super::correlate::correlate;
use super::types::{CertificateRecord, SignerInfoRecord, SignerIdentity, VerificationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SIGNATURE_VALID: &str = "signatureValid";
const SIGNATURE_VALID_YES: &str = "yes";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum RecordKind {
    Certificate,
    SignerInformation,
}

/// Indexed key families, matched as `<family>[<index>].<field-path>`
const RECORD_FAMILIES: &[(&str, RecordKind)] = &[
    ("certificate", RecordKind::Certificate),
    ("signerInformation", RecordKind::SignerInformation),
];

enum Entry<'a> {
    SignatureValid(&'a str),
    Field {
        kind: RecordKind,
        index: usize,
        path: &'a str,
        value: &'a str,
    },
}

/// Grouped contents of a verification report
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// `true` only when the report says `signatureValid=yes`
    pub signature_valid: bool,
    /// Certificate records ordered by index
    pub certificates: Vec<CertificateRecord>,
    /// Signer-info records ordered by index
    pub signers: Vec<SignerInfoRecord>,
}

impl VerificationReport {
    /// Parse the full text of a report
    pub fn parse(text: &str) -> Self {
        let mut signature_valid = false;
        let mut groups: BTreeMap<(RecordKind, usize), BTreeMap<String, String>> = BTreeMap::new();

        for entry in text.lines().filter_map(classify) {
            match entry {
                Entry::SignatureValid(value) => {
                    signature_valid = value == SIGNATURE_VALID_YES;
                }
                Entry::Field {
                    kind,
                    index,
                    path,
                    value,
                } => {
                    groups
                        .entry((kind, index))
                        .or_default()
                        .insert(path.to_string(), value.to_string());
                }
            }
        }

        let mut report = VerificationReport {
            signature_valid,
            ..Default::default()
        };
        for ((kind, index), fields) in groups {
            match kind {
                RecordKind::Certificate => {
                    report.certificates.push(CertificateRecord { index, fields })
                }
                RecordKind::SignerInformation => {
                    report.signers.push(SignerInfoRecord { index, fields })
                }
            }
        }
        report
    }

    /// Signers matched to the certificate that issued their signature
    pub fn signer_identities(&self) -> Vec<SignerIdentity> {
        correlate(&self.signers, &self.certificates)
    }

    /// Collapse the report into a verification result
    pub fn into_result(self) -> VerificationResult {
        VerificationResult {
            valid: self.signature_valid,
            signers: self.signer_identities(),
        }
    }
}

fn classify(line: &str) -> Option<Entry<'_>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    if key == SIGNATURE_VALID {
        return Some(Entry::SignatureValid(value));
    }

    RECORD_FAMILIES.iter().find_map(|&(family, kind)| {
        let (index, path) = split_indexed(key, family)?;
        Some(Entry::Field {
            kind,
            index,
            path,
            value,
        })
    })
}

/// Split `<family>[<index>].<path>` into its index and path
fn split_indexed<'a>(key: &'a str, family: &str) -> Option<(usize, &'a str)> {
    let rest = key.strip_prefix(family)?.strip_prefix('[')?;
    let (index, path) = rest.split_once("].")?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) || path.is_empty() {
        return None;
    }
    Some((index.parse().ok()?, path))
}
