use super::types::{fields, CertificateRecord, SignerIdentity, SignerInfoRecord};
use tracing::debug;

/// Match each signer-info record to the certificate that issued it
///
/// A signer is matched by issuer name and serial number; the first matching
/// certificate in list order wins. Signers lacking either value, or matching
/// no certificate, are left out of the result.
pub fn correlate(
    signers: &[SignerInfoRecord],
    certificates: &[CertificateRecord],
) -> Vec<SignerIdentity> {
    signers
        .iter()
        .filter_map(|signer| {
            let issuer = signer.field(fields::SIGNER_ISSUER)?;
            let serial = signer.field(fields::SIGNER_SERIAL)?;

            let certificate = certificates.iter().find(|certificate| {
                certificate.field(fields::CERT_ISSUER) == Some(issuer)
                    && certificate.field(fields::CERT_SERIAL) == Some(serial)
            });

            match certificate {
                Some(certificate) => Some(SignerIdentity {
                    subject: certificate
                        .field(fields::CERT_SUBJECT)
                        .unwrap_or_default()
                        .to_string(),
                    issuer: issuer.to_string(),
                    serial: serial.to_string(),
                }),
                None => {
                    debug!(
                        index = signer.index,
                        "No certificate matches signer information, skipping"
                    );
                    None
                }
            }
        })
        .collect()
}
