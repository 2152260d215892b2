use super::{flags, OperationKind, Smime};
use crate::error::SmimeResult;
use crate::report::{VerificationReport, VerificationResult};
use std::io::{self, Write};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

impl Smime {
    /// Verify a detached `signature` over `text`
    ///
    /// The tool reads signed content from a file, so `text` is staged in an
    /// owner-only temporary file that is removed before this returns.
    pub async fn verify(&self, text: &[u8], signature: &[u8]) -> SmimeResult<VerificationResult> {
        let content = self.content_file(text)?;

        let result = match self
            .base_args(flags::DECODE)
            .and_then(|args| args.path(flags::CONTENT_FILE, content.path()))
        {
            Ok(args) => self.execute(OperationKind::Verify, args, signature).await,
            Err(e) => Err(e),
        };

        let path = content.path().to_path_buf();
        match content.close() {
            Ok(()) => debug!(path = %path.display(), "Removed verification content file"),
            // The tool may already have removed it
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove verification content file"
            ),
        }

        let output = result?;
        let report = VerificationReport::parse(&String::from_utf8_lossy(&output));
        debug!(
            signature_valid = report.signature_valid,
            certificates = report.certificates.len(),
            signers = report.signers.len(),
            "Parsed verification report"
        );
        Ok(report.into_result())
    }

    fn content_file(&self, text: &[u8]) -> SmimeResult<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("smime-content-");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o600));
        }

        let mut file = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(text)?;
        file.flush()?;
        Ok(file)
    }
}
