use super::{flags, require_identifiers, OperationKind, Smime};
use crate::error::SmimeResult;
use secrecy::SecretString;

impl Smime {
    /// Produce a detached signature over `text`, one signer info per entry
    /// of `signers`
    pub async fn sign<S: AsRef<str>>(
        &self,
        text: &[u8],
        signers: &[S],
        credential: SecretString,
    ) -> SmimeResult<Vec<u8>> {
        require_identifiers(signers, "signer")?;

        let args = self
            .base_args(flags::SIGN)?
            .flag(flags::DETACHED)
            .secret(flags::PASSWORD, &credential)
            .repeated(flags::SIGNER, signers);
        drop(credential);

        self.execute(OperationKind::Sign, args, text).await
    }
}
