use super::{flags, OperationKind, Smime};
use crate::error::SmimeResult;
use secrecy::SecretString;

impl Smime {
    /// Decrypt an enveloped CMS message
    ///
    /// `credential` unlocks the private key in the database; it is consumed
    /// and zeroized once the tool has been launched.
    pub async fn decrypt(&self, cipher: &[u8], credential: SecretString) -> SmimeResult<Vec<u8>> {
        let args = self
            .base_args(flags::DECODE)?
            .secret(flags::PASSWORD, &credential);
        drop(credential);

        self.execute(OperationKind::Decrypt, args, cipher).await
    }
}
