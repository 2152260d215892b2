use super::{flags, require_identifiers, OperationKind, Smime};
use crate::error::SmimeResult;

impl Smime {
    /// Encrypt `plain` for every recipient in `recipients`
    pub async fn encrypt<S: AsRef<str>>(
        &self,
        plain: &[u8],
        recipients: &[S],
    ) -> SmimeResult<Vec<u8>> {
        require_identifiers(recipients, "recipient")?;

        let args = self
            .base_args(flags::ENCRYPT)?
            .repeated(flags::RECIPIENT, recipients);

        self.execute(OperationKind::Encrypt, args, plain).await
    }
}
