//! Argument lists for tool invocations
//!
//! Arguments may carry credentials, so every value is zeroized when the list
//! is dropped and secret positions are redacted from `Debug` output.

use crate::error::{SmimeError, SmimeResult};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::path::Path;
use zeroize::Zeroize;

/// Ordered command-line arguments for one tool invocation
#[derive(Clone, Default)]
pub struct ToolArgs {
    args: Vec<String>,
    secret_positions: Vec<usize>,
}

impl ToolArgs {
    /// Empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bare flag
    #[must_use]
    pub fn flag(mut self, flag: &str) -> Self {
        self.args.push(flag.to_string());
        self
    }

    /// Append a flag followed by its value
    #[must_use]
    pub fn option(mut self, flag: &str, value: &str) -> Self {
        self.args.push(flag.to_string());
        self.args.push(value.to_string());
        self
    }

    /// Append a flag followed by a filesystem path
    ///
    /// The tool receives paths as text, so non-UTF-8 paths are rejected.
    pub fn path(self, flag: &str, path: &Path) -> SmimeResult<Self> {
        let value = path.to_str().ok_or_else(|| {
            SmimeError::Configuration(format!("Path is not valid UTF-8: {}", path.display()))
        })?;
        Ok(self.option(flag, value))
    }

    /// Append a flag followed by a secret value
    #[must_use]
    pub fn secret(mut self, flag: &str, secret: &SecretString) -> Self {
        self.args.push(flag.to_string());
        self.secret_positions.push(self.args.len());
        self.args.push(secret.expose_secret().to_string());
        self
    }

    /// Append `flag value` once per value
    #[must_use]
    pub fn repeated<S: AsRef<str>>(mut self, flag: &str, values: &[S]) -> Self {
        for value in values {
            self = self.option(flag, value.as_ref());
        }
        self
    }

    /// Iterate over the raw arguments
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(String::as_str)
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Debug for ToolArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.args.iter().enumerate().map(|(position, arg)| {
            if self.secret_positions.contains(&position) {
                "<redacted>"
            } else {
                arg.as_str()
            }
        });
        f.debug_list().entries(shown).finish()
    }
}

impl Drop for ToolArgs {
    fn drop(&mut self) {
        self.args.zeroize();
    }
}
