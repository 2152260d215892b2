//! Terminal I/O helpers: payload files, password prompt, diagnostic output

use cryypt_smime::{DiagnosticSink, SecretString, SmimeResult};
use std::io::{Read, Write};
use std::path::Path;

/// Writes tool diagnostics verbatim to standard error
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn show(&self, diagnostic: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(diagnostic.as_bytes());
        if !diagnostic.is_empty() && !diagnostic.ends_with('\n') {
            let _ = stderr.write_all(b"\n");
        }
    }
}

/// Read a whole payload from `path`, or from stdin when absent
pub fn read_input(path: Option<&Path>) -> SmimeResult<Vec<u8>> {
    match path {
        Some(path) => Ok(std::fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Write a whole payload to `path`, or to stdout when absent
pub fn write_output(path: Option<&Path>, data: &[u8]) -> SmimeResult<()> {
    match path {
        Some(path) => Ok(std::fs::write(path, data)?),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Password from the command line, or prompted without echo
pub fn credential(password: Option<String>) -> SmimeResult<SecretString> {
    match password {
        Some(password) => Ok(SecretString::from(password)),
        None => Ok(SecretString::from(rpassword::prompt_password(
            "Database password: ",
        )?)),
    }
}
