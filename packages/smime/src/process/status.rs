use std::fmt;
use std::process::ExitStatus;

/// How a tool invocation ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalStatus {
    /// Process exited with the given code
    Exited(i32),
    /// Process was terminated by the given signal
    Signaled(i32),
}

impl TerminalStatus {
    /// Only a zero exit code counts as success
    pub fn success(&self) -> bool {
        matches!(self, TerminalStatus::Exited(0))
    }
}

impl From<ExitStatus> for TerminalStatus {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return TerminalStatus::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return TerminalStatus::Signaled(signal);
            }
        }

        // No code and no signal: report as abnormal termination
        TerminalStatus::Signaled(-1)
    }
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalStatus::Exited(code) => write!(f, "exit code {code}"),
            TerminalStatus::Signaled(signal) => write!(f, "terminated by signal {signal}"),
        }
    }
}
