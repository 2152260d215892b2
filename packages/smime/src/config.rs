use crate::error::{SmimeError, SmimeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Where and how the CMS tool is run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmimeConfig {
    /// Tool executable, resolved through `PATH` when relative
    #[serde(default = "default_program")]
    pub program: PathBuf,
    /// Arguments placed before every operation's own arguments
    #[serde(default)]
    pub program_args: Vec<String>,
    /// Certificate and key database directory handed to the tool
    #[serde(default = "default_database_dir")]
    pub database_dir: PathBuf,
    /// Deadline for one tool run in seconds (0 waits indefinitely)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Directory for verification content files (system temp dir if unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

fn default_program() -> PathBuf {
    PathBuf::from("cmsutil")
}

fn default_database_dir() -> PathBuf {
    // NSS shared database location
    match dirs::home_dir() {
        Some(home) => home.join(".pki").join("nssdb"),
        None => {
            warn!("Could not determine home directory, using ./nssdb");
            PathBuf::from("./nssdb")
        }
    }
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for SmimeConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            program_args: Vec::new(),
            database_dir: default_database_dir(),
            timeout_seconds: default_timeout_seconds(),
            temp_dir: None,
        }
    }
}

impl SmimeConfig {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cryypt").join("smime.json"))
    }

    /// Load configuration from a JSON file; absent keys take their defaults
    pub fn from_file(path: &Path) -> SmimeResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SmimeError::Configuration(format!("Cannot read {}: {e}", path.display()))
        })?;
        let config: SmimeConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the tool cannot work with
    pub fn validate(&self) -> SmimeResult<()> {
        if self.program.as_os_str().is_empty() {
            return Err(SmimeError::Configuration(
                "Program path must not be empty".to_string(),
            ));
        }
        if self.database_dir.as_os_str().is_empty() {
            return Err(SmimeError::Configuration(
                "Database directory must not be empty".to_string(),
            ));
        }
        if let Some(dir) = &self.temp_dir {
            if !dir.is_dir() {
                return Err(SmimeError::Configuration(format!(
                    "Temporary directory does not exist: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Deadline for one tool run, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_seconds {
            0 => None,
            seconds => Some(Duration::from_secs(seconds)),
        }
    }
}
