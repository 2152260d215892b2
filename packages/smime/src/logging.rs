//! Logging setup and security audit events
//!
//! Library code emits `tracing` events; with no subscriber installed they are
//! forwarded to the `log` facade, which [`LoggingTransformer::init`] wires to
//! `env_logger`. Configure levels through `RUST_LOG`, e.g.
//! `RUST_LOG=cryypt_smime=debug`.

use log::{info, warn};
use std::sync::Once;
use std::time::{SystemTime, UNIX_EPOCH};

static INIT_LOGGER: Once = Once::new();

/// Process-wide logger initialisation
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialise `env_logger` once; later calls are no-ops
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();
        });
    }

    /// Capture-friendly logger for test binaries; safe to call from every test
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }
}

/// Logs a security-relevant event with standardized formatting
///
/// # Parameters
/// * `event_type` - Type of security event (e.g., "SMIME_DECRYPT", "SMIME_VERIFY")
/// * `details` - Additional details about the event; never include secrets
/// * `success` - Whether the operation was successful
pub fn log_security_event(event_type: &str, details: &str, success: bool) {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let status = if success { "SUCCESS" } else { "FAILURE" };

    if success {
        info!("[{}] {} - {}: {}", timestamp, status, event_type, details);
    } else {
        warn!("[{}] {} - {}: {}", timestamp, status, event_type, details);
    }
}
