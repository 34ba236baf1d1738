// ── Runtime gateway configuration ──
//
// Describes *how* to reach one gateway. Core never reads files; the CLI
// resolves profiles and credentials and hands a `GatewayConfig` in.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::CoreError;

pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 15;
pub const MIN_SCAN_INTERVAL_SECS: u64 = 5;
pub const MAX_SCAN_INTERVAL_SECS: u64 = 300;

/// Configuration for one gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway host or `host:port`, optionally with an `http://` prefix.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// How often the coordinator polls `GetStates`.
    pub scan_interval: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
            scan_interval: Duration::from_secs(DEFAULT_SCAN_INTERVAL_SECS),
            timeout: mediola_api::transport::DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the values a setup form would reject.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "gateway host must not be empty".into(),
            });
        }
        validate_scan_interval(self.scan_interval.as_secs())?;
        if self.scan_interval.subsec_nanos() != 0 {
            return Err(CoreError::ValidationFailed {
                message: "scan interval must be a whole number of seconds".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(CoreError::ValidationFailed {
                message: "request timeout must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

/// Bounds check for a polling interval in seconds.
pub fn validate_scan_interval(secs: u64) -> Result<(), CoreError> {
    if (MIN_SCAN_INTERVAL_SECS..=MAX_SCAN_INTERVAL_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed {
            message: format!(
                "scan interval {secs}s is outside {MIN_SCAN_INTERVAL_SECS}-{MAX_SCAN_INTERVAL_SECS}s"
            ),
        })
    }
}
