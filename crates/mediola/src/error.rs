//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use mediola_config::ConfigError;
use mediola_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the gateway at {host}: {reason}")]
    #[diagnostic(
        code(mediola::connection_failed),
        help(
            "Check that the gateway is powered on and reachable.\n\
             Host: {host}\n\
             Try: mediola check -v"
        )
    )]
    ConnectionFailed { host: String, reason: String },

    #[error("Gateway answered with an error: {message}")]
    #[diagnostic(
        code(mediola::gateway),
        help("Verify the username and password for this gateway.")
    )]
    Gateway { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(mediola::timeout),
        help("Increase timeout with --timeout or check gateway responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Shutters ─────────────────────────────────────────────────────
    #[error("Shutter '{sid}' not found")]
    #[diagnostic(
        code(mediola::not_found),
        help("Run: mediola shutters list to see available shutters")
    )]
    NotFound { sid: String },

    #[error("{message}")]
    #[diagnostic(
        code(mediola::unsupported),
        help("Only WIR shutters accept target positions; Elero shutters support open, close and stop.")
    )]
    Unsupported { message: String },

    #[error("The gateway did not acknowledge '{action}' for shutter '{sid}'")]
    #[diagnostic(
        code(mediola::rejected),
        help("The gateway was reachable but did not report success. Try again or run with -v.")
    )]
    Rejected { action: String, sid: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mediola::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mediola::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mediola config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No gateway configured")]
    #[diagnostic(
        code(mediola::no_config),
        help(
            "Create a profile with: mediola config init\n\
             Or pass --host, --username and --password.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(mediola::no_credentials),
        help(
            "Store a password with: mediola config set-password --profile {profile}\n\
             Or set MEDIOLA_USERNAME and MEDIOLA_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error(transparent)]
    #[diagnostic(code(mediola::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {0}")]
    #[diagnostic(code(mediola::prompt))]
    Prompt(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(mediola::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Gateway { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let host = match &err {
            CoreError::CannotConnect { host, .. } => Some(host.clone()),
            _ => None,
        };

        match err.root().clone() {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed {
                host: host.unwrap_or_else(|| "(configured host)".into()),
                reason,
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Gateway { status, message } => CliError::Gateway {
                message: format!("HTTP {status}: {message}"),
            },

            CoreError::Protocol { message } => CliError::Gateway { message },

            CoreError::ShutterNotFound { sid } => CliError::NotFound { sid },

            e @ (CoreError::UnsupportedFamily { .. } | CoreError::Unsupported { .. }) => {
                CliError::Unsupported {
                    message: e.to_string(),
                }
            }

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),

            // root() looks through CannotConnect
            CoreError::CannotConnect { .. } => CliError::Internal(err.to_string()),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                available: available_profiles(),
                name,
            },
            other => CliError::Config(other),
        }
    }
}

fn available_profiles() -> String {
    let cfg = mediola_config::load_config_or_default();
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cannot_connect_maps_through_to_root_cause() {
        let err = CoreError::CannotConnect {
            host: "192.168.1.50".into(),
            source: Box::new(CoreError::ConnectionFailed {
                reason: "refused".into(),
            }),
        };
        let cli: CliError = err.into();
        assert!(
            matches!(cli, CliError::ConnectionFailed { ref host, .. } if host == "192.168.1.50"),
            "{cli:?}"
        );
        assert_eq!(cli.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn exit_codes_by_category() {
        let cases = [
            (CoreError::Timeout { timeout_secs: 10 }, exit_code::TIMEOUT),
            (
                CoreError::ShutterNotFound { sid: "99".into() },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Unsupported {
                    operation: "set_position".into(),
                    family: "ER".into(),
                },
                exit_code::UNSUPPORTED,
            ),
            (
                CoreError::ValidationFailed {
                    message: "bad".into(),
                },
                exit_code::USAGE,
            ),
            (CoreError::Internal("boom".into()), exit_code::GENERAL),
        ];
        for (core, code) in cases {
            let cli: CliError = core.clone().into();
            assert_eq!(cli.exit_code(), code, "{core:?}");
        }
    }
}
