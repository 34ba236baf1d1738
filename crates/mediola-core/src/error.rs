// ── Core error types ──
//
// User-facing errors from mediola-core. Consumers never see reqwest or
// serde errors directly; the `From<mediola_api::Error>` impl translates
// transport failures into domain variants.
//
// `CoreError` is `Clone` so a single refresh outcome can be handed to
// every caller that joined the same in-flight fetch.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach gateway: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Gateway request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Gateway returned HTTP {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Unexpected gateway response: {message}")]
    Protocol { message: String },

    /// The first refresh failed, so setup cannot complete.
    #[error("Cannot connect to gateway at {host}: {source}")]
    CannotConnect {
        host: String,
        source: Box<CoreError>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Shutter not found: {sid}")]
    ShutterNotFound { sid: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Unsupported device family: {family}")]
    UnsupportedFamily { family: String },

    #[error("Operation not supported: {operation} on {family} shutters")]
    Unsupported { operation: String, family: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The underlying failure, looking through `CannotConnect`.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::CannotConnect { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the gateway could not be reached or answered badly.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::Timeout { .. }
                | Self::Gateway { .. }
                | Self::Protocol { .. }
                | Self::CannotConnect { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mediola_api::Error> for CoreError {
    fn from(err: mediola_api::Error) -> Self {
        match err {
            mediola_api::Error::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            mediola_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            mediola_api::Error::Status { status, body } => CoreError::Gateway {
                status,
                message: body,
            },
            mediola_api::Error::Deserialization { message, .. } => {
                CoreError::Protocol { message }
            }
            mediola_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid gateway host: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_gateway() {
        let err: CoreError = mediola_api::Error::Status {
            status: 503,
            body: "busy".into(),
        }
        .into();
        assert_eq!(
            err,
            CoreError::Gateway {
                status: 503,
                message: "busy".into()
            }
        );
        assert!(err.is_connectivity());
    }

    #[test]
    fn deserialization_maps_to_protocol() {
        let err: CoreError = mediola_api::Error::Deserialization {
            message: "expected value".into(),
            body: "{XC_ERR}".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Protocol { .. }));
    }

    #[test]
    fn timeout_keeps_duration() {
        let err: CoreError = mediola_api::Error::Timeout { timeout_secs: 10 }.into();
        assert_eq!(err, CoreError::Timeout { timeout_secs: 10 });
    }

    #[test]
    fn cannot_connect_exposes_root() {
        let err = CoreError::CannotConnect {
            host: "192.168.1.50".into(),
            source: Box::new(CoreError::Timeout { timeout_secs: 10 }),
        };
        assert_eq!(err.root(), &CoreError::Timeout { timeout_secs: 10 });
        assert!(err.to_string().contains("192.168.1.50"));
    }

    #[test]
    fn invalid_url_is_config() {
        let parse_err = url_parse_error();
        let err: CoreError = mediola_api::Error::InvalidUrl(parse_err).into();
        assert!(matches!(err, CoreError::Config { .. }));
        assert!(!err.is_connectivity());
    }

    fn url_parse_error() -> url::ParseError {
        url::ParseError::EmptyHost
    }
}
