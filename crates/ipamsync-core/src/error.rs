// ── Core error types ──
//
// Errors surfaced by ipamsync-core. Callers never see HTTP status codes
// or raw response bodies; the `From<ipamsync_api::Error>` impl folds
// transport-layer failures into domain variants.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// A record or row failed validation (bad CIDR, empty name, unknown source).
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// The input file could not be read or decoded.
    #[error("Cannot read {}: {message}", path.display())]
    Input { path: PathBuf, message: String },

    /// Input file extension is not one of csv, xlsx, xls.
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    // ── IPAM errors ──────────────────────────────────────────────────
    /// A single IPAM round trip failed. Never aborts a batch.
    #[error("IPAM call failed: {message}")]
    RemoteCall { message: String },

    #[error("Cannot connect to Grid Master at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Job errors ───────────────────────────────────────────────────
    #[error("Import job not found: {id}")]
    JobNotFound { id: uuid::Uuid },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Collapse any API failure into the per-record remote-call variant.
    pub(crate) fn remote(err: ipamsync_api::Error) -> Self {
        Self::RemoteCall {
            message: err.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ipamsync_api::Error> for CoreError {
    fn from(err: ipamsync_api::Error) -> Self {
        match err {
            ipamsync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            ipamsync_api::Error::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                CoreError::ConnectionFailed {
                    url: e
                        .url()
                        .map(|u| u.origin().ascii_serialization())
                        .unwrap_or_else(|| "<unknown>".into()),
                    reason: e.to_string(),
                }
            }
            ipamsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid Grid Master URL: {e}"),
            },
            ipamsync_api::Error::Tls(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            other => CoreError::remote(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wapi_error_becomes_remote_call() {
        let err: CoreError = ipamsync_api::Error::Wapi {
            message: "The network 10.0.0.0/24 already exists.".into(),
            code: Some("Client.Ibap.Data.Conflict".into()),
            status: 400,
        }
        .into();
        assert!(
            matches!(err, CoreError::RemoteCall { ref message } if message.contains("already exists"))
        );
    }

    #[test]
    fn auth_error_is_kept_distinct() {
        let err: CoreError = ipamsync_api::Error::Authentication {
            message: "bad password".into(),
        }
        .into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }
}
