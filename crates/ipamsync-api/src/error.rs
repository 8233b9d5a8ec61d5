use thiserror::Error;

/// Top-level error type for the `ipamsync-api` crate.
///
/// Covers every failure mode of the WAPI surface: authentication,
/// transport, structured WAPI errors, and response decoding.
/// `ipamsync-core` folds these into a single remote-call failure.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Grid Master rejected the credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── WAPI ────────────────────────────────────────────────────────
    /// Structured error from WAPI (`{"Error": ..., "code": ..., "text": ...}`).
    #[error("WAPI error (HTTP {status}): {message}")]
    Wapi {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the credentials were rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Wapi { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if WAPI reported a duplicate object.
    ///
    /// Infoblox signals this with a `Client.Ibap.Data.Conflict` code.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Wapi { code, .. } => code
                .as_deref()
                .is_some_and(|c| c.ends_with("Data.Conflict")),
            _ => false,
        }
    }

    /// Extract the WAPI error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Wapi { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
