//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ipamsync_config::ConfigError;
use ipamsync_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    /// The import ran but some records failed.
    pub const PARTIAL: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Grid Master at {url}")]
    #[diagnostic(
        code(ipamsync::connection_failed),
        help(
            "Check that the Grid Master is reachable and the WAPI version is supported.\n\
             URL: {url}\n\
             Try: ipamsync test-connection --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(ipamsync::auth_failed),
        help(
            "Verify the WAPI username and password for profile '{profile}'.\n\
             Run: ipamsync config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(ipamsync::no_credentials),
        help(
            "Configure credentials with: ipamsync config init\n\
             Or set the INFOBLOX_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Cannot read input file {path}: {reason}")]
    #[diagnostic(
        code(ipamsync::input),
        help("Inventory files must be CSV (.csv) or Excel (.xlsx, .xls).")
    )]
    Input { path: String, reason: String },

    #[error("Import job {id} not found")]
    #[diagnostic(code(ipamsync::not_found))]
    JobNotFound { id: String },

    // ── IPAM ─────────────────────────────────────────────────────────
    #[error("Grid Master request failed: {message}")]
    #[diagnostic(code(ipamsync::api_error))]
    ApiError { message: String },

    #[error("Import finished with {failed} failed record(s)")]
    #[diagnostic(
        code(ipamsync::partial_import),
        help("Re-run with -v for per-record details, or fix the listed networks and import again.")
    )]
    PartialImport { failed: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ipamsync::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ipamsync::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ipamsync config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No Grid Master configured")]
    #[diagnostic(
        code(ipamsync::no_config),
        help(
            "Create a profile with: ipamsync config init\n\
             Or pass --grid-master / set INFOBLOX_GRID_MASTER.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ipamsync::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Import requires confirmation")]
    #[diagnostic(
        code(ipamsync::confirmation_required),
        help("Use --yes (-y) or --no-confirm in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(ipamsync::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::JobNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            Self::PartialImport { .. } => exit_code::PARTIAL,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message: _ } => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Input { path, message } => CliError::Input {
                path: path.display().to_string(),
                reason: message,
            },

            CoreError::UnsupportedFormat { extension } => CliError::Validation {
                field: "file".into(),
                reason: format!("unsupported file format '{extension}'"),
            },

            CoreError::RemoteCall { message } | CoreError::Internal(message) => {
                CliError::ApiError { message }
            }

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::JobNotFound { id } => CliError::JobNotFound { id: id.to_string() },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: "(none)".into(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Io(err) => CliError::Io(err),
            ConfigError::Serialization(err) => CliError::Validation {
                field: "config".into(),
                reason: err.to_string(),
            },
        }
    }
}
