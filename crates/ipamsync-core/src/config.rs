// ── Runtime connection configuration ──
//
// How to reach a Grid Master and how to pace an import. These types carry
// credentials and tuning but never touch disk; the CLI builds them from
// its profile config and hands them in.

use std::time::Duration;

use secrecy::SecretString;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Grid Masters usually present self-signed certs.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single Grid Master.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Grid Master URL or host (e.g., `https://192.168.1.222`).
    pub grid_master: String,
    pub wapi_version: String,
    pub username: String,
    pub password: SecretString,
    /// Network view imports operate on.
    pub network_view: String,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// `_max_results` for list queries (overlap search scans the whole view).
    pub max_results: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            grid_master: String::new(),
            wapi_version: ipamsync_api::wapi::client::DEFAULT_WAPI_VERSION.into(),
            username: "admin".into(),
            password: SecretString::from(String::new()),
            network_view: "default".into(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            max_results: ipamsync_api::wapi::client::DEFAULT_MAX_RESULTS,
        }
    }
}

/// Knobs for analysis and execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Pause between IPAM round trips. Zero disables pacing.
    pub call_delay: Duration,
    /// Cap on per-item errors kept in an `ImportSummary`.
    pub max_reported_errors: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            call_delay: Duration::from_millis(100),
            max_reported_errors: 100,
        }
    }
}

impl ImportOptions {
    /// Options with no inter-call delay.
    pub fn unpaced() -> Self {
        Self {
            call_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub(crate) async fn pause(&self) {
        if !self.call_delay.is_zero() {
            tokio::time::sleep(self.call_delay).await;
        }
    }
}
