//! Shared configuration for ipamsync.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `ipamsync_core::ConnectionConfig` / `ImportOptions`. The
//! CLI layers its flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ipamsync_core::{ConnectionConfig, ImportOptions, TlsVerification};

/// Keyring service name; entries are keyed `{profile}/password`.
pub const KEYRING_SERVICE: &str = "ipamsync";

/// Environment variable consulted for the password when the profile does
/// not name its own.
pub const PASSWORD_ENV: &str = "INFOBLOX_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named Grid Master profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Pause between IPAM calls during an import, in milliseconds.
    #[serde(default = "default_call_delay_ms")]
    pub call_delay_ms: u64,

    /// Cap on per-record errors kept in an import summary.
    #[serde(default = "default_max_reported_errors")]
    pub max_reported_errors: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            call_delay_ms: default_call_delay_ms(),
            max_reported_errors: default_max_reported_errors(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_call_delay_ms() -> u64 {
    100
}
fn default_max_reported_errors() -> usize {
    100
}

/// A named Grid Master profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Grid Master URL or host (e.g., "https://192.168.1.222").
    pub grid_master: String,

    #[serde(default = "default_wapi_version")]
    pub wapi_version: String,

    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    #[serde(default = "default_network_view")]
    pub network_view: String,

    /// Skip TLS verification. Unset means accept the Grid Master's
    /// self-signed certificate unless `ca_cert` is given.
    pub insecure: Option<bool>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub timeout: Option<u64>,

    pub call_delay_ms: Option<u64>,

    /// `_max_results` for list queries.
    pub max_results: Option<u32>,
}

impl Profile {
    pub fn new(grid_master: impl Into<String>) -> Self {
        Self {
            grid_master: grid_master.into(),
            wapi_version: default_wapi_version(),
            username: None,
            password: None,
            password_env: None,
            network_view: default_network_view(),
            insecure: None,
            ca_cert: None,
            timeout: None,
            call_delay_ms: None,
            max_results: None,
        }
    }
}

fn default_wapi_version() -> String {
    "2.13.1".into()
}
fn default_network_view() -> String {
    "default".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "ipamsync", "ipamsync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ipamsync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment.
///
/// Environment keys use `__` for nesting, e.g.
/// `IPAMSYNC_DEFAULTS__CALL_DELAY_MS=0`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("IPAMSYNC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the WAPI password: profile env var, `INFOBLOX_PASSWORD`,
/// keyring, then plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

/// TLS mode implied by a profile.
pub fn profile_tls(profile: &Profile) -> TlsVerification {
    match (profile.insecure, &profile.ca_cert) {
        (Some(true), _) | (None, None) => TlsVerification::DangerAcceptInvalid,
        (_, Some(ca)) => TlsVerification::CustomCa(ca.clone()),
        (Some(false), None) => TlsVerification::SystemDefaults,
    }
}

/// Build a `ConnectionConfig` from a profile with no CLI overrides.
pub fn profile_to_connection_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ConnectionConfig, ConfigError> {
    if profile.grid_master.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "grid_master".into(),
            reason: "must not be empty".into(),
        });
    }

    let password = resolve_password(profile, profile_name)?;
    let defaults = ConnectionConfig::default();

    Ok(ConnectionConfig {
        grid_master: profile.grid_master.clone(),
        wapi_version: profile.wapi_version.clone(),
        username: profile.username.clone().unwrap_or(defaults.username),
        password,
        network_view: profile.network_view.clone(),
        tls: profile_tls(profile),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout.as_secs())),
        max_results: profile.max_results.unwrap_or(defaults.max_results),
    })
}

/// Import pacing from a profile, falling back to the global defaults.
pub fn import_options(profile: Option<&Profile>, defaults: &Defaults) -> ImportOptions {
    let delay_ms = profile
        .and_then(|p| p.call_delay_ms)
        .unwrap_or(defaults.call_delay_ms);
    ImportOptions {
        call_delay: Duration::from_millis(delay_ms),
        max_reported_errors: defaults.max_reported_errors,
    }
}
