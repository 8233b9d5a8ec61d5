//! CLI configuration: thin wrapper around `ipamsync_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--grid-master, --password, etc.).

use std::time::Duration;

use secrecy::SecretString;

use ipamsync_core::{ConnectionConfig, ImportOptions, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ipamsync_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Everything a Grid Master command needs: where to connect and how to pace.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub connection: ConnectionConfig,
    pub import: ImportOptions,
}

/// Build a connection from the config file, profile, and CLI overrides.
///
/// A `--grid-master` flag (or `INFOBLOX_GRID_MASTER`) is enough on its own;
/// no profile is required when the flags cover everything.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match (cfg.profiles.get(&profile_name), &global.grid_master) {
        (Some(profile), _) => profile.clone(),
        (None, Some(url)) => Profile::new(url.clone()),
        (None, None) if global.profile.is_some() => {
            let available: Vec<_> = cfg.profiles.keys().cloned().collect();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let connection = resolve_profile(&profile, &profile_name, global)?;
    let import = ipamsync_config::import_options(Some(&profile), &cfg.defaults);

    Ok(Resolved {
        profile_name,
        connection,
        import,
    })
}

/// Translate a `Profile` + global flags into a `ConnectionConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ConnectionConfig, CliError> {
    // 1. Grid Master (flag > env > profile)
    let grid_master = global
        .grid_master
        .clone()
        .unwrap_or_else(|| profile.grid_master.clone());
    if grid_master.trim().is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    // 2. Credentials
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => ipamsync_config::resolve_password(profile, profile_name)?,
    };
    let defaults = ConnectionConfig::default();
    let username = global
        .username
        .clone()
        .or_else(|| profile.username.clone())
        .unwrap_or(defaults.username);

    // 3. TLS verification
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        ipamsync_config::profile_tls(profile)
    };

    // 4. Timeout
    let timeout = global
        .timeout
        .or(profile.timeout)
        .map_or(defaults.timeout, Duration::from_secs);

    Ok(ConnectionConfig {
        grid_master,
        wapi_version: global
            .wapi_version
            .clone()
            .unwrap_or_else(|| profile.wapi_version.clone()),
        username,
        password,
        network_view: global
            .network_view
            .clone()
            .unwrap_or_else(|| profile.network_view.clone()),
        tls,
        timeout,
        max_results: profile.max_results.unwrap_or(defaults.max_results),
    })
}
