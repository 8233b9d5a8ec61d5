//! Read-only Grid Master commands: connection check and listings.

use tabled::Tabled;

use ipamsync_core::{CoreError, ExtensibleAttributeDef, IpamNetwork, NetworkView, WapiClient};

use crate::cli::{GlobalOpts, ListNetworksArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    attr_type: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&ExtensibleAttributeDef> for AttributeRow {
    fn from(d: &ExtensibleAttributeDef) -> Self {
        Self {
            name: d.name.clone(),
            attr_type: d.attr_type.clone(),
            comment: d.comment.clone(),
        }
    }
}

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "View")]
    view: String,
    #[tabled(rename = "Comment")]
    comment: String,
    #[tabled(rename = "Attributes")]
    attributes: String,
}

impl From<&IpamNetwork> for NetworkRow {
    fn from(n: &IpamNetwork) -> Self {
        Self {
            network: n.network.clone(),
            view: n.network_view.clone().unwrap_or_default(),
            comment: n.comment.clone(),
            attributes: n.extattrs.len().to_string(),
        }
    }
}

#[derive(Tabled)]
struct ViewRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Default")]
    is_default: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&NetworkView> for ViewRow {
    fn from(v: &NetworkView) -> Self {
        Self {
            name: v.name.clone(),
            is_default: if v.is_default { "yes" } else { "" }.into(),
            comment: v.comment.clone(),
        }
    }
}

/// What `test-connection` reports.
#[derive(serde::Serialize)]
struct ConnectionReport {
    grid_master: String,
    wapi_version: String,
    base_url: String,
    grid_name: Option<String>,
    members: Option<usize>,
    network_view: String,
}

fn report_detail(r: &ConnectionReport) -> String {
    [
        format!("Grid Master:  {}", r.grid_master),
        format!("WAPI Version: {}", r.wapi_version),
        format!("Base URL:     {}", r.base_url),
        format!("Grid Name:    {}", r.grid_name.as_deref().unwrap_or("N/A")),
        format!(
            "Members:      {}",
            r.members.map_or_else(|| "N/A".into(), |n| n.to_string())
        ),
        format!("Network View: {}", r.network_view),
    ]
    .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

async fn connect(resolved: &Resolved) -> Result<WapiClient, CliError> {
    ipamsync_core::connect(&resolved.connection)
        .await
        .map_err(|e| auth_context(e, &resolved.profile_name))
}

/// Attach the profile name to authentication failures.
pub(crate) fn auth_context(err: CoreError, profile: &str) -> CliError {
    match err {
        CoreError::AuthenticationFailed { .. } => CliError::AuthFailed {
            profile: profile.to_owned(),
        },
        other => other.into(),
    }
}

pub async fn test_connection(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let client = connect(resolved).await?;
    let grid_name = client
        .grid_info()
        .await
        .map_err(CoreError::from)?
        .into_iter()
        .find_map(|g| g.name);
    // Member listing needs more privileges than the grid object
    let members = match client.list_members().await {
        Ok(members) => Some(members.len()),
        Err(e) => {
            tracing::debug!(error = %e, "member listing unavailable");
            None
        }
    };

    let report = ConnectionReport {
        grid_master: resolved.connection.grid_master.clone(),
        wapi_version: resolved.connection.wapi_version.clone(),
        base_url: client.base_url().to_string(),
        grid_name,
        members,
        network_view: resolved.connection.network_view.clone(),
    };

    if !global.quiet {
        output::success("Successfully connected to Infoblox");
    }
    let out = output::render_single(&global.output, &report, report_detail, |r| {
        r.base_url.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn list_eas(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let client = connect(resolved).await?;
    let defs = client.list_ea_definitions().await.map_err(CoreError::from)?;

    if defs.is_empty() && !global.quiet {
        output::warning("No extensible attributes defined");
        return Ok(());
    }

    let out = output::render_list(&global.output, &defs, |x| AttributeRow::from(x), |d| {
        d.name.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn list_networks(
    args: &ListNetworksArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = connect(resolved).await?;
    let view = &resolved.connection.network_view;
    let networks: Vec<IpamNetwork> = client
        .search_networks(view, args.limit)
        .await
        .map_err(CoreError::from)?
        .into_iter()
        .map(IpamNetwork::from)
        .collect();

    tracing::debug!(view = %view, count = networks.len(), "listed networks");
    let out = output::render_list(&global.output, &networks, |x| NetworkRow::from(x), |n| {
        n.network.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn list_views(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let client = connect(resolved).await?;
    let views = client.list_network_views().await.map_err(CoreError::from)?;

    let out = output::render_list(&global.output, &views, |x| ViewRow::from(x), |v| v.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
