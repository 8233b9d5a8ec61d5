// ── IPAM client seam ──
//
// The analyzer and executor talk to the IPAM through `IpamClient` so they
// can run against the live WAPI client or an in-memory fake.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use indexmap::IndexMap;
use ipamsync_api::{ExtAttrValue, ExtensibleAttributeDef, TlsMode, TransportConfig, WapiClient};
use tracing::{debug, info};

use crate::cidr::Cidr;
use crate::config::{ConnectionConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{AttributeType, IpamNetwork};

/// Operations core needs from an IPAM.
///
/// Every failure is a `CoreError::RemoteCall`; callers treat it as
/// scoped to the record being processed.
pub trait IpamClient: Send + Sync {
    /// One authenticated round trip; failure means no record can be processed.
    fn check_connectivity(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Exact CIDR match within the view.
    fn find_network_by_cidr(
        &self,
        cidr: &Cidr,
        view: &str,
    ) -> impl Future<Output = Result<Option<IpamNetwork>, CoreError>> + Send;

    /// Every network in the view whose range intersects `cidr`.
    fn find_overlapping_networks(
        &self,
        cidr: &Cidr,
        view: &str,
    ) -> impl Future<Output = Result<Vec<IpamNetwork>, CoreError>> + Send;

    /// Returns the new object's reference.
    fn create_network(
        &self,
        cidr: &Cidr,
        view: &str,
        comment: &str,
        attributes: &IndexMap<String, String>,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Replace the comment and the whole attribute set.
    fn update_network(
        &self,
        reference: &str,
        comment: &str,
        attributes: &IndexMap<String, String>,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Create the attribute definition unless it already exists.
    fn ensure_attribute_definition(
        &self,
        name: &str,
        attribute_type: AttributeType,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl<C: IpamClient> IpamClient for Arc<C> {
    fn check_connectivity(&self) -> impl Future<Output = Result<(), CoreError>> + Send {
        (**self).check_connectivity()
    }

    fn find_network_by_cidr(
        &self,
        cidr: &Cidr,
        view: &str,
    ) -> impl Future<Output = Result<Option<IpamNetwork>, CoreError>> + Send {
        (**self).find_network_by_cidr(cidr, view)
    }

    fn find_overlapping_networks(
        &self,
        cidr: &Cidr,
        view: &str,
    ) -> impl Future<Output = Result<Vec<IpamNetwork>, CoreError>> + Send {
        (**self).find_overlapping_networks(cidr, view)
    }

    fn create_network(
        &self,
        cidr: &Cidr,
        view: &str,
        comment: &str,
        attributes: &IndexMap<String, String>,
    ) -> impl Future<Output = Result<String, CoreError>> + Send {
        (**self).create_network(cidr, view, comment, attributes)
    }

    fn update_network(
        &self,
        reference: &str,
        comment: &str,
        attributes: &IndexMap<String, String>,
    ) -> impl Future<Output = Result<String, CoreError>> + Send {
        (**self).update_network(reference, comment, attributes)
    }

    fn ensure_attribute_definition(
        &self,
        name: &str,
        attribute_type: AttributeType,
    ) -> impl Future<Output = Result<(), CoreError>> + Send {
        (**self).ensure_attribute_definition(name, attribute_type)
    }
}

// ── WAPI implementation ──────────────────────────────────────────────

fn to_wapi_attrs(attributes: &IndexMap<String, String>) -> BTreeMap<String, ExtAttrValue> {
    attributes
        .iter()
        .map(|(k, v)| (k.clone(), ExtAttrValue::text(v.as_str())))
        .collect()
}

impl IpamClient for WapiClient {
    async fn check_connectivity(&self) -> Result<(), CoreError> {
        self.verify_connection().await.map_err(CoreError::from)
    }

    async fn find_network_by_cidr(
        &self,
        cidr: &Cidr,
        view: &str,
    ) -> Result<Option<IpamNetwork>, CoreError> {
        let found = self
            .get_network(&cidr.to_string(), view)
            .await
            .map_err(CoreError::remote)?;
        Ok(found.map(IpamNetwork::from))
    }

    async fn find_overlapping_networks(
        &self,
        cidr: &Cidr,
        view: &str,
    ) -> Result<Vec<IpamNetwork>, CoreError> {
        let found = self
            .overlapping_networks(&cidr.to_string(), view)
            .await
            .map_err(CoreError::remote)?;
        Ok(found.into_iter().map(IpamNetwork::from).collect())
    }

    async fn create_network(
        &self,
        cidr: &Cidr,
        view: &str,
        comment: &str,
        attributes: &IndexMap<String, String>,
    ) -> Result<String, CoreError> {
        WapiClient::create_network(
            self,
            &cidr.to_string(),
            view,
            comment,
            to_wapi_attrs(attributes),
        )
        .await
        .map_err(CoreError::remote)
    }

    async fn update_network(
        &self,
        reference: &str,
        comment: &str,
        attributes: &IndexMap<String, String>,
    ) -> Result<String, CoreError> {
        WapiClient::update_network(self, reference, comment, to_wapi_attrs(attributes))
            .await
            .map_err(CoreError::remote)
    }

    async fn ensure_attribute_definition(
        &self,
        name: &str,
        attribute_type: AttributeType,
    ) -> Result<(), CoreError> {
        let def = ExtensibleAttributeDef {
            reference: String::new(),
            name: name.to_owned(),
            attr_type: attribute_type.to_string(),
            comment: "Auto-created by ipamsync".into(),
            flags: None,
            list_values: None,
        };
        match self.create_ea_definition(&def).await {
            Ok(Some(reference)) => {
                debug!(name, reference = %reference, "created attribute definition");
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) if e.is_conflict() => Ok(()),
            Err(e) => Err(CoreError::remote(e)),
        }
    }
}

// ── Connection bootstrap ─────────────────────────────────────────────

/// Build a WAPI client from `config` and verify the Grid Master answers.
pub async fn connect(config: &ConnectionConfig) -> Result<WapiClient, CoreError> {
    let client = build_client(config)?;
    client.verify_connection().await?;
    info!(grid = %config.grid_master, "connected to Grid Master");
    Ok(client)
}

/// Build a WAPI client without any network round trip.
pub fn build_client(config: &ConnectionConfig) -> Result<WapiClient, CoreError> {
    if config.grid_master.trim().is_empty() {
        return Err(CoreError::Config {
            message: "no Grid Master configured".into(),
        });
    }

    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    let transport = TransportConfig {
        tls,
        ..TransportConfig::default()
    }
    .with_timeout(config.timeout);

    let client = WapiClient::new(
        &config.grid_master,
        &config.wapi_version,
        config.username.clone(),
        config.password.clone(),
        &transport,
    )?;
    Ok(client.with_max_results(config.max_results))
}
