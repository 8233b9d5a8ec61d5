// ── API-to-domain conversions ──

use ipamsync_api::WapiNetwork;

use crate::model::IpamNetwork;

impl From<WapiNetwork> for IpamNetwork {
    fn from(n: WapiNetwork) -> Self {
        Self {
            reference: n.reference,
            network: n.network,
            network_view: n.network_view,
            comment: n.comment,
            extattrs: n.extattrs,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wapi_network_keeps_reference_and_attributes() {
        let wapi: WapiNetwork = serde_json::from_value(serde_json::json!({
            "_ref": "network/abc:10.0.0.0/24/default",
            "network": "10.0.0.0/24",
            "comment": "lab",
            "extattrs": { "Site": { "value": 7 } }
        }))
        .unwrap();
        let net = IpamNetwork::from(wapi);
        assert_eq!(net.reference, "network/abc:10.0.0.0/24/default");
        assert_eq!(net.attribute("Site").as_deref(), Some("7"));
    }
}
