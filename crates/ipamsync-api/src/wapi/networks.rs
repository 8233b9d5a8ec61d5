// WAPI network endpoints

use std::collections::BTreeMap;

use ipnet::IpNet;
use tracing::debug;

use crate::error::Error;
use crate::wapi::client::WapiClient;
use crate::wapi::models::{ExtAttrValue, NetworkCreate, NetworkUpdate, WapiNetwork};

/// Fields requested for every network read.
const NETWORK_FIELDS: &str = "network,network_view,comment,extattrs";

impl WapiClient {
    /// Look up a network by exact CIDR within a view.
    ///
    /// `GET network?network={cidr}&network_view={view}`
    pub async fn get_network(
        &self,
        network: &str,
        network_view: &str,
    ) -> Result<Option<WapiNetwork>, Error> {
        debug!(network, network_view, "looking up network");
        let found: Vec<WapiNetwork> = self
            .get(
                "network",
                &[
                    ("network", network.to_owned()),
                    ("network_view", network_view.to_owned()),
                    ("_return_fields", NETWORK_FIELDS.to_owned()),
                ],
            )
            .await?;
        Ok(found.into_iter().next())
    }

    /// List networks in a view, bounded by `_max_results`.
    ///
    /// `GET network?network_view={view}&_max_results={n}`
    pub async fn search_networks(
        &self,
        network_view: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<WapiNetwork>, Error> {
        let limit = max_results.unwrap_or_else(|| self.max_results());
        debug!(network_view, limit, "listing networks");
        self.get(
            "network",
            &[
                ("network_view", network_view.to_owned()),
                ("_max_results", limit.to_string()),
                ("_return_fields", NETWORK_FIELDS.to_owned()),
            ],
        )
        .await
    }

    /// All networks in the view whose address range intersects `network`.
    ///
    /// WAPI has no server-side overlap filter, so this lists the view and
    /// filters locally. Entries whose CIDR does not parse are ignored.
    pub async fn overlapping_networks(
        &self,
        network: &str,
        network_view: &str,
    ) -> Result<Vec<WapiNetwork>, Error> {
        let Some(proposed) = parse_net(network) else {
            return Ok(Vec::new());
        };
        let all = self.search_networks(network_view, None).await?;
        Ok(all
            .into_iter()
            .filter(|n| parse_net(&n.network).is_some_and(|r| nets_intersect(&proposed, &r)))
            .collect())
    }

    /// Create a network. Returns the new object's `_ref`.
    ///
    /// `POST network`
    pub async fn create_network(
        &self,
        network: &str,
        network_view: &str,
        comment: &str,
        extattrs: BTreeMap<String, ExtAttrValue>,
    ) -> Result<String, Error> {
        debug!(network, network_view, "creating network");
        self.post(
            "network",
            &NetworkCreate {
                network,
                network_view,
                comment,
                extattrs,
            },
        )
        .await
    }

    /// Replace a network's comment and extensible attributes.
    ///
    /// `PUT {ref}`
    pub async fn update_network(
        &self,
        reference: &str,
        comment: &str,
        extattrs: BTreeMap<String, ExtAttrValue>,
    ) -> Result<String, Error> {
        debug!(reference, "updating network");
        self.put(reference, &NetworkUpdate { comment, extattrs })
            .await
    }
}

// ── Overlap helpers ─────────────────────────────────────────────────

/// Parse a CIDR, clearing any host bits.
fn parse_net(cidr: &str) -> Option<IpNet> {
    cidr.parse::<IpNet>().ok().map(|n| n.trunc())
}

/// Two prefixes intersect exactly when one contains the other's network
/// address. Mixed families never do.
fn nets_intersect(a: &IpNet, b: &IpNet) -> bool {
    a.contains(&b.network()) || b.contains(&a.network())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn overlap(a: &str, b: &str) -> bool {
        nets_intersect(&parse_net(a).unwrap(), &parse_net(b).unwrap())
    }

    #[test]
    fn supernet_overlaps_both_halves() {
        assert!(overlap("10.0.0.0/23", "10.0.0.0/24"));
        assert!(overlap("10.0.0.0/23", "10.0.1.0/24"));
        assert!(!overlap("10.0.0.0/23", "10.0.2.0/24"));
    }

    #[test]
    fn families_never_overlap() {
        assert!(!overlap("0.0.0.0/0", "::/0"));
    }

    #[test]
    fn intersection_is_symmetric_and_reflexive() {
        for (a, b) in [
            ("10.0.0.0/23", "10.0.1.0/24"),
            ("10.0.0.0/24", "10.0.2.0/24"),
            ("2001:db8::/32", "2001:db8:1::/48"),
        ] {
            assert_eq!(overlap(a, b), overlap(b, a), "{a} vs {b}");
            assert!(overlap(a, a));
        }
    }

    #[test]
    fn host_bits_are_truncated() {
        assert_eq!(parse_net("10.0.1.7/23").unwrap().to_string(), "10.0.0.0/23");
        assert!(overlap("10.0.1.7/23", "10.0.0.0/24"));
    }

    #[test]
    fn garbage_is_not_a_network() {
        assert!(parse_net("not-a-cidr").is_none());
        assert!(parse_net("10.0.0.0/33").is_none());
    }
}
