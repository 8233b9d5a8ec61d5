// In-memory IPAM used by the core integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use ipamsync_core::{AttributeType, Cidr, CoreError, ExtAttrValue, IpamClient, IpamNetwork};

#[derive(Default)]
pub struct FakeIpam {
    networks: Mutex<Vec<IpamNetwork>>,
    definitions: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    fail_lookup: HashSet<String>,
    fail_create: HashSet<String>,
    fail_update: HashSet<String>,
    unreachable: bool,
    fail_definitions: bool,
    next_ref: AtomicUsize,
}

impl FakeIpam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_network(self, cidr: &str, comment: &str, attrs: &[(&str, &str)]) -> Self {
        let net = IpamNetwork {
            reference: format!("network/seed:{cidr}/default"),
            network: cidr.to_owned(),
            network_view: Some("default".into()),
            comment: comment.to_owned(),
            extattrs: attrs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), ExtAttrValue::text(*v)))
                .collect(),
        };
        self.networks.lock().unwrap().push(net);
        self
    }

    pub fn failing_lookup(mut self, cidr: &str) -> Self {
        self.fail_lookup.insert(cidr.to_owned());
        self
    }

    pub fn failing_create(mut self, cidr: &str) -> Self {
        self.fail_create.insert(cidr.to_owned());
        self
    }

    pub fn failing_update(mut self, reference: &str) -> Self {
        self.fail_update.insert(reference.to_owned());
        self
    }

    /// Every call fails as if the Grid Master were down.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn failing_definitions(mut self) -> Self {
        self.fail_definitions = true;
        self
    }

    pub fn networks(&self) -> Vec<IpamNetwork> {
        self.networks.lock().unwrap().clone()
    }

    pub fn network(&self, cidr: &str) -> Option<IpamNetwork> {
        self.networks().into_iter().find(|n| n.network == cidr)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn remote(message: &str) -> CoreError {
    CoreError::RemoteCall {
        message: message.to_owned(),
    }
}

fn to_extattrs(attributes: &IndexMap<String, String>) -> BTreeMap<String, ExtAttrValue> {
    attributes
        .iter()
        .map(|(k, v)| (k.clone(), ExtAttrValue::text(v.as_str())))
        .collect()
}

impl IpamClient for FakeIpam {
    async fn check_connectivity(&self) -> Result<(), CoreError> {
        self.log("ping".into());
        if self.unreachable {
            return Err(remote("connection refused"));
        }
        Ok(())
    }

    async fn find_network_by_cidr(
        &self,
        cidr: &Cidr,
        _view: &str,
    ) -> Result<Option<IpamNetwork>, CoreError> {
        let key = cidr.to_string();
        self.log(format!("find {key}"));
        if self.unreachable || self.fail_lookup.contains(&key) {
            return Err(remote("connection reset by peer"));
        }
        Ok(self.network(&key))
    }

    async fn find_overlapping_networks(
        &self,
        cidr: &Cidr,
        _view: &str,
    ) -> Result<Vec<IpamNetwork>, CoreError> {
        self.log(format!("overlap {cidr}"));
        Ok(self
            .networks()
            .into_iter()
            .filter(|n| {
                n.network
                    .parse::<Cidr>()
                    .is_ok_and(|existing| existing.overlaps(cidr))
            })
            .collect())
    }

    async fn create_network(
        &self,
        cidr: &Cidr,
        view: &str,
        comment: &str,
        attributes: &IndexMap<String, String>,
    ) -> Result<String, CoreError> {
        let key = cidr.to_string();
        self.log(format!("create {key}"));
        if self.fail_create.contains(&key) {
            return Err(remote("The network already exists."));
        }
        let n = self.next_ref.fetch_add(1, Ordering::SeqCst);
        let reference = format!("network/fake{n}:{key}/{view}");
        self.networks.lock().unwrap().push(IpamNetwork {
            reference: reference.clone(),
            network: key,
            network_view: Some(view.to_owned()),
            comment: comment.to_owned(),
            extattrs: to_extattrs(attributes),
        });
        Ok(reference)
    }

    async fn update_network(
        &self,
        reference: &str,
        comment: &str,
        attributes: &IndexMap<String, String>,
    ) -> Result<String, CoreError> {
        self.log(format!("update {reference}"));
        if self.fail_update.contains(reference) {
            return Err(remote("Reference not found"));
        }
        let mut nets = self.networks.lock().unwrap();
        let net = nets
            .iter_mut()
            .find(|n| n.reference == reference)
            .ok_or_else(|| remote("no such object"))?;
        net.comment = comment.to_owned();
        net.extattrs = to_extattrs(attributes);
        Ok(reference.to_owned())
    }

    async fn ensure_attribute_definition(
        &self,
        name: &str,
        _attribute_type: AttributeType,
    ) -> Result<(), CoreError> {
        self.log(format!("ensure {name}"));
        if self.fail_definitions {
            return Err(remote("write permission denied"));
        }
        self.definitions.lock().unwrap().insert(name.to_owned());
        Ok(())
    }
}
