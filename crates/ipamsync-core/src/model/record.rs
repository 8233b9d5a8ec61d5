// ── Canonical network record ──

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::cidr::Cidr;
use crate::error::CoreError;

/// Where a record came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Source {
    Aws,
    Azure,
    Gcp,
    Alibaba,
    Properties,
    Custom,
}

/// One network, normalized from any source.
///
/// `tags` keeps insertion order; the pass-through attribute mapping
/// depends on it when sanitized keys collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub name: String,
    pub address: Cidr,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: IndexMap<String, String>,
    pub source: Source,

    // Provenance, carried but not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// VPC id, VNet, or resource group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl NetworkRecord {
    /// Build a record, validating the name and CIDR.
    pub fn new(name: impl Into<String>, address: &str, source: Source) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::validation("network name must not be empty"));
        }
        Ok(Self {
            name,
            address: address.parse()?,
            description: String::new(),
            tags: IndexMap::new(),
            source,
            account_id: None,
            region: None,
            container_id: None,
            state: None,
            is_default: false,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}
