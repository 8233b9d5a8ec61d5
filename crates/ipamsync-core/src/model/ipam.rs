// ── IPAM-side view of a network ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use ipamsync_api::ExtAttrValue;

/// A network as it exists in the IPAM. Read-only to core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpamNetwork {
    /// Opaque object reference (`_ref`).
    pub reference: String,
    /// CIDR as the IPAM returned it.
    pub network: String,
    pub network_view: Option<String>,
    pub comment: String,
    pub extattrs: BTreeMap<String, ExtAttrValue>,
}

impl IpamNetwork {
    /// Attribute value rendered as a string, if present.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.extattrs.get(name).map(ExtAttrValue::as_text)
    }
}

/// Extensible attribute data type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum AttributeType {
    #[default]
    String,
    Integer,
    Enum,
    Email,
    Url,
    Date,
}
