// WAPI wire types
//
// Only the fields ipamsync reads or writes are modelled; WAPI returns
// `_ref` on every object regardless of `_return_fields`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Error body returned by WAPI on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct WapiErrorBody {
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A single extensible attribute value: `{"value": ...}`.
///
/// WAPI stores STRING attributes as JSON strings but INTEGER attributes as
/// numbers, so the raw value is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtAttrValue {
    pub value: serde_json::Value,
}

impl ExtAttrValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: serde_json::Value::String(value.into()),
        }
    }

    /// Render the value as the string a tag would carry.
    pub fn as_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// `network` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WapiNetwork {
    #[serde(rename = "_ref")]
    pub reference: String,
    pub network: String,
    #[serde(default)]
    pub network_view: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub extattrs: BTreeMap<String, ExtAttrValue>,
}

/// Body for `POST network`.
#[derive(Debug, Serialize)]
pub(crate) struct NetworkCreate<'a> {
    pub network: &'a str,
    pub network_view: &'a str,
    pub comment: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extattrs: BTreeMap<String, ExtAttrValue>,
}

/// Body for `PUT {ref}`. `extattrs` replaces the whole attribute set.
#[derive(Debug, Serialize)]
pub(crate) struct NetworkUpdate<'a> {
    pub comment: &'a str,
    pub extattrs: BTreeMap<String, ExtAttrValue>,
}

/// `extensibleattributedef` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensibleAttributeDef {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: String,
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_values: Option<Vec<ListValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListValue {
    pub value: String,
}

/// `networkview` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkView {
    #[serde(rename = "_ref")]
    pub reference: String,
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_default: bool,
}

/// `grid` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridInfo {
    #[serde(rename = "_ref")]
    pub reference: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `member` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridMember {
    #[serde(rename = "_ref")]
    pub reference: String,
    pub host_name: String,
    #[serde(default)]
    pub platform: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ext_attr_text_renders_numbers_and_strings() {
        assert_eq!(ExtAttrValue::text("prod").as_text(), "prod");
        let num = ExtAttrValue { value: json!(42) };
        assert_eq!(num.as_text(), "42");
    }

    #[test]
    fn network_defaults_missing_fields() {
        let net: WapiNetwork = serde_json::from_value(json!({
            "_ref": "network/ZG5z:10.0.0.0/24/default",
            "network": "10.0.0.0/24"
        }))
        .unwrap();
        assert_eq!(net.comment, "");
        assert!(net.extattrs.is_empty());
        assert!(net.network_view.is_none());
    }
}
