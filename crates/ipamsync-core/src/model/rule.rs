// ── Tag to attribute mapping rules ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::ipam::AttributeType;

/// Value transform applied by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    Uppercase,
    Lowercase,
    /// Prepend a literal.
    Prefix(String),
}

impl Transform {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::Uppercase => value.to_uppercase(),
            Self::Lowercase => value.to_lowercase(),
            Self::Prefix(lit) => format!("{lit}{value}"),
        }
    }
}

impl FromStr for Transform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(lit) = s.strip_prefix("prefix:") {
            return Ok(Self::Prefix(lit.to_owned()));
        }
        match s.to_ascii_lowercase().as_str() {
            "uppercase" => Ok(Self::Uppercase),
            "lowercase" => Ok(Self::Lowercase),
            other => Err(CoreError::validation(format!(
                "unknown transform '{other}' (expected uppercase, lowercase, or prefix:<text>)"
            ))),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uppercase => f.write_str("uppercase"),
            Self::Lowercase => f.write_str("lowercase"),
            Self::Prefix(lit) => write!(f, "prefix:{lit}"),
        }
    }
}

impl Serialize for Transform {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Transform {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One tag-to-attribute rule. Rules apply in order; the last rule writing
/// a given attribute wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub source_tag: String,
    #[serde(alias = "target_ea")]
    pub target_attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, alias = "ea_type")]
    pub attribute_type: AttributeType,
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
    /// Allowed values for ENUM definitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_values: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

impl MappingRule {
    pub fn new(source_tag: impl Into<String>, target_attribute: impl Into<String>) -> Self {
        Self {
            source_tag: source_tag.into(),
            target_attribute: target_attribute.into(),
            transform: None,
            default_value: None,
            attribute_type: AttributeType::String,
            create_if_missing: true,
            list_values: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn transform_parses_prefix_literal_verbatim() {
        assert_eq!(
            "prefix:ENV-".parse::<Transform>().unwrap(),
            Transform::Prefix("ENV-".into())
        );
        assert_eq!("UPPERCASE".parse::<Transform>().unwrap(), Transform::Uppercase);
        assert!("reverse".parse::<Transform>().is_err());
    }

    #[test]
    fn rule_accepts_legacy_field_names() {
        let rule: MappingRule = serde_json::from_str(
            r#"{"source_tag":"Owner","target_ea":"Network_Owner","ea_type":"STRING","transform":"lowercase"}"#,
        )
        .unwrap();
        assert_eq!(rule.target_attribute, "Network_Owner");
        assert_eq!(rule.transform, Some(Transform::Lowercase));
        assert!(rule.create_if_missing);
        assert_eq!(rule.attribute_type, AttributeType::String);
    }
}
