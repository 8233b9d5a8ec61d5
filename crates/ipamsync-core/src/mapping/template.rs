use crate::mapping::MappingConfig;
use crate::model::{AttributeType, MappingRule, Source};

fn rule(tag: &str, target: &str) -> MappingRule {
    MappingRule::new(tag, target)
}

fn enum_rule(tag: &str, target: &str, values: &[&str]) -> MappingRule {
    MappingRule {
        attribute_type: AttributeType::Enum,
        list_values: Some(values.iter().map(|v| (*v).to_owned()).collect()),
        ..MappingRule::new(tag, target)
    }
}

/// Starter mapping configuration for a source.
///
/// Sources without a dedicated template get the AWS one.
pub fn template_for(source: Option<Source>) -> MappingConfig {
    let mappings = match source {
        Some(Source::Azure) => vec![
            rule("Name", "Name"),
            rule("Environment", "Environment"),
            rule("ResourceGroup", "Azure RG"),
        ],
        Some(Source::Properties) => vec![
            rule("Environment", "Environment"),
            rule("Owner", "Network_Owner"),
            rule("Department", "Department"),
            rule("Cost_Center", "Cost_Center"),
            enum_rule(
                "Site_Type",
                "Site_Type",
                &["Office", "Branch", "Datacenter", "Lab", "Cloud"],
            ),
            enum_rule(
                "Compliance",
                "Compliance",
                &["GDPR", "HIPAA", "PCI-DSS", "SOC2", "None"],
            ),
        ],
        _ => vec![
            rule("Name", "Name"),
            rule("Environment", "Environment"),
            rule("AWS_AccountId", "AWS Account"),
            rule("AWS_Region", "AWS Region"),
            rule("AWS_VpcId", "AWS VPC ID"),
        ],
    };

    let label = source.map_or_else(|| "all".to_owned(), |s| s.to_string());
    MappingConfig {
        description: format!("EA mapping configuration for {label} networks"),
        mappings,
    }
}
