// AWS VPC export adapter.
//
// Columns: AccountId, Region, VpcId, Name, CidrBlock, IsDefault, State,
// Tags. Extra columns (DhcpOptionsId, InstanceTenancy, ...) are ignored.

use crate::error::CoreError;
use crate::model::{NetworkRecord, Source};
use crate::normalize::table::Row;
use crate::normalize::tags::parse_tags;

pub(crate) fn normalize_row(row: Row<'_>) -> Result<NetworkRecord, CoreError> {
    let cidr = row
        .get("CidrBlock")
        .ok_or_else(|| CoreError::validation("missing CidrBlock"))?;
    let vpc = row.get("VpcId").unwrap_or_default();
    let region = row.get("Region").unwrap_or_default();
    let state = row.get("State").unwrap_or("available");
    let account = row.get("AccountId");

    let tags = row.get("Tags").map(parse_tags).unwrap_or_default();

    let name = row
        .get("Name")
        .map(str::to_owned)
        .or_else(|| tags.get("Name").filter(|n| !n.is_empty()).cloned())
        .unwrap_or_else(|| format!("aws-{vpc}-{}", cidr.replace('/', "-")));

    let mut description = format!("AWS VPC: {vpc}");
    if !region.is_empty() {
        description.push_str(&format!(" | Region: {region}"));
    }
    description.push_str(&format!(" | State: {state}"));

    let mut record = NetworkRecord::new(name, cidr, Source::Aws)?.with_description(description);
    record.tags = tags;
    if let Some(account) = account {
        record.tags.insert("AWS_AccountId".into(), account.to_owned());
    }
    record.tags.insert("AWS_Region".into(), region.to_owned());
    record.tags.insert("AWS_VpcId".into(), vpc.to_owned());
    record.tags.insert("AWS_State".into(), state.to_owned());

    record.account_id = account.map(str::to_owned);
    record.region = Some(region.to_owned()).filter(|r| !r.is_empty());
    record.container_id = Some(vpc.to_owned()).filter(|v| !v.is_empty());
    record.state = Some(state.to_owned());
    record.is_default = row.get("IsDefault").is_some_and(parse_bool);

    Ok(record)
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "1.0")
}
