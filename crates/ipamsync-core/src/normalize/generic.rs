// Header-sniffing adapter for GCP, Alibaba, property sheets, and custom CSVs.
//
// Known columns are picked by folded header name; every other non-empty
// column becomes a tag.

use crate::error::CoreError;
use crate::model::{NetworkRecord, Source};
use crate::normalize::table::{Row, fold_header};

const NAME_KEYS: &[&str] = &["name", "networkname", "subnetname", "vswitchname", "displayname"];

// CIDR-specific headers first: GCP uses `network` for the parent VPC.
const ADDRESS_KEYS: &[&str] = &[
    "cidr",
    "cidrblock",
    "ipcidrrange",
    "addressprefix",
    "addressspace",
    "iprange",
    "subnet",
    "prefix",
    "address",
    "network",
];

const DESCRIPTION_KEYS: &[&str] = &["description", "comment", "comments", "notes"];
const REGION_KEYS: &[&str] = &["region", "regionid", "location", "zone", "site"];
const CONTAINER_KEYS: &[&str] = &["vpcid", "vpc", "project", "projectid", "resourcegroup"];

pub(crate) fn normalize_row(
    row: Row<'_>,
    index: usize,
    source: Source,
) -> Result<NetworkRecord, CoreError> {
    let (address_col, address) = row
        .sniff(ADDRESS_KEYS)
        .ok_or_else(|| CoreError::validation("no CIDR column found"))?;
    let name = row.sniff(NAME_KEYS);
    let description = row.sniff(DESCRIPTION_KEYS);

    let name_value = name.map_or_else(
        || format!("{source}-network-{index}"),
        |(_, v)| v.to_owned(),
    );

    let mut record = NetworkRecord::new(name_value, address, source)?
        .with_description(description.map(|(_, v)| v).unwrap_or_default());
    record.region = row.sniff(REGION_KEYS).map(|(_, v)| v.to_owned());
    record.container_id = row.sniff(CONTAINER_KEYS).map(|(_, v)| v.to_owned());

    let used: Vec<&str> = [Some(address_col), name.map(|(h, _)| h), description.map(|(h, _)| h)]
        .into_iter()
        .flatten()
        .collect();

    for (header, value) in row.pairs() {
        if used.contains(&header) || fold_header(header) == "tags" {
            continue;
        }
        record.tags.insert(header.to_owned(), value.to_owned());
    }

    // An explicit tag column is decoded and merged last.
    if let Some((_, raw)) = row.sniff(&["tags"]) {
        record.tags.extend(super::tags::parse_tags(raw));
    }

    Ok(record)
}
