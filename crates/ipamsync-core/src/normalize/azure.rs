// Azure VNet export adapter.

use crate::error::CoreError;
use crate::model::{NetworkRecord, Source};
use crate::normalize::table::Row;
use crate::normalize::tags::parse_json_tags;

pub(crate) fn normalize_row(row: Row<'_>, index: usize) -> Result<NetworkRecord, CoreError> {
    let address = row
        .first(&["addressSpace", "AddressPrefix"])
        .ok_or_else(|| CoreError::validation("missing addressSpace"))?;
    let name = row
        .first(&["name", "Name"])
        .map_or_else(|| format!("azure-network-{index}"), str::to_owned);
    let resource_group = row.get("resourceGroup");

    let mut record = NetworkRecord::new(name, address, Source::Azure)?.with_description(format!(
        "Azure Network - {}",
        resource_group.unwrap_or("Unknown RG")
    ));
    record.tags = row
        .first(&["tags", "Tags"])
        .map(parse_json_tags)
        .unwrap_or_default();
    record.region = row.first(&["location", "Location"]).map(str::to_owned);
    record.container_id = resource_group.map(str::to_owned);

    Ok(record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::normalize::table::Table;

    #[test]
    fn azure_row_maps_columns() {
        let t = Table::from_csv_reader(
            "name,addressSpace,resourceGroup,location,tags\nhub,10.10.0.0/16,rg-net,westeurope,\"{\"\"Env\"\":\"\"prod\"\"}\"\n"
                .as_bytes(),
        )
        .unwrap();
        let rec = normalize_row(t.rows().next().unwrap(), 0).unwrap();
        assert_eq!(rec.name, "hub");
        assert_eq!(rec.description, "Azure Network - rg-net");
        assert_eq!(rec.region.as_deref(), Some("westeurope"));
        assert_eq!(rec.tags["Env"], "prod");
    }

    #[test]
    fn defaults_when_optional_columns_missing() {
        let t = Table::from_csv_reader("AddressPrefix\n10.20.0.0/24\n".as_bytes()).unwrap();
        let rec = normalize_row(t.rows().next().unwrap(), 4).unwrap();
        assert_eq!(rec.name, "azure-network-4");
        assert_eq!(rec.description, "Azure Network - Unknown RG");
        assert!(rec.tags.is_empty());
    }
}
