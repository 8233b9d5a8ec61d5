// ── Tag to attribute mapping ──
//
// Turns a record's tags into the extensible attribute set submitted to
// the IPAM. Pure apart from the import timestamp.

mod file;
mod template;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;

use crate::model::{MappingRule, NetworkRecord};

pub use file::{MappingConfig, load_mapping_file};
pub use template::template_for;

/// Provenance attribute carrying the record's source.
pub const IMPORT_SOURCE_ATTR: &str = "Import_Source";
/// Provenance attribute carrying the import time (RFC 3339).
pub const IMPORT_DATE_ATTR: &str = "Import_Date";

/// Map tags to attributes, stamping the current time.
pub fn map_tags_to_attributes(
    record: &NetworkRecord,
    rules: &[MappingRule],
) -> IndexMap<String, String> {
    map_with_timestamp(record, rules, Utc::now())
}

/// Map tags to attributes with an explicit import time.
///
/// With rules: each rule in order reads `tags[source_tag]`, falling back to
/// its default, applies its transform, and writes a non-empty result under
/// its target name. Without rules: every tag passes through with spaces and
/// hyphens in the key replaced by `_`. Provenance attributes are always set
/// last and overwrite any rule output of the same name.
pub fn map_with_timestamp(
    record: &NetworkRecord,
    rules: &[MappingRule],
    now: DateTime<Utc>,
) -> IndexMap<String, String> {
    let mut attrs = IndexMap::new();

    if rules.is_empty() {
        for (key, value) in &record.tags {
            attrs.insert(sanitize_key(key), value.clone());
        }
    } else {
        for rule in rules {
            let Some(raw) = record
                .tags
                .get(&rule.source_tag)
                .or(rule.default_value.as_ref())
            else {
                continue;
            };
            let value = match &rule.transform {
                Some(t) => t.apply(raw),
                None => raw.clone(),
            };
            if !value.is_empty() {
                attrs.insert(rule.target_attribute.clone(), value);
            }
        }
    }

    attrs.insert(IMPORT_SOURCE_ATTR.to_owned(), record.source.to_string());
    attrs.insert(
        IMPORT_DATE_ATTR.to_owned(),
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    attrs
}

fn sanitize_key(key: &str) -> String {
    key.replace([' ', '-'], "_")
}
