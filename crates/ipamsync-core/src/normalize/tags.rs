// Tag column decoding shared by the provider adapters.

use indexmap::IndexMap;
use serde_json::Value;

/// Decode a tag cell.
///
/// Accepts an AWS-style JSON list (`[{"Key": "Name", "Value": "web"}]`), a
/// JSON object, or `k=v,k=v` pairs. Anything else yields no tags.
pub fn parse_tags(raw: &str) -> IndexMap<String, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| {
                let key = obj.get("Key").map(value_text).unwrap_or_default();
                let value = obj.get("Value").map(value_text).unwrap_or_default();
                (key, value)
            })
            .collect(),
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(k, v)| (k, value_text(&v)))
            .collect(),
        Ok(_) => IndexMap::new(),
        Err(_) => parse_pairs(raw),
    }
}

/// Decode a JSON object cell, keeping the raw text under `raw_tags` when
/// it is not JSON.
pub fn parse_json_tags(raw: &str) -> IndexMap<String, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(k, v)| (k, value_text(&v)))
            .collect(),
        Ok(_) => IndexMap::new(),
        Err(_) => IndexMap::from([("raw_tags".to_owned(), raw.to_owned())]),
    }
}

fn parse_pairs(raw: &str) -> IndexMap<String, String> {
    raw.split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .collect()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
