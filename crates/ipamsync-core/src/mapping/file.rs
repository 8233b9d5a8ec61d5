use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::model::MappingRule;

/// On-disk mapping configuration: `{ "description": ..., "mappings": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mappings: Vec<MappingRule>,
}

/// Load mapping rules from a JSON file.
///
/// A bare JSON array of rules is accepted as well as the wrapped form.
pub fn load_mapping_file(path: &Path) -> Result<MappingConfig, CoreError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CoreError::Input {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let config = match serde_json::from_str::<MappingConfig>(&raw) {
        Ok(config) => config,
        Err(wrapped_err) => match serde_json::from_str::<Vec<MappingRule>>(&raw) {
            Ok(mappings) => MappingConfig {
                description: String::new(),
                mappings,
            },
            Err(_) => {
                return Err(CoreError::Input {
                    path: path.to_path_buf(),
                    message: format!("invalid mapping file: {wrapped_err}"),
                });
            }
        },
    };

    debug!(path = %path.display(), rules = config.mappings.len(), "loaded mapping rules");
    Ok(config)
}
