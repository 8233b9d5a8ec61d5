// WAPI extensible attribute definition endpoints

use tracing::debug;

use crate::error::Error;
use crate::wapi::client::WapiClient;
use crate::wapi::models::ExtensibleAttributeDef;

const EA_FIELDS: &str = "name,type,comment,flags,list_values";

impl WapiClient {
    /// Fetch a single definition by name.
    ///
    /// `GET extensibleattributedef?name={name}`
    pub async fn get_ea_definition(
        &self,
        name: &str,
    ) -> Result<Option<ExtensibleAttributeDef>, Error> {
        let found: Vec<ExtensibleAttributeDef> = self
            .get(
                "extensibleattributedef",
                &[
                    ("name", name.to_owned()),
                    ("_return_fields", EA_FIELDS.to_owned()),
                ],
            )
            .await?;
        Ok(found.into_iter().next())
    }

    /// List every definition on the grid.
    pub async fn list_ea_definitions(&self) -> Result<Vec<ExtensibleAttributeDef>, Error> {
        self.get(
            "extensibleattributedef",
            &[
                ("_max_results", self.max_results().to_string()),
                ("_return_fields", EA_FIELDS.to_owned()),
            ],
        )
        .await
    }

    /// Create a definition unless one with the same name already exists.
    ///
    /// Returns `Ok(None)` when it was already present, otherwise the new
    /// object's `_ref`.
    pub async fn create_ea_definition(
        &self,
        def: &ExtensibleAttributeDef,
    ) -> Result<Option<String>, Error> {
        if self.get_ea_definition(&def.name).await?.is_some() {
            debug!(name = %def.name, "extensible attribute already defined");
            return Ok(None);
        }

        debug!(name = %def.name, attr_type = %def.attr_type, "creating extensible attribute");
        let reference: String = self.post("extensibleattributedef", def).await?;
        Ok(Some(reference))
    }
}
