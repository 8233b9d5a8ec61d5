// WAPI grid, network view, and member endpoints

use tracing::debug;

use crate::error::Error;
use crate::wapi::client::WapiClient;
use crate::wapi::models::{GridInfo, GridMember, NetworkView};

impl WapiClient {
    /// `GET grid`
    pub async fn grid_info(&self) -> Result<Vec<GridInfo>, Error> {
        self.get("grid", &[("_return_fields", "name".to_owned())])
            .await
    }

    /// `GET networkview`
    pub async fn list_network_views(&self) -> Result<Vec<NetworkView>, Error> {
        self.get(
            "networkview",
            &[("_return_fields", "name,comment,is_default".to_owned())],
        )
        .await
    }

    /// `GET member`
    pub async fn list_members(&self) -> Result<Vec<GridMember>, Error> {
        self.get(
            "member",
            &[("_return_fields", "host_name,platform".to_owned())],
        )
        .await
    }

    /// Cheap authenticated round trip against the grid object.
    pub async fn verify_connection(&self) -> Result<(), Error> {
        let grids = self.grid_info().await?;
        debug!(count = grids.len(), base = %self.base_url(), "grid reachable");
        Ok(())
    }
}
