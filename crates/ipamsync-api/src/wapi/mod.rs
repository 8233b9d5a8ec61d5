// WAPI client modules
//
// Hand-written client for the Infoblox Web API. `client` owns transport
// mechanics; endpoint groups are inherent methods in their own files.

pub mod client;
pub mod extattrs;
pub mod grid;
pub mod models;
pub mod networks;

pub use client::WapiClient;
