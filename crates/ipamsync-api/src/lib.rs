// ipamsync-api: Async Rust client for the Infoblox WAPI

pub mod error;
pub mod transport;
pub mod wapi;

pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use wapi::WapiClient;
pub use wapi::models::{
    ExtAttrValue, ExtensibleAttributeDef, GridInfo, GridMember, NetworkView, WapiNetwork,
};
