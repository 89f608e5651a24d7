// hubmate-api: Async Rust clients for the Hubitat Maker API, hub-local
// management endpoints, and the eWeLink smart-plug cloud.

pub mod error;
pub mod ewelink;
pub mod maker;
pub mod management;
pub mod transport;

pub use error::Error;
pub use ewelink::EweLinkClient;
pub use maker::MakerClient;
pub use management::ManagementClient;
pub use transport::TransportConfig;
