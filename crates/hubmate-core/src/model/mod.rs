// ── Domain model ──

pub mod device;
pub mod hub;

pub use device::{Device, DeviceKind, KindGroup};
pub use hub::{Hub, PollConfig, RebootConfig, RetryConfig};
