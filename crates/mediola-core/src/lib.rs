// mediola-core: Shutter codec and polling coordinator between mediola-api and consumers (CLI).

pub mod codec;
pub mod config;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::GatewayConfig;
pub use convert::filter_shutters;
pub use coordinator::{
    Coordinator, RefreshState, get_manufacturer, parse_position, supports_position,
};
pub use error::CoreError;
pub use store::{ShutterStore, Snapshot};

pub use model::{
    DeviceFamily, Motion, Position, Shutter, ShutterAction, ShutterFeature, manufacturer_for,
};
