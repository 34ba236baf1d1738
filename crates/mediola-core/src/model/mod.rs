// ── Domain model ──
//
// Normalized shutter types produced by the device filter and consumed by
// the coordinator and its callers.

pub mod action;
pub mod family;
pub mod position;
pub mod shutter;

pub use action::ShutterAction;
pub use family::{DeviceFamily, UNKNOWN_MANUFACTURER, manufacturer_for};
pub use position::{Motion, Position};
pub use shutter::{Shutter, ShutterFeature};
