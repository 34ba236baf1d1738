// mediola-api: Async Rust client for the Mediola gateway HTTP command API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{GatewayClient, SUCCESS_MARKER, parse_states};
pub use error::Error;
pub use models::RawDevice;
pub use transport::TransportConfig;
