// Gateway response types
//
// `GetStates` returns every device paired with the gateway, not only
// shutters. Only `type` is guaranteed; everything else is optional because
// the field set depends on the device family.

use serde::{Deserialize, Serialize};

/// One entry of the `GetStates` JSON array.
///
/// Unknown fields (battery, rssi, etc. for non-shutter devices) land in
/// `extra` so nothing is lost when a caller wants to inspect them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDevice {
    /// Family tag: `WR`, `ER`, or any other device class the gateway knows.
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub adr: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawDevice {
    /// Minimal constructor, mostly for tests and fixtures.
    pub fn new(
        device_type: impl Into<String>,
        sid: impl Into<String>,
        adr: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            device_type: device_type.into(),
            sid: Some(sid.into()),
            adr: Some(adr.into()),
            state: Some(state.into()),
            extra: serde_json::Map::new(),
        }
    }
}
