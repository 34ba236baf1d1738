// ── Shutter record ──
//
// One addressable actuator from the latest poll. Everything beyond the
// four gateway fields is derived on demand from `family` and `state`.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::family::DeviceFamily;
use super::position::{Motion, Position};

/// Capabilities a shutter exposes to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShutterFeature {
    Open,
    Close,
    Stop,
    SetPosition,
}

/// A shutter as reported by the gateway, filtered to a supported family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shutter {
    /// Short gateway identifier, unique within a snapshot.
    pub sid: String,
    /// Radio address used to build command strings.
    pub adr: String,
    #[serde(rename = "type")]
    pub family: DeviceFamily,
    /// Raw family-specific state string.
    pub state: String,
}

impl Shutter {
    pub fn new(
        sid: impl Into<String>,
        adr: impl Into<String>,
        family: DeviceFamily,
        state: impl Into<String>,
    ) -> Self {
        Self {
            sid: sid.into(),
            adr: adr.into(),
            family,
            state: state.into(),
        }
    }

    pub fn position(&self) -> Position {
        self.family.decode(&self.state)
    }

    /// Direction of travel; `None` for families that never report it.
    pub fn motion(&self) -> Option<Motion> {
        self.family.motion(&self.state)
    }

    pub fn cover_position(&self) -> Option<u8> {
        self.position().cover()
    }

    pub fn is_closed(&self) -> Option<bool> {
        self.position().is_closed()
    }

    pub fn is_open(&self) -> Option<bool> {
        self.position().is_open()
    }

    pub fn name(&self) -> String {
        format!("Shutter {}", self.sid)
    }

    pub fn manufacturer(&self) -> &'static str {
        self.family.manufacturer()
    }

    pub fn model(&self) -> String {
        format!("{} Shutter", self.family.tag())
    }

    pub fn features(&self) -> Vec<ShutterFeature> {
        let mut features = vec![ShutterFeature::Open, ShutterFeature::Close, ShutterFeature::Stop];
        if self.family.supports_position() {
            features.push(ShutterFeature::SetPosition);
        }
        features
    }
}
