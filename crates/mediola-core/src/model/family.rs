// ── Device families ──
//
// The gateway tags every device with a short family code. Only two of
// them are shutter actuators; every other tag is resolved to `None` at
// the boundary and never reaches the encoder.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Manufacturer reported for tags that are not a known shutter family.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";

/// Shutter actuator family, keyed by the gateway's `type` tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum DeviceFamily {
    /// WIR roller shutters (`WR`). Absolute positioning supported.
    #[serde(rename = "WR")]
    #[strum(serialize = "WR")]
    Wir,
    /// Elero shutters (`ER`). Open/close/stop only.
    #[serde(rename = "ER")]
    #[strum(serialize = "ER")]
    Elero,
}

impl DeviceFamily {
    pub const ALL: [Self; 2] = [Self::Wir, Self::Elero];

    /// Resolve a gateway tag. Matching is exact: `wr` is not `WR`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.parse().ok()
    }

    /// The gateway tag, as sent in the `type` query parameter.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Wir => "WR",
            Self::Elero => "ER",
        }
    }

    pub fn manufacturer(self) -> &'static str {
        match self {
            Self::Wir => "WIR",
            Self::Elero => "Elero",
        }
    }

    /// Whether the family accepts an absolute set-position command.
    pub fn supports_position(self) -> bool {
        matches!(self, Self::Wir)
    }
}

/// Manufacturer name for any tag, known or not.
pub fn manufacturer_for(tag: &str) -> &'static str {
    DeviceFamily::from_tag(tag).map_or(UNKNOWN_MANUFACTURER, DeviceFamily::manufacturer)
}
