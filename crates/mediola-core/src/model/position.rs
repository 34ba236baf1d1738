use serde::{Deserialize, Serialize};
use strum::Display;

/// Highest gateway position (fully closed).
pub const FULLY_CLOSED: u8 = 100;

/// Decoded shutter position in gateway convention: 0 = open, 100 = closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Known(u8),
    /// Moving, or a state code the decoder does not recognize.
    Unknown,
}

impl Position {
    pub fn value(self) -> Option<u8> {
        match self {
            Self::Known(p) => Some(p),
            Self::Unknown => None,
        }
    }

    /// Position in host convention: 100 = open, 0 = closed.
    ///
    /// Out-of-range raw values (a WIR byte above `0x64`) saturate at 0.
    pub fn cover(self) -> Option<u8> {
        self.value().map(|p| FULLY_CLOSED.saturating_sub(p))
    }

    pub fn is_closed(self) -> Option<bool> {
        self.cover().map(|c| c == 0)
    }

    pub fn is_open(self) -> Option<bool> {
        self.value().map(|p| p == 0)
    }
}

/// Direction of travel. Only Elero reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Motion {
    Opening,
    Closing,
    Stationary,
}

impl Motion {
    pub fn is_opening(self) -> bool {
        self == Self::Opening
    }

    pub fn is_closing(self) -> bool {
        self == Self::Closing
    }
}
