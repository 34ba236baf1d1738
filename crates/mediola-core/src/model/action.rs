use serde::{Deserialize, Serialize};

/// A user command addressed to one shutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "position")]
pub enum ShutterAction {
    Open,
    Close,
    Stop,
    /// Absolute target in gateway convention (0 = open, 100 = closed).
    SetPosition(u8),
}

impl ShutterAction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Stop => "stop",
            Self::SetPosition(_) => "set_position",
        }
    }
}
