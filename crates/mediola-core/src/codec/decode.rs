use tracing::{debug, error, warn};

use crate::model::position::FULLY_CLOSED;
use crate::model::{DeviceFamily, Motion, Position};

/// Elero state codes as reported in the `state` field.
pub mod elero {
    pub const OPEN: &str = "1001";
    pub const CLOSED: &str = "1002";
    pub const INTERMEDIATE: &str = "100D";
    pub const MOVING_UP: &str = "100A";
    pub const MOVING_DOWN: &str = "100B";
}

/// Minimum length of a WIR state string (`XXPPZZ`).
const WIR_STATE_LEN: usize = 6;

impl DeviceFamily {
    /// Decode a raw state string into a gateway-convention position.
    ///
    /// WIR never yields `Unknown`: a short or non-hex state reads as open.
    pub fn decode(self, state: &str) -> Position {
        match self {
            Self::Wir => Position::Known(decode_wir(state)),
            Self::Elero => decode_elero(state),
        }
    }

    /// Direction of travel, for families that report one.
    pub fn motion(self, state: &str) -> Option<Motion> {
        match self {
            Self::Wir => None,
            Self::Elero => Some(match state {
                elero::MOVING_UP => Motion::Opening,
                elero::MOVING_DOWN => Motion::Closing,
                _ => Motion::Stationary,
            }),
        }
    }
}

fn decode_wir(state: &str) -> u8 {
    if state.chars().count() < WIR_STATE_LEN {
        debug!(state, "WIR state too short, assuming open");
        return 0;
    }
    let byte: String = state.chars().skip(2).take(2).collect();
    match u8::from_str_radix(&byte, 16) {
        Ok(position) if position > FULLY_CLOSED => {
            warn!(state, position, "WIR position out of range, clamping to closed");
            FULLY_CLOSED
        }
        Ok(position) => position,
        Err(_) => {
            error!(state, "could not parse position from WIR state");
            0
        }
    }
}

fn decode_elero(state: &str) -> Position {
    match state {
        elero::OPEN => Position::Known(0),
        elero::CLOSED => Position::Known(100),
        elero::INTERMEDIATE => Position::Known(50),
        elero::MOVING_UP | elero::MOVING_DOWN => Position::Unknown,
        other => {
            warn!(state = other, "unknown Elero state code");
            Position::Unknown
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::position_hex;
    use crate::model::ShutterAction;

    #[test]
    fn wir_positions() {
        let wir = DeviceFamily::Wir;
        assert_eq!(wir.decode("016400"), Position::Known(100));
        assert_eq!(wir.decode("010000"), Position::Known(0));
        assert_eq!(wir.decode("014800"), Position::Known(72));
    }

    #[test]
    fn wir_malformed_defaults_to_open() {
        let wir = DeviceFamily::Wir;
        assert_eq!(wir.decode("01ZZ00"), Position::Known(0));
        assert_eq!(wir.decode("0164"), Position::Known(0));
        assert_eq!(wir.decode(""), Position::Known(0));
    }

    #[test]
    fn wir_out_of_range_clamps_to_closed() {
        let wir = DeviceFamily::Wir;
        assert_eq!(wir.decode("01FF00"), Position::Known(100));
        assert_eq!(wir.decode("016500"), Position::Known(100));
    }

    #[test]
    fn wir_never_reports_motion() {
        assert_eq!(DeviceFamily::Wir.motion("016400"), None);
    }

    #[test]
    fn wir_hex_roundtrip_over_full_range() {
        for p in 0..=100u8 {
            let state = format!("01{}00", position_hex(p));
            assert_eq!(DeviceFamily::Wir.decode(&state), Position::Known(p), "p={p}");
        }
    }

    #[test]
    fn wir_encoded_position_decodes_back() {
        // The set-position payload carries the same hex byte the state reports.
        for p in [0u8, 1, 50, 99, 100] {
            let cmd = DeviceFamily::Wir
                .encode("AB", ShutterAction::SetPosition(p))
                .unwrap();
            let byte = &cmd[cmd.len() - 2..];
            let state = format!("01{byte}00");
            assert_eq!(DeviceFamily::Wir.decode(&state), Position::Known(p));
        }
    }

    #[test]
    fn elero_known_codes() {
        let er = DeviceFamily::Elero;
        assert_eq!(er.decode("1001"), Position::Known(0));
        assert_eq!(er.decode("1002"), Position::Known(100));
        assert_eq!(er.decode("100D"), Position::Known(50));
    }

    #[test]
    fn elero_moving_is_unknown_with_direction() {
        let er = DeviceFamily::Elero;
        assert_eq!(er.decode("100A"), Position::Unknown);
        assert_eq!(er.motion("100A"), Some(Motion::Opening));
        assert_eq!(er.decode("100B"), Position::Unknown);
        assert_eq!(er.motion("100B"), Some(Motion::Closing));
    }

    #[test]
    fn elero_unrecognized_code() {
        let er = DeviceFamily::Elero;
        assert_eq!(er.decode("9999"), Position::Unknown);
        let motion = er.motion("9999").unwrap();
        assert!(!motion.is_opening());
        assert!(!motion.is_closing());
    }
}
