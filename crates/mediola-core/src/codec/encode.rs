use crate::error::CoreError;
use crate::model::position::FULLY_CLOSED;
use crate::model::{DeviceFamily, ShutterAction};

const WIR_PREFIX: &str = "01";
const WIR_OPEN: &str = "010101";
const WIR_CLOSE: &str = "010102";
const WIR_STOP: &str = "010103";
const WIR_SET_POSITION: &str = "0107";

const ELERO_UP: &str = "08";
const ELERO_DOWN: &str = "09";
const ELERO_STOP: &str = "02";

/// Two-digit uppercase hex of a gateway position (`72` -> `48`).
pub fn position_hex(position: u8) -> String {
    format!("{position:02X}")
}

impl DeviceFamily {
    /// Build the `data` payload for a `SendSC` request.
    ///
    /// Fails without side effects for positions above 100 and for
    /// set-position on families that cannot do it.
    pub fn encode(self, address: &str, action: ShutterAction) -> Result<String, CoreError> {
        match self {
            Self::Wir => {
                let suffix = match action {
                    ShutterAction::Open => WIR_OPEN.to_owned(),
                    ShutterAction::Close => WIR_CLOSE.to_owned(),
                    ShutterAction::Stop => WIR_STOP.to_owned(),
                    ShutterAction::SetPosition(p) if p > FULLY_CLOSED => {
                        return Err(CoreError::ValidationFailed {
                            message: format!("position {p} is outside 0-100"),
                        });
                    }
                    ShutterAction::SetPosition(p) => {
                        format!("{WIR_SET_POSITION}{}", position_hex(p))
                    }
                };
                Ok(format!("{WIR_PREFIX}{address}{suffix}"))
            }
            Self::Elero => {
                let code = match action {
                    ShutterAction::Open => ELERO_UP,
                    ShutterAction::Close => ELERO_DOWN,
                    ShutterAction::Stop => ELERO_STOP,
                    ShutterAction::SetPosition(_) => {
                        return Err(CoreError::Unsupported {
                            operation: action.name().into(),
                            family: self.tag().into(),
                        });
                    }
                };
                Ok(format!("{address}{code}"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ADR: &str = "2E105601";

    #[test]
    fn wir_commands() {
        let wir = DeviceFamily::Wir;
        assert_eq!(wir.encode(ADR, ShutterAction::Open).unwrap(), "012E105601010101");
        assert_eq!(wir.encode(ADR, ShutterAction::Close).unwrap(), "012E105601010102");
        assert_eq!(wir.encode(ADR, ShutterAction::Stop).unwrap(), "012E105601010103");
    }

    #[test]
    fn wir_set_position_uses_uppercase_hex() {
        let wir = DeviceFamily::Wir;
        assert_eq!(
            wir.encode(ADR, ShutterAction::SetPosition(0)).unwrap(),
            "012E105601010700"
        );
        assert_eq!(
            wir.encode(ADR, ShutterAction::SetPosition(72)).unwrap(),
            "012E105601010748"
        );
        assert_eq!(
            wir.encode(ADR, ShutterAction::SetPosition(100)).unwrap(),
            "012E105601010764"
        );
        assert_eq!(
            wir.encode(ADR, ShutterAction::SetPosition(58)).unwrap(),
            "012E10560101073A"
        );
    }

    #[test]
    fn wir_rejects_position_above_100() {
        let err = DeviceFamily::Wir
            .encode(ADR, ShutterAction::SetPosition(101))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }), "{err:?}");
    }

    #[test]
    fn elero_commands() {
        let er = DeviceFamily::Elero;
        assert_eq!(er.encode("09", ShutterAction::Open).unwrap(), "0908");
        assert_eq!(er.encode("09", ShutterAction::Close).unwrap(), "0909");
        assert_eq!(er.encode("09", ShutterAction::Stop).unwrap(), "0902");
    }

    #[test]
    fn elero_set_position_is_unsupported() {
        for p in [0, 50, 100] {
            let err = DeviceFamily::Elero
                .encode("09", ShutterAction::SetPosition(p))
                .unwrap_err();
            assert!(matches!(err, CoreError::Unsupported { .. }), "{err:?}");
        }
    }

    #[test]
    fn position_hex_range() {
        assert_eq!(position_hex(0), "00");
        assert_eq!(position_hex(10), "0A");
        assert_eq!(position_hex(100), "64");
    }
}
