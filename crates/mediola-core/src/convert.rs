// ── Gateway-to-domain conversion ──
//
// `GetStates` lists every paired device. This module narrows that list to
// shutters the codec understands, keeping gateway order.

use std::collections::HashSet;

use mediola_api::RawDevice;
use tracing::{trace, warn};

use crate::model::{DeviceFamily, Shutter};

/// Keep only `WR` and `ER` entries, in gateway order.
///
/// Unsupported families are dropped silently. A shutter without `sid` or
/// `adr` cannot be addressed and is skipped. A repeated `sid` keeps its
/// first occurrence.
pub fn filter_shutters(raw_devices: impl IntoIterator<Item = RawDevice>) -> Vec<Shutter> {
    let mut seen = HashSet::new();
    let mut shutters = Vec::new();

    for raw in raw_devices {
        let Some(family) = DeviceFamily::from_tag(&raw.device_type) else {
            trace!(device_type = %raw.device_type, "skipping non-shutter device");
            continue;
        };
        let (Some(sid), Some(adr)) = (raw.sid, raw.adr) else {
            warn!(family = %family, "skipping shutter without sid or adr");
            continue;
        };
        if !seen.insert(sid.clone()) {
            warn!(sid = %sid, "duplicate shutter sid, keeping first entry");
            continue;
        }
        shutters.push(Shutter::new(sid, adr, family, raw.state.unwrap_or_default()));
    }

    shutters
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn raw(device_type: &str, sid: &str) -> RawDevice {
        RawDevice::new(device_type, sid, format!("A{sid}"), "010000")
    }

    #[test]
    fn keeps_supported_families_in_order() {
        let devices = vec![raw("WR", "01"), raw("XX", "02"), raw("ER", "03"), raw("YY", "04")];
        let sids: Vec<String> = filter_shutters(devices).into_iter().map(|s| s.sid).collect();
        assert_eq!(sids, ["01", "03"]);
    }

    #[test]
    fn maps_fields() {
        let shutters = filter_shutters(vec![RawDevice::new("ER", "02", "09", "1002")]);
        assert_eq!(shutters, [Shutter::new("02", "09", DeviceFamily::Elero, "1002")]);
    }

    #[test]
    fn skips_entries_without_address() {
        let mut missing_adr = raw("WR", "01");
        missing_adr.adr = None;
        let mut missing_sid = raw("ER", "02");
        missing_sid.sid = None;
        let shutters = filter_shutters(vec![missing_adr, missing_sid, raw("WR", "03")]);
        assert_eq!(shutters.len(), 1);
        assert_eq!(shutters[0].sid, "03");
    }

    #[test]
    fn missing_state_is_empty() {
        let mut device = raw("WR", "01");
        device.state = None;
        let shutters = filter_shutters(vec![device]);
        assert_eq!(shutters[0].state, "");
    }

    #[test]
    fn duplicate_sid_keeps_first() {
        let first = RawDevice::new("WR", "01", "AAAA", "014800");
        let second = RawDevice::new("ER", "01", "09", "1001");
        let shutters = filter_shutters(vec![first, second]);
        assert_eq!(shutters, [Shutter::new("01", "AAAA", DeviceFamily::Wir, "014800")]);
    }

    #[test]
    fn empty_input() {
        assert!(filter_shutters(Vec::new()).is_empty());
    }
}
