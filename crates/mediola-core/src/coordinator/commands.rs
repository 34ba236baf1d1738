// ── Shutter commands ──
//
// Encode, send, then ask for a refresh so the snapshot catches up. The
// boolean entry points never fail: errors are logged and reported as
// `false`. The `try_` variant keeps the error for callers that need it.

use tracing::{debug, error, warn};

use super::Coordinator;
use crate::error::CoreError;
use crate::model::{DeviceFamily, Position, ShutterAction, manufacturer_for};

impl Coordinator {
    pub async fn open(&self, device_type: &str, sid: &str, adr: &str) -> bool {
        self.execute(device_type, sid, adr, ShutterAction::Open).await
    }

    pub async fn close(&self, device_type: &str, sid: &str, adr: &str) -> bool {
        self.execute(device_type, sid, adr, ShutterAction::Close).await
    }

    pub async fn stop(&self, device_type: &str, sid: &str, adr: &str) -> bool {
        self.execute(device_type, sid, adr, ShutterAction::Stop).await
    }

    /// Move to `percent` in gateway convention (0 = open, 100 = closed).
    ///
    /// Families without absolute positioning report `false` without
    /// contacting the gateway.
    pub async fn set_position(&self, device_type: &str, sid: &str, adr: &str, percent: u8) -> bool {
        self.execute(device_type, sid, adr, ShutterAction::SetPosition(percent))
            .await
    }

    /// Send `action` and report whether the gateway accepted it.
    pub async fn execute(
        &self,
        device_type: &str,
        sid: &str,
        adr: &str,
        action: ShutterAction,
    ) -> bool {
        match self.try_execute(device_type, sid, adr, action).await {
            Ok(accepted) => accepted,
            Err(e @ (CoreError::Unsupported { .. } | CoreError::ValidationFailed { .. })) => {
                warn!(sid, device_type, action = action.name(), error = %e, "command not sent");
                false
            }
            Err(e) => {
                error!(sid, device_type, action = action.name(), error = %e, "command failed");
                false
            }
        }
    }

    /// Like [`execute`](Self::execute) but surfaces why a command failed.
    ///
    /// A refresh is requested whenever a request reached the transport,
    /// whatever the gateway answered.
    pub async fn try_execute(
        &self,
        device_type: &str,
        sid: &str,
        adr: &str,
        action: ShutterAction,
    ) -> Result<bool, CoreError> {
        let result = self.dispatch(device_type, sid, adr, action).await;
        let sent = match &result {
            Ok(_) => true,
            Err(e) => e.is_connectivity(),
        };
        if sent {
            self.request_refresh();
        }
        result
    }

    /// Run `action` on the shutter `sid` from the current snapshot.
    pub async fn command(&self, sid: &str, action: ShutterAction) -> Result<bool, CoreError> {
        let shutter = self
            .shutter(sid)
            .ok_or_else(|| CoreError::ShutterNotFound { sid: sid.into() })?;
        self.try_execute(shutter.family.tag(), &shutter.sid, &shutter.adr, action)
            .await
    }

    // ── Group commands ───────────────────────────────────────────

    /// Open every shutter in the snapshot. Returns how many were accepted.
    pub async fn open_all(&self) -> usize {
        self.execute_all(ShutterAction::Open).await
    }

    pub async fn close_all(&self) -> usize {
        self.execute_all(ShutterAction::Close).await
    }

    pub async fn stop_all(&self) -> usize {
        self.execute_all(ShutterAction::Stop).await
    }

    async fn execute_all(&self, action: ShutterAction) -> usize {
        let snapshot = self.snapshot();
        let mut accepted = 0;

        for shutter in &snapshot.shutters {
            match self
                .dispatch(shutter.family.tag(), &shutter.sid, &shutter.adr, action)
                .await
            {
                Ok(true) => accepted += 1,
                Ok(false) => {}
                Err(e) => {
                    error!(sid = %shutter.sid, action = action.name(), error = %e, "command failed");
                }
            }
        }

        debug!(action = action.name(), accepted, total = snapshot.len(), "group command sent");
        self.request_refresh();
        accepted
    }

    // ── Dispatch ─────────────────────────────────────────────────

    /// Resolve the family, encode and send. Never requests a refresh.
    async fn dispatch(
        &self,
        device_type: &str,
        sid: &str,
        adr: &str,
        action: ShutterAction,
    ) -> Result<bool, CoreError> {
        let family = DeviceFamily::from_tag(device_type).ok_or_else(|| {
            CoreError::UnsupportedFamily {
                family: device_type.into(),
            }
        })?;
        let data = family.encode(adr, action)?;

        debug!(sid, family = %family, action = action.name(), data = %data, "sending shutter command");
        let accepted = self.inner.client.send_command(family.tag(), &data).await?;
        if !accepted {
            warn!(sid, action = action.name(), "gateway did not accept command");
        }
        Ok(accepted)
    }
}

// ── Stateless helpers ────────────────────────────────────────────

/// Decode `state` for the family tagged `device_type`.
///
/// Unknown tags decode to [`Position::Unknown`].
pub fn parse_position(device_type: &str, state: &str) -> Position {
    DeviceFamily::from_tag(device_type).map_or(Position::Unknown, |f| f.decode(state))
}

pub fn get_manufacturer(device_type: &str) -> &'static str {
    manufacturer_for(device_type)
}

pub fn supports_position(device_type: &str) -> bool {
    DeviceFamily::from_tag(device_type).is_some_and(DeviceFamily::supports_position)
}
