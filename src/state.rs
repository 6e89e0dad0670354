//! C6 — the state transaction: validates a pending mode/format/property set
//! on `SET_STATE_CHECK` and applies it on `SET_STATE_COMMIT`, grounded in
//! `gud_req_set_state_check`/`gud_req_set_state_commit` in
//! `original_source/gud-pico/gud.c`.

use crate::format::{self, PixelFormat};
use crate::profile::{Hooks, Profile};
use crate::status::Status;
use crate::wire::{Property, SetBufferReq, StateReqHeader, PROPERTY_BACKLIGHT_BRIGHTNESS};

/// Single-slot pending state, overwritten by each `SET_STATE_CHECK`.
pub struct PendingState {
    header: StateReqHeader,
    properties: heapless::Vec<Property, { crate::wire::MAX_PROPERTIES }>,
    check_ok: bool,
}

impl Default for PendingState {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingState {
    pub const fn new() -> Self {
        Self {
            header: crate::wire::StateReqHeader {
                mode: crate::wire::Mode {
                    clock: [0; 4],
                    hdisplay: [0; 2],
                    hsync_start: [0; 2],
                    hsync_end: [0; 2],
                    htotal: [0; 2],
                    vdisplay: [0; 2],
                    vsync_start: [0; 2],
                    vsync_end: [0; 2],
                    vtotal: [0; 2],
                    flags: [0; 4],
                },
                format: 0,
                connector: 0,
            },
            properties: heapless::Vec::new(),
            check_ok: false,
        }
    }

    /// Validate `payload` against `profile`, per §4.5's five ordered checks.
    /// On success, returns the whole-frame rect to arm if the profile's
    /// `FULL_UPDATE` flag is set (only meaningful for the first frame after
    /// a mode change — the buffer engine re-arms on its own afterwards).
    pub fn check(
        &mut self,
        profile: &Profile,
        payload: &[u8],
    ) -> Result<Option<SetBufferReq>, Status> {
        self.check_ok = false;

        let header_size = core::mem::size_of::<StateReqHeader>();
        let property_size = core::mem::size_of::<Property>();

        if payload.len() < header_size {
            return Err(Status::ProtocolError);
        }
        let tail_len = payload.len() - header_size;
        if tail_len % property_size != 0 {
            return Err(Status::ProtocolError);
        }
        let num_properties = tail_len / property_size;
        if num_properties > profile.total_property_count() {
            return Err(Status::ProtocolError);
        }
        // A profile that advertises more properties than the pending-state
        // slot can hold is a device misconfiguration, not a bad request.
        if profile.total_property_count() > crate::wire::MAX_PROPERTIES {
            return Err(Status::Error);
        }

        let header: StateReqHeader = bytemuck::pod_read_unaligned(&payload[..header_size]);

        if header.mode.hdisplay() != profile.width as u16
            || header.mode.vdisplay() != profile.height as u16
        {
            return Err(Status::InvalidParameter);
        }
        if header.connector != 0 {
            return Err(Status::InvalidParameter);
        }

        let format = PixelFormat::from_wire(header.format).ok_or(Status::InvalidParameter)?;
        if !profile.supports_format(format) {
            return Err(Status::InvalidParameter);
        }

        let mut properties = heapless::Vec::new();
        for chunk in payload[header_size..].chunks_exact(property_size) {
            let property: Property = bytemuck::pod_read_unaligned(chunk);
            if property.id() == PROPERTY_BACKLIGHT_BRIGHTNESS && property.value() > 100 {
                return Err(Status::InvalidParameter);
            }
            // Unknown property ids are accepted and carried, not rejected.
            let _ = properties.push(property);
        }

        self.header = header;
        self.properties = properties;
        self.check_ok = true;

        if profile
            .flags
            .contains(crate::wire::DisplayFlags::FULL_UPDATE)
        {
            let length = format::buffer_length(format, profile.width, profile.height)
                .ok_or(Status::Error)?;
            Ok(Some(SetBufferReq {
                x: 0u32.to_le_bytes(),
                y: 0u32.to_le_bytes(),
                width: profile.width.to_le_bytes(),
                height: profile.height.to_le_bytes(),
                length: length.to_le_bytes(),
                compression: 0,
                compressed_length: 0u32.to_le_bytes(),
            }))
        } else {
            Ok(None)
        }
    }

    /// Apply the last-checked state (§4.5 COMMIT). Idempotent: repeat
    /// commits without an intervening CHECK are permitted.
    pub fn commit(&self, hooks: &mut impl Hooks) -> Result<(), Status> {
        if !self.check_ok {
            return Err(Status::InvalidParameter);
        }
        hooks.state_commit(&self.header, &self.properties)
    }

    pub fn header(&self) -> &StateReqHeader {
        &self.header
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn check_ok(&self) -> bool {
        self.check_ok
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/state.rs"]
mod tests;
