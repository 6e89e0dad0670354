//! C4/C5 — the GET and SET request dispatchers, plus the `Engine` that
//! owns the per-connection state (C6 pending state, C7 pending rect, C8
//! status cell) the source kept in static globals. Grounded in
//! `gud_req_get`/`gud_req_set` in `original_source/gud-pico/gud.c`.

use core::marker::PhantomData;

use crate::buffer::{Decompressor, PendingRect};
use crate::debug;
use crate::edid;
use crate::format::PixelFormat;
use crate::profile::{Hooks, Profile};
use crate::state::PendingState;
use crate::status::{Status, StatusCell};
use crate::wire::{
    self, ConnectorDescriptor, ConnectorStatus, ConnectorType, DisplayDescriptor, Mode, Property,
    SetBufferReq,
};

/// Owns everything the source kept in statically-allocated globals: the
/// status cell, the pending state slot, and the pending buffer-rect. A
/// transport implementation holds one `Engine` per connected interface.
pub struct Engine<'a, H: Hooks> {
    profile: &'a Profile<'a>,
    state: PendingState,
    rect: PendingRect,
    status: StatusCell,
    _hooks: PhantomData<H>,
}

impl<'a, H: Hooks> Engine<'a, H> {
    pub fn new(profile: &'a Profile<'a>) -> Self {
        Self {
            profile,
            state: PendingState::new(),
            rect: PendingRect::new(),
            status: StatusCell::new(),
            _hooks: PhantomData,
        }
    }

    pub fn profile(&self) -> &Profile<'a> {
        self.profile
    }

    pub fn pending_rect(&self) -> &PendingRect {
        &self.rect
    }

    pub fn status(&self) -> StatusCell {
        self.status
    }

    /// C4 — dispatch a vendor GET request (control-transfer IN), writing
    /// the response into `out` and returning the byte count written.
    /// `hooks` is only consulted for `GET_CONNECTOR_EDID`'s serial number.
    pub fn get(
        &mut self,
        hooks: &mut H,
        request: u8,
        index: u16,
        out: &mut [u8],
    ) -> Result<usize, Status> {
        debug::println!("engine::get: request={} index={}", request, index);

        if request == wire::GET_STATUS {
            let bytes = self.status.to_wire();
            let n = bytes.len().min(out.len());
            out[..n].copy_from_slice(&bytes[..n]);
            return Ok(n);
        }

        self.status.clear();
        let result = self.dispatch_get(hooks, request, index, out);
        self.status
            .record(result.as_ref().map(|_| ()).map_err(|e| *e));
        result
    }

    fn dispatch_get(
        &mut self,
        hooks: &mut H,
        request: u8,
        index: u16,
        out: &mut [u8],
    ) -> Result<usize, Status> {
        if index != 0 {
            return Err(Status::ProtocolError);
        }

        match request {
            wire::GET_DESCRIPTOR => {
                if out.is_empty() {
                    return Err(Status::ProtocolError);
                }
                let desc = DisplayDescriptor::new(
                    self.profile.flags,
                    self.profile.compression,
                    self.profile.max_buffer_size.unwrap_or(0),
                    self.profile.width,
                    self.profile.height,
                );
                Ok(copy_truncated(bytemuck::bytes_of(&desc), out))
            }
            wire::GET_FORMATS => {
                if out.is_empty() {
                    return Err(Status::ProtocolError);
                }
                let n = self.profile.formats.len().min(out.len());
                for (dst, format) in out[..n].iter_mut().zip(self.profile.formats.iter()) {
                    *dst = format.to_wire();
                }
                Ok(n)
            }
            wire::GET_PROPERTIES => write_properties(self.profile.properties, out),
            wire::GET_CONNECTORS => {
                if out.len() < core::mem::size_of::<ConnectorDescriptor>() {
                    return Err(Status::ProtocolError);
                }
                let desc =
                    ConnectorDescriptor::new(ConnectorType::Panel, wire::ConnectorFlags::empty());
                Ok(copy_truncated(bytemuck::bytes_of(&desc), out))
            }
            wire::GET_CONNECTOR_PROPERTIES => {
                write_properties(self.profile.connector_properties, out)
            }
            wire::GET_CONNECTOR_STATUS => {
                if out.is_empty() {
                    return Err(Status::ProtocolError);
                }
                out[0] = ConnectorStatus::Connected.to_wire();
                Ok(1)
            }
            wire::GET_CONNECTOR_MODES => {
                if out.len() < core::mem::size_of::<Mode>() {
                    return Err(Status::ProtocolError);
                }
                let mode = Mode::synthetic(self.profile.width, self.profile.height);
                Ok(copy_truncated(bytemuck::bytes_of(&mode), out))
            }
            wire::GET_CONNECTOR_EDID => {
                let serial = hooks.serial_number().unwrap_or(0);
                Ok(edid::synthesize(self.profile, serial, out))
            }
            _ => Err(Status::RequestNotSupported),
        }
    }

    /// C5 — dispatch a vendor SET request (control-transfer OUT, already
    /// past the data stage).
    pub fn set(
        &mut self,
        hooks: &mut H,
        request: u8,
        index: u16,
        payload: &[u8],
    ) -> Result<(), Status> {
        debug::println!(
            "engine::set: request={} index={} len={}",
            request,
            index,
            payload.len()
        );
        self.status.clear();
        let result = self.dispatch_set(hooks, request, index, payload);
        if request == wire::SET_BUFFER && result.is_ok() {
            // The rect is staged but its pixels haven't arrived yet; stays
            // pending until `complete_buffer_transfer`/`fail_buffer_transfer`
            // resolves it (§4.7).
            self.status.set_pending();
        } else {
            self.status.record(result);
        }
        result
    }

    fn dispatch_set(
        &mut self,
        hooks: &mut H,
        request: u8,
        index: u16,
        payload: &[u8],
    ) -> Result<(), Status> {
        if index != 0 {
            return Err(Status::ProtocolError);
        }

        match request {
            wire::SET_CONNECTOR_FORCE_DETECT => Ok(()),
            wire::SET_BUFFER => {
                if payload.len() != core::mem::size_of::<SetBufferReq>() {
                    return Err(Status::ProtocolError);
                }
                let req: SetBufferReq = bytemuck::pod_read_unaligned(payload);
                let format = self.current_format()?;
                self.rect.stage(self.profile, format, req, hooks)
            }
            wire::SET_STATE_CHECK => match self.state.check(self.profile, payload)? {
                Some(full_update_rect) => {
                    self.rect.rearm_full_update(full_update_rect);
                    Ok(())
                }
                None => Ok(()),
            },
            wire::SET_STATE_COMMIT => self.state.commit(hooks),
            wire::SET_CONTROLLER_ENABLE => {
                let enable = single_byte(payload)?;
                hooks.controller_enable(enable != 0)
            }
            wire::SET_DISPLAY_ENABLE => {
                let enable = single_byte(payload)?;
                hooks.display_enable(enable != 0)
            }
            _ => Err(Status::RequestNotSupported),
        }
    }

    fn current_format(&self) -> Result<PixelFormat, Status> {
        PixelFormat::from_wire(self.state.header().format).ok_or(Status::InvalidParameter)
    }

    /// Advance the chunked bulk OUT transfer (§4.4 step 3), returning
    /// whether the declared total has now been received.
    pub fn on_bulk_chunk(&mut self, chunk_len: u32) -> Result<bool, Status> {
        self.rect.advance(chunk_len)
    }

    /// Finish a completed bulk transfer: decompress if needed, blit via
    /// `write_buffer`, and re-arm the next `FULL_UPDATE` frame if
    /// configured (§4.4 steps 4-6).
    pub fn complete_buffer_transfer(
        &mut self,
        hooks: &mut H,
        received: &[u8],
        framebuffer: &mut [u8],
        decompressor: &mut impl Decompressor,
    ) -> Result<(), Status> {
        let format = self.current_format().unwrap_or(PixelFormat::Xrgb8888);
        let result = self.rect.complete(
            self.profile,
            format,
            received,
            framebuffer,
            decompressor,
            hooks,
        );
        self.status.record(result);
        result
    }

    /// A transport-level transfer failure (§4.6): the host must resend
    /// `SET_BUFFER` before the next attempt.
    pub fn fail_buffer_transfer(&mut self) {
        self.rect.fail_transfer();
        self.status.record(Err(Status::Error));
    }
}

fn copy_truncated(src: &[u8], out: &mut [u8]) -> usize {
    let n = src.len().min(out.len());
    out[..n].copy_from_slice(&src[..n]);
    n
}

fn write_properties(properties: &[Property], out: &mut [u8]) -> Result<usize, Status> {
    let property_size = core::mem::size_of::<Property>();
    let capacity = out.len() - (out.len() % property_size);
    if capacity == 0 {
        return Err(Status::ProtocolError);
    }
    let n = core::mem::size_of_val(properties).min(capacity);
    out[..n].copy_from_slice(&bytemuck::cast_slice(properties)[..n]);
    Ok(n)
}

fn single_byte(payload: &[u8]) -> Result<u8, Status> {
    match payload {
        [byte] => Ok(*byte),
        _ => Err(Status::RequestNotSupported),
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/engine.rs"]
mod tests;
