//! C1 — the display profile: the immutable, device-supplied description of
//! geometry, formats, properties and EDID seed, plus the capability hooks
//! the engine calls out to.
//!
//! The five hook methods map to a single trait with defaultable methods
//! (the design note in `SPEC_FULL.md` §9 calls for exactly this — no
//! virtual-inheritance hierarchy is needed), grounded in
//! `cotton-usb-host`'s own `DescriptorVisitor` trait (`src/wire.rs`), whose
//! `on_configuration`/`on_interface`/`on_endpoint`/`on_other` methods all
//! default to a no-op body: a thin interface an integrator implements once
//! for their board.

use crate::format::PixelFormat;
use crate::status::Status;
use crate::wire::{Compression, DisplayFlags, Property, SetBufferReq, StateReqHeader};

/// The device-supplied EDID seed (§4.1). `name` must be 1-13 bytes and
/// `pnp` must be three uppercase ASCII letters for `edid::synthesize` to
/// produce a non-empty block (§4.1 edge cases).
#[derive(Copy, Clone)]
pub struct EdidSeed<'a> {
    pub name: &'a str,
    pub pnp: [u8; 3],
    pub product_code: u16,
    pub year: u16,
    pub width_mm: u16,
    pub height_mm: u16,
}

/// Capability hooks an integrator implements for their board. Every method
/// has a no-op default so a profile only needs to override the ones it
/// cares about.
pub trait Hooks {
    /// Read the device's serial number for the EDID block, if it has one.
    fn serial_number(&mut self) -> Option<u32> {
        None
    }

    fn controller_enable(&mut self, _enable: bool) -> Result<(), Status> {
        Ok(())
    }

    fn display_enable(&mut self, _enable: bool) -> Result<(), Status> {
        Ok(())
    }

    /// Called on `SET_STATE_COMMIT` with the checked state and how many of
    /// its trailing properties are populated.
    fn state_commit(
        &mut self,
        _state: &StateReqHeader,
        _properties: &[Property],
    ) -> Result<(), Status> {
        Ok(())
    }

    /// Called synchronously from `SET_BUFFER`, before the bulk transfer is
    /// armed — a chance to halt a prior DMA push of the framebuffer.
    fn set_buffer(&mut self, _rect: &SetBufferReq) -> Result<(), Status> {
        Ok(())
    }

    /// Called once the framebuffer holds the rectangle's pixels (after
    /// decompression, if any). The engine guarantees this is never called
    /// while a bulk transfer for the next rectangle is in flight.
    fn write_buffer(&mut self, _rect: &SetBufferReq, _framebuffer: &[u8]) {}
}

/// C1 — static, device-supplied description of a single-connector display.
pub struct Profile<'a> {
    pub width: u32,
    pub height: u32,
    pub flags: DisplayFlags,
    pub compression: Compression,
    pub max_buffer_size: Option<u32>,
    pub formats: &'a [PixelFormat],
    pub properties: &'a [Property],
    pub connector_properties: &'a [Property],
    pub edid: Option<EdidSeed<'a>>,
}

impl<'a> Profile<'a> {
    pub fn supports_format(&self, format: PixelFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Total number of properties (connector + non-connector) the profile
    /// exposes — the cap that `SET_STATE_CHECK` validates an incoming
    /// property count against (§4.5 check 1).
    pub fn total_property_count(&self) -> usize {
        self.properties.len() + self.connector_properties.len()
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/profile.rs"]
mod tests;
