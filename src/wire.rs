//! C3 — the wire codec: request/descriptor codes and the fixed binary
//! control-message layouts, little-endian and packed.
//!
//! Multi-byte fields are stored as `[u8; N]` rather than native `u16`/`u32`
//! so that `bytemuck::Pod` derivation does not depend on host endianness or
//! alignment — each field is read and written with explicit
//! `{to,from}_le_bytes` accessors rather than by reinterpreting memory,
//! which is what keeps this codec correct on big-endian and
//! strict-alignment targets (see `original_source/gud-pico/gud.h` for the
//! packed-C-struct layout this mirrors).
//!
//! Struct sizes here are the sizes implied by each struct's own field list
//! (and match `sizeof()` of the original C structs), which for the display
//! descriptor, set-buffer and mode/state-header structs differ from the
//! byte counts named in the distilled specification text — see
//! `SPEC_FULL.md` §3 and `DESIGN.md` for the resolution.

use bytemuck::{Pod, Zeroable};

// --- Request codes (bRequest) -----------------------------------------

pub const GET_STATUS: u8 = 0x00;
pub const GET_DESCRIPTOR: u8 = 0x01;
pub const GET_FORMATS: u8 = 0x40;
pub const GET_PROPERTIES: u8 = 0x41;
pub const GET_CONNECTORS: u8 = 0x50;
pub const GET_CONNECTOR_PROPERTIES: u8 = 0x51;
pub const SET_CONNECTOR_FORCE_DETECT: u8 = 0x53;
pub const GET_CONNECTOR_STATUS: u8 = 0x54;
pub const GET_CONNECTOR_MODES: u8 = 0x55;
pub const GET_CONNECTOR_EDID: u8 = 0x56;
pub const SET_BUFFER: u8 = 0x60;
pub const SET_STATE_CHECK: u8 = 0x61;
pub const SET_STATE_COMMIT: u8 = 0x62;
pub const SET_CONTROLLER_ENABLE: u8 = 0x63;
pub const SET_DISPLAY_ENABLE: u8 = 0x64;

pub const DISPLAY_MAGIC: u32 = 0x1d50_614d;
pub const PROTOCOL_VERSION: u8 = 1;

pub const FORMATS_MAX_NUM: usize = 32;
pub const PROPERTIES_MAX_NUM: usize = 32;
pub const CONNECTORS_MAX_NUM: usize = 32;
pub const CONNECTOR_MAX_NUM_MODES: usize = 128;
pub const CONNECTOR_MAX_EDID_LEN: usize = 2048;

/// Maximum number of properties the pending state can carry (matches
/// `GUD_MAX_PROPERTIES` in `original_source/gud-pico/gud.c`).
pub const MAX_PROPERTIES: usize = 8;

// --- Property ids -------------------------------------------------------
//
// Carried in full even though this engine only special-cases
// `BACKLIGHT_BRIGHTNESS` (§4.5): the rest are data the profile can expose
// and the host can set, validated only by "is it a known id" — unknown ids
// are silently ignored, matching `original_source`.

pub const PROPERTY_TV_LEFT_MARGIN: u16 = 1;
pub const PROPERTY_TV_RIGHT_MARGIN: u16 = 2;
pub const PROPERTY_TV_TOP_MARGIN: u16 = 3;
pub const PROPERTY_TV_BOTTOM_MARGIN: u16 = 4;
pub const PROPERTY_TV_MODE: u16 = 5;
pub const PROPERTY_TV_BRIGHTNESS: u16 = 6;
pub const PROPERTY_TV_CONTRAST: u16 = 7;
pub const PROPERTY_TV_FLICKER_REDUCTION: u16 = 8;
pub const PROPERTY_TV_OVERSCAN: u16 = 9;
pub const PROPERTY_TV_SATURATION: u16 = 10;
pub const PROPERTY_TV_HUE: u16 = 11;
pub const PROPERTY_BACKLIGHT_BRIGHTNESS: u16 = 12;
pub const PROPERTY_ROTATION: u16 = 50;

bitflags::bitflags! {
    /// `GUD_ROTATION_*`: the bitmask value of the `ROTATION` property.
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub struct Rotation: u64 {
        const ROTATE_0 = 1 << 0;
        const ROTATE_90 = 1 << 1;
        const ROTATE_180 = 1 << 2;
        const ROTATE_270 = 1 << 3;
        const REFLECT_X = 1 << 4;
        const REFLECT_Y = 1 << 5;
    }
}

bitflags::bitflags! {
    /// `GUD_DISPLAY_FLAG_*`.
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    pub struct DisplayFlags: u32 {
        const STATUS_ON_SET = 1 << 0;
        const FULL_UPDATE = 1 << 1;
    }
}

bitflags::bitflags! {
    /// `GUD_COMPRESSION_*`.
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    pub struct Compression: u8 {
        const LZ4 = 1 << 0;
    }
}

bitflags::bitflags! {
    /// `GUD_DISPLAY_MODE_FLAG_*`: bits 0-9 are RandR/DRM-compatible, bit 10
    /// is an internal "preferred mode" flag reusing space the DRM bit
    /// definitions have deprecated.
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    pub struct ModeFlags: u32 {
        const PHSYNC = 1 << 0;
        const NHSYNC = 1 << 1;
        const PVSYNC = 1 << 2;
        const NVSYNC = 1 << 3;
        const INTERLACE = 1 << 4;
        const DBLSCAN = 1 << 5;
        const CSYNC = 1 << 6;
        const PCSYNC = 1 << 7;
        const NCSYNC = 1 << 8;
        const HSKEW = 1 << 9;
        const PREFERRED = 1 << 10;
        const DBLCLK = 1 << 12;
        const CLKDIV2 = 1 << 13;
    }
}

bitflags::bitflags! {
    /// `GUD_CONNECTOR_FLAGS_*`.
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    pub struct ConnectorFlags: u32 {
        const POLL_STATUS = 1 << 0;
        const INTERLACE = 1 << 1;
        const DOUBLESCAN = 1 << 2;
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectorType {
    Panel = 0,
    Vga = 1,
    Composite = 2,
    Svideo = 3,
    Component = 4,
    Dvi = 5,
    DisplayPort = 6,
    Hdmi = 7,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectorStatus {
    Disconnected = 0x00,
    Connected = 0x01,
    Unknown = 0x02,
}

impl ConnectorStatus {
    /// `GUD_CONNECTOR_STATUS_CHANGED` is never set by this single-connector,
    /// never-hotplugged engine, so the wire byte is just the status value.
    pub const fn to_wire(self) -> u8 {
        self as u8
    }
}

// --- Packed wire structs -------------------------------------------------

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct DisplayDescriptor {
    pub magic: [u8; 4],
    pub version: u8,
    pub flags: [u8; 4],
    pub compression: u8,
    pub max_buffer_size: [u8; 4],
    pub min_width: [u8; 4],
    pub max_width: [u8; 4],
    pub min_height: [u8; 4],
    pub max_height: [u8; 4],
}

impl DisplayDescriptor {
    pub fn new(
        flags: DisplayFlags,
        compression: Compression,
        max_buffer_size: u32,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            magic: DISPLAY_MAGIC.to_le_bytes(),
            version: PROTOCOL_VERSION,
            flags: flags.bits().to_le_bytes(),
            compression: compression.bits(),
            max_buffer_size: max_buffer_size.to_le_bytes(),
            min_width: width.to_le_bytes(),
            max_width: width.to_le_bytes(),
            min_height: height.to_le_bytes(),
            max_height: height.to_le_bytes(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Property {
    pub id: [u8; 2],
    pub value: [u8; 8],
}

impl Property {
    pub const fn new(id: u16, value: u64) -> Self {
        Self {
            id: id.to_le_bytes(),
            value: value.to_le_bytes(),
        }
    }

    pub fn id(&self) -> u16 {
        u16::from_le_bytes(self.id)
    }

    pub fn value(&self) -> u64 {
        u64::from_le_bytes(self.value)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct ConnectorDescriptor {
    pub connector_type: u8,
    pub flags: [u8; 4],
}

impl ConnectorDescriptor {
    pub fn new(connector_type: ConnectorType, flags: ConnectorFlags) -> Self {
        Self {
            connector_type: connector_type as u8,
            flags: flags.bits().to_le_bytes(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Mode {
    pub clock: [u8; 4],
    pub hdisplay: [u8; 2],
    pub hsync_start: [u8; 2],
    pub hsync_end: [u8; 2],
    pub htotal: [u8; 2],
    pub vdisplay: [u8; 2],
    pub vsync_start: [u8; 2],
    pub vsync_end: [u8; 2],
    pub vtotal: [u8; 2],
    pub flags: [u8; 4],
}

impl Mode {
    pub fn hdisplay(&self) -> u16 {
        u16::from_le_bytes(self.hdisplay)
    }

    pub fn vdisplay(&self) -> u16 {
        u16::from_le_bytes(self.vdisplay)
    }

    pub fn flags(&self) -> ModeFlags {
        ModeFlags::from_bits_truncate(u32::from_le_bytes(self.flags))
    }

    /// The single synthetic mode this engine's one connector advertises:
    /// totals equal to the display geometry and a nominal 1 kHz clock,
    /// matching `gud_req_get_connector_modes` in `original_source`.
    pub fn synthetic(width: u32, height: u32) -> Self {
        let w = width as u16;
        let h = height as u16;
        Self {
            clock: 1u32.to_le_bytes(),
            hdisplay: w.to_le_bytes(),
            hsync_start: w.to_le_bytes(),
            hsync_end: w.to_le_bytes(),
            htotal: w.to_le_bytes(),
            vdisplay: h.to_le_bytes(),
            vsync_start: h.to_le_bytes(),
            vsync_end: h.to_le_bytes(),
            vtotal: h.to_le_bytes(),
            flags: 0u32.to_le_bytes(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct StateReqHeader {
    pub mode: Mode,
    pub format: u8,
    pub connector: u8,
}

#[repr(C)]
#[cfg_attr(feature = "std", derive(Debug, PartialEq, Eq))]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct SetBufferReq {
    pub x: [u8; 4],
    pub y: [u8; 4],
    pub width: [u8; 4],
    pub height: [u8; 4],
    pub length: [u8; 4],
    pub compression: u8,
    pub compressed_length: [u8; 4],
}

impl SetBufferReq {
    pub fn x(&self) -> u32 {
        u32::from_le_bytes(self.x)
    }
    pub fn y(&self) -> u32 {
        u32::from_le_bytes(self.y)
    }
    pub fn width(&self) -> u32 {
        u32::from_le_bytes(self.width)
    }
    pub fn height(&self) -> u32 {
        u32::from_le_bytes(self.height)
    }
    pub fn length(&self) -> u32 {
        u32::from_le_bytes(self.length)
    }
    pub fn compressed_length(&self) -> u32 {
        u32::from_le_bytes(self.compressed_length)
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/wire.rs"]
mod tests;
