//! C3 (part) — pixel format codes and the single centralized
//! bytes-per-rectangle calculation.
//!
//! The `original_source` variants disagree on the row alignment of the R1
//! format (`width * height / 8` in `gud-pico/gud.c`'s `gud_req_set_buffer`
//! vs. the row-aligned `div_round_up(width, 8) * height` in that same file's
//! `gud_get_buffer_length`). This module has exactly one implementation and
//! it is the row-aligned one, matching the protocol's stated row alignment.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelFormat {
    /// 1-bit monochrome, presented to userspace as XRGB8888.
    R1 = 0x01,
    Rgb111 = 0x20,
    Rgb565 = 0x40,
    Xrgb8888 = 0x80,
    Argb8888 = 0x81,
}

impl PixelFormat {
    pub const fn from_wire(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::R1),
            0x20 => Some(Self::Rgb111),
            0x40 => Some(Self::Rgb565),
            0x80 => Some(Self::Xrgb8888),
            0x81 => Some(Self::Argb8888),
            _ => None,
        }
    }

    pub const fn to_wire(self) -> u8 {
        self as u8
    }
}

const fn div_round_up(n: u32, d: u32) -> u32 {
    n.div_ceil(d)
}

/// Bytes needed to hold a `width x height` rectangle in `format`, or `None`
/// if either dimension is zero.
pub fn buffer_length(format: PixelFormat, width: u32, height: u32) -> Option<u32> {
    if width == 0 || height == 0 {
        return None;
    }

    let length = match format {
        PixelFormat::R1 => div_round_up(width, 8) * height,
        PixelFormat::Rgb111 => div_round_up(width, 2) * height,
        PixelFormat::Rgb565 => width * height * 2,
        PixelFormat::Xrgb8888 | PixelFormat::Argb8888 => width * height * 4,
    };

    Some(length)
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/format.rs"]
mod tests;
