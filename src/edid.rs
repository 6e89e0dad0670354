//! C2 — EDID synthesis: builds a 128-byte EDID block from the profile's
//! EDID seed plus a device serial number, byte-exact with
//! `original_source/gud-pico/gud.c`'s `gud_req_get_connector_edid`.

use crate::profile::{EdidSeed, Profile};

pub const EDID_LEN: usize = 128;

const fn div_round_up(n: u32, d: u32) -> u32 {
    n.div_ceil(d)
}

/// Write the 128-byte EDID block for `profile` into `out`, returning the
/// number of bytes written.
///
/// Returns 0 (success, no data) if `out` is smaller than 128 bytes, if the
/// profile has no EDID seed, or if the seed's `name`/`pnp` fail their
/// length/case constraints (§4.1 edge cases) — matching the original's
/// "caller might cap wLength to save on buffer size, so don't return an
/// error" behavior.
pub fn synthesize(profile: &Profile, serial: u32, out: &mut [u8]) -> usize {
    if out.len() < EDID_LEN {
        return 0;
    }

    let Some(seed) = profile.edid.as_ref() else {
        return 0;
    };

    if !is_valid_seed(seed) {
        return 0;
    }

    let edid = &mut out[..EDID_LEN];
    edid.fill(0);

    write_header(edid);
    write_vendor_product(edid, seed, serial);
    write_basic_params(edid, seed);
    write_filler_timings(edid);
    write_detailed_timing_descriptor(edid, profile);
    write_display_name(edid, seed.name);
    edid[126] = 0;
    edid[127] = checksum(edid);

    EDID_LEN
}

fn is_valid_seed(seed: &EdidSeed) -> bool {
    let name_len = seed.name.len();
    if name_len == 0 || name_len > 13 {
        return false;
    }
    seed.pnp.iter().all(|c| c.is_ascii_uppercase())
}

fn write_header(edid: &mut [u8]) {
    edid[0..8].copy_from_slice(&[0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]);
}

fn write_vendor_product(edid: &mut [u8], seed: &EdidSeed, serial: u32) {
    let pnp: [u8; 3] = [
        seed.pnp[0] - b'A' + 1,
        seed.pnp[1] - b'A' + 1,
        seed.pnp[2] - b'A' + 1,
    ];
    edid[8] = (pnp[0] << 2) | (pnp[1] >> 3);
    edid[9] = (pnp[1] << 5) | pnp[2];

    edid[10..12].copy_from_slice(&seed.product_code.to_le_bytes());
    edid[12..16].copy_from_slice(&serial.to_le_bytes());
}

fn write_basic_params(edid: &mut [u8], seed: &EdidSeed) {
    edid[16] = 1; // manufacture week
    edid[17] = if seed.year > 1990 {
        (seed.year - 1990) as u8
    } else {
        0
    };

    edid[18] = 1;
    edid[19] = 3;

    edid[20] = 0x80; // digital input, bit depth/interface undefined
    edid[21] = div_round_up(seed.width_mm as u32, 10) as u8;
    edid[22] = div_round_up(seed.height_mm as u32, 10) as u8;
    edid[23] = 0; // gamma
    edid[24] = 0x0a; // RGB color, preferred timing in DTD 1
}

fn write_filler_timings(edid: &mut [u8]) {
    // 25..34 chroma, 35..37 established timings: already zeroed by fill().
    edid[38..54].fill(0x01); // standard timing fillers
}

fn write_detailed_timing_descriptor(edid: &mut [u8], profile: &Profile) {
    let width = profile.width;
    let height = profile.height;
    let Some(seed) = profile.edid.as_ref() else {
        return;
    };

    let clock_khz = width * height * 60 / 1000;
    let pixel_clock = div_round_up(clock_khz, 10);
    edid[54..56].copy_from_slice(&(pixel_clock as u16).to_le_bytes());

    edid[56] = (width & 0xff) as u8;
    edid[57] = 0x00; // horizontal blanking lsbits
    edid[58] = (((width >> 8) & 0x0f) << 4) as u8;

    edid[59] = (height & 0xff) as u8;
    edid[60] = 0x00; // vertical blanking lsbits
    edid[61] = (((height >> 8) & 0x0f) << 4) as u8;

    edid[62] = 0x00; // horizontal front porch
    edid[63] = 0x01; // horizontal sync pulse width (DRM rejects zero)
    edid[64] = 0x01; // vfront(0) << 4 | vpulse(1)
    edid[65] = 0x00;

    edid[66] = (seed.width_mm & 0xff) as u8;
    edid[67] = (seed.height_mm & 0xff) as u8;
    edid[68] = (((seed.width_mm >> 8) & 0x0f) << 4 | ((seed.height_mm >> 8) & 0x0f)) as u8;

    edid[69] = 0x00;
    edid[70] = 0x00;
    edid[71] = 0x1e; // non-interlaced, digital separate sync, +V, +H
}

fn write_display_name(edid: &mut [u8], name: &str) {
    edid[72] = 0x00;
    edid[73] = 0x00;
    edid[74] = 0x00;
    edid[75] = 0xfc;
    edid[76] = 0x00;

    let field = &mut edid[77..90];
    field.fill(0x20);
    let name_bytes = name.as_bytes();
    field[..name_bytes.len()].copy_from_slice(name_bytes);
    if name_bytes.len() < 13 {
        field[name_bytes.len()] = 0x0a;
    }
    // 90..108, 108..126: unused descriptors, already zeroed by fill().
}

fn checksum(edid: &[u8]) -> u8 {
    let sum = edid[..127].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    0u8.wrapping_sub(sum)
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/edid.rs"]
mod tests;
