//! C7 — the buffer-transfer engine: stages a rectangle on `SET_BUFFER`,
//! tracks the chunked bulk OUT transfer that follows, and hands the
//! completed pixels to the profile's `write_buffer` hook. Grounded in
//! `gud_req_set_buffer`/`gud_write_buffer` in
//! `original_source/gud-pico/gud.c`.

use crate::format::{self, PixelFormat};
use crate::profile::{Hooks, Profile};
use crate::status::Status;
use crate::wire::SetBufferReq;

/// Consumes compressed bytes already collected in a scratch buffer and
/// writes the decoded pixels into `dst`, returning the decoded length.
/// The spec's compression boundary is exactly this function — the codec's
/// internals are out of scope.
pub trait Decompressor {
    fn decompress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError>;
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct DecompressError;

/// A no-op decompressor for profiles that never advertise compression.
pub struct NoCompression;

impl Decompressor for NoCompression {
    fn decompress(&mut self, _src: &[u8], _dst: &mut [u8]) -> Result<usize, DecompressError> {
        Err(DecompressError)
    }
}

#[cfg(feature = "lz4")]
pub struct Lz4Decompressor;

#[cfg(feature = "lz4")]
impl Decompressor for Lz4Decompressor {
    fn decompress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
        lz4_flex::block::decompress_into(src, dst).map_err(|_| DecompressError)
    }
}

/// Which byte count a transfer in flight is tracked against — the
/// compressed length when compression is in use, otherwise the plain
/// pixel length (§4.4 step 2).
struct InFlight {
    rect: SetBufferReq,
    total: u32,
    offset: u32,
}

/// C7 state: the last staged rect plus the chunked-transfer cursor. At
/// most one transfer is ever in flight.
#[derive(Default)]
pub struct PendingRect {
    rect: Option<SetBufferReq>,
    in_flight: Option<InFlight>,
}

impl PendingRect {
    pub const fn new() -> Self {
        Self {
            rect: None,
            in_flight: None,
        }
    }

    pub fn rect(&self) -> Option<&SetBufferReq> {
        self.rect.as_ref()
    }

    pub fn is_transfer_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// `SET_BUFFER` (§3 invariants, §4.4 step 1). Rejects a second rect
    /// while a transfer from a prior one is still outstanding.
    pub fn stage(
        &mut self,
        profile: &Profile,
        format: PixelFormat,
        req: SetBufferReq,
        hooks: &mut impl Hooks,
    ) -> Result<(), Status> {
        if self.in_flight.is_some() {
            return Err(Status::Busy);
        }

        let x = req.x();
        let y = req.y();
        let width = req.width();
        let height = req.height();

        if x >= profile.width
            || y >= profile.height
            || x + width > profile.width
            || y + height > profile.height
        {
            return Err(Status::InvalidParameter);
        }

        let expected =
            format::buffer_length(format, width, height).ok_or(Status::InvalidParameter)?;
        if req.length() != expected {
            return Err(Status::InvalidParameter);
        }

        if req.compression != 0 && req.compressed_length() == 0 {
            return Err(Status::InvalidParameter);
        }

        hooks.set_buffer(&req)?;

        let total = if req.compression != 0 {
            req.compressed_length()
        } else {
            req.length()
        };
        self.in_flight = Some(InFlight {
            rect: req,
            total,
            offset: 0,
        });
        self.rect = Some(req);

        Ok(())
    }

    /// Arm the whole-frame rect directly, bypassing the `SET_BUFFER`
    /// handshake — used for the `FULL_UPDATE` re-arm (§4.4 step 6) and for
    /// the first frame after a successful `SET_STATE_CHECK` (§4.5).
    pub fn rearm_full_update(&mut self, rect: SetBufferReq) {
        debug_assert!(
            self.in_flight.is_none(),
            "bulk endpoint must be idle before re-arming"
        );
        let total = rect.length();
        self.in_flight = Some(InFlight {
            rect,
            total,
            offset: 0,
        });
        self.rect = Some(rect);
    }

    /// Advance the chunked transfer cursor by `chunk_len` bytes (§4.4 step
    /// 3), returning whether the full transfer has now been received.
    pub fn advance(&mut self, chunk_len: u32) -> Result<bool, Status> {
        let in_flight = self.in_flight.as_mut().ok_or(Status::Error)?;
        let new_offset = in_flight
            .offset
            .checked_add(chunk_len)
            .filter(|&o| o <= in_flight.total)
            .ok_or(Status::Error)?;
        in_flight.offset = new_offset;
        Ok(new_offset == in_flight.total)
    }

    /// Complete the in-flight transfer: decompress if needed, blit via
    /// `write_buffer`, then (for `FULL_UPDATE` profiles) immediately
    /// re-arm the next whole-frame transfer (§4.4 steps 4-6).
    ///
    /// `received` holds the bytes the transport collected — the scratch
    /// buffer when compressed, the framebuffer region directly otherwise.
    /// `framebuffer` is only written to by this call when decompressing.
    pub fn complete(
        &mut self,
        profile: &Profile,
        format: PixelFormat,
        received: &[u8],
        framebuffer: &mut [u8],
        decompressor: &mut impl Decompressor,
        hooks: &mut impl Hooks,
    ) -> Result<(), Status> {
        let in_flight = self.in_flight.take().ok_or(Status::Error)?;
        let rect = in_flight.rect;

        if rect.compression != 0 {
            let decoded = decompressor
                .decompress(received, framebuffer)
                .map_err(|_| Status::Error)?;
            if decoded as u32 != rect.length() {
                return Err(Status::Error);
            }
        }

        hooks.write_buffer(&rect, framebuffer);

        if profile
            .flags
            .contains(crate::wire::DisplayFlags::FULL_UPDATE)
        {
            let length = format::buffer_length(format, profile.width, profile.height)
                .ok_or(Status::Error)?;
            self.rearm_full_update(SetBufferReq {
                x: 0u32.to_le_bytes(),
                y: 0u32.to_le_bytes(),
                width: profile.width.to_le_bytes(),
                height: profile.height.to_le_bytes(),
                length: length.to_le_bytes(),
                compression: 0,
                compressed_length: 0u32.to_le_bytes(),
            });
        }

        Ok(())
    }

    /// A transport-level transfer failure: drop the in-flight cursor
    /// without touching the staged rect, so the host must resend
    /// `SET_BUFFER` before the next attempt (§4.4 step 6, §4.6 error
    /// policy for bulk decompression failure).
    pub fn fail_transfer(&mut self) {
        self.in_flight = None;
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/buffer.rs"]
mod tests;
