use super::*;
use crate::profile::{Hooks, Profile};
use crate::wire::{Compression, DisplayFlags};

struct NoopHooks;
impl Hooks for NoopHooks {}

struct RecordingHooks {
    writes: Vec<(u32, u32, u32, u32)>,
}

impl Hooks for RecordingHooks {
    fn write_buffer(&mut self, rect: &SetBufferReq, _framebuffer: &[u8]) {
        self.writes
            .push((rect.x(), rect.y(), rect.width(), rect.height()));
    }
}

fn profile(flags: DisplayFlags) -> Profile<'static> {
    Profile {
        width: 320,
        height: 240,
        flags,
        compression: Compression::empty(),
        max_buffer_size: None,
        formats: &[],
        properties: &[],
        connector_properties: &[],
        edid: None,
    }
}

fn rect(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    length: u32,
    compression: u8,
    compressed_length: u32,
) -> SetBufferReq {
    SetBufferReq {
        x: x.to_le_bytes(),
        y: y.to_le_bytes(),
        width: width.to_le_bytes(),
        height: height.to_le_bytes(),
        length: length.to_le_bytes(),
        compression,
        compressed_length: compressed_length.to_le_bytes(),
    }
}

#[test]
fn stage_accepts_contained_rect_with_matching_length() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = NoopHooks;
    let req = rect(10, 20, 100, 50, 100 * 50 * 2, 0, 0);
    assert!(pending
        .stage(&profile, PixelFormat::Rgb565, req, &mut hooks)
        .is_ok());
    assert!(pending.is_transfer_in_flight());
}

// a rect that survives validation satisfies containment and the
// format-expected byte count.
#[test]
fn stage_rejects_rect_exceeding_bounds() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = NoopHooks;
    let req = rect(300, 200, 100, 100, 100 * 100 * 2, 0, 0);
    assert_eq!(
        pending.stage(&profile, PixelFormat::Rgb565, req, &mut hooks),
        Err(Status::InvalidParameter)
    );
    assert!(pending.rect().is_none());
}

#[test]
fn stage_rejects_wrong_length() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = NoopHooks;
    let req = rect(0, 0, 100, 50, 1234, 0, 0);
    assert_eq!(
        pending.stage(&profile, PixelFormat::Rgb565, req, &mut hooks),
        Err(Status::InvalidParameter)
    );
}

#[test]
fn stage_rejects_compression_without_compressed_length() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = NoopHooks;
    let req = rect(0, 0, 100, 50, 100 * 50 * 2, 1, 0);
    assert_eq!(
        pending.stage(&profile, PixelFormat::Rgb565, req, &mut hooks),
        Err(Status::InvalidParameter)
    );
}

// a second SET_BUFFER before the prior transfer completes is rejected
// and does not overwrite the staged rect.
#[test]
fn stage_rejects_second_rect_while_transfer_in_flight() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = NoopHooks;
    let first = rect(0, 0, 100, 50, 100 * 50 * 2, 0, 0);
    assert!(pending
        .stage(&profile, PixelFormat::Rgb565, first, &mut hooks)
        .is_ok());

    let second = rect(10, 10, 20, 20, 20 * 20 * 2, 0, 0);
    assert_eq!(
        pending.stage(&profile, PixelFormat::Rgb565, second, &mut hooks),
        Err(Status::Busy)
    );
    assert_eq!(pending.rect().unwrap().x(), 0);
}

#[test]
fn advance_tracks_chunked_transfer_completion() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = NoopHooks;
    let req = rect(0, 0, 100, 50, 10000, 0, 0);
    pending
        .stage(&profile, PixelFormat::Rgb565, req, &mut hooks)
        .unwrap();

    assert_eq!(pending.advance(4000), Ok(false));
    assert_eq!(pending.advance(4000), Ok(false));
    assert_eq!(pending.advance(2000), Ok(true));
}

#[test]
fn advance_rejects_overshoot() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = NoopHooks;
    let req = rect(0, 0, 10, 10, 200, 0, 0);
    pending
        .stage(&profile, PixelFormat::Rgb565, req, &mut hooks)
        .unwrap();
    assert_eq!(pending.advance(9999), Err(Status::Error));
}

#[test]
fn complete_without_compression_blits_and_clears_in_flight() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = RecordingHooks { writes: Vec::new() };
    let req = rect(10, 20, 4, 4, 32, 0, 0);
    pending
        .stage(&profile, PixelFormat::Rgb565, req, &mut hooks)
        .unwrap();
    pending.advance(32).unwrap();

    let received = [0u8; 32];
    let mut framebuffer = [0u8; 32];
    let mut decompressor = NoCompression;
    assert!(pending
        .complete(
            &profile,
            PixelFormat::Rgb565,
            &received,
            &mut framebuffer,
            &mut decompressor,
            &mut hooks
        )
        .is_ok());
    assert!(!pending.is_transfer_in_flight());
    assert_eq!(hooks.writes, vec![(10, 20, 4, 4)]);
}

#[test]
fn complete_with_full_update_rearms_whole_frame() {
    let profile = profile(DisplayFlags::FULL_UPDATE);
    let mut pending = PendingRect::new();
    let mut hooks = RecordingHooks { writes: Vec::new() };
    let whole_frame = format::buffer_length(PixelFormat::Rgb565, 320, 240).unwrap();
    pending.rearm_full_update(rect(0, 0, 320, 240, whole_frame, 0, 0));
    pending.advance(whole_frame).unwrap();

    let received = vec![0u8; whole_frame as usize];
    let mut framebuffer = vec![0u8; whole_frame as usize];
    let mut decompressor = NoCompression;
    pending
        .complete(
            &profile,
            PixelFormat::Rgb565,
            &received,
            &mut framebuffer,
            &mut decompressor,
            &mut hooks,
        )
        .unwrap();

    assert!(pending.is_transfer_in_flight());
    assert_eq!(pending.rect().unwrap().width(), 320);
}

struct FixedDecompressor(usize);
impl Decompressor for FixedDecompressor {
    fn decompress(&mut self, _src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
        dst[..self.0].fill(0xab);
        Ok(self.0)
    }
}

#[test]
fn complete_with_compression_decompresses_before_blit() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = RecordingHooks { writes: Vec::new() };
    let req = rect(0, 0, 4, 4, 32, 1, 10);
    pending
        .stage(&profile, PixelFormat::Rgb565, req, &mut hooks)
        .unwrap();
    pending.advance(10).unwrap();

    let received = [0u8; 10];
    let mut framebuffer = [0u8; 32];
    let mut decompressor = FixedDecompressor(32);
    assert!(pending
        .complete(
            &profile,
            PixelFormat::Rgb565,
            &received,
            &mut framebuffer,
            &mut decompressor,
            &mut hooks
        )
        .is_ok());
    assert!(framebuffer.iter().all(|&b| b == 0xab));
}

#[test]
fn complete_with_decompression_length_mismatch_is_fatal() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = RecordingHooks { writes: Vec::new() };
    let req = rect(0, 0, 4, 4, 32, 1, 10);
    pending
        .stage(&profile, PixelFormat::Rgb565, req, &mut hooks)
        .unwrap();
    pending.advance(10).unwrap();

    let received = [0u8; 10];
    let mut framebuffer = [0u8; 32];
    let mut decompressor = FixedDecompressor(16);
    assert_eq!(
        pending.complete(
            &profile,
            PixelFormat::Rgb565,
            &received,
            &mut framebuffer,
            &mut decompressor,
            &mut hooks
        ),
        Err(Status::Error)
    );
    assert!(hooks.writes.is_empty());
}

#[test]
fn fail_transfer_clears_in_flight_but_keeps_staged_rect() {
    let profile = profile(DisplayFlags::empty());
    let mut pending = PendingRect::new();
    let mut hooks = NoopHooks;
    let req = rect(0, 0, 4, 4, 32, 0, 0);
    pending
        .stage(&profile, PixelFormat::Rgb565, req, &mut hooks)
        .unwrap();
    pending.fail_transfer();
    assert!(!pending.is_transfer_in_flight());
    assert!(pending.rect().is_some());
}
