use super::*;

#[test]
fn from_wire_round_trips_known_codes() {
    for code in [0x01u8, 0x20, 0x40, 0x80, 0x81] {
        let fmt = PixelFormat::from_wire(code).expect("known code");
        assert_eq!(fmt.to_wire(), code);
    }
}

#[test]
fn from_wire_rejects_unknown_codes() {
    assert!(PixelFormat::from_wire(0x02).is_none());
    assert!(PixelFormat::from_wire(0x00).is_none());
}

#[test]
fn zero_dimension_is_none() {
    assert_eq!(buffer_length(PixelFormat::Rgb565, 0, 10), None);
    assert_eq!(buffer_length(PixelFormat::Rgb565, 10, 0), None);
}

#[test]
fn r1_is_row_aligned() {
    // 5 bits wide rounds up to one byte per row, not 5/8 of a byte.
    assert_eq!(buffer_length(PixelFormat::R1, 5, 4), Some(4));
    assert_eq!(buffer_length(PixelFormat::R1, 8, 4), Some(4));
    assert_eq!(buffer_length(PixelFormat::R1, 9, 4), Some(8));
}

#[test]
fn rgb111_is_row_aligned() {
    assert_eq!(buffer_length(PixelFormat::Rgb111, 5, 4), Some(12));
    assert_eq!(buffer_length(PixelFormat::Rgb111, 4, 4), Some(8));
}

#[test]
fn rgb565_is_two_bytes_per_pixel() {
    assert_eq!(
        buffer_length(PixelFormat::Rgb565, 320, 240),
        Some(320 * 240 * 2)
    );
}

#[test]
fn argb_formats_are_four_bytes_per_pixel() {
    assert_eq!(
        buffer_length(PixelFormat::Xrgb8888, 100, 50),
        Some(100 * 50 * 4)
    );
    assert_eq!(
        buffer_length(PixelFormat::Argb8888, 100, 50),
        Some(100 * 50 * 4)
    );
}
