//! C9 — the USB transport boundary. This engine does not own a USB device
//! controller driver (out of scope, §1); it defines the trait a transport
//! implementation calls into and the capability the engine needs from it,
//! grounded in the callback shape of
//! `original_source/gud-pico/libraries/gud_pico/driver.c` (TinyUSB's
//! `control_request`/`control_complete`/`xfer_cb`, and the endpoint
//! arm/reset calls around them).

/// What the engine needs a transport to provide: arming and tearing down
/// the single bulk OUT endpoint that carries framebuffer data.
pub trait BulkEndpoint {
    /// Arm the endpoint to receive up to `max_len` bytes into its next
    /// buffer. The engine calls this once per chunk (§4.4 step 3).
    fn arm_out(&mut self, max_len: u32);

    /// Tear down and reopen the endpoint, e.g. on `CLEAR_FEATURE` or a USB
    /// reset (§4.8).
    fn reset(&mut self);

    /// The largest single transfer the endpoint can accept before the
    /// engine must chunk a request across multiple arm/complete rounds.
    fn max_transfer_size(&self) -> u32;
}
