//! C8 — the status channel.
//!
//! A two-field cell {pending, errno} shared between the dispatcher (single
//! writer) and the host's `GET_STATUS` poll (single reader). See
//! `original_source/gud-pico/gud.h` (`GUD_REQ_GET_STATUS` and the
//! `GUD_STATUS_*` values) for the wire-visible taxonomy this mirrors.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    Busy = 1,
    RequestNotSupported = 2,
    ProtocolError = 3,
    InvalidParameter = 4,
    Error = 5,
}

impl Status {
    pub const fn to_wire(self) -> u8 {
        self as u8
    }
}

/// {pending, errno}, cleared at the start of every non-`GET_STATUS` request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct StatusCell {
    pending: bool,
    errno: Status,
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCell {
    pub const fn new() -> Self {
        Self {
            pending: false,
            errno: Status::Ok,
        }
    }

    /// Run at the start of every non-`GET_STATUS` vendor request.
    pub fn clear(&mut self) {
        self.pending = false;
        self.errno = Status::Ok;
    }

    pub fn set_pending(&mut self) {
        self.pending = true;
    }

    /// Record the outcome of a handler. `Ok(())` clears `pending` with
    /// `errno = Ok`; `Err(status)` clears `pending` and latches `status`.
    pub fn record(&mut self, result: Result<(), Status>) {
        self.pending = false;
        self.errno = result.err().unwrap_or(Status::Ok);
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn errno(&self) -> Status {
        self.errno
    }

    /// The two bytes returned for `GET_STATUS`: {flags, errno}. Bit 0 of
    /// `flags` is the pending bit.
    pub fn to_wire(self) -> [u8; 2] {
        [self.pending as u8, self.errno.to_wire()]
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/status.rs"]
mod tests;
