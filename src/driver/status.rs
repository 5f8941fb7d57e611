use chrono::{DateTime, Duration, Local};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Binding for the single character the controller answers `STATUS` with
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, FromPrimitive)]
pub enum MotorStatus {
    /// `B`, at least one motor is still moving
    Busy = b'B' as isize,
    /// `N`, all motors are free to receive commands
    Ready = b'N' as isize,
}

impl MotorStatus {
    /// Anything but `N` means the motors aren't ready yet, so unknown
    /// characters are treated as [`Busy`][MotorStatus::Busy]. Returns the status
    /// and whether the character was known.
    pub(crate) fn from_char(c: u8) -> (Self, bool) {
        match Self::from_u8(c) {
            Some(s) => (s, true),
            None => (Self::Busy, false),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Returned by [`Controller::await_motors_ready`][super::Controller::await_motors_ready]
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct ReadyReport {
    /// Number of `STATUS` commands sent, including the one answered with `N`
    pub polls: u32,
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
}

impl ReadyReport {
    /// How long it took for the motors to become ready
    pub fn elapsed(&self) -> Duration {
        self.finished - self.started
    }
}
