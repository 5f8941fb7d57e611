//! Configuration of a [`Controller`][super::Controller]
//!
//! All of it is plain data handed to the controller once, nothing here is
//! global. The defaults match a MAC 2002 at 9600 baud and bound every wait, see
//! [`Config::unbounded`] to wait forever instead.

use super::DriverError;
use serialport::{DataBits, Parity, SerialPort, StopBits};
use std::time::Duration;

/// Serial settings used to open the port
///
/// The baud rate varies from model to model, if the controller doesn't answer
/// try 19200.
///
/// # Examples
/// ```no_run
/// # use ludl_stage_driver::PortSettings;
/// let port = PortSettings::default()
///     .baud_rate(19200)
///     .open("/dev/ttyUSB0")
///     .unwrap();
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PortSettings {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// Timeout of single reads and writes on the port itself
    pub timeout: Duration,
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::Two,
            timeout: Duration::from_secs(1),
        }
    }
}

impl PortSettings {
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Opens the serial port called `name`, e.g. `COM3` or `/dev/ttyUSB0`
    ///
    /// # Errors
    /// [`DriverError::SerialPortError`] if the port can't be opened
    pub fn open(&self, name: &str) -> Result<Box<dyn SerialPort>, DriverError> {
        Ok(serialport::new(name, self.baud_rate)
            .data_bits(self.data_bits)
            .parity(self.parity)
            .stop_bits(self.stop_bits)
            .timeout(self.timeout)
            .open()?)
    }
}

//

/// Bounds waiting for a reply
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ReadPolicy {
    /// How long to wait for a complete reply. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Pause between checking whether bytes arrived. Zero spins.
    pub interval: Duration,
}

impl Default for ReadPolicy {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(2)),
            interval: Duration::from_millis(1),
        }
    }
}

/// Bounds [`Controller::await_motors_ready`][super::Controller::await_motors_ready]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ReadyPolicy {
    /// Maximum number of `STATUS` commands to send. `None` polls forever.
    pub max_polls: Option<u32>,
    /// Pause after a busy status before asking again
    pub interval: Duration,
}

impl Default for ReadyPolicy {
    fn default() -> Self {
        // roughly a minute, long enough for a full travel of most stages
        Self {
            max_polls: Some(6000),
            interval: Duration::from_millis(10),
        }
    }
}

/// How reply lines are handled
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum ReplyMode {
    /// Replies are classified by their reply token and arguments are cast
    #[default]
    Checked,
    /// Replies are only split into fields, the reply token included. Nothing
    /// is classified or cast and unknown reply tokens aren't an error.
    Unchecked,
}

/// Everything a [`Controller`][super::Controller] needs to know besides the port
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Config {
    pub port: PortSettings,
    pub read: ReadPolicy,
    pub ready: ReadyPolicy,
    pub reply_mode: ReplyMode,
}

impl Config {
    /// Waits forever for replies and for the motors to become ready, and spins
    /// while doing so
    pub fn unbounded() -> Self {
        Self {
            read: ReadPolicy {
                timeout: None,
                interval: Duration::ZERO,
            },
            ready: ReadyPolicy {
                max_polls: None,
                interval: Duration::ZERO,
            },
            ..Self::default()
        }
    }

    pub fn reply_mode(mut self, reply_mode: ReplyMode) -> Self {
        self.reply_mode = reply_mode;
        self
    }
}
