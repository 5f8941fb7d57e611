use super::DriverError;
use serialport::SerialPort;
use std::io::{Read, Write};

/// The interface used to actually talk to the controller, usually a serialport
///
/// Besides reading and writing bytes, the driver needs to know how many bytes
/// arrived so it can wait for a reply without blocking inside a read.
pub trait Transport: Read + Write {
    /// Number of bytes that can be read right now
    fn bytes_available(&mut self) -> Result<usize, DriverError>;
}

impl Transport for Box<dyn SerialPort> {
    fn bytes_available(&mut self) -> Result<usize, DriverError> {
        Ok(self.bytes_to_read()? as usize)
    }
}

#[cfg(test)]
impl Transport for ludl_stage_driver_test::Interface {
    fn bytes_available(&mut self) -> Result<usize, DriverError> {
        Ok(self.pending())
    }
}
