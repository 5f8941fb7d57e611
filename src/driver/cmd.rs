//! Provides bindings for the raw commands of the stage controller.
//!
//! You usually don't have to build commands yourself, the methods on
//! [`Controller`][super::Controller] cover every command this crate knows.
//! A [`Command`] is a [`Verb`] followed by zero or more parameters, each either
//! a bare [`MotorId`] (for queries) or a `<motor id> = <value>` assignment. On
//! the wire the parameters are separated by single spaces and the whole thing
//! is terminated by a carriage return.

#[cfg(test)]
mod tests;

use super::{map, DriverError};
use crate::util::ensure;
use std::fmt::Display;

// unfortunately, due to rustfmt not having the blank_lines_upper_bound feature
// stable yet, we gotta put comments in between the different sections. otherwise
// its just too much

//

/// The command verbs the controller understands
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Verb {
    /// `RDSTAT`, used as a connectivity check
    ReadStatus,
    /// `SPEED`, gets or sets the top speed of motors
    Speed,
    /// `ACCEL`, gets or sets the acceleration of motors
    Accel,
    /// `WHERE`, reads the absolute position of motors
    Where,
    /// `MOVE`, moves to absolute coordinates
    Move,
    /// `MOVREL`, moves relative to the current position
    MoveRelative,
    /// `STATUS`, answered with a single character telling if motors are busy
    Status,
}

impl Verb {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::ReadStatus => map::READ_STATUS,
            Self::Speed => map::SPEED,
            Self::Accel => map::ACCEL,
            Self::Where => map::WHERE,
            Self::Move => map::MOVE,
            Self::MoveRelative => map::MOVE_RELATIVE,
            Self::Status => map::STATUS,
        }
    }
}

impl Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

//

/// Identifies a single axis of the stage, e.g. `X` or `Y`
///
/// Only ASCII alphanumeric characters are accepted, anything else would produce
/// a malformed command.
///
/// # Examples
/// ```
/// # use ludl_stage_driver::MotorId;
/// let x = MotorId::new('X').unwrap();
/// assert_eq!(x, MotorId::X);
/// assert!(MotorId::new(' ').is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct MotorId(char);

impl MotorId {
    pub const X: MotorId = MotorId('X');
    pub const Y: MotorId = MotorId('Y');
    pub const Z: MotorId = MotorId('Z');

    /// Returns a new MotorId
    ///
    /// # Errors
    /// [`DriverError::InvalidMotorId`] if `id` isn't ASCII alphanumeric
    pub fn new(id: char) -> Result<Self, DriverError> {
        ensure!(id.is_ascii_alphanumeric(), DriverError::InvalidMotorId(id));
        Ok(Self(id))
    }

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl TryFrom<char> for MotorId {
    type Error = DriverError;

    fn try_from(id: char) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl Display for MotorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//

/// A single parameter of a command
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Param {
    pub motor: MotorId,
    pub value: Option<i64>,
}

impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(v) => write!(f, "{} = {}", self.motor, v),
            None => write!(f, "{}", self.motor),
        }
    }
}

//

/// A complete command, ready to be encoded
///
/// # Examples
/// ```
/// # use ludl_stage_driver::{Command, MotorId, Verb};
/// let cmd = Command::assign(Verb::Speed, &[(MotorId::X, 10000)]);
/// assert_eq!(cmd.encode(), b"SPEED X = 10000\r");
///
/// let cmd = Command::query(Verb::Where, &[MotorId::X, MotorId::Y]);
/// assert_eq!(cmd.encode(), b"WHERE X Y\r");
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Command {
    verb: Verb,
    params: Vec<Param>,
}

impl Command {
    /// Command without any parameters
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            params: Vec::new(),
        }
    }

    /// Command with bare motor ids, used to read values
    pub fn query(verb: Verb, motors: &[MotorId]) -> Self {
        Self {
            verb,
            params: motors
                .iter()
                .map(|&motor| Param { motor, value: None })
                .collect(),
        }
    }

    /// Command with `<id> = <value>` pairs, in the given order
    pub fn assign(verb: Verb, values: &[(MotorId, i64)]) -> Self {
        Self {
            verb,
            params: values
                .iter()
                .map(|&(motor, value)| Param {
                    motor,
                    value: Some(value),
                })
                .collect(),
        }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Returns the bytes sent to the controller, including the terminating
    /// carriage return. Everything in a command is ASCII by construction.
    ///
    /// Every parameter is preceded by a single space, so a command without
    /// parameters is just its verb, e.g. `STATUS\r` and never `STATUS \r`.
    pub fn encode(&self) -> Vec<u8> {
        // chosen more or less randomly, fits any command with a few motors
        let mut buf = Vec::with_capacity(32);
        buf.extend_from_slice(self.to_string().as_bytes());
        buf.push(map::CMD_TERMINATOR);
        buf
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.verb)?;
        for p in &self.params {
            write!(f, " {}", p)?;
        }
        Ok(())
    }
}
