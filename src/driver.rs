#[cfg(test)]
mod tests;

pub mod cmd;
pub mod config;
mod map;
mod parse;
pub mod reply;
pub mod status;
pub mod transport;

use self::{
    cmd::{Command, MotorId, Verb},
    config::{Config, ReplyMode},
    parse::ParseError,
    reply::{ArgType, Reply},
    status::{MotorStatus, ReadyReport},
    transport::Transport,
};
use crate::util::ensure;
use chrono::Local;
use log::{debug, info, trace, warn};
use serialport::SerialPort;
use std::{
    fmt::Debug,
    io::{self, Read, Write},
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;

// unfortunately, due to rustfmt not having the blank_lines_upper_bound feature
// stable yet, we gotta put comments in between the different sections. otherwise
// its just too much

//

/// Errors returned by any part of the driver
///
/// Note that the controller rejecting a command isn't an error, see
/// [`ReplyStatus::Rejected`][reply::ReplyStatus::Rejected].
#[derive(Error, Debug)]
pub enum DriverError {
    /// Thrown by [`MotorId::new`] if the id would produce a malformed command
    #[error("motor id must be an ASCII letter or digit, was {0:?}")]
    InvalidMotorId(char),
    /// Thrown if a reply line starts with something else than `:A` or `:N`
    #[error("unknown reply character: {0:?}")]
    UnknownReply(String),
    /// Thrown if a reply line couldn't be split into its fields or got longer
    /// than any reply of the controller without a line terminator
    #[error("malformed reply: {0:?}")]
    MalformedReply(String),
    /// Thrown if a reply has a different number of arguments than types were
    /// requested
    #[error("expected {expected} reply arguments, got {found}")]
    ArgumentCount { expected: usize, found: usize },
    /// Thrown if a reply argument can't be cast to the requested type
    #[error("can't cast {value:?} to {ty}")]
    Cast { ty: ArgType, value: String },
    /// Thrown if the controller sent something that isn't ASCII
    #[error("reply isn't ASCII: {0:?}")]
    NonAscii(Vec<u8>),
    /// Thrown if a reply didn't arrive within
    /// [`ReadPolicy::timeout`][config::ReadPolicy::timeout]
    #[error("no complete reply within {0:?}")]
    Timeout(Duration),
    /// Thrown by [`Controller::await_motors_ready`] if the motors were still
    /// busy after [`ReadyPolicy::max_polls`][config::ReadyPolicy::max_polls]
    #[error("motors still busy after {polls} status polls")]
    NotReady { polls: u32 },
    /// Wrapper around [`io::Error`]
    #[error(transparent)]
    IoError(#[from] io::Error),
    /// Wrapper around [`serialport::Error`]
    #[error(transparent)]
    SerialPortError(#[from] serialport::Error),
}

impl From<ParseError<&str>> for DriverError {
    fn from(e: ParseError<&str>) -> Self {
        match e {
            ParseError::UnknownReplyToken(t) => Self::UnknownReply(t.to_owned()),
            ParseError::NomError(e) => Self::MalformedReply(e.input.to_owned()),
        }
    }
}

//

/// Represents a single serial connection to a stage controller
///
/// `T` is the interface used to actually communicate with the controller,
/// usually a serialport. The protocol is strictly half-duplex: every method
/// sends one command and blocks until its reply arrived, so there is never
/// more than one outstanding reply. If multiple threads need the controller,
/// they have to serialize access themselves.
///
/// Every getter and setter returns a [`Reply`]. Whether the controller
/// accepted the command has to be checked on it, a rejected command is not an
/// error.
///
/// Dropping the controller drops the interface, which closes the port.
///
/// # Examples
/// ```no_run
/// # use ludl_stage_driver::{Config, Controller, MotorId};
/// let mut stage = Controller::open("/dev/ttyUSB0", Config::default()).unwrap();
///
/// if stage.send_check(MotorId::X).unwrap().is_accepted() {
///     println!("controller is there");
/// }
///
/// stage.set_speed(&[(MotorId::X, 10000)]).unwrap();
/// let speed = stage.get_speed(&[MotorId::X]).unwrap();
/// println!("{:?}", speed.ints());
///
/// stage.await_motors_ready().unwrap();
/// stage.move_absolute(&[(MotorId::X, 0), (MotorId::Y, 0)]).unwrap();
/// let report = stage.await_motors_ready().unwrap();
/// println!("done moving after {} ms", report.elapsed().num_milliseconds());
/// ```
pub struct Controller<T: Transport = Box<dyn SerialPort>> {
    transport: T,
    config: Config,
}

impl Controller<Box<dyn SerialPort>> {
    /// Opens the serial port called `name` with
    /// [`config.port`][config::Config::port] and returns a controller using it.
    ///
    /// # Errors
    /// [`DriverError::SerialPortError`] if the port can't be opened
    pub fn open(name: &str, config: Config) -> Result<Self, DriverError> {
        let port = config.port.open(name)?;
        info!("opened {} at {} baud", name, config.port.baud_rate);
        Ok(Self::new(port, config))
    }
}

impl<T: Transport> Controller<T> {
    /// Returns a new controller talking over `transport`, which has to be set
    /// up already
    pub fn new(transport: T, config: Config) -> Self {
        Self { transport, config }
    }

    /// Returns the configuration the controller was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the interface, e.g. to close the port explicitly
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Sends a command without waiting for the reply. The reply has to be
    /// fetched with [`await_response`][Controller::await_response] or
    /// [`await_char`][Controller::await_char] before sending the next one.
    pub fn send(&mut self, cmd: &Command) -> Result<(), DriverError> {
        debug!("sending {}", cmd);
        self.transport.write_all(&cmd.encode())?;
        self.transport.flush()?;
        Ok(())
    }

    // blocks until at least one byte can be read or the read timeout since
    // start ran out
    fn wait_for_data(&mut self, start: Instant) -> Result<(), DriverError> {
        let policy = self.config.read;
        loop {
            if self.transport.bytes_available()? > 0 {
                return Ok(());
            }
            if let Some(timeout) = policy.timeout {
                ensure!(start.elapsed() < timeout, DriverError::Timeout(timeout));
            }
            if policy.interval.is_zero() {
                std::hint::spin_loop();
            } else {
                thread::sleep(policy.interval);
            }
        }
    }

    fn read_byte(&mut self, start: Instant) -> Result<u8, DriverError> {
        self.wait_for_data(start)?;
        let mut buf = [0u8; 1];
        self.transport.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    // the timeout bounds the whole line, not only the waits for bytes, so a
    // port that keeps sending garbage without a terminator still times out
    fn read_line(&mut self) -> Result<String, DriverError> {
        let start = Instant::now();
        let timeout = self.config.read.timeout;
        // size chosen more or less randomly, should fit most replies
        let mut buf = Vec::with_capacity(32);
        loop {
            let b = self.read_byte(start)?;
            buf.push(b);
            if b == map::REPLY_TERMINATOR {
                break;
            }
            if let Some(timeout) = timeout {
                ensure!(start.elapsed() < timeout, DriverError::Timeout(timeout));
            }
            ensure!(
                buf.len() < map::MAX_REPLY_LEN,
                DriverError::MalformedReply(String::from_utf8_lossy(&buf).into_owned())
            );
        }
        ensure!(buf.is_ascii(), DriverError::NonAscii(buf));
        String::from_utf8(buf).map_err(|e| DriverError::NonAscii(e.into_bytes()))
    }

    /// Waits for a reply line and classifies it. If the command was accepted
    /// the arguments are cast to `types`, an empty `types` leaves them as
    /// strings. See also [`classify`][reply::classify].
    ///
    /// In [`ReplyMode::Unchecked`] the line is only split into fields.
    ///
    /// # Errors
    /// [`DriverError::Timeout`] if no complete line arrived in time,
    /// [`DriverError::NonAscii`] if the line isn't ASCII, and the errors of
    /// [`classify`][reply::classify].
    pub fn await_response(&mut self, types: &[ArgType]) -> Result<Reply, DriverError> {
        let line = self.read_line()?;
        debug!("received {:?}", line);
        let reply = match self.config.reply_mode {
            ReplyMode::Checked => reply::classify(&line, types)?,
            ReplyMode::Unchecked => reply::unchecked(&line),
        };
        if reply.is_rejected() {
            warn!("controller rejected command, replied {:?}", line.trim_end());
        }
        Ok(reply)
    }

    /// Waits for a reply consisting of a single character, which has neither a
    /// reply token nor a line terminator
    pub fn await_char(&mut self) -> Result<char, DriverError> {
        let b = self.read_byte(Instant::now())?;
        ensure!(b.is_ascii(), DriverError::NonAscii(vec![b]));
        debug!("received {:?}", b as char);
        Ok(b as char)
    }

    fn exchange(&mut self, cmd: Command, types: &[ArgType]) -> Result<Reply, DriverError> {
        self.send(&cmd)?;
        self.await_response(types)
    }

    fn read_ints(&mut self, verb: Verb, motors: &[MotorId]) -> Result<Reply, DriverError> {
        let types = vec![ArgType::Integer; motors.len()];
        self.exchange(Command::query(verb, motors), &types)
    }

    /// Checks the connection to the controller by reading the status of `motor`
    pub fn send_check(&mut self, motor: MotorId) -> Result<Reply, DriverError> {
        self.exchange(Command::query(Verb::ReadStatus, &[motor]), &[])
    }

    /// Reads the speeds of `motors`, one integer per motor in the same order
    pub fn get_speed(&mut self, motors: &[MotorId]) -> Result<Reply, DriverError> {
        self.read_ints(Verb::Speed, motors)
    }

    /// Sets the speed of every given motor. An accepted reply has no arguments.
    pub fn set_speed(&mut self, speeds: &[(MotorId, i64)]) -> Result<Reply, DriverError> {
        self.exchange(Command::assign(Verb::Speed, speeds), &[])
    }

    /// Same as [`get_speed`][Controller::get_speed] for the acceleration
    pub fn get_acceleration(&mut self, motors: &[MotorId]) -> Result<Reply, DriverError> {
        self.read_ints(Verb::Accel, motors)
    }

    /// Same as [`set_speed`][Controller::set_speed] for the acceleration
    pub fn set_acceleration(&mut self, accels: &[(MotorId, i64)]) -> Result<Reply, DriverError> {
        self.exchange(Command::assign(Verb::Accel, accels), &[])
    }

    /// Reads the absolute positions of `motors`, one integer per motor
    pub fn get_absolute_position(&mut self, motors: &[MotorId]) -> Result<Reply, DriverError> {
        self.read_ints(Verb::Where, motors)
    }

    /// Moves to the given coordinates in the absolute frame. The reply arrives
    /// once the move started, not once it finished, see
    /// [`await_motors_ready`][Controller::await_motors_ready].
    pub fn move_absolute(&mut self, positions: &[(MotorId, i64)]) -> Result<Reply, DriverError> {
        self.exchange(Command::assign(Verb::Move, positions), &[])
    }

    /// Moves by the given distances relative to the current position
    pub fn move_relative(&mut self, distances: &[(MotorId, i64)]) -> Result<Reply, DriverError> {
        self.exchange(Command::assign(Verb::MoveRelative, distances), &[])
    }

    /// Asks whether the motors are still moving. Any character other than `N`
    /// counts as [`MotorStatus::Busy`].
    pub fn check_motor_status(&mut self) -> Result<MotorStatus, DriverError> {
        self.send(&Command::new(Verb::Status))?;
        let c = self.await_char()?;
        let (status, known) = MotorStatus::from_char(c as u8);
        if !known {
            warn!("unknown motor status {:?}, treating it as busy", c);
        }
        Ok(status)
    }

    /// Blocks until all motors are ready to receive commands, by sending
    /// `STATUS` until the controller answers with `N`.
    ///
    /// # Errors
    /// [`DriverError::NotReady`] if the motors were still busy after
    /// [`ReadyPolicy::max_polls`][config::ReadyPolicy::max_polls] polls, as
    /// well as any error of [`check_motor_status`][Controller::check_motor_status].
    pub fn await_motors_ready(&mut self) -> Result<ReadyReport, DriverError> {
        let policy = self.config.ready;
        let started = Local::now();
        let mut polls: u32 = 0;
        loop {
            if let Some(max) = policy.max_polls {
                ensure!(polls < max, DriverError::NotReady { polls });
            }
            polls = polls.saturating_add(1);
            if self.check_motor_status()?.is_ready() {
                let finished = Local::now();
                debug!("motors ready after {} polls", polls);
                return Ok(ReadyReport {
                    polls,
                    started,
                    finished,
                });
            }
            trace!("motors busy after {} polls", polls);
            if !policy.interval.is_zero() {
                thread::sleep(policy.interval);
            }
        }
    }
}

impl<T: Transport> Debug for Controller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Controller {{ transport: _, config: {:?} }}",
            self.config
        )
    }
}
