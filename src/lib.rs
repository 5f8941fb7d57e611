//! Rust driver for Ludl MAC 2002 class stage controllers connected over RS-232
//! or a USB-serial adapter.
//!
//! The controller speaks a line based ASCII protocol: a command like
//! `SPEED X = 10000` terminated by a carriage return, answered by a line
//! starting with `:A` if the command was accepted or `:N` if it wasn't,
//! followed by the requested values. `STATUS` is the exception, it's answered
//! with a single `B` while motors are busy and `N` once they are ready.
//!
//! # Usage
//! Each serial port with a connected controller gets its own [`Controller`],
//! either opened directly with [`Controller::open`] or built from an already
//! opened interface with [`Controller::new`]. Every command of the controller
//! is a method on it, returning a [`Reply`] that tells whether the command was
//! accepted and holds the returned values. Waiting for replies and for moves
//! to finish is bounded by [`Config`], see [`Config::unbounded`] to wait
//! forever instead.
//!
//! # Examples
//! ```no_run
//! # use ludl_stage_driver::{Config, Controller, MotorId, PortSettings};
//! let config = Config {
//!     port: PortSettings::default().baud_rate(19200),
//!     ..Config::default()
//! };
//! let mut stage = Controller::open("COM3", config).unwrap();
//!
//! stage.set_acceleration(&[(MotorId::Y, 5)]).unwrap();
//! let accel = stage.get_acceleration(&[MotorId::Y]).unwrap();
//! if let Some(accel) = accel.ints() {
//!     println!("Y acceleration: {}", accel[0]);
//! }
//!
//! stage.move_relative(&[(MotorId::X, 1000)]).unwrap();
//! stage.await_motors_ready().unwrap();
//! let pos = stage.get_absolute_position(&[MotorId::X, MotorId::Y]).unwrap();
//! println!("now at {:?}", pos.ints());
//! ```
//!

mod driver;
pub(crate) mod util;

pub use driver::{
    cmd::{Command, MotorId, Param, Verb},
    config::{Config, PortSettings, ReadPolicy, ReadyPolicy, ReplyMode},
    reply::{cast_args, classify, unchecked, Arg, ArgType, Reply, ReplyStatus},
    status::{MotorStatus, ReadyReport},
    transport::Transport,
    Controller, DriverError,
};
