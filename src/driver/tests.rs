use super::{
    cmd::{Command, MotorId, Verb},
    config::{Config, ReadPolicy, ReadyPolicy, ReplyMode},
    reply::{Arg, ArgType, ReplyStatus},
    status::MotorStatus,
    transport::Transport,
    Controller, DriverError,
};
use ludl_stage_driver_test::Interface;
use std::{
    io::{self, Read, Write},
    time::Duration,
};

// a port that never stops sending the same byte, e.g. a controller set to
// another baud rate
struct Noise(u8);

impl Read for Noise {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        buf.fill(self.0);
        Ok(buf.len())
    }
}

impl Write for Noise {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for Noise {
    fn bytes_available(&mut self) -> Result<usize, DriverError> {
        Ok(1)
    }
}

fn controller(interface: &Interface) -> Controller<Interface> {
    Controller::new(interface.clone(), Config::unbounded())
}

// never waits for bytes that aren't there
fn impatient(interface: &Interface) -> Controller<Interface> {
    let config = Config {
        read: ReadPolicy {
            timeout: Some(Duration::ZERO),
            interval: Duration::ZERO,
        },
        ..Config::unbounded()
    };
    Controller::new(interface.clone(), config)
}

#[test]
fn send_writes_encoded_cmd() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_write(b"SPEED X = 10000\r");

    c.send(&Command::assign(Verb::Speed, &[(MotorId::X, 10000)]))
        .unwrap();

    assert!(interface.is_empty());
}

#[test]
fn await_response_typed() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_read(b":A 10000\n");

    let r = c.await_response(&[ArgType::Integer]).unwrap();

    assert!(interface.is_empty());
    assert!(r.is_accepted());
    assert_eq!(r.args, vec![Arg::Int(10000)]);
}

#[test]
fn await_response_reads_single_line() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_read(b":A\n:N\n");

    assert!(c.await_response(&[]).unwrap().is_accepted());
    assert_eq!(interface.pending(), 3);
    assert!(c.await_response(&[]).unwrap().is_rejected());
    assert!(interface.is_empty());
}

#[test]
fn await_response_unknown_reply() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_read(b"?? 1\n");

    let r = c.await_response(&[]);

    assert!(matches!(r, Err(DriverError::UnknownReply(t)) if t == "??"));
    assert!(interface.is_empty());
}

#[test]
fn await_response_non_ascii() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_read(b":A \xc3\xa4\n");

    let r = c.await_response(&[]);

    assert!(matches!(r, Err(DriverError::NonAscii(_))));
}

#[test]
fn await_response_timeout() {
    let mut interface = Interface::new();
    let mut c = impatient(&interface);
    interface.add_read(b":A 1");

    let r = c.await_response(&[ArgType::Integer]);

    assert!(matches!(r, Err(DriverError::Timeout(d)) if d == Duration::ZERO));
    // gave up right after the first byte
    assert_eq!(interface.pending(), 3);
}

#[test]
fn await_response_timeout_while_bytes_keep_coming() {
    let config = Config {
        read: ReadPolicy {
            timeout: Some(Duration::ZERO),
            interval: Duration::ZERO,
        },
        ..Config::unbounded()
    };
    let mut c = Controller::new(Noise(b'x'), config);

    let r = c.await_response(&[]);

    assert!(matches!(r, Err(DriverError::Timeout(_))));
}

#[test]
fn await_response_line_too_long() {
    let mut c = Controller::new(Noise(b'x'), Config::unbounded());

    let r = c.await_response(&[]);

    assert!(matches!(
        r,
        Err(DriverError::MalformedReply(line)) if line.len() == 256 && line.bytes().all(|b| b == b'x')
    ));
}

#[test]
fn await_response_unchecked() {
    let mut interface = Interface::new();
    let mut c = Controller::new(
        interface.clone(),
        Config::unbounded().reply_mode(ReplyMode::Unchecked),
    );
    interface.add_read(b"E 7\n");

    let r = c.await_response(&[ArgType::Integer]).unwrap();

    assert_eq!(r.status, ReplyStatus::Unchecked);
    assert_eq!(
        r.args,
        vec![Arg::Str("E".to_owned()), Arg::Str("7".to_owned())]
    );
}

#[test]
fn await_char_single_byte() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_read(b"BN");

    assert_eq!(c.await_char().unwrap(), 'B');
    assert_eq!(c.await_char().unwrap(), 'N');
    assert!(interface.is_empty());
}

#[test]
fn await_char_non_ascii() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_read(b"\xd0");

    assert!(matches!(c.await_char(), Err(DriverError::NonAscii(b)) if b == vec![0xd0]));
    assert!(interface.is_empty());
}

#[test]
fn await_char_timeout() {
    let interface = Interface::new();
    let mut c = impatient(&interface);

    assert!(matches!(c.await_char(), Err(DriverError::Timeout(_))));
}

#[test]
fn check_motor_status() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_exchange(b"STATUS\r", b"B");
    interface.add_exchange(b"STATUS\r", b"N");
    interface.add_exchange(b"STATUS\r", b"?");

    assert_eq!(c.check_motor_status().unwrap(), MotorStatus::Busy);
    assert_eq!(c.check_motor_status().unwrap(), MotorStatus::Ready);
    assert_eq!(c.check_motor_status().unwrap(), MotorStatus::Busy);
    assert!(interface.is_empty());
}

#[test]
fn await_motors_ready_counts_polls() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_exchange(b"STATUS\r", b"B");
    interface.add_exchange(b"STATUS\r", b"B");
    interface.add_exchange(b"STATUS\r", b"N");

    let report = c.await_motors_ready().unwrap();

    assert_eq!(report.polls, 3);
    assert!(report.finished >= report.started);
    assert!(interface.is_empty());
}

#[test]
fn await_motors_ready_immediately() {
    let mut interface = Interface::new();
    let mut c = controller(&interface);
    interface.add_exchange(b"STATUS\r", b"N");

    assert_eq!(c.await_motors_ready().unwrap().polls, 1);
    assert!(interface.is_empty());
}

#[test]
fn await_motors_ready_gives_up() {
    let mut interface = Interface::new();
    let config = Config {
        ready: ReadyPolicy {
            max_polls: Some(2),
            interval: Duration::ZERO,
        },
        ..Config::unbounded()
    };
    let mut c = Controller::new(interface.clone(), config);
    interface.add_exchange(b"STATUS\r", b"B");
    interface.add_exchange(b"STATUS\r", b"B");

    let r = c.await_motors_ready();

    assert!(matches!(r, Err(DriverError::NotReady { polls: 2 })));
    assert!(interface.is_empty());
}

#[test]
fn into_inner_returns_interface() {
    let mut interface = Interface::new();
    let c = controller(&interface);
    interface.add_read(b":A\n");

    let inner = c.into_inner();

    assert_eq!(inner.pending(), 3);
}
