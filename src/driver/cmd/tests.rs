use super::{Command, MotorId, Verb};
use crate::DriverError;

#[test]
fn motor_id_valid() {
    assert_eq!(MotorId::new('X').unwrap(), MotorId::X);
    assert_eq!(MotorId::try_from('y').unwrap().as_char(), 'y');
    assert_eq!(MotorId::new('1').unwrap().to_string(), "1");
}

#[test]
fn motor_id_invalid() {
    assert!(matches!(
        MotorId::new(' '),
        Err(DriverError::InvalidMotorId(' '))
    ));
    assert!(matches!(
        MotorId::new('='),
        Err(DriverError::InvalidMotorId('='))
    ));
    assert!(matches!(
        MotorId::new('Ä'),
        Err(DriverError::InvalidMotorId('Ä'))
    ));
}

#[test]
fn encode_no_params() {
    assert_eq!(Command::new(Verb::Status).encode(), b"STATUS\r");
}

#[test]
fn encode_empty_motor_list() {
    let query = Command::query(Verb::Speed, &[]);
    let assign = Command::assign(Verb::Speed, &[]);
    assert!(query.params().is_empty());
    assert_eq!(query.encode(), b"SPEED\r");
    assert_eq!(assign.encode(), b"SPEED\r");
    assert_eq!(query.to_string(), "SPEED");
}

#[test]
fn encode_single_query() {
    let cmd = Command::query(Verb::ReadStatus, &[MotorId::X]);
    assert_eq!(cmd.encode(), b"RDSTAT X\r");
}

#[test]
fn encode_multiple_query() {
    let cmd = Command::query(Verb::Accel, &[MotorId::X, MotorId::Y]);
    assert_eq!(cmd.encode(), b"ACCEL X Y\r");
}

#[test]
fn encode_single_assign() {
    let cmd = Command::assign(Verb::Speed, &[(MotorId::X, 10000)]);
    assert_eq!(cmd.encode(), b"SPEED X = 10000\r");
}

#[test]
fn encode_assign_keeps_order() {
    let cmd = Command::assign(Verb::MoveRelative, &[(MotorId::Y, -250), (MotorId::X, 0)]);
    assert_eq!(cmd.encode(), b"MOVREL Y = -250 X = 0\r");
}

#[test]
fn encode_is_verb_space_pairs_cr() {
    let pairs = [(MotorId::X, 1), (MotorId::Y, 22), (MotorId::Z, 333)];
    for k in 1..=pairs.len() {
        let cmd = Command::assign(Verb::Move, &pairs[..k]);
        let joined = pairs[..k]
            .iter()
            .map(|(m, v)| format!("{} = {}", m, v))
            .collect::<Vec<_>>()
            .join(" ");
        let expected = format!("MOVE {}\r", joined);
        let encoded = cmd.encode();
        assert!(encoded.is_ascii());
        assert_eq!(encoded, expected.as_bytes());
    }
}

#[test]
fn verb_mnemonics() {
    let verbs = [
        (Verb::ReadStatus, "RDSTAT"),
        (Verb::Speed, "SPEED"),
        (Verb::Accel, "ACCEL"),
        (Verb::Where, "WHERE"),
        (Verb::Move, "MOVE"),
        (Verb::MoveRelative, "MOVREL"),
        (Verb::Status, "STATUS"),
    ];
    for (v, m) in verbs {
        assert_eq!(v.to_string(), m);
    }
}
