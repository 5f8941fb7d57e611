//! Provides the mnemonics of the individual commands

macro_rules! makepl {
    ($($name:ident, $val:literal),*) => {
        $(pub const $name: &str = $val;)*
    };
}

// mnemonics of the commands as they appear in the MAC 2002 manual
#[rustfmt::skip]
makepl!(
    READ_STATUS, "RDSTAT",
    SPEED, "SPEED",
    ACCEL, "ACCEL",
    WHERE, "WHERE",
    MOVE, "MOVE",
    MOVE_RELATIVE, "MOVREL",
    STATUS, "STATUS"
);

// reply tokens the controller puts in front of every line
#[rustfmt::skip]
makepl!(
    ACK, ":A",
    NACK, ":N"
);

pub const CMD_TERMINATOR: u8 = b'\r';
pub const REPLY_TERMINATOR: u8 = b'\n';

// longest reply line accepted, anything longer isn't a reply of the controller
pub const MAX_REPLY_LEN: usize = 256;
