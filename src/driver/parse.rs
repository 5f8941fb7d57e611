use super::{map, reply::ReplyStatus};
use nom::{
    bytes::complete::{take_till, take_till1, take_while1},
    character::complete::i64 as parse_i64,
    combinator::{all_consuming, opt},
    multi::many0,
    number::complete::double,
    sequence::{preceded, tuple},
    Finish, IResult,
};
use std::fmt::Debug;
use thiserror::Error;

/// Gets thrown when there is an error while parsing a reply of the controller
#[derive(Error, Debug)]
pub enum ParseError<I: Debug> {
    /// Gets thrown when the first token of a reply is neither `:A` nor `:N`
    #[error("unknown reply token {0:?}")]
    UnknownReplyToken(I),
    /// Wrapper around [`nom::error::Error`]
    #[error("nom error: {0:?}")]
    NomError(nom::error::Error<I>),
}

impl<I: Debug> nom::error::ParseError<I> for ParseError<I> {
    fn from_error_kind(input: I, kind: nom::error::ErrorKind) -> Self {
        Self::NomError(nom::error::Error::from_error_kind(input, kind))
    }

    /// basically copied from nom::error::Error::append
    fn append(_: I, _: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I: Debug> From<nom::error::Error<I>> for ParseError<I> {
    fn from(e: nom::error::Error<I>) -> Self {
        Self::NomError(e)
    }
}

// the controller only ever separates fields with plain spaces, tabs are part
// of a field
fn spaces(s: &str) -> IResult<&str, &str, ParseError<&str>> {
    take_while1(|c: char| c == ' ')(s)
}

fn field(s: &str) -> IResult<&str, &str, ParseError<&str>> {
    take_till1(|c: char| c == ' ')(s)
}

// may be empty, an empty line has an empty reply token
fn first_field(s: &str) -> IResult<&str, &str, ParseError<&str>> {
    take_till(|c: char| c == ' ')(s)
}

fn reply_token(s: &str) -> IResult<&str, ReplyStatus, ParseError<&str>> {
    let (rem, token) = first_field(s)?;
    match token {
        map::ACK => Ok((rem, ReplyStatus::Accepted)),
        map::NACK => Ok((rem, ReplyStatus::Rejected)),
        _ => Err(nom::Err::Failure(ParseError::UnknownReplyToken(token))),
    }
}

/// Parses a reply line (without its terminator) into the reply token and the
/// arguments following it. A trailing space doesn't produce an empty argument.
pub(crate) fn reply_line(s: &str) -> Result<(ReplyStatus, Vec<&str>), ParseError<&str>> {
    let (_, (status, args, _)) =
        all_consuming(tuple((reply_token, many0(preceded(spaces, field)), opt(spaces))))(s)
            .finish()?;
    Ok((status, args))
}

/// Splits a reply line (without its terminator) into its fields without
/// looking at them
pub(crate) fn fields(s: &str) -> Vec<&str> {
    s.split(' ').filter(|f| !f.is_empty()).collect()
}

/// Strips `\n` and an optional `\r` in front of it
pub(crate) fn strip_terminator(s: &str) -> &str {
    s.trim_end_matches(|c: char| c == '\n' || c == '\r')
}

pub(crate) fn parse_int(s: &str) -> Result<i64, ParseError<&str>> {
    let (_, v) = all_consuming(parse_i64::<&str, ParseError<&str>>)(s).finish()?;
    Ok(v)
}

pub(crate) fn parse_float(s: &str) -> Result<f64, ParseError<&str>> {
    let (_, v) = all_consuming(double::<&str, ParseError<&str>>)(s).finish()?;
    Ok(v)
}
