//! Classifies the reply lines of the controller and casts their arguments.
//!
//! Every line the controller answers with starts with a reply token, `:A` if
//! the command was accepted and `:N` if it wasn't, optionally followed by
//! space separated arguments, e.g. `:A 10000 5000\n` as the answer to
//! `SPEED X Y`.


use super::{parse, DriverError};
use crate::util::ensure;
use std::fmt::Display;

// unfortunately, due to rustfmt not having the blank_lines_upper_bound feature
// stable yet, we gotta put comments in between the different sections. otherwise
// its just too much

//

/// Whether the controller accepted a command
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ReplyStatus {
    /// The reply started with `:A`
    Accepted,
    /// The reply started with `:N`. This is not an error on the driver side, the
    /// caller has to check for it.
    Rejected,
    /// The reply wasn't classified, see [`ReplyMode::Unchecked`][super::config::ReplyMode::Unchecked]
    Unchecked,
}

//

/// The type a reply argument should be cast to
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ArgType {
    Integer,
    Float,
    String,
}

impl ArgType {
    /// Casts a single argument
    ///
    /// # Errors
    /// [`DriverError::Cast`] if `s` isn't a valid value of this type. Integers
    /// and floats have to span the whole argument.
    pub fn cast(self, s: &str) -> Result<Arg, DriverError> {
        let cast_err = |_| DriverError::Cast {
            ty: self,
            value: s.to_owned(),
        };
        match self {
            Self::Integer => parse::parse_int(s).map(Arg::Int).map_err(cast_err),
            Self::Float => parse::parse_float(s).map(Arg::Float).map_err(cast_err),
            Self::String => Ok(Arg::Str(s.to_owned())),
        }
    }
}

impl Display for ArgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
        }
    }
}

//

/// A single argument of a reply
#[derive(Debug, PartialEq, Clone)]
pub enum Arg {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Arg {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

//

/// A classified reply of the controller
///
/// If the command was rejected, the arguments are never cast and are all
/// [`Arg::Str`].
#[derive(Debug, PartialEq, Clone)]
pub struct Reply {
    pub status: ReplyStatus,
    pub args: Vec<Arg>,
}

impl Reply {
    pub fn is_accepted(&self) -> bool {
        self.status == ReplyStatus::Accepted
    }

    pub fn is_rejected(&self) -> bool {
        self.status == ReplyStatus::Rejected
    }

    /// Returns the arguments as integers, if the reply was accepted and all
    /// arguments are integers. Useful for the getters, which all cast to
    /// integers.
    pub fn ints(&self) -> Option<Vec<i64>> {
        if !self.is_accepted() {
            return None;
        }
        self.args.iter().map(Arg::as_int).collect()
    }
}

//

/// Casts `args` element-wise to `types`
///
/// # Errors
/// [`DriverError::ArgumentCount`] if the lengths differ, [`DriverError::Cast`]
/// if any argument can't be cast.
///
/// # Examples
/// ```
/// # use ludl_stage_driver::{cast_args, Arg, ArgType};
/// let args = cast_args(&["10", "20"], &[ArgType::Integer, ArgType::Integer]).unwrap();
/// assert_eq!(args, vec![Arg::Int(10), Arg::Int(20)]);
/// assert!(cast_args(&["3.5"], &[ArgType::Float, ArgType::Float]).is_err());
/// ```
pub fn cast_args(args: &[&str], types: &[ArgType]) -> Result<Vec<Arg>, DriverError> {
    ensure!(
        args.len() == types.len(),
        DriverError::ArgumentCount {
            expected: types.len(),
            found: args.len(),
        }
    );
    args.iter()
        .zip(types)
        .map(|(a, ty)| ty.cast(a))
        .collect()
}

/// Classifies a reply line and, if it was accepted, casts its arguments to
/// `types`. An empty `types` leaves all arguments as strings.
///
/// The line terminator is optional.
///
/// # Errors
/// [`DriverError::UnknownReply`] if the reply token is neither `:A` nor `:N`.
/// See also [`cast_args`].
///
/// # Examples
/// ```
/// # use ludl_stage_driver::{classify, Arg, ArgType, ReplyStatus};
/// let reply = classify(":A 10000\n", &[ArgType::Integer]).unwrap();
/// assert_eq!(reply.status, ReplyStatus::Accepted);
/// assert_eq!(reply.args, vec![Arg::Int(10000)]);
///
/// let reply = classify(":N\n", &[]).unwrap();
/// assert!(reply.is_rejected());
/// ```
pub fn classify(line: &str, types: &[ArgType]) -> Result<Reply, DriverError> {
    let (status, args) = parse::reply_line(parse::strip_terminator(line))?;
    let args = if status == ReplyStatus::Accepted && !types.is_empty() {
        cast_args(&args, types)?
    } else {
        strings(&args)
    };
    Ok(Reply { status, args })
}

/// Splits a reply line into its fields without classifying it, the reply token
/// included
pub fn unchecked(line: &str) -> Reply {
    Reply {
        status: ReplyStatus::Unchecked,
        args: strings(&parse::fields(parse::strip_terminator(line))),
    }
}

fn strings(args: &[&str]) -> Vec<Arg> {
    args.iter().map(|a| Arg::Str((*a).to_owned())).collect()
}
