//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = MbmaError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum MbmaError {
    InvalidTable(InvalidTableError),
    MissingTable(MissingTableError),
    UnknownValue(UnknownValueError),
    InvalidArgument(InvalidArgumentError),
    InvalidModel(InvalidModelError),
    UTF8Error(std::string::FromUtf8Error),
    DecodeError(bincode::error::DecodeError),
    EncodeError(bincode::error::EncodeError),
    IOError(std::io::Error),
}

impl MbmaError {
    pub(crate) fn invalid_table<S>(file: &str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidTable(InvalidTableError {
            file: file.to_string(),
            msg: msg.into(),
        })
    }

    pub(crate) fn missing_table<S>(path: S, source: std::io::Error) -> Self
    where
        S: Into<String>,
    {
        Self::MissingTable(MissingTableError {
            path: path.into(),
            source,
        })
    }

    pub(crate) fn unknown_value<S>(value: S) -> Self
    where
        S: Into<String>,
    {
        Self::UnknownValue(UnknownValueError {
            value: value.into(),
        })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }
}

impl fmt::Display for MbmaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidTable(e) => e.fmt(f),
            Self::MissingTable(e) => e.fmt(f),
            Self::UnknownValue(e) => e.fmt(f),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidModel(e) => e.fmt(f),
            Self::UTF8Error(e) => e.fmt(f),
            Self::DecodeError(e) => e.fmt(f),
            Self::EncodeError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for MbmaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingTable(e) => Some(&e.source),
            Self::UTF8Error(e) => Some(e),
            Self::DecodeError(e) => Some(e),
            Self::EncodeError(e) => Some(e),
            Self::IOError(e) => Some(e),
            _ => None,
        }
    }
}

/// Error used when a tag table contains a malformed line.
#[derive(Debug)]
pub struct InvalidTableError {
    /// Name of the table file.
    pub(crate) file: String,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidTableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidTableError: {}: {}", self.file, self.msg)
    }
}

impl Error for InvalidTableError {}

/// Error used when a tag table cannot be opened.
#[derive(Debug)]
pub struct MissingTableError {
    /// Path of the table file.
    pub(crate) path: String,

    pub(crate) source: std::io::Error,
}

impl fmt::Display for MissingTableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MissingTableError: unable to open: {}", self.path)
    }
}

impl Error for MissingTableError {}

/// Error used when a POS tag has no conversion to the analyzer's tag alphabet.
#[derive(Debug)]
pub struct UnknownValueError {
    /// The offending tag value.
    pub(crate) value: String,
}

impl UnknownValueError {
    /// Gets the offending value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for UnknownValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UnknownValueError: unknown pos tag value '{}'", self.value)
    }
}

impl Error for UnknownValueError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when the model is invalid.
#[derive(Debug)]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidModelError: {}", self.msg)
    }
}

impl Error for InvalidModelError {}

impl From<std::string::FromUtf8Error> for MbmaError {
    fn from(error: std::string::FromUtf8Error) -> Self {
        Self::UTF8Error(error)
    }
}

impl From<bincode::error::DecodeError> for MbmaError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::DecodeError(error)
    }
}

impl From<bincode::error::EncodeError> for MbmaError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::EncodeError(error)
    }
}

impl From<std::io::Error> for MbmaError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
