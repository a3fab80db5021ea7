use std::fmt;

/// Text the display shows whenever an action fails.
pub const ERROR_DISPLAY: &str = "Error";

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The canonical expression could not be parsed or evaluated.
    MalformedExpression(String),
    /// Evaluation succeeded but produced infinity or NaN.
    NonFiniteResult(String),
    /// Display text that is not a number was used as one.
    InvalidNumericInput(String),
    UnknownUnit(String),
    InvalidArgument(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedExpression(s) => write!(f, "Malformed expression: {}", s),
            Error::NonFiniteResult(s) => write!(f, "'{}' has no finite value", s),
            Error::InvalidNumericInput(s) => write!(f, "'{}' is not a number", s),
            Error::UnknownUnit(s) => write!(f, "Unknown unit: {}", s),
            Error::InvalidArgument(s) => write!(f, "Invalid argument: {}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<meval::Error> for Error {
    fn from(err: meval::Error) -> Self {
        Error::MalformedExpression(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
