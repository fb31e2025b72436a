use serde::{Deserialize, Serialize};

/// pagesim errors. The replacement engine reports at most one error per
/// reference and never leaves partial state behind, so every variant is a
/// plain value that can be cloned into a report or compared in tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Error {
    /// A reference named a page outside `[0, max_page_id]`. The reference is
    /// skipped; the simulation continues.
    InvalidPage { page_id: u64, max_page_id: u64 },
    /// The page index was asked to track an id it has no room for.
    OutOfRange(u64),
    /// The cache configuration was rejected before any reference ran.
    InvalidConfig(String),
    /// Malformed driver input, e.g. a reference token that isn't a number.
    InvalidInput(String),
    /// An IO error while reading a reference string.
    IO(String),
}

impl Error {
    /// Whether the simulation can skip the offending reference and go on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidPage { .. } | Error::OutOfRange(_))
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidPage {
                page_id,
                max_page_id,
            } => write!(f, "invalid page {page_id} (valid range 0..={max_page_id})"),
            Error::OutOfRange(page_id) => write!(f, "page {page_id} is out of range"),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Error::IO(msg) => write!(f, "io error: {msg}"),
        }
    }
}

/// Constructs an Error::InvalidConfig for the given format string.
#[macro_export]
macro_rules! errconfig {
    ($($args:tt)*) => { Err($crate::Error::InvalidConfig(format!($($args)*)).into()) };
}

/// Constructs an Error::InvalidInput for the given format string.
#[macro_export]
macro_rules! errinput {
    ($($args:tt)*) => { Err($crate::Error::InvalidInput(format!($($args)*)).into()) };
}

/// A pagesim Result returning Error.
pub type Result<T> = std::result::Result<T, Error>;

impl<T> From<Error> for Result<T> {
    fn from(error: Error) -> Self {
        Err(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IO(err.to_string())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::InvalidInput(err.to_string())
    }
}
