//! Error types for huf-compress

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

pub type HufResult<T> = Result<T, HufError>;

/// Exit code for failures that carry no [`HufError`] kind.
pub const EXIT_UNKNOWN: i32 = 99;

#[derive(Error, Debug)]
pub enum HufError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("memory allocation failure: {0}")]
    MemoryAlloc(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("cannot access file: {0}")]
    FileAccess(io::Error),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("priority queue not initialized")]
    QueueNotInitialized,

    #[error("priority queue size exceeded (capacity {capacity})")]
    QueueSizeExceeded { capacity: usize },

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl HufError {
    /// Process exit code for this error kind. Zero is reserved for success.
    pub fn exit_code(&self) -> i32 {
        match self {
            HufError::InvalidParameter(_) => 2,
            HufError::MemoryAlloc(_) => 3,
            HufError::InvalidResource(_) => 4,
            HufError::InvalidArguments(_) => 5,
            HufError::FileAccess(_) => 6,
            HufError::UnexpectedEof => 7,
            HufError::UnknownOption(_) => 8,
            HufError::QueueNotInitialized => 9,
            HufError::QueueSizeExceeded { .. } => 10,
            HufError::Unknown(_) => EXIT_UNKNOWN,
        }
    }

    pub(crate) fn invalid_resource(msg: impl Into<String>) -> Self {
        HufError::InvalidResource(msg.into())
    }
}

impl From<io::Error> for HufError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => HufError::UnexpectedEof,
            io::ErrorKind::OutOfMemory => HufError::MemoryAlloc(e.to_string()),
            _ => HufError::FileAccess(e),
        }
    }
}

impl From<TryReserveError> for HufError {
    fn from(e: TryReserveError) -> Self {
        HufError::MemoryAlloc(e.to_string())
    }
}
