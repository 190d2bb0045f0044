use std::io;
use thiserror::Error;

/// Everything that can end a session early.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

impl SessionError {
    /// Input or buffer contract violations, as opposed to a broken output stream.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SessionError::Write(_))
    }
}

/// Errors raised while turning input lines into operations. `line` is 1-based.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("line {line}: unrecognized command {text:?}")]
    UnrecognizedCommand { line: usize, text: String },

    #[error("line {line}: expected {expected} value line(s) after append, input ended after {received}")]
    TruncatedInput { line: usize, expected: usize, received: usize },

    #[error("line {line}: invalid count {text:?}")]
    InvalidCount { line: usize, text: String },

    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum BufferError {
    #[error("cannot evict {requested} value(s), only {live} live")]
    EvictUnderflow { requested: usize, live: usize },

    #[error("buffer used before its capacity was set")]
    NotInitialized,

    #[error("cannot append {requested} value(s) to a zero-capacity buffer")]
    ZeroCapacity { requested: usize },
}
