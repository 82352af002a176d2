//! Error kinds surfaced by the compressor.
//!
//! Every failure is terminal for the current operation: the pipeline stops,
//! drops whatever it had built, and hands one of these back to the caller.

use std::collections::TryReserveError;
use std::fmt::Display;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HuffError>;

#[derive(Error, Debug)]
pub enum HuffError {
    /// A fallible reservation (nodes, code table, buffers) was refused
    #[error("out of memory: could not reserve {requested} elements")]
    OutOfMemory { requested: usize },

    /// Malformed or truncated container, unknown selector, unrepresentable length
    #[error("wrong input: {message}")]
    WrongInput { message: String },

    #[error("I/O error: {0}")]
    Io(std::io::Error),

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl HuffError {
    pub fn wrong_input(message: impl Into<String>) -> Self {
        Self::WrongInput { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Wraps a `try_reserve` failure, remembering how much was asked for.
    pub fn out_of_memory(requested: usize) -> impl FnOnce(TryReserveError) -> Self {
        move |_| Self::OutOfMemory { requested }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::OutOfMemory { .. } => ExitCode::OutOfMemory,
            Self::WrongInput { .. } | Self::Io(_) | Self::Config { .. } => ExitCode::WrongInput,
        }
    }
}

impl From<std::io::Error> for HuffError {
    fn from(e: std::io::Error) -> Self {
        // A source that ends early is a truncated container, not a device failure
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return Self::wrong_input("unexpected end of stream");
        }
        Self::Io(e)
    }
}

/// Process-level outcome reported by the command line tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    OutOfMemory = 1,
    WrongInput = 2,
}

impl ExitCode {
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::OutOfMemory => "out of memory",
            Self::WrongInput => "wrong input",
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl<T> From<&Result<T>> for ExitCode {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ExitCode::Success,
            Err(e) => e.exit_code(),
        }
    }
}
