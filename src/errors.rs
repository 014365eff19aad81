use displaydoc::Display;
use std::error::Error;
use std::io;

/// Errors raised while placing a program image into the address space.
#[derive(Debug, Display, PartialEq, Eq, Clone)]
pub enum LoadProgramError {
    /// Failed to load image {path}: {message}
    Io { path: String, message: String },
    /// Failed to load image {path}: missing origin address
    MissingOrigin { path: String },
}
impl Error for LoadProgramError {}

impl LoadProgramError {
    pub(crate) fn from_io(path: &str, error: &io::Error) -> Self {
        Self::Io {
            path: path.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Errors that stop the fetch-decode-execute loop.
#[derive(Debug, Display, PartialEq, Eq, Clone)]
pub enum ExecutionError {
    /// Illegal opcode {opcode:#06b} at address {address:#06X}
    IllegalOpcode { opcode: u8, address: u16 },
    /// Unknown trap vector {vector:#04X} at address {address:#06X}
    UnknownTrapVector { vector: u8, address: u16 },
    /// Execution interrupted
    Interrupted,
    /// Error during reading Stdin or writing program output to Stdout: {0}
    IOInputOutputError(String),
}
impl Error for ExecutionError {}

impl From<io::Error> for ExecutionError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::Interrupted {
            Self::Interrupted
        } else {
            Self::IOInputOutputError(error.to_string())
        }
    }
}
