//! The driver's own error type: wraps compile/runtime faults from
//! `ember-runtime` plus the one kind only the driver can produce, a failure
//! to read the source file.

use std::fmt;
use std::path::PathBuf;

use ember_runtime::EmberError;

#[derive(Debug)]
pub struct IoError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not read file \"{}\": {}", self.path.display(), self.source)
    }
}

impl std::error::Error for IoError {}

#[derive(Debug)]
pub enum CliError {
    Compile(ember_compiler::CompileError),
    Runtime(ember_runtime::RuntimeError),
    Io(IoError),
}

impl CliError {
    /// The process exit code this error maps to, per the conventional
    /// sysexits.h scheme the reference interpreter also follows.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Compile(_) => 65,
            CliError::Runtime(_) => 70,
            CliError::Io(_) => 74,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Compile(e) => write!(f, "{e}"),
            CliError::Runtime(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<EmberError> for CliError {
    fn from(e: EmberError) -> Self {
        match e {
            EmberError::Compile(e) => CliError::Compile(e),
            EmberError::Runtime(e) => CliError::Runtime(e),
        }
    }
}

impl From<IoError> for CliError {
    fn from(e: IoError) -> Self {
        CliError::Io(e)
    }
}
