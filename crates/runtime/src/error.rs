//! The VM's runtime error type: a single fault that aborts the instruction
//! loop immediately. Unlike the compiler, nothing here aggregates: the
//! first fault wins.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub message: String,
    pub line: i32,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}] in script", self.message, self.line)
    }
}

impl std::error::Error for RuntimeError {}
