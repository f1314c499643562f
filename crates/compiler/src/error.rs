//! The compiler's error type: an aggregate of every diagnostic reported
//! while compiling one source, not just the first.

use std::fmt;

/// A single `[line N] Error at <lexeme|end>: <msg>` diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub line: i32,
    pub location: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}] Error{}: {}",
            self.line, self.location, self.message
        )
    }
}

/// Every diagnostic collected during one `compile()` call.
///
/// Compilation runs to the end of the source even after an error, via
/// panic-mode synchronization, so one invocation reports everything wrong
/// with the program instead of stopping at the first mistake.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {}
