//! The VM's small set of runtime-configurable knobs.

/// Debug/tracing switches the driver can flip on via CLI flags or
/// environment variables. Both default to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Print each instruction and the value stack before it executes.
    pub trace_execution: bool,
    /// Disassemble the compiled chunk to stdout before running it.
    pub print_code: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}
