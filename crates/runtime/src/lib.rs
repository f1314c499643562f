//! Ember Runtime: the stack-machine VM that executes compiled chunks.
//!
//! # Modules
//!
//! - `vm`: `VM`, the instruction dispatch loop
//! - `error`: `RuntimeError`
//! - `config`: `Config`, the debug-trace knobs
//! - `debug`: textual bytecode disassembly

pub mod config;
pub mod debug;
pub mod error;
pub mod vm;

pub use config::Config;
pub use error::RuntimeError;
pub use vm::VM;

use std::fmt;

use ember_compiler::CompileError;

/// Either layer's error, wrapped so the driver has one type to match on.
#[derive(Debug)]
pub enum EmberError {
    Compile(CompileError),
    Runtime(RuntimeError),
}

impl fmt::Display for EmberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmberError::Compile(e) => write!(f, "{e}"),
            EmberError::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EmberError {}

impl From<CompileError> for EmberError {
    fn from(e: CompileError) -> Self {
        EmberError::Compile(e)
    }
}

impl From<RuntimeError> for EmberError {
    fn from(e: RuntimeError) -> Self {
        EmberError::Runtime(e)
    }
}

/// Compile `source` and run it to completion, writing `print` output to
/// `out`.
///
/// Builds a fresh intern table and object list, compiles into them (so
/// literal and runtime-concatenated strings with equal bytes are identical),
/// then hands both to a freshly constructed [`VM`].
pub fn interpret<W: std::io::Write>(source: &str, config: &Config, out: &mut W) -> Result<(), EmberError> {
    let mut strings = ember_core::Table::new();
    let mut objects = None;

    let chunk = ember_compiler::compile(source, &mut strings, &mut objects)?;

    if config.print_code {
        print!("{}", debug::disassemble_chunk(&chunk, "code"));
    }

    let mut vm = VM::new(chunk, strings, objects);
    vm.run(config, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_capture(source: &str) -> Result<String, String> {
        let mut out = Vec::new();
        match interpret(source, &Config::new(), &mut out) {
            Ok(()) => Ok(String::from_utf8(out).unwrap()),
            Err(e) => Err(e.to_string()),
        }
    }

    #[test]
    fn arithmetic_print_runs_to_completion() {
        assert_eq!(run_capture("print 1 + 2;").unwrap(), "'3.0'\n");
    }

    #[test]
    fn undefined_global_is_a_runtime_error() {
        let err = run_capture("{ var x = 5; } print x;").unwrap_err();
        assert!(err.contains("Undefined variable 'x'."));
    }

    #[test]
    fn type_mismatch_reports_operand_error() {
        let err = run_capture("print 1 + true;").unwrap_err();
        assert!(err.contains("Operands must be two numbers or two strings."));
    }

    #[test]
    fn syntax_error_is_a_compile_error() {
        let err = run_capture("print 1 +;").unwrap_err();
        assert!(err.contains("Expect expression"));
    }

    #[test]
    fn while_loop_prints_each_iteration() {
        let out = run_capture("var i = 0; while (i < 3) { print i; i = i + 1; }").unwrap();
        assert_eq!(out, "'0.0'\n'1.0'\n'2.0'\n");
    }

    #[test]
    fn string_equality_is_interning_backed() {
        assert_eq!(run_capture("print \"a\" == \"a\";").unwrap(), "true\n");
    }
}
