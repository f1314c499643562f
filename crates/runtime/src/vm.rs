//! The instruction dispatch loop.

use std::io::Write;

use ember_core::object::ObjHandle;
use ember_core::{intern_string, Chunk, OpCode, Table, Value};

use crate::error::RuntimeError;

const STACK_MAX: usize = 256;

/// A freshly constructed VM owns one chunk's worth of execution: its value
/// stack, instruction pointer, globals, string intern table and object
/// list. Built new per `interpret` call; there is no global VM instance.
pub struct VM {
    chunk: Chunk,
    ip: usize,
    stack: Vec<Value>,
    globals: Table,
    strings: Table,
    objects: Option<ObjHandle>,
}

impl VM {
    /// Take ownership of an already-compiled chunk plus the intern table and
    /// object list the compiler built while producing it, so compile-time
    /// string constants and runtime-created strings share one intern set.
    pub fn new(chunk: Chunk, strings: Table, objects: Option<ObjHandle>) -> Self {
        VM {
            chunk,
            ip: 0,
            stack: Vec::with_capacity(STACK_MAX),
            globals: Table::new(),
            strings,
            objects,
        }
    }

    /// Run to completion, writing `print` output to `out`.
    ///
    /// Generic over the output sink rather than hard-wired to `stdout` so
    /// tests can capture program output into an in-memory buffer instead of
    /// spawning a subprocess.
    pub fn run<W: Write>(&mut self, config: &crate::config::Config, out: &mut W) -> Result<(), RuntimeError> {
        loop {
            if config.trace_execution {
                self.trace();
            }

            let op = self.read_op()?;
            tracing::trace!(ip = self.ip - 1, ?op, "dispatch");
            match op {
                OpCode::Constant => {
                    let value = self.read_constant();
                    self.push(value)?;
                }
                OpCode::Nil => self.push(Value::Nil)?,
                OpCode::True => self.push(Value::Bool(true))?,
                OpCode::False => self.push(Value::Bool(false))?,
                OpCode::Pop => {
                    self.pop()?;
                }
                OpCode::GetLocal => {
                    let slot = self.read_byte();
                    self.push(self.stack[slot as usize])?;
                }
                OpCode::SetLocal => {
                    let slot = self.read_byte();
                    self.stack[slot as usize] = self.peek(0)?;
                }
                OpCode::GetGlobal => {
                    let name = self.read_string();
                    match self.globals.get(name) {
                        Some(value) => self.push(value)?,
                        None => return Err(self.runtime_error(&undefined_variable(name))),
                    }
                }
                OpCode::DefineGlobal => {
                    let name = self.read_string();
                    let value = self.peek(0)?;
                    self.globals.set(name, value);
                    self.pop()?;
                }
                OpCode::SetGlobal => {
                    let name = self.read_string();
                    let value = self.peek(0)?;
                    if self.globals.set(name, value) {
                        self.globals.delete(name);
                        return Err(self.runtime_error(&undefined_variable(name)));
                    }
                }
                OpCode::Equal => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(Value::Bool(a == b))?;
                }
                OpCode::Greater => self.numeric_binary(|a, b| Value::Bool(a > b))?,
                OpCode::Less => self.numeric_binary(|a, b| Value::Bool(a < b))?,
                OpCode::Add => self.add()?,
                OpCode::Subtract => self.numeric_binary(|a, b| Value::Number(a - b))?,
                OpCode::Multiply => self.numeric_binary(|a, b| Value::Number(a * b))?,
                OpCode::Divide => self.numeric_binary(|a, b| Value::Number(a / b))?,
                OpCode::Not => {
                    let value = self.pop()?;
                    self.push(Value::Bool(value.is_falsey()))?;
                }
                OpCode::Negate => {
                    let value = self.peek(0)?;
                    match value.as_number() {
                        Some(n) => {
                            self.pop()?;
                            self.push(Value::Number(-n))?;
                        }
                        None => return Err(self.runtime_error("Operand must be a number.")),
                    }
                }
                OpCode::Print => {
                    let value = self.pop()?;
                    let _ = writeln!(out, "{value}");
                }
                OpCode::Jump => {
                    let offset = self.read_u16();
                    self.ip += offset as usize;
                }
                OpCode::JumpIfFalse => {
                    let offset = self.read_u16();
                    if self.peek(0)?.is_falsey() {
                        self.ip += offset as usize;
                    }
                }
                OpCode::Loop => {
                    let offset = self.read_u16();
                    self.ip -= offset as usize;
                }
                OpCode::Return => {
                    return Ok(());
                }
            }
        }
    }

    fn trace(&self) {
        print!("          ");
        for value in &self.stack {
            print!("[ {value} ]");
        }
        println!();
        let (line, _) = crate::debug::disassemble_instruction(&self.chunk, self.ip);
        println!("{line}");
    }

    fn read_byte(&mut self) -> u8 {
        let byte = self.chunk.byte_at(self.ip);
        self.ip += 1;
        byte
    }

    fn read_op(&mut self) -> Result<OpCode, RuntimeError> {
        let byte = self.read_byte();
        OpCode::try_from(byte).map_err(|_| self.runtime_error("Unknown opcode."))
    }

    fn read_u16(&mut self) -> u16 {
        let hi = self.read_byte() as u16;
        let lo = self.read_byte() as u16;
        (hi << 8) | lo
    }

    fn read_constant(&mut self) -> Value {
        let index = self.read_byte();
        self.chunk.constant_at(index)
    }

    fn read_string(&mut self) -> ObjHandle {
        match self.read_constant() {
            Value::Obj(handle) => handle,
            _ => unreachable!("the compiler only ever emits string constants for name operands"),
        }
    }

    fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        if self.stack.len() == STACK_MAX {
            return Err(self.runtime_error("Stack overflow."));
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or_else(|| self.runtime_error("Stack underflow."))
    }

    fn peek(&self, distance: usize) -> Result<Value, RuntimeError> {
        self.stack
            .len()
            .checked_sub(distance + 1)
            .and_then(|i| self.stack.get(i).copied())
            .ok_or_else(|| self.runtime_error("Stack underflow."))
    }

    fn numeric_binary(&mut self, op: impl Fn(f64, f64) -> Value) -> Result<(), RuntimeError> {
        let b = self.peek(0)?;
        let a = self.peek(1)?;
        match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => {
                self.pop()?;
                self.pop()?;
                self.push(op(a, b))
            }
            _ => Err(self.runtime_error("Operands must be numbers.")),
        }
    }

    fn add(&mut self) -> Result<(), RuntimeError> {
        let b = self.peek(0)?;
        let a = self.peek(1)?;
        match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => {
                self.pop()?;
                self.pop()?;
                return self.push(Value::Number(a + b));
            }
            _ => {}
        }
        match (a.as_str(), b.as_str()) {
            (Some(a), Some(b)) => {
                let mut concatenated = String::with_capacity(a.len() + b.len());
                concatenated.push_str(a);
                concatenated.push_str(b);
                let handle = intern_string(&concatenated, &mut self.strings, &mut self.objects);
                self.pop()?;
                self.pop()?;
                self.push(Value::Obj(handle))
            }
            _ => Err(self.runtime_error("Operands must be two numbers or two strings.")),
        }
    }

    fn runtime_error(&self, message: &str) -> RuntimeError {
        let offset = self.ip.saturating_sub(1).min(self.chunk.len().saturating_sub(1));
        RuntimeError {
            message: message.to_string(),
            line: self.chunk.line_at(offset),
        }
    }
}

impl Drop for VM {
    fn drop(&mut self) {
        let mut current = self.objects.take();
        while let Some(handle) = current {
            let next = handle.next();
            handle.free();
            current = next;
        }
    }
}

fn undefined_variable(name: ObjHandle) -> String {
    format!(
        "Undefined variable '{}'.",
        name.as_string().map(|s| s.as_str()).unwrap_or("?")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_past_stack_max_is_a_runtime_error() {
        let mut chunk = Chunk::new();
        chunk.write_byte(OpCode::Return.into(), 1);
        let mut vm = VM::new(chunk, Table::new(), None);

        for _ in 0..STACK_MAX {
            vm.push(Value::Number(0.0)).unwrap();
        }
        let err = vm.push(Value::Number(0.0)).unwrap_err();
        assert!(err.message.contains("Stack overflow."));
    }
}
