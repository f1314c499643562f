//! Textual bytecode disassembly used by the `--trace`/`--print-code` debug
//! hooks. The format is implementation-defined but kept stable across runs
//! so it can be asserted on in tests.

use ember_core::{Chunk, OpCode};

/// Disassemble every instruction in `chunk`, one per line, prefixed with a
/// title banner.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = format!("== {name} ==\n");
    let mut offset = 0;
    while offset < chunk.len() {
        let (line, next) = disassemble_instruction(chunk, offset);
        out.push_str(&line);
        out.push('\n');
        offset = next;
    }
    out
}

/// Disassemble the single instruction at `offset`, returning its text and
/// the offset of the instruction that follows it.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> (String, usize) {
    let mut line = format!("{offset:04} ");
    if offset > 0 && chunk.line_at(offset) == chunk.line_at(offset - 1) {
        line.push_str("   | ");
    } else {
        line.push_str(&format!("{:4} ", chunk.line_at(offset)));
    }

    let byte = chunk.byte_at(offset);
    let Ok(op) = OpCode::try_from(byte) else {
        line.push_str(&format!("Unknown opcode {byte}"));
        return (line, offset + 1);
    };

    match op {
        OpCode::Constant => constant_instruction("OP_CONSTANT", chunk, offset, &mut line),
        OpCode::Nil => simple_instruction("OP_NIL", &mut line, offset),
        OpCode::True => simple_instruction("OP_TRUE", &mut line, offset),
        OpCode::False => simple_instruction("OP_FALSE", &mut line, offset),
        OpCode::Pop => simple_instruction("OP_POP", &mut line, offset),
        OpCode::GetLocal => byte_instruction("OP_GET_LOCAL", chunk, offset, &mut line),
        OpCode::SetLocal => byte_instruction("OP_SET_LOCAL", chunk, offset, &mut line),
        OpCode::GetGlobal => constant_instruction("OP_GET_GLOBAL", chunk, offset, &mut line),
        OpCode::DefineGlobal => constant_instruction("OP_DEFINE_GLOBAL", chunk, offset, &mut line),
        OpCode::SetGlobal => constant_instruction("OP_SET_GLOBAL", chunk, offset, &mut line),
        OpCode::Equal => simple_instruction("OP_EQUAL", &mut line, offset),
        OpCode::Greater => simple_instruction("OP_GREATER", &mut line, offset),
        OpCode::Less => simple_instruction("OP_LESS", &mut line, offset),
        OpCode::Add => simple_instruction("OP_ADD", &mut line, offset),
        OpCode::Subtract => simple_instruction("OP_SUBTRACT", &mut line, offset),
        OpCode::Multiply => simple_instruction("OP_MULTIPLY", &mut line, offset),
        OpCode::Divide => simple_instruction("OP_DIVIDE", &mut line, offset),
        OpCode::Not => simple_instruction("OP_NOT", &mut line, offset),
        OpCode::Negate => simple_instruction("OP_NEGATE", &mut line, offset),
        OpCode::Print => simple_instruction("OP_PRINT", &mut line, offset),
        OpCode::Jump => jump_instruction("OP_JUMP", 1, chunk, offset, &mut line),
        OpCode::JumpIfFalse => jump_instruction("OP_JUMP_IF_FALSE", 1, chunk, offset, &mut line),
        OpCode::Loop => jump_instruction("OP_LOOP", -1, chunk, offset, &mut line),
        OpCode::Return => simple_instruction("OP_RETURN", &mut line, offset),
    }
}

fn simple_instruction(name: &str, line: &mut String, offset: usize) -> (String, usize) {
    line.push_str(name);
    (line.clone(), offset + 1)
}

fn byte_instruction(name: &str, chunk: &Chunk, offset: usize, line: &mut String) -> (String, usize) {
    let slot = chunk.byte_at(offset + 1);
    line.push_str(&format!("{name:<16} {slot:4}"));
    (line.clone(), offset + 2)
}

fn constant_instruction(name: &str, chunk: &Chunk, offset: usize, line: &mut String) -> (String, usize) {
    let index = chunk.byte_at(offset + 1);
    let value = chunk.constant_at(index);
    line.push_str(&format!("{name:<16} {index:4} '{value}'"));
    (line.clone(), offset + 2)
}

fn jump_instruction(name: &str, sign: i32, chunk: &Chunk, offset: usize, line: &mut String) -> (String, usize) {
    let hi = chunk.byte_at(offset + 1) as u16;
    let lo = chunk.byte_at(offset + 2) as u16;
    let jump = (hi << 8) | lo;
    let target = (offset as i32) + 3 + sign * (jump as i32);
    line.push_str(&format!("{name:<16} {offset:4} -> {target}"));
    (line.clone(), offset + 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Value;

    #[test]
    fn disassembles_constant_instruction() {
        let mut chunk = Chunk::new();
        let idx = chunk.add_constant(Value::Number(1.0)).unwrap();
        chunk.write_byte(OpCode::Constant.into(), 1);
        chunk.write_byte(idx, 1);
        chunk.write_byte(OpCode::Return.into(), 1);

        let out = disassemble_chunk(&chunk, "test");
        assert!(out.contains("OP_CONSTANT"));
        assert!(out.contains("OP_RETURN"));
    }

    #[test]
    fn jump_instruction_reports_target_offset() {
        let mut chunk = Chunk::new();
        chunk.write_byte(OpCode::Jump.into(), 1);
        chunk.write_byte(0, 1);
        chunk.write_byte(3, 1);
        let (text, next) = disassemble_instruction(&chunk, 0);
        assert!(text.contains("OP_JUMP"));
        assert!(text.contains("-> 6"));
        assert_eq!(next, 3);
    }
}
