//! Ember Core: value, object and bytecode primitives
//!
//! This crate provides the language-agnostic-as-possible foundation shared by
//! the Ember compiler and runtime crates:
//!
//! - `value`: the tagged `Value` union (`Bool`, `Nil`, `Number`, `Obj`)
//! - `object`: heap objects (currently only interned strings), threaded into
//!   an intrusive singly-linked list for bulk reclamation
//! - `chunk`: a growable bytecode buffer with a parallel line table and a
//!   constant pool
//! - `opcode`: the one-byte instruction set
//! - `table`: the open-addressed string-interning/globals hash table, shared
//!   by the compiler and the runtime
//!
//! # Modules
//!
//! - `chunk`: `Chunk`, the compiled output of a single compilation unit
//! - `object`: `Obj`, `ObjString`, `ObjHandle`, and the FNV-1a string hash
//! - `opcode`: `OpCode`
//! - `table`: `Table`, `intern_string`
//! - `value`: `Value`

pub mod chunk;
pub mod object;
pub mod opcode;
pub mod table;
pub mod value;

pub use chunk::Chunk;
pub use object::{fnv1a_hash, ObjHandle, ObjKind, ObjString};
pub use opcode::OpCode;
pub use table::{intern_string, Table};
pub use value::Value;
