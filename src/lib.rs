//! # uvm-asm — Bit-Packed Instruction Assembler
//!
//! `uvm-asm` translates the textual instruction language of a small
//! educational virtual machine into a binary instruction stream. Each
//! instruction becomes one bit-packed little-endian word: the opcode lives
//! in bits 0–3, operand fields at the fixed offsets and widths the ISA
//! table declares, and the output image is the plain concatenation of the
//! words in source order — no header, no padding.
//!
//! ## Quick Start
//!
//! ```rust
//! use uvm_asm::assemble;
//!
//! let image = assemble("LDM R[53] = M[820]").unwrap();
//! assert_eq!(image, vec![0x4E, 0x33, 0xA8, 0x01]);
//! ```
//!
//! ## Features
//!
//! - **Exact wire format** — per-opcode bit-field layouts with strict
//!   range checking; an operand that does not fit its field is an error,
//!   never silent truncation.
//! - **Line-oriented source** — one instruction per line, `#` comments,
//!   case-insensitive mnemonics, whitespace-insensitive operand grammar.
//! - **Fail-fast** — the first error aborts the run with its line number;
//!   a failed run produces no output bytes.
//! - **`no_std` + `alloc`** — the library carries no mandatory
//!   dependencies; the CLI front end is feature-gated.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// A bit-field codec lives on narrowing casts and dense hex literals; these
// lints are expected in this context.
#![allow(
    clippy::cast_possible_truncation,
    clippy::unreadable_literal,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::missing_errors_doc
)]

extern crate alloc;

/// Assembly pipeline: builder API, result type, diagnostic records.
pub mod assembler;
/// Bit-field codec: pack/unpack engine over ISA layouts.
pub mod codec;
/// Error types and source-span diagnostics.
pub mod error;
/// Intermediate representation: mnemonics and instruction records.
pub mod ir;
/// Static instruction layout table (the ISA table).
pub mod isa;
/// Line-oriented source parser with per-mnemonic operand grammars.
pub mod parser;

// Re-exports
pub use assembler::{AssembledInstruction, Assembler, AssemblyResult};
pub use error::{AsmError, Span};
pub use ir::{Instruction, Mnemonic};
pub use isa::{FieldSpec, Layout, ISA};

use alloc::vec::Vec;

/// Assemble source text into the binary instruction stream.
///
/// One instruction per line; blank lines and `#` comment lines are
/// skipped. The whole run is fail-fast: on error nothing is returned.
///
/// # Errors
///
/// Returns [`AsmError`] if any line has an unknown mnemonic, operand text
/// that deviates from its grammar, or a field value wider than its target
/// bit field.
///
/// # Examples
///
/// ```rust
/// use uvm_asm::assemble;
///
/// let image = assemble("STM M[R[5]] = R[8]").unwrap();
/// assert_eq!(image, vec![0x5A, 0x40, 0x00]);
/// ```
pub fn assemble(source: &str) -> Result<Vec<u8>, AsmError> {
    let mut asm = Assembler::new();
    asm.emit(source)?;
    Ok(asm.finish().into_bytes())
}

/// Assemble in diagnostic mode, retaining every record and its bytes.
///
/// # Errors
///
/// Returns [`AsmError`] on any assembly failure (see [`assemble`]).
///
/// # Examples
///
/// ```rust
/// use uvm_asm::assemble_with_records;
///
/// let result = assemble_with_records("# setup\nLDC R[91] = 651")?;
/// assert_eq!(result.instruction_count(), 1);
/// assert_eq!(result.records()[0].span.line, 2);
/// # Ok::<(), uvm_asm::AsmError>(())
/// ```
pub fn assemble_with_records(source: &str) -> Result<AssemblyResult, AsmError> {
    let mut asm = Assembler::new();
    asm.keep_records(true);
    asm.emit(source)?;
    Ok(asm.finish())
}
