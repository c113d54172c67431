//! Assembly pipeline — drives the parser and codec over source lines.
//!
//! Processing is a fold over the physical lines in order: parse, look up
//! the layout, encode, append. The first error aborts the run with its
//! originating line; nothing is emitted for a failed run. The optional
//! diagnostic mode keeps every record with its encoded bytes for external
//! inspection without changing the encoding semantics.

use alloc::vec::Vec;

use crate::codec;
use crate::error::{AsmError, Span};
use crate::ir::Instruction;
use crate::isa;
use crate::parser;

/// One assembled instruction, retained when diagnostic mode is on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AssembledInstruction {
    /// The parsed record.
    pub instruction: Instruction,
    /// Source location of the mnemonic token.
    pub span: Span,
    /// Byte offset of this word within the output image.
    pub offset: usize,
    /// The encoded little-endian word.
    pub bytes: Vec<u8>,
}

/// The result of a successful assembly run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[must_use]
pub struct AssemblyResult {
    /// The output image: each word's bytes concatenated in source order.
    bytes: Vec<u8>,
    /// Ordered records, non-empty only in diagnostic mode.
    records: Vec<AssembledInstruction>,
    /// Number of instructions assembled.
    count: usize,
}

impl AssemblyResult {
    /// The assembled bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Output length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether no bytes were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of instructions assembled.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.count
    }

    /// The retained records, in source order. Empty unless the assembler
    /// ran with [`Assembler::keep_records`] enabled.
    #[must_use]
    pub fn records(&self) -> &[AssembledInstruction] {
        &self.records
    }
}

/// Batch assembler for the instruction language.
///
/// Lines are processed strictly in order as they are fed in; line numbering
/// continues across [`emit`](Assembler::emit) calls so diagnostics always
/// reference the physical source line. After an error the assembler's
/// intermediate state is meaningless and the instance should be dropped —
/// the pipeline is fail-fast, not best-effort.
///
/// # Examples
///
/// ```
/// use uvm_asm::Assembler;
///
/// let mut asm = Assembler::new();
/// asm.emit("STM M[R[5]] = R[8]")?;
/// let result = asm.finish();
/// assert_eq!(result.bytes(), &[0x5A, 0x40, 0x00]);
/// assert_eq!(result.instruction_count(), 1);
/// # Ok::<(), uvm_asm::AsmError>(())
/// ```
#[derive(Debug)]
pub struct Assembler {
    keep_records: bool,
    bytes: Vec<u8>,
    records: Vec<AssembledInstruction>,
    count: usize,
    next_line: u32,
    src_offset: usize,
}

impl Assembler {
    /// Create an assembler with an empty output buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keep_records: false,
            bytes: Vec::new(),
            records: Vec::new(),
            count: 0,
            next_line: 1,
            src_offset: 0,
        }
    }

    /// Toggle diagnostic mode: retain every record with its encoded bytes.
    pub fn keep_records(&mut self, keep: bool) -> &mut Self {
        self.keep_records = keep;
        self
    }

    /// Assemble a chunk of source text, appending to the output buffer.
    ///
    /// Blank lines and `#` comment lines are skipped but still advance the
    /// line counter, so later diagnostics stay accurate.
    ///
    /// # Errors
    ///
    /// Returns the first [`AsmError`] encountered; earlier lines of the
    /// same chunk may already have been appended, so on error the whole
    /// assembler should be discarded.
    pub fn emit(&mut self, source: &str) -> Result<(), AsmError> {
        for line in source.split('\n') {
            let line_no = self.next_line;
            self.next_line += 1;

            if let Some((instruction, span)) = parser::parse_line(line, line_no, self.src_offset)? {
                let layout = isa::layout_of(instruction.mnemonic());
                let encoded = codec::encode(layout, &instruction, span)?;
                let offset = self.bytes.len();
                self.bytes.extend_from_slice(&encoded);
                if self.keep_records {
                    self.records.push(AssembledInstruction {
                        instruction,
                        span,
                        offset,
                        bytes: encoded,
                    });
                }
                self.count += 1;
            }

            self.src_offset += line.len() + 1;
        }
        Ok(())
    }

    /// Finish assembly and hand back the output.
    pub fn finish(self) -> AssemblyResult {
        AssemblyResult {
            bytes: self.bytes,
            records: self.records,
            count: self.count,
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn empty_source_is_an_empty_image() {
        let mut asm = Assembler::new();
        asm.emit("").unwrap();
        let result = asm.finish();
        assert!(result.is_empty());
        assert_eq!(result.instruction_count(), 0);
    }

    #[test]
    fn output_is_concatenation_in_source_order() {
        let mut asm = Assembler::new();
        asm.emit("STM M[R[5]] = R[8]\nLDM R[53] = M[820]").unwrap();
        let result = asm.finish();
        assert_eq!(
            result.bytes(),
            &[0x5A, 0x40, 0x00, 0x4E, 0x33, 0xA8, 0x01]
        );
        assert_eq!(result.instruction_count(), 2);
    }

    #[test]
    fn line_numbers_continue_across_emit_calls() {
        let mut asm = Assembler::new();
        asm.emit("LDC R[1] = 2\n").unwrap();
        let err = asm.emit("bogus").unwrap_err();
        match err {
            AsmError::UnknownMnemonic { span, .. } => assert_eq!(span.line, 3),
            other => panic!("expected UnknownMnemonic, got {:?}", other),
        }
    }

    #[test]
    fn records_are_kept_only_in_diagnostic_mode() {
        let source = "LDC R[1] = 2\nSTM M[R[3]] = R[4]";

        let mut plain = Assembler::new();
        plain.emit(source).unwrap();
        assert!(plain.finish().records().is_empty());

        let mut diag = Assembler::new();
        diag.keep_records(true);
        diag.emit(source).unwrap();
        let result = diag.finish();
        let records = result.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].offset, 0);
        assert_eq!(records[0].bytes.len(), 5);
        assert_eq!(records[1].offset, 5);
        assert_eq!(records[1].instruction, Instruction::Stm { b: 3, c: 4 });
        assert_eq!(records[1].span.line, 2);
    }

    #[test]
    fn field_overflow_aborts_with_the_instruction_line() {
        let mut asm = Assembler::new();
        let err = asm.emit("# header\nSTM M[R[5]] = R[200]").unwrap_err();
        match err {
            AsmError::FieldOverflow { field, value, max, span, .. } => {
                assert_eq!(field, "C");
                assert_eq!(value, 200);
                assert_eq!(max, 127);
                assert_eq!(span.line, 2);
            }
            other => panic!("expected FieldOverflow, got {:?}", other),
        }
    }

    #[test]
    fn skipped_lines_still_advance_line_numbers() {
        let mut asm = Assembler::new();
        let err = asm
            .emit("# one\n\n# three\nLDC R[1] = huh")
            .unwrap_err();
        match err {
            AsmError::Syntax { span, .. } => assert_eq!(span.line, 4),
            other => panic!("expected Syntax, got {:?}", other),
        }
    }

    #[test]
    fn result_serializes_counts_and_bytes() {
        let mut asm = Assembler::new();
        asm.emit("LDC R[0] = 0").unwrap();
        let result = asm.finish();
        assert_eq!(result.len(), 5);
        assert_eq!(result.into_bytes(), vec![0x04, 0x00, 0x00, 0x00, 0x00]);
    }
}
