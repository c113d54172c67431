//! Line-oriented parser for the assembly dialect.
//!
//! Each source line holds at most one instruction: the first
//! whitespace-delimited token is the mnemonic (case-insensitive), and the
//! rest of the line is operand text matched in full against that mnemonic's
//! grammar. Blank lines and `#` comment lines produce no record.
//!
//! The per-mnemonic grammars are explicit byte-scanner matchers rather than
//! regular expressions: whitespace between tokens is insignificant, integer
//! operands are digit runs only (no sign, no radix prefixes), and nothing
//! may remain after the pattern — partial matches and trailing garbage are
//! syntax errors.

use crate::error::{AsmError, Span};
use crate::ir::{Instruction, Mnemonic};
use crate::isa::{self, Layout};

/// First non-whitespace character that marks a comment line.
pub const COMMENT_MARKER: char = '#';

/// Parse one physical source line.
///
/// Returns `Ok(None)` for blank and comment lines, `Ok(Some(record, span))`
/// for an instruction, where the span covers the mnemonic token.
/// `line_offset` is the byte offset of the line start within the whole
/// source, used for span bookkeeping only.
///
/// # Errors
///
/// [`AsmError::UnknownMnemonic`] if the first token is not in the ISA
/// table, [`AsmError::Syntax`] if the operand text deviates from the
/// mnemonic's grammar in any way.
pub fn parse_line(
    raw: &str,
    line_no: u32,
    line_offset: usize,
) -> Result<Option<(Instruction, Span)>, AsmError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
        return Ok(None);
    }

    let lead = raw.len() - raw.trim_start().len();
    let body = raw.trim_start();
    let token_len = body
        .find(|c: char| c.is_whitespace())
        .unwrap_or(body.len());
    let (token, after) = body.split_at(token_len);
    let mnemonic_span = Span::new(line_no, (lead + 1) as u32, line_offset + lead, token.len());

    let layout = match isa::lookup(token) {
        Some(layout) => layout,
        None => {
            return Err(AsmError::UnknownMnemonic {
                mnemonic: token.into(),
                span: mnemonic_span,
            })
        }
    };

    let gap = after.len() - after.trim_start().len();
    let operands = after.trim();
    let operand_offset = lead + token.len() + gap;
    let operand_span = Span::new(
        line_no,
        (operand_offset + 1) as u32,
        line_offset + operand_offset,
        operands.len(),
    );

    match parse_operands(layout, operands) {
        Some(instr) => Ok(Some((instr, mnemonic_span))),
        None => Err(AsmError::Syntax {
            mnemonic: layout.mnemonic.as_str(),
            expected: layout.syntax,
            span: operand_span,
        }),
    }
}

/// Match operand text in full against the mnemonic's grammar.
///
/// `None` means any deviation: wrong bracket nesting, missing `=`,
/// non-numeric operand, extra tokens. The caller turns it into a
/// [`AsmError::Syntax`] carrying the expected surface pattern.
fn parse_operands(layout: &Layout, text: &str) -> Option<Instruction> {
    let mut s = Scanner::new(text);
    let instr = match layout.mnemonic {
        // R[B] = C
        Mnemonic::Ldc => {
            let b = s.register()?;
            s.expect(b'=')?;
            let c = s.number()?;
            Instruction::Ldc { b, c }
        }
        // R[C] = M[B]
        Mnemonic::Ldm => {
            let c = s.register()?;
            s.expect(b'=')?;
            let b = s.memory_cell()?;
            Instruction::Ldm { b, c }
        }
        // M[R[B]] = R[C]
        Mnemonic::Stm => {
            s.expect(b'M')?;
            s.expect(b'[')?;
            let b = s.register()?;
            s.expect(b']')?;
            s.expect(b'=')?;
            let c = s.register()?;
            Instruction::Stm { b, c }
        }
        // R[D], R[B], C
        Mnemonic::BinOp => {
            let d = s.register()?;
            s.expect(b',')?;
            let b = s.register()?;
            s.expect(b',')?;
            let c = s.number()?;
            Instruction::BinOp { d, b, c }
        }
    };
    s.finished().then_some(instr)
}

/// Minimal byte scanner over operand text.
///
/// All lookahead is single-byte; operand text is ASCII by construction of
/// the grammars (any non-ASCII byte simply fails to match).
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.bytes.get(self.pos) {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }

    /// Consume one expected byte, skipping leading whitespace.
    fn expect(&mut self, expected: u8) -> Option<()> {
        self.skip_ws();
        if self.bytes.get(self.pos) == Some(&expected) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    /// Consume a run of decimal digits as a non-negative integer.
    ///
    /// At least one digit is required; a literal that does not fit in
    /// `u64` fails the match (no field is anywhere near that wide).
    fn number(&mut self) -> Option<u64> {
        self.skip_ws();
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(&b) = self.bytes.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)?
                .checked_add(u64::from(b - b'0'))?;
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    /// Consume `R[ n ]` and return `n`.
    fn register(&mut self) -> Option<u64> {
        self.expect(b'R')?;
        self.bracketed_number()
    }

    /// Consume `M[ n ]` and return `n`.
    fn memory_cell(&mut self) -> Option<u64> {
        self.expect(b'M')?;
        self.bracketed_number()
    }

    fn bracketed_number(&mut self) -> Option<u64> {
        self.expect(b'[')?;
        let n = self.number()?;
        self.expect(b']')?;
        Some(n)
    }

    /// True when nothing but whitespace remains.
    fn finished(&mut self) -> bool {
        self.skip_ws();
        self.pos == self.bytes.len()
    }
}
