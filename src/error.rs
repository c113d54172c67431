//! Error types and source span tracking for diagnostics.

use alloc::string::String;
use core::fmt;

/// Source location for diagnostics.
///
/// Tracks the line, column, byte offset, and length of a token or construct
/// in the original assembly source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (byte offset within line).
    pub col: u32,
    /// 0-based byte offset from start of source.
    pub offset: usize,
    /// Byte length of the spanned region.
    pub len: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub fn new(line: u32, col: u32, offset: usize, len: usize) -> Self {
        Self {
            line,
            col,
            offset,
            len,
        }
    }

    /// A dummy span for generated/internal constructs.
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            line: 0,
            col: 0,
            offset: 0,
            len: 0,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Assembly error with source location and descriptive message.
///
/// Every error aborts the run: the pipeline stops at the first failure and
/// produces no output bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AsmError {
    /// First token of a line is not in the ISA table.
    UnknownMnemonic {
        /// The mnemonic that was not recognized.
        mnemonic: String,
        /// Source location of the unknown mnemonic.
        span: Span,
    },

    /// Operand text does not match the mnemonic's grammar.
    Syntax {
        /// Canonical name of the mnemonic whose grammar failed.
        mnemonic: &'static str,
        /// The surface syntax the grammar expected, e.g. `R[B] = C`.
        expected: &'static str,
        /// Source location of the operand text.
        span: Span,
    },

    /// A parsed integer does not fit in its target field's bit width.
    FieldOverflow {
        /// Canonical name of the mnemonic being encoded.
        mnemonic: &'static str,
        /// Name of the overflowing field.
        field: &'static str,
        /// The value that does not fit.
        value: u64,
        /// Maximum value the field can hold (`2^width - 1`).
        max: u64,
        /// Source location of the instruction.
        span: Span,
    },

    /// A word handed to `decode` carries a different opcode than the
    /// layout it was decoded with.
    WrongOpcode {
        /// Canonical name of the mnemonic whose layout was used.
        mnemonic: &'static str,
        /// The layout's opcode.
        expected: u8,
        /// The opcode found in bits 0–3 of the word.
        found: u8,
    },

    /// A byte slice handed to `decode` is not exactly one word long.
    TruncatedWord {
        /// Canonical name of the mnemonic whose layout was used.
        mnemonic: &'static str,
        /// The layout's word size in bytes.
        expected: usize,
        /// The length of the slice actually provided.
        got: usize,
    },
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::UnknownMnemonic { mnemonic, span } => {
                write!(f, "{}: unknown mnemonic '{}'", span, mnemonic)
            }
            AsmError::Syntax {
                mnemonic,
                expected,
                span,
            } => {
                write!(
                    f,
                    "{}: malformed {} operands, expected '{}'",
                    span, mnemonic, expected
                )
            }
            AsmError::FieldOverflow {
                mnemonic,
                field,
                value,
                max,
                span,
            } => {
                write!(
                    f,
                    "{}: {} field {} value {} exceeds maximum {}",
                    span, mnemonic, field, value, max
                )
            }
            AsmError::WrongOpcode {
                mnemonic,
                expected,
                found,
            } => {
                write!(
                    f,
                    "{} word carries opcode {}, expected {}",
                    mnemonic, found, expected
                )
            }
            AsmError::TruncatedWord {
                mnemonic,
                expected,
                got,
            } => {
                write!(
                    f,
                    "{} word is {} bytes, expected {}",
                    mnemonic, got, expected
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AsmError {}
