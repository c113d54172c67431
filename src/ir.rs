//! Intermediate representation: mnemonics and parsed instruction records.
//!
//! An [`Instruction`] is a closed tagged variant carrying exactly the fields
//! its layout declares, so a record can never be missing a field the codec
//! needs, and no extraneous field can leak through.

use alloc::vec::Vec;
use core::fmt;

/// The four mnemonics of the instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Mnemonic {
    /// `LDC R[B] = C` — load constant into register.
    Ldc,
    /// `LDM R[C] = M[B]` — load from memory into register.
    Ldm,
    /// `STM M[R[B]] = R[C]` — store register through register-held address.
    Stm,
    /// `BIN_OP R[D], R[B], C` — binary operation with base register and offset.
    BinOp,
}

impl Mnemonic {
    /// All mnemonics, in ISA table order.
    pub const ALL: [Mnemonic; 4] = [Mnemonic::Ldc, Mnemonic::Ldm, Mnemonic::Stm, Mnemonic::BinOp];

    /// Canonical (upper-case) spelling used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Ldc => "LDC",
            Mnemonic::Ldm => "LDM",
            Mnemonic::Stm => "STM",
            Mnemonic::BinOp => "BIN_OP",
        }
    }

    /// Match a source token against the mnemonic set, case-insensitively.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| token.eq_ignore_ascii_case(m.as_str()))
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed instruction record — the pre-encoding form of one source line.
///
/// One variant per mnemonic; each carries its operand field values as
/// unsigned integers. Width validation happens in the codec, not here, so a
/// record can represent an out-of-range operand long enough to produce a
/// precise [`FieldOverflow`](crate::AsmError::FieldOverflow) diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Instruction {
    /// `LDC R[B] = C`
    Ldc {
        /// Destination register index.
        b: u64,
        /// Constant value.
        c: u64,
    },
    /// `LDM R[C] = M[B]`
    Ldm {
        /// Source memory address.
        b: u64,
        /// Destination register index.
        c: u64,
    },
    /// `STM M[R[B]] = R[C]`
    Stm {
        /// Register holding the target memory address.
        b: u64,
        /// Register holding the value to store.
        c: u64,
    },
    /// `BIN_OP R[D], R[B], C`
    BinOp {
        /// Result/operand register index.
        d: u64,
        /// Base register index.
        b: u64,
        /// Offset constant.
        c: u64,
    },
}

impl Instruction {
    /// The mnemonic of this record.
    #[must_use]
    pub const fn mnemonic(&self) -> Mnemonic {
        match self {
            Instruction::Ldc { .. } => Mnemonic::Ldc,
            Instruction::Ldm { .. } => Mnemonic::Ldm,
            Instruction::Stm { .. } => Mnemonic::Stm,
            Instruction::BinOp { .. } => Mnemonic::BinOp,
        }
    }

    /// Field name/value pairs in layout order (ascending bit offset).
    ///
    /// The order matches `fields` in the corresponding
    /// [`Layout`](crate::isa::Layout) entry, which the codec relies on.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, u64)> {
        match *self {
            Instruction::Ldc { b, c } | Instruction::Ldm { b, c } | Instruction::Stm { b, c } => {
                alloc::vec![("B", b), ("C", c)]
            }
            Instruction::BinOp { d, b, c } => alloc::vec![("B", b), ("C", c), ("D", d)],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Ldc { b, c } => write!(f, "LDC R[{}] = {}", b, c),
            Instruction::Ldm { b, c } => write!(f, "LDM R[{}] = M[{}]", c, b),
            Instruction::Stm { b, c } => write!(f, "STM M[R[{}]] = R[{}]", b, c),
            Instruction::BinOp { d, b, c } => write!(f, "BIN_OP R[{}], R[{}], {}", d, b, c),
        }
    }
}
