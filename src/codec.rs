//! Bit-field codec: packs an instruction record into its little-endian word
//! and unpacks it back.
//!
//! Both directions are pure functions over a [`Layout`] and a word of
//! `byte_size` bytes. Fields occupy disjoint bit ranges, so packing order
//! never affects the result; the defining correctness property is the
//! round-trip identity `decode(layout, encode(layout, v)) == v` for every
//! record whose values fit their declared widths.

use alloc::vec::Vec;

use crate::error::{AsmError, Span};
use crate::ir::{Instruction, Mnemonic};
use crate::isa::{Layout, OPCODE_MASK};

/// Encode a record into its `byte_size`-byte little-endian word.
///
/// Every field value is range-checked against its declared width before any
/// bit is placed; an out-of-range value fails with
/// [`AsmError::FieldOverflow`] naming the field, the value, and the maximum.
/// An oversized value is never truncated or allowed to spill into a
/// neighboring field.
///
/// `span` locates the instruction in the source text for diagnostics; pass
/// [`Span::dummy`] when encoding records that have no source line.
///
/// # Errors
///
/// Returns [`AsmError::FieldOverflow`] if any field value exceeds
/// `2^bit_width - 1`.
///
/// # Examples
///
/// ```
/// use uvm_asm::{codec, isa, Instruction, Mnemonic, Span};
///
/// let layout = isa::layout_of(Mnemonic::Ldm);
/// let word = codec::encode(layout, &Instruction::Ldm { b: 820, c: 53 }, Span::dummy())?;
/// assert_eq!(word, vec![0x4E, 0x33, 0xA8, 0x01]);
/// # Ok::<(), uvm_asm::AsmError>(())
/// ```
pub fn encode(layout: &Layout, instr: &Instruction, span: Span) -> Result<Vec<u8>, AsmError> {
    debug_assert_eq!(layout.mnemonic, instr.mnemonic());

    let values = instr.fields();
    debug_assert_eq!(values.len(), layout.fields.len());

    let mut word = u64::from(layout.opcode);
    for (spec, (name, value)) in layout.fields.iter().zip(values) {
        debug_assert_eq!(spec.name, name);
        if value > spec.max_value() {
            return Err(AsmError::FieldOverflow {
                mnemonic: layout.mnemonic.as_str(),
                field: spec.name,
                value,
                max: spec.max_value(),
                span,
            });
        }
        word |= value << spec.bit_offset;
    }

    let mut bytes = Vec::with_capacity(layout.byte_size);
    for i in 0..layout.byte_size {
        bytes.push((word >> (8 * i as u32)) as u8);
    }
    Ok(bytes)
}

/// Decode a `byte_size`-byte little-endian word back into a record.
///
/// # Errors
///
/// Returns [`AsmError::TruncatedWord`] if `bytes` is not exactly
/// `layout.byte_size` long, and [`AsmError::WrongOpcode`] if bits 0–3 of
/// the word do not carry the layout's opcode.
///
/// # Examples
///
/// ```
/// use uvm_asm::{codec, isa, Instruction, Mnemonic};
///
/// let layout = isa::layout_of(Mnemonic::Ldm);
/// let instr = codec::decode(layout, &[0x4E, 0x33, 0xA8, 0x01])?;
/// assert_eq!(instr, Instruction::Ldm { b: 820, c: 53 });
/// # Ok::<(), uvm_asm::AsmError>(())
/// ```
pub fn decode(layout: &Layout, bytes: &[u8]) -> Result<Instruction, AsmError> {
    if bytes.len() != layout.byte_size {
        return Err(AsmError::TruncatedWord {
            mnemonic: layout.mnemonic.as_str(),
            expected: layout.byte_size,
            got: bytes.len(),
        });
    }

    let mut word: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        word |= u64::from(byte) << (8 * i as u32);
    }
    let found = (word & OPCODE_MASK) as u8;
    if found != layout.opcode {
        return Err(AsmError::WrongOpcode {
            mnemonic: layout.mnemonic.as_str(),
            expected: layout.opcode,
            found,
        });
    }

    let field = |i: usize| {
        let spec = &layout.fields[i];
        (word >> spec.bit_offset) & spec.mask()
    };

    Ok(match layout.mnemonic {
        Mnemonic::Ldc => Instruction::Ldc {
            b: field(0),
            c: field(1),
        },
        Mnemonic::Ldm => Instruction::Ldm {
            b: field(0),
            c: field(1),
        },
        Mnemonic::Stm => Instruction::Stm {
            b: field(0),
            c: field(1),
        },
        Mnemonic::BinOp => Instruction::BinOp {
            b: field(0),
            c: field(1),
            d: field(2),
        },
    })
}
