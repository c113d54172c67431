//! Static instruction layout table — the ISA table.
//!
//! One [`Layout`] per mnemonic, built once as process-wide immutable data.
//! Layouts describe the wire contract: the 4-bit opcode in bits 0–3, the
//! total word size, and the bit offset/width of every operand field. The
//! numeric values here are part of the binary format, not implementation
//! detail.

use crate::ir::Mnemonic;

/// Number of bits the opcode occupies at the bottom of every word.
pub const OPCODE_BITS: u32 = 4;

/// Mask selecting the opcode from the first byte of a word.
pub const OPCODE_MASK: u64 = (1 << OPCODE_BITS) - 1;

/// A named, fixed-width, fixed-offset bit range within an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldSpec {
    /// Field name as it appears in the surface syntax (`B`, `C`, `D`).
    pub name: &'static str,
    /// Bit position of the field's least-significant bit.
    pub bit_offset: u32,
    /// Field width in bits.
    pub bit_width: u32,
}

impl FieldSpec {
    /// Mask of `bit_width` ones, unshifted.
    #[must_use]
    pub fn mask(&self) -> u64 {
        (1u64 << self.bit_width) - 1
    }

    /// Largest value the field can hold.
    #[must_use]
    pub fn max_value(&self) -> u64 {
        self.mask()
    }
}

/// Complete bit-field description for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Layout {
    /// The mnemonic this layout encodes.
    pub mnemonic: Mnemonic,
    /// 4-bit opcode stored in bits 0–3 of the word.
    pub opcode: u8,
    /// Total word size in bytes.
    pub byte_size: usize,
    /// Operand fields in ascending bit-offset order.
    pub fields: &'static [FieldSpec],
    /// Surface operand syntax, used verbatim in syntax diagnostics.
    pub syntax: &'static str,
}

impl Layout {
    /// Total word size in bits.
    #[must_use]
    pub fn bit_size(&self) -> u32 {
        self.byte_size as u32 * 8
    }
}

/// The ISA table: every supported layout, in [`Mnemonic::ALL`] order.
pub const ISA: &[Layout] = &[
    Layout {
        mnemonic: Mnemonic::Ldc,
        opcode: 4,
        byte_size: 5,
        fields: &[
            FieldSpec {
                name: "B",
                bit_offset: 4,
                bit_width: 7,
            },
            FieldSpec {
                name: "C",
                bit_offset: 11,
                bit_width: 26,
            },
        ],
        syntax: "R[B] = C",
    },
    Layout {
        mnemonic: Mnemonic::Ldm,
        opcode: 14,
        byte_size: 4,
        fields: &[
            FieldSpec {
                name: "B",
                bit_offset: 4,
                bit_width: 15,
            },
            FieldSpec {
                name: "C",
                bit_offset: 19,
                bit_width: 7,
            },
        ],
        syntax: "R[C] = M[B]",
    },
    Layout {
        mnemonic: Mnemonic::Stm,
        opcode: 10,
        byte_size: 3,
        fields: &[
            FieldSpec {
                name: "B",
                bit_offset: 4,
                bit_width: 7,
            },
            FieldSpec {
                name: "C",
                bit_offset: 11,
                bit_width: 7,
            },
        ],
        syntax: "M[R[B]] = R[C]",
    },
    Layout {
        mnemonic: Mnemonic::BinOp,
        opcode: 5,
        byte_size: 4,
        fields: &[
            FieldSpec {
                name: "B",
                bit_offset: 4,
                bit_width: 7,
            },
            FieldSpec {
                name: "C",
                bit_offset: 11,
                bit_width: 10,
            },
            FieldSpec {
                name: "D",
                bit_offset: 21,
                bit_width: 7,
            },
        ],
        syntax: "R[D], R[B], C",
    },
];

/// Layout for a known mnemonic. Total: every mnemonic has exactly one entry.
#[must_use]
pub fn layout_of(mnemonic: Mnemonic) -> &'static Layout {
    match mnemonic {
        Mnemonic::Ldc => &ISA[0],
        Mnemonic::Ldm => &ISA[1],
        Mnemonic::Stm => &ISA[2],
        Mnemonic::BinOp => &ISA[3],
    }
}

/// Look up a source token in the ISA table, case-insensitively.
#[must_use]
pub fn lookup(token: &str) -> Option<&'static Layout> {
    Mnemonic::from_token(token).map(layout_of)
}

/// Recover the mnemonic from an encoded word's first byte.
///
/// The opcode always occupies bits 0–3 of the first byte, so record
/// boundaries in a headerless stream are recoverable from the opcode alone.
#[must_use]
pub fn mnemonic_of_byte(first: u8) -> Option<Mnemonic> {
    let opcode = u64::from(first) & OPCODE_MASK;
    ISA.iter()
        .find(|l| u64::from(l.opcode) == opcode)
        .map(|l| l.mnemonic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_mnemonic_order() {
        for (layout, mnemonic) in ISA.iter().zip(Mnemonic::ALL) {
            assert_eq!(layout.mnemonic, mnemonic);
            assert_eq!(layout_of(mnemonic), layout);
        }
    }

    #[test]
    fn opcodes_are_distinct_nibbles() {
        for (i, a) in ISA.iter().enumerate() {
            assert!(a.opcode < 16, "{} opcode exceeds 4 bits", a.mnemonic);
            for b in &ISA[i + 1..] {
                assert_ne!(a.opcode, b.opcode);
            }
        }
    }

    #[test]
    fn fields_are_disjoint_and_fit_the_word() {
        for layout in ISA {
            let mut occupied: u64 = OPCODE_MASK;
            for field in layout.fields {
                assert!(
                    field.bit_offset + field.bit_width <= layout.bit_size(),
                    "{} field {} overruns the word",
                    layout.mnemonic,
                    field.name
                );
                let bits = field.mask() << field.bit_offset;
                assert_eq!(
                    occupied & bits,
                    0,
                    "{} field {} overlaps another field",
                    layout.mnemonic,
                    field.name
                );
                occupied |= bits;
            }
        }
    }

    #[test]
    fn fields_are_in_ascending_offset_order() {
        for layout in ISA {
            for pair in layout.fields.windows(2) {
                assert!(pair[0].bit_offset < pair[1].bit_offset);
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("stm").map(|l| l.opcode), Some(10));
        assert_eq!(lookup("STM").map(|l| l.opcode), Some(10));
        assert_eq!(lookup("bin_op").map(|l| l.mnemonic), Some(Mnemonic::BinOp));
        assert!(lookup("jmp").is_none());
    }

    #[test]
    fn mnemonic_recoverable_from_first_byte() {
        assert_eq!(mnemonic_of_byte(0xE4), Some(Mnemonic::Ldc));
        assert_eq!(mnemonic_of_byte(0x4E), Some(Mnemonic::Ldm));
        assert_eq!(mnemonic_of_byte(0x5A), Some(Mnemonic::Stm));
        assert_eq!(mnemonic_of_byte(0x55), Some(Mnemonic::BinOp));
        assert_eq!(mnemonic_of_byte(0x00), None);
    }

    #[test]
    fn field_max_values() {
        let ldc = layout_of(Mnemonic::Ldc);
        assert_eq!(ldc.fields[0].max_value(), 127);
        assert_eq!(ldc.fields[1].max_value(), 67108863);
        let ldm = layout_of(Mnemonic::Ldm);
        assert_eq!(ldm.fields[0].max_value(), 32767);
        assert_eq!(ldm.fields[1].max_value(), 127);
    }
}
