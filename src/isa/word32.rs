use crate::decoder::{Decoded, Decoder, Op};
use crate::instructions::by_opcode;

/// Opcode lives in the top byte of every word.
pub const OPCODE_SHIFT: u32 = 24;
/// Operand field below the opcode. Per-opcode widths are narrower and checked separately.
pub const OPERAND_MASK: u32 = 0x00FF_FFFF;

/// Packs one instruction into a word. The operand is masked to the operand field;
/// range checks against the opcode's width belong to the caller.
pub fn encode(op: Op, operand: u32) -> u32 {
    ((op.opcode() as u32) << OPCODE_SHIFT) | (operand & OPERAND_MASK)
}

/// Uniform 32-bit word decoder: `opcode << 24 | operand`.
///
/// Rejects unknown opcodes and operands wider than the opcode allows, so every word
/// it accepts is one the assembler could have produced.
pub struct Word32Decoder;

impl Word32Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Word32Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for Word32Decoder {
    fn decode(&self, raw32: u32) -> Option<Decoded> {
        let opcode = (raw32 >> OPCODE_SHIFT) as u8;
        let operand = raw32 & OPERAND_MASK;
        let desc = by_opcode(opcode)?;
        if operand > desc.mode.max() {
            return None;
        }
        Some(Decoded {
            op: desc.op,
            operand,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_const_round_trip_at_limits() {
        let dec = Word32Decoder::new();
        for n in [0u32, 1, 4096, 8191] {
            let d = dec.decode(encode(Op::LoadConst, n)).expect("decode");
            assert_eq!(d, Decoded { op: Op::LoadConst, operand: n });
        }
    }

    #[test]
    fn write_mem_keeps_wide_operand() {
        let dec = Word32Decoder::new();
        let raw = encode(Op::WriteMem, 524_287);
        assert_eq!(raw, (8 << 24) | 0x7_FFFF);
        assert_eq!(dec.decode(raw).map(|d| d.operand), Some(524_287));
    }

    #[test]
    fn rejects_unknown_opcode_and_wide_operand() {
        let dec = Word32Decoder::new();
        assert!(dec.decode(0xFF00_0000).is_none());
        assert!(dec.decode((25 << 24) | 8192).is_none());
        assert!(dec.decode((54 << 24) | 1).is_none());
    }

    #[test]
    fn halt_is_bare_opcode() {
        assert_eq!(encode(Op::Halt, 0).to_be_bytes(), [54, 0, 0, 0]);
    }
}
