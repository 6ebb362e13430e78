use serde::{Deserialize, Serialize};

/// The closed instruction set of the accumulator machine.
///
/// Variant order matches [`crate::instructions::TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    LoadConst,
    ReadMem,
    WriteMem,
    Sgn,
    Add,
    Sub,
    Jz,
    Jmp,
    Halt,
}

impl Op {
    pub const ALL: [Op; 9] = [
        Op::LoadConst,
        Op::ReadMem,
        Op::WriteMem,
        Op::Sgn,
        Op::Add,
        Op::Sub,
        Op::Jz,
        Op::Jmp,
        Op::Halt,
    ];

    pub fn is_jump(self) -> bool {
        matches!(self, Op::Jz | Op::Jmp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub op: Op,
    pub operand: u32,
}

pub trait Decoder {
    fn decode(&self, raw32: u32) -> Option<Decoded>;
}
