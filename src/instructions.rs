use crate::decoder::Op;

/// How many operands an instruction takes and how wide the encoded operand may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandMode {
    /// No operand; any argument is rejected.
    Implied,
    /// One operand that may be left out, in which case it encodes as zero.
    Optional { bits: u8 },
    /// Exactly one operand.
    Required { bits: u8 },
}

impl OperandMode {
    pub fn bits(self) -> u8 {
        match self {
            OperandMode::Implied => 0,
            OperandMode::Optional { bits } | OperandMode::Required { bits } => bits,
        }
    }

    /// Largest operand value this mode can encode.
    pub fn max(self) -> u32 {
        match self.bits() {
            0 => 0,
            bits => (1u32 << bits) - 1,
        }
    }

    pub fn arity(self) -> &'static str {
        match self {
            OperandMode::Implied => "no",
            OperandMode::Optional { .. } => "at most one",
            OperandMode::Required { .. } => "exactly one",
        }
    }

    pub fn accepts(self, count: usize) -> bool {
        match self {
            OperandMode::Implied => count == 0,
            OperandMode::Optional { .. } => count <= 1,
            OperandMode::Required { .. } => count == 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Op,
    pub mnemonic: &'static str,
    pub opcode: u8,
    pub mode: OperandMode,
}

pub const TABLE: &[InstrDesc] = &[
    InstrDesc {
        op: Op::LoadConst,
        mnemonic: "LOAD_CONST",
        opcode: 25,
        mode: OperandMode::Required { bits: 13 },
    },
    InstrDesc {
        op: Op::ReadMem,
        mnemonic: "READ_MEM",
        opcode: 31,
        mode: OperandMode::Required { bits: 13 },
    },
    InstrDesc {
        op: Op::WriteMem,
        mnemonic: "WRITE_MEM",
        opcode: 8,
        mode: OperandMode::Required { bits: 19 },
    },
    InstrDesc {
        op: Op::Sgn,
        mnemonic: "SGN",
        opcode: 10,
        mode: OperandMode::Optional { bits: 13 },
    },
    InstrDesc {
        op: Op::Add,
        mnemonic: "ADD",
        opcode: 50,
        mode: OperandMode::Optional { bits: 13 },
    },
    InstrDesc {
        op: Op::Sub,
        mnemonic: "SUB",
        opcode: 51,
        mode: OperandMode::Optional { bits: 13 },
    },
    InstrDesc {
        op: Op::Jz,
        mnemonic: "JZ",
        opcode: 52,
        mode: OperandMode::Required { bits: 13 },
    },
    InstrDesc {
        op: Op::Jmp,
        mnemonic: "JMP",
        opcode: 53,
        mode: OperandMode::Required { bits: 13 },
    },
    InstrDesc {
        op: Op::Halt,
        mnemonic: "HALT",
        opcode: 54,
        mode: OperandMode::Implied,
    },
];

impl Op {
    pub fn desc(self) -> &'static InstrDesc {
        &TABLE[self as usize]
    }

    pub fn mnemonic(self) -> &'static str {
        self.desc().mnemonic
    }

    pub fn opcode(self) -> u8 {
        self.desc().opcode
    }
}

pub fn by_mnemonic(name: &str) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.mnemonic == name)
}

pub fn by_opcode(opcode: u8) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.opcode == opcode)
}
