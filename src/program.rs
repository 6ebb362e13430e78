use serde::{Deserialize, Serialize};

use crate::cpu::Trap;

/// A dense instruction stream: one big-endian word per instruction, no header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub words: Vec<u32>,
}

impl Program {
    pub fn from_words(words: Vec<u32>) -> Self {
        Self { words }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Trap> {
        if bytes.len() % 4 != 0 {
            return Err(Trap::TruncatedProgram { len: bytes.len() });
        }
        let words = bytes
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { words })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    pub fn fetch(&self, pc: u32) -> Option<u32> {
        self.words.get(pc as usize).copied()
    }

    pub fn contains(&self, pc: u32) -> bool {
        (pc as usize) < self.words.len()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
