use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};

use crate::cpu::Trap;

/// Data memory as seen by the executor. Cells are signed words addressed by index.
pub trait Bus {
    fn size(&self) -> usize;
    fn read(&mut self, addr: u32) -> Result<i64, Trap>;
    fn write(&mut self, addr: u32, val: i64) -> Result<(), Trap>;
}

/// One `(address, value)` row of a memory image or result dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemoryCell {
    pub address: u32,
    pub value: i64,
}

/// One past the widest address operand (WRITE_MEM, 19 bits).
pub const MAX_MEMORY_SIZE: usize = 1 << 19;

/// Zero-filled flat memory that remembers which cells the program wrote.
#[derive(Debug, Clone)]
pub struct LinearMemory {
    pub cells: Vec<i64>,
    written: BitVec,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size],
            written: BitVec::repeat(false, size),
        }
    }

    /// Like [`LinearMemory::new`], but refuses sizes no operand can address.
    pub fn with_size(size: usize) -> Result<Self, Trap> {
        if size > MAX_MEMORY_SIZE {
            return Err(Trap::MemorySize {
                size,
                max: MAX_MEMORY_SIZE,
            });
        }
        Ok(Self::new(size))
    }

    fn index(&self, addr: u32) -> Result<usize, Trap> {
        let idx = addr as usize;
        if idx < self.cells.len() {
            Ok(idx)
        } else {
            Err(Trap::OutOfBounds {
                addr,
                size: self.cells.len(),
            })
        }
    }

    /// Preloads an image. Image cells are initial contents, not program writes.
    pub fn load(&mut self, image: &[MemoryCell]) -> Result<(), Trap> {
        for cell in image {
            let idx = self.index(cell.address)?;
            self.cells[idx] = cell.value;
        }
        Ok(())
    }

    pub fn peek(&self, addr: u32) -> Option<i64> {
        self.cells.get(addr as usize).copied()
    }

    pub fn was_written(&self, addr: u32) -> bool {
        self.written
            .get(addr as usize)
            .map(|bit| *bit)
            .unwrap_or(false)
    }

    /// Final contents of every written cell, ascending by address.
    pub fn changed(&self) -> Vec<MemoryCell> {
        self.written
            .iter_ones()
            .map(|idx| MemoryCell {
                address: idx as u32,
                value: self.cells[idx],
            })
            .collect()
    }
}

impl Bus for LinearMemory {
    fn size(&self) -> usize {
        self.cells.len()
    }
    fn read(&mut self, addr: u32) -> Result<i64, Trap> {
        let idx = self.index(addr)?;
        Ok(self.cells[idx])
    }
    fn write(&mut self, addr: u32, val: i64) -> Result<(), Trap> {
        let idx = self.index(addr)?;
        self.cells[idx] = val;
        self.written.set(idx, true);
        Ok(())
    }
}
