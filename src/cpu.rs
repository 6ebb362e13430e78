use crate::decoder::Decoder;
use crate::exec::Executor;
use crate::memory::Bus;
use crate::program::Program;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_MEMORY_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuConfig {
    pub memory_size: usize,
    /// Stop with [`Trap::StepLimit`] after this many instructions. `None` runs to completion.
    pub max_steps: Option<u64>,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            max_steps: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub pc: u32,        // index into the instruction stream
    pub acc: i64,       // accumulator
    pub status: Status, // derived from acc, plus the halt latch
    pub steps: u64,
    pub cfg: CpuConfig,
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status: u8 {
const Z = 1 << 0; // acc == 0
const N = 1 << 1; // acc < 0
const H = 1 << 2; // HALT executed
}
}

/// Why a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stop {
    Halt,
    EndOfProgram,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Trap {
    #[error("Invalid instruction {word:#010x} at {pc}")]
    InvalidInstruction { pc: u32, word: u32 },
    #[error("Out of bounds access at address {addr} (memory size {size})")]
    OutOfBounds { addr: u32, size: usize },
    #[error("Fetch past end of program at {pc}")]
    FetchOutOfRange { pc: u32 },
    #[error("Step limit of {limit} reached at {pc}")]
    StepLimit { limit: u64, pc: u32 },
    #[error("Program is {len} bytes, not a whole number of 4-byte words")]
    TruncatedProgram { len: usize },
    #[error("Memory size {size} exceeds the addressable maximum of {max} cells")]
    MemorySize { size: usize, max: usize },
}

impl Cpu {
    pub fn new(cfg: CpuConfig) -> Self {
        Self {
            pc: 0,
            acc: 0,
            status: Status::Z,
            steps: 0,
            cfg,
        }
    }

    pub fn reset(&mut self, reset_pc: u32) {
        self.pc = reset_pc;
        self.set_acc(0);
        self.status.remove(Status::H);
        self.steps = 0;
    }

    pub fn set_acc(&mut self, val: i64) {
        self.acc = val;
        self.status.set(Status::Z, val == 0);
        self.status.set(Status::N, val < 0);
    }

    pub fn is_halted(&self) -> bool {
        self.status.contains(Status::H)
    }

    pub fn step<B: Bus, D: Decoder, X: Executor>(
        &mut self,
        program: &Program,
        bus: &mut B,
        dec: &D,
        exec: &X,
    ) -> Result<(), Trap> {
        let pc = self.pc;
        let raw32 = program.fetch(pc).ok_or(Trap::FetchOutOfRange { pc })?;
        let d = dec
            .decode(raw32)
            .ok_or(Trap::InvalidInstruction { pc, word: raw32 })?;
        // Advance before executing so jumps are absolute and fallthrough is pc + 1
        self.pc = pc.wrapping_add(1);
        self.steps += 1;
        debug!(pc, acc = self.acc, op = ?d.op, operand = d.operand, "step");
        exec.exec(self, bus, d)
    }

    /// Steps until HALT or until pc leaves the program.
    pub fn run<B: Bus, D: Decoder, X: Executor>(
        &mut self,
        program: &Program,
        bus: &mut B,
        dec: &D,
        exec: &X,
    ) -> Result<Stop, Trap> {
        let stop = loop {
            if self.is_halted() {
                break Stop::Halt;
            }
            if !program.contains(self.pc) {
                break Stop::EndOfProgram;
            }
            if let Some(limit) = self.cfg.max_steps {
                if self.steps >= limit {
                    warn!(limit, pc = self.pc, "step limit reached");
                    return Err(Trap::StepLimit { limit, pc: self.pc });
                }
            }
            self.step(program, bus, dec, exec)?;
        };
        info!(?stop, steps = self.steps, acc = self.acc, "run finished");
        Ok(stop)
    }
}
