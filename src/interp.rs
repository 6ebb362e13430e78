use serde::Serialize;

use crate::cpu::{Cpu, CpuConfig, Stop, Trap};
use crate::exec::AccExecutor;
use crate::isa::word32::Word32Decoder;
use crate::memory::{LinearMemory, MemoryCell};
use crate::program::Program;

/// Result of one complete run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub stop: Stop,
    pub steps: u64,
    pub acc: i64,
    /// Written cells with their final values, ascending by address.
    pub changed: Vec<MemoryCell>,
}

/// Runs programs on a fresh memory, optionally seeded with an image.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    cfg: CpuConfig,
    image: Vec<MemoryCell>,
}

impl Interpreter {
    pub fn new(cfg: CpuConfig) -> Self {
        Self {
            cfg,
            image: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: Vec<MemoryCell>) -> Self {
        self.image = image;
        self
    }

    pub fn run(&self, bytes: &[u8]) -> Result<Outcome, Trap> {
        let program = Program::from_bytes(bytes)?;
        self.run_program(&program)
    }

    pub fn run_program(&self, program: &Program) -> Result<Outcome, Trap> {
        let mut mem = LinearMemory::with_size(self.cfg.memory_size)?;
        mem.load(&self.image)?;
        let mut cpu = Cpu::new(self.cfg);
        let stop = cpu.run(program, &mut mem, &Word32Decoder::new(), &AccExecutor)?;
        Ok(Outcome {
            stop,
            steps: cpu.steps,
            acc: cpu.acc,
            changed: mem.changed(),
        })
    }
}

/// Executes an encoded program on zeroed memory and returns the written cells.
pub fn interpret(bytes: &[u8], memory_size: usize) -> Result<Vec<MemoryCell>, Trap> {
    let cfg = CpuConfig {
        memory_size,
        ..CpuConfig::default()
    };
    Ok(Interpreter::new(cfg).run(bytes)?.changed)
}
