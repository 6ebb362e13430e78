pub mod asm;
pub mod cpu;
pub mod decoder;
pub mod disasm;
pub mod exec;
pub mod instructions;
pub mod interp;
pub mod memory;
pub mod program;
pub mod report;

pub mod isa {
    pub mod word32; // opcode << 24 | operand
}

pub use asm::{assemble, AsmError, Assembly, TraceRecord};
pub use cpu::{Cpu, CpuConfig, Stop, Trap, DEFAULT_MEMORY_SIZE};
pub use interp::{interpret, Interpreter, Outcome};
pub use memory::{Bus, LinearMemory, MemoryCell, MAX_MEMORY_SIZE};
pub use program::Program;
