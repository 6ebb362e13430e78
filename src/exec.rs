use crate::cpu::{Cpu, Status, Trap};
use crate::decoder::{Decoded, Op};
use crate::memory::Bus;

pub trait Executor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, d: Decoded) -> Result<(), Trap>;
}

/// Executes the accumulator instruction set. Arithmetic wraps.
pub struct AccExecutor;
impl Executor for AccExecutor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, d: Decoded) -> Result<(), Trap> {
        match d.op {
            Op::LoadConst => {
                cpu.set_acc(d.operand as i64);
            }
            Op::ReadMem => {
                let val = bus.read(d.operand)?;
                cpu.set_acc(val);
            }
            Op::WriteMem => {
                bus.write(d.operand, cpu.acc)?;
            }
            Op::Sgn => {
                cpu.set_acc(cpu.acc.signum());
            }
            Op::Add => {
                cpu.set_acc(cpu.acc.wrapping_add(d.operand as i64));
            }
            Op::Sub => {
                cpu.set_acc(cpu.acc.wrapping_sub(d.operand as i64));
            }
            Op::Jz => {
                // No bounds check: a target past the end stops the run on the next fetch
                if cpu.status.contains(Status::Z) {
                    cpu.pc = d.operand;
                }
            }
            Op::Jmp => {
                cpu.pc = d.operand;
            }
            Op::Halt => {
                cpu.status.insert(Status::H);
            }
        }
        Ok(())
    }
}
