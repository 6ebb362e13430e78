use accum_vm::exec::AccExecutor;
use accum_vm::isa::word32::{encode, Word32Decoder};
use accum_vm::decoder::Op;
use accum_vm::{
    assemble, interpret, Bus, Cpu, CpuConfig, Interpreter, LinearMemory, MemoryCell, Program, Trap,
    MAX_MEMORY_SIZE,
};
use pretty_assertions::assert_eq;

#[test]
fn read_beyond_memory_traps() {
    let asm = assemble("READ_MEM 16\nHALT").unwrap();
    assert_eq!(
        interpret(&asm.to_bytes(), 16).unwrap_err(),
        Trap::OutOfBounds { addr: 16, size: 16 }
    );
    assert!(interpret(&asm.to_bytes(), 17).is_ok());
}

#[test]
fn write_beyond_memory_traps() {
    // Encodable as a 19-bit address, but the default memory is 1024 cells
    let asm = assemble("LOAD_CONST 1\nWRITE_MEM 300000").unwrap();
    assert!(matches!(
        Interpreter::default().run(&asm.to_bytes()),
        Err(Trap::OutOfBounds { addr: 300000, size: 1024 })
    ));
}

#[test]
fn wide_write_with_large_memory() {
    let asm = assemble("LOAD_CONST 42\nWRITE_MEM 524287\nHALT").unwrap();
    assert_eq!(
        interpret(&asm.to_bytes(), 524_288).unwrap(),
        vec![MemoryCell { address: 524_287, value: 42 }]
    );
}

#[test]
fn unaddressable_memory_size_is_an_error() {
    assert_eq!(
        interpret(&[], usize::MAX),
        Err(Trap::MemorySize {
            size: usize::MAX,
            max: MAX_MEMORY_SIZE
        })
    );
    assert!(interpret(&[], MAX_MEMORY_SIZE + 1).is_err());
}

#[test]
fn overwritten_cell_reported_once_with_final_value() {
    let asm = assemble("LOAD_CONST 1\nWRITE_MEM 4\nLOAD_CONST 2\nWRITE_MEM 4\nWRITE_MEM 1").unwrap();
    assert_eq!(
        interpret(&asm.to_bytes(), 8).unwrap(),
        vec![
            MemoryCell { address: 1, value: 2 },
            MemoryCell { address: 4, value: 2 },
        ]
    );
}

#[test]
fn image_is_readable_but_not_reported() {
    let asm = assemble("READ_MEM 2\nWRITE_MEM 3\nHALT").unwrap();
    let out = Interpreter::default()
        .with_image(vec![MemoryCell { address: 2, value: -9 }])
        .run(&asm.to_bytes())
        .unwrap();
    assert_eq!(out.changed, vec![MemoryCell { address: 3, value: -9 }]);
}

#[test]
fn image_outside_memory_is_rejected() {
    let cfg = CpuConfig { memory_size: 4, max_steps: None };
    let err = Interpreter::new(cfg)
        .with_image(vec![MemoryCell { address: 4, value: 1 }])
        .run(&[])
        .unwrap_err();
    assert_eq!(err, Trap::OutOfBounds { addr: 4, size: 4 });
}

#[test]
fn truncated_binary_is_rejected() {
    assert_eq!(
        interpret(&[25, 0, 0], 16).unwrap_err(),
        Trap::TruncatedProgram { len: 3 }
    );
}

#[test]
fn undecodable_word_traps() {
    let bytes = [0xFFu8, 0, 0, 0];
    assert_eq!(
        interpret(&bytes, 16).unwrap_err(),
        Trap::InvalidInstruction { pc: 0, word: 0xFF00_0000 }
    );
}

#[test]
fn step_after_end_reports_fetch() {
    let prog = Program::from_words(vec![encode(Op::Halt, 0)]);
    let mut mem = LinearMemory::new(1);
    let mut cpu = Cpu::new(CpuConfig::default());
    cpu.reset(1);
    assert_eq!(
        cpu.step(&prog, &mut mem, &Word32Decoder::new(), &AccExecutor),
        Err(Trap::FetchOutOfRange { pc: 1 })
    );
    assert_eq!(mem.size(), 1);
}
