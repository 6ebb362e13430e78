use accum_vm::decoder::{Decoded, Decoder, Op};
use accum_vm::isa::word32::Word32Decoder;
use accum_vm::{assemble, AsmError};
use pretty_assertions::assert_eq;

#[test]
fn load_const_encodes_and_decodes() {
    let dec = Word32Decoder::new();
    for n in [0u32, 1, 77, 8190, 8191] {
        let asm = assemble(&format!("LOAD_CONST {n}")).unwrap();
        assert_eq!(asm.program.len(), 1);
        let d = dec.decode(asm.program.words[0]).unwrap();
        assert_eq!(d, Decoded { op: Op::LoadConst, operand: n });
    }
}

#[test]
fn every_instruction_gets_a_word() {
    let src = "LOAD_CONST 1\nADD 2\nSUB\nSGN\nJZ 0\nJMP 0\nWRITE_MEM 3\nREAD_MEM 3\nHALT";
    let asm = assemble(src).unwrap();
    assert_eq!(asm.program.len(), 9);
    assert_eq!(asm.trace.len(), 9);
    let bytes = asm.to_bytes();
    assert_eq!(bytes.len(), 36);
    assert_eq!(bytes[..8].to_vec(), vec![25, 0, 0, 1, 50, 0, 0, 2]);
    assert_eq!(bytes[32..].to_vec(), vec![54, 0, 0, 0]);
}

#[test]
fn trace_lists_resolved_args() {
    let src = "start:\n  LOAD_CONST 0x10\n  WRITE_MEM 20\n  JMP start\n  ADD\n  HALT\n";
    let asm = assemble(src).unwrap();
    assert_eq!(
        asm.trace_text(),
        "command=LOAD_CONST, args=[16]\n\
         command=WRITE_MEM, args=[20]\n\
         command=JMP, args=[0]\n\
         command=ADD, args=[]\n\
         command=HALT, args=[]\n"
    );
}

#[test]
fn read_mem_over_13_bits_is_out_of_range() {
    assert_eq!(
        assemble("READ_MEM 8192").unwrap_err(),
        AsmError::OperandOutOfRange {
            line: 1,
            command: "READ_MEM",
            value: 8192,
            max: 8191
        }
    );
}

#[test]
fn write_mem_over_19_bits_is_out_of_range() {
    assert!(assemble("WRITE_MEM 524287").is_ok());
    assert!(matches!(
        assemble("WRITE_MEM 524288"),
        Err(AsmError::OperandOutOfRange { value: 524288, max: 524287, .. })
    ));
}

#[test]
fn negative_operand_is_out_of_range() {
    assert!(matches!(
        assemble("LOAD_CONST -1"),
        Err(AsmError::OperandOutOfRange { value: -1, .. })
    ));
}

#[test]
fn unknown_command() {
    let err = assemble("LOAD_CONST 1\n\nMUL 3\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::UnknownCommand {
            line: 3,
            command: "MUL".into()
        }
    );
    assert_eq!(err.to_string(), "line 3: unknown command `MUL`");
}

#[test]
fn mnemonics_are_case_sensitive() {
    assert!(matches!(
        assemble("halt"),
        Err(AsmError::UnknownCommand { .. })
    ));
}

#[test]
fn undefined_label_is_invalid_operand() {
    assert_eq!(
        assemble("JMP nowhere").unwrap_err(),
        AsmError::InvalidOperand {
            line: 1,
            command: "JMP",
            token: "nowhere".into()
        }
    );
}

#[test]
fn operand_count_is_checked() {
    assert!(matches!(
        assemble("LOAD_CONST"),
        Err(AsmError::OperandCount { found: 0, .. })
    ));
    assert!(matches!(
        assemble("HALT 1"),
        Err(AsmError::OperandCount { found: 1, .. })
    ));
    assert!(matches!(
        assemble("ADD 1 2"),
        Err(AsmError::OperandCount { found: 2, .. })
    ));
}

#[test]
fn duplicate_and_malformed_labels() {
    assert_eq!(
        assemble("a:\nHALT\na:\nHALT").unwrap_err(),
        AsmError::DuplicateLabel {
            line: 3,
            name: "a".into()
        }
    );
    assert!(matches!(
        assemble(": HALT"),
        Err(AsmError::InvalidLabel { line: 1, .. })
    ));
    assert!(matches!(
        assemble("two words: HALT"),
        Err(AsmError::InvalidLabel { .. })
    ));
}

#[test]
fn label_takes_precedence_over_number() {
    // A label spelled like a number shadows the literal
    let asm = assemble("JMP 7\nHALT\n7:\nHALT").unwrap();
    assert_eq!(asm.trace[0].args, vec![2]);
}

#[test]
fn first_error_wins() {
    let err = assemble("BOGUS\nREAD_MEM 9999").unwrap_err();
    assert_eq!(err.line(), 1);
}
