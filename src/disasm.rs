use crate::decoder::Decoded;
use crate::instructions::OperandMode;

/// Renders a decoded instruction in the syntax the assembler accepts.
pub fn fmt_decoded(d: &Decoded) -> String {
    let desc = d.op.desc();
    match desc.mode {
        OperandMode::Implied => desc.mnemonic.to_string(),
        _ => format!("{} {}", desc.mnemonic, d.operand),
    }
}

/// Renders a jump with its target name when one is known.
pub fn fmt_decoded_with_label(d: &Decoded, label: Option<&str>) -> String {
    match label {
        Some(name) if d.op.is_jump() => format!("{} {}", d.op.mnemonic(), name),
        _ => fmt_decoded(d),
    }
}
