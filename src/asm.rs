//! Two-pass assembler for the accumulator machine.
//!
//! ```text
//!         LOAD_CONST 5      # comment
//! loop:   READ_MEM 0
//!         JZ loop
//!         HALT
//! ```
//!
//! - One instruction per line, mnemonics are uppercase.
//! - `name:` declares a label bound to the next instruction; an instruction may follow
//!   the colon on the same line.
//! - Operands are label names or integers (decimal or `0x` hex).
//! - Every instruction encodes to exactly one word, so label addresses are word indices.

use std::collections::BTreeMap;
use std::fmt;
use std::num::IntErrorKind;

use serde::Serialize;
use tracing::{debug, info};

use crate::instructions::{by_mnemonic, InstrDesc};
use crate::isa::word32::encode;
use crate::program::Program;

const COMMENT_CHAR: char = '#';
const LABEL_DELIM: char = ':';

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: invalid operand `{token}` for {command}")]
    InvalidOperand {
        line: usize,
        command: &'static str,
        token: String,
    },
    #[error("line {line}: operand {value} out of range for {command} (0-{max})")]
    OperandOutOfRange {
        line: usize,
        command: &'static str,
        value: i64,
        max: u32,
    },
    #[error("line {line}: {command} takes {expected} operand(s), got {found}")]
    OperandCount {
        line: usize,
        command: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("line {line}: label `{name}` is already defined")]
    DuplicateLabel { line: usize, name: String },
    #[error("line {line}: invalid label name `{name}`")]
    InvalidLabel { line: usize, name: String },
}

impl AsmError {
    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownCommand { line, .. }
            | AsmError::InvalidOperand { line, .. }
            | AsmError::OperandOutOfRange { line, .. }
            | AsmError::OperandCount { line, .. }
            | AsmError::DuplicateLabel { line, .. }
            | AsmError::InvalidLabel { line, .. } => *line,
        }
    }
}

/// One assembled instruction as it appears in the trace artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    pub command: &'static str,
    pub args: Vec<u32>,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self
            .args
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "command={}, args=[{}]", self.command, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assembly {
    pub program: Program,
    pub trace: Vec<TraceRecord>,
    pub labels: BTreeMap<String, u32>,
}

impl Assembly {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.program.to_bytes()
    }

    /// The trace artifact: one line per instruction, in source order.
    pub fn trace_text(&self) -> String {
        self.trace.iter().map(|r| format!("{r}\n")).collect()
    }
}

#[derive(Debug, Clone)]
enum Item<'a> {
    Label(&'a str),
    Instr {
        desc: &'static InstrDesc,
        args: Vec<&'a str>,
    },
}

fn parse_num(s: &str) -> Option<i64> {
    let t = s.trim();
    let (neg, body) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };
    if body.starts_with(['+', '-']) {
        return None;
    }
    let (digits, radix) = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (body, 10),
    };
    // Too large is still a number; the range check reports it
    let mag = match i64::from_str_radix(digits, radix) {
        Ok(v) => v,
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow) => i64::MAX,
        Err(_) => return None,
    };
    Some(if neg { -mag } else { mag })
}

fn parse_line(nr: usize, line: &str) -> Result<Vec<Item<'_>>, AsmError> {
    let s = match line.find(COMMENT_CHAR) {
        Some(p) => &line[..p],
        None => line,
    }
    .trim();
    let mut items = Vec::new();
    if s.is_empty() {
        return Ok(items);
    }
    let rest = match s.split_once(LABEL_DELIM) {
        Some((name, rest)) => {
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(AsmError::InvalidLabel {
                    line: nr,
                    name: name.to_string(),
                });
            }
            items.push(Item::Label(name));
            rest.trim()
        }
        None => s,
    };
    let mut parts = rest.split_whitespace();
    let Some(mn) = parts.next() else {
        return Ok(items);
    };
    let desc = by_mnemonic(mn).ok_or_else(|| AsmError::UnknownCommand {
        line: nr,
        command: mn.to_string(),
    })?;
    let args: Vec<&str> = parts.collect();
    if !desc.mode.accepts(args.len()) {
        return Err(AsmError::OperandCount {
            line: nr,
            command: desc.mnemonic,
            expected: desc.mode.arity(),
            found: args.len(),
        });
    }
    items.push(Item::Instr { desc, args });
    Ok(items)
}

fn resolve(
    nr: usize,
    desc: &InstrDesc,
    token: &str,
    labels: &BTreeMap<String, u32>,
) -> Result<u32, AsmError> {
    let value = match labels.get(token) {
        Some(&addr) => addr as i64,
        None => parse_num(token).ok_or_else(|| AsmError::InvalidOperand {
            line: nr,
            command: desc.mnemonic,
            token: token.to_string(),
        })?,
    };
    let max = desc.mode.max();
    if value < 0 || value > max as i64 {
        return Err(AsmError::OperandOutOfRange {
            line: nr,
            command: desc.mnemonic,
            value,
            max,
        });
    }
    Ok(value as u32)
}

/// Assembles `source` into one word per instruction plus its trace.
///
/// Stops at the first error; nothing partial is returned.
pub fn assemble(source: &str) -> Result<Assembly, AsmError> {
    let mut items = Vec::new();
    for (i, line) in source.lines().enumerate() {
        for it in parse_line(i + 1, line)? {
            items.push((i + 1, it));
        }
    }

    // Pass 1: labels bind to the index of the next instruction
    let mut pc = 0u32;
    let mut labels: BTreeMap<String, u32> = BTreeMap::new();
    for (nr, it) in &items {
        match it {
            Item::Label(name) => {
                if labels.insert(name.to_string(), pc).is_some() {
                    return Err(AsmError::DuplicateLabel {
                        line: *nr,
                        name: name.to_string(),
                    });
                }
            }
            Item::Instr { .. } => pc += 1,
        }
    }

    // Pass 2: encode
    let mut words = Vec::with_capacity(pc as usize);
    let mut trace = Vec::with_capacity(pc as usize);
    for (nr, it) in &items {
        let Item::Instr { desc, args } = it else {
            continue;
        };
        let resolved = args
            .iter()
            .map(|a| resolve(*nr, desc, a, &labels))
            .collect::<Result<Vec<u32>, _>>()?;
        let raw = encode(desc.op, resolved.first().copied().unwrap_or(0));
        debug!(line = nr, command = desc.mnemonic, ?resolved, word = raw, "assembled");
        words.push(raw);
        trace.push(TraceRecord {
            command: desc.mnemonic,
            args: resolved,
        });
    }

    info!(instructions = words.len(), labels = labels.len(), "assembly complete");
    Ok(Assembly {
        program: Program::from_words(words),
        trace,
        labels,
    })
}
