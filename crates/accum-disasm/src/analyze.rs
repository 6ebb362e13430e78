use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use accum_vm::decoder::{Decoded, Decoder, Op};
use accum_vm::disasm::fmt_decoded_with_label;
use accum_vm::isa::word32::Word32Decoder;
use accum_vm::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeKind {
    Fallthrough,
    Branch,
    CondBranch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: u32,
    pub to: u32,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingLine {
    pub index: u32,
    pub word: u32,
    pub label: Option<String>,
    /// `None` when the word does not decode.
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub reachable: Vec<u32>,
    pub unreachable: Vec<u32>,
    pub invalid: Vec<u32>,
    pub edges: Vec<Edge>,
    pub labels: BTreeMap<u32, String>,
}

fn decode_all(prog: &Program) -> Vec<Option<Decoded>> {
    let dec = Word32Decoder::new();
    prog.words.iter().map(|&w| dec.decode(w)).collect()
}

/// Walks the program from index 0, following jumps and fallthrough.
/// HALT ends a path; jumps past the end are recorded but not followed.
pub fn analyze(prog: &Program, mut labels: BTreeMap<u32, String>) -> Report {
    let decoded = decode_all(prog);
    let len = prog.len() as u32;
    let mut queue: VecDeque<u32> = VecDeque::new();
    let mut visited: BTreeSet<u32> = BTreeSet::new();
    let mut edges: Vec<Edge> = Vec::new();
    if len > 0 {
        queue.push_back(0);
    }
    while let Some(pc) = queue.pop_front() {
        if pc >= len || !visited.insert(pc) {
            continue;
        }
        let Some(d) = decoded[pc as usize] else { continue };
        let ft = pc + 1;
        match d.op {
            Op::Halt => {}
            Op::Jmp => {
                edges.push(Edge { from: pc, to: d.operand, kind: EdgeKind::Branch });
                queue.push_back(d.operand);
            }
            Op::Jz => {
                edges.push(Edge { from: pc, to: d.operand, kind: EdgeKind::CondBranch });
                queue.push_back(d.operand);
                edges.push(Edge { from: pc, to: ft, kind: EdgeKind::Fallthrough });
                queue.push_back(ft);
            }
            _ => {
                edges.push(Edge { from: pc, to: ft, kind: EdgeKind::Fallthrough });
                queue.push_back(ft);
            }
        }
    }

    for e in &edges {
        if !matches!(e.kind, EdgeKind::Fallthrough) {
            labels.entry(e.to).or_insert_with(|| format!("loc_{:04}", e.to));
        }
    }
    let invalid = (0..len).filter(|&i| decoded[i as usize].is_none()).collect();
    let unreachable = (0..len).filter(|i| !visited.contains(i)).collect();
    Report {
        reachable: visited.into_iter().collect(),
        unreachable,
        invalid,
        edges,
        labels,
    }
}

pub fn listing(prog: &Program, labels: &BTreeMap<u32, String>) -> Vec<ListingLine> {
    decode_all(prog)
        .into_iter()
        .zip(prog.words.iter())
        .enumerate()
        .map(|(i, (d, &word))| {
            let index = i as u32;
            let text = d.map(|d| {
                let target = labels.get(&d.operand).map(String::as_str);
                fmt_decoded_with_label(&d, target)
            });
            ListingLine {
                index,
                word,
                label: labels.get(&index).cloned(),
                text,
            }
        })
        .collect()
}

pub fn render_text(lines: &[ListingLine], show_words: bool) -> String {
    use std::fmt::Write as _;
    let mut buf = String::new();
    for l in lines {
        if let Some(lbl) = &l.label {
            let _ = writeln!(buf, "{lbl}:");
        }
        let body = match &l.text {
            Some(t) => t.clone(),
            None => format!(".word {:#010x}", l.word),
        };
        if show_words {
            let _ = writeln!(buf, "  {:04}: {:08x}  {body}", l.index, l.word);
        } else {
            let _ = writeln!(buf, "  {:04}: {body}", l.index);
        }
    }
    buf
}
