use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use accum_vm::Program;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelKV {
    pub addr: u32,
    pub name: String,
}

pub fn load_bin(path: &Path) -> Result<Program> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Program::from_bytes(&bytes)?)
}

/// Accepts either the assembler's symbol export (`{ "name": addr }`) or a
/// list of `{ addr, name }` pairs. When several names share an address the
/// alphabetically first one wins.
pub fn parse_labels(text: &str) -> Result<BTreeMap<u32, String>> {
    let mut out = BTreeMap::new();
    if let Ok(list) = serde_json::from_str::<Vec<LabelKV>>(text) {
        for kv in list {
            out.entry(kv.addr).or_insert(kv.name);
        }
        return Ok(out);
    }
    let map: HashMap<String, u32> =
        serde_json::from_str(text).context("labels must be a JSON object or a list of {addr, name}")?;
    let mut pairs: Vec<(String, u32)> = map.into_iter().collect();
    pairs.sort();
    for (name, addr) in pairs {
        out.entry(addr).or_insert(name);
    }
    Ok(out)
}

pub fn load_labels(path: &Path) -> Result<BTreeMap<u32, String>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_labels(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_reads_big_endian_words() {
        let path = std::env::temp_dir().join(format!("accum-disasm-{}.bin", std::process::id()));
        std::fs::write(&path, [0x19u8, 0, 0, 5, 0x36, 0, 0, 0]).unwrap();
        let prog = load_bin(&path).unwrap();
        assert_eq!(prog.words, vec![0x1900_0005, 0x3600_0000]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn labels_from_symbol_map_and_list() {
        let m = parse_labels(r#"{ "loop": 2, "again": 2, "end": 15 }"#).unwrap();
        assert_eq!(m.get(&2).map(String::as_str), Some("again"));
        assert_eq!(m.get(&15).map(String::as_str), Some("end"));

        let l = parse_labels(r#"[{ "addr": 4, "name": "top" }]"#).unwrap();
        assert_eq!(l.get(&4).map(String::as_str), Some("top"));

        assert!(parse_labels("42").is_err());
    }
}
