//! `address,value` tables: the result dump and the optional initial memory image.

use std::io::{BufRead, Write};

use crate::memory::MemoryCell;

pub const CSV_HEADER: &str = "address,value";

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("line {line}: expected header `address,value`, got `{text}`")]
    Header { line: usize, text: String },
    #[error("line {line}: malformed row `{text}`")]
    Row { line: usize, text: String },
}

pub fn write_csv<W: Write>(mut w: W, cells: &[MemoryCell]) -> Result<(), ReportError> {
    writeln!(w, "{CSV_HEADER}")?;
    for c in cells {
        writeln!(w, "{},{}", c.address, c.value)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut w: W, cells: &[MemoryCell]) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut w, cells)?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

/// Reads an `address,value` table. Blank lines are ignored.
pub fn read_csv<R: BufRead>(r: R) -> Result<Vec<MemoryCell>, ReportError> {
    let mut cells = Vec::new();
    let mut seen_header = false;
    for (i, line) in r.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if !seen_header {
            if text.replace(' ', "") != CSV_HEADER {
                return Err(ReportError::Header {
                    line: i + 1,
                    text: text.to_string(),
                });
            }
            seen_header = true;
            continue;
        }
        cells.push(parse_row(text).ok_or_else(|| ReportError::Row {
            line: i + 1,
            text: text.to_string(),
        })?);
    }
    Ok(cells)
}

fn parse_row(text: &str) -> Option<MemoryCell> {
    let (address, value) = text.split_once(',')?;
    Some(MemoryCell {
        address: address.trim().parse().ok()?,
        value: value.trim().parse().ok()?,
    })
}
