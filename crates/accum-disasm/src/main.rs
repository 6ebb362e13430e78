use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use accum_disasm::{analyze, listing, load_bin, load_labels, render_text, LabelKV};

#[derive(Parser, Debug)]
#[command(author, version, about = "accum-vm disassembler CLI", long_about = None)]
struct Cli {
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: PathBuf,
    /// Import labels from JSON (assembler symbol map or Vec<{ addr, name }>)
    #[arg(long, value_name = "FILE")]
    labels_in: Option<PathBuf>,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Linear listing of every word
    List {
        /// Show the encoded word next to each instruction
        #[arg(long)]
        show_words: bool,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Reachability and jump graph from instruction 0
    Analyze {
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Export labels (imported plus generated) to JSON
        #[arg(long, value_name = "FILE")]
        labels_out: Option<PathBuf>,
        /// Write analysis output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let prog = load_bin(&cli.input)?;
    let labels = match &cli.labels_in {
        Some(path) => load_labels(path)?,
        None => BTreeMap::new(),
    };
    tracing::debug!(words = prog.len(), labels = labels.len(), "loaded");

    match cli.cmd {
        Command::List { show_words, out } => {
            let lines = listing(&prog, &labels);
            emit(out.as_deref(), &render_text(&lines, show_words))?;
        }
        Command::Analyze { format, labels_out, out } => {
            let report = analyze(&prog, labels);
            if let Some(path) = &labels_out {
                let arr: Vec<LabelKV> = report
                    .labels
                    .iter()
                    .map(|(addr, name)| LabelKV { addr: *addr, name: name.clone() })
                    .collect();
                std::fs::write(path, serde_json::to_string_pretty(&arr)?)?;
            }
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report)?;
                    emit(out.as_deref(), &format!("{json}\n"))?;
                }
                OutputFormat::Text => {
                    use std::fmt::Write as _;
                    let mut buf = String::new();
                    let _ = writeln!(buf, "Analysis summary:");
                    let _ = writeln!(buf, "  insts       : {}", prog.len());
                    let _ = writeln!(buf, "  reachable   : {}", report.reachable.len());
                    let _ = writeln!(buf, "  unreachable : {:?}", report.unreachable);
                    let _ = writeln!(buf, "  invalid     : {:?}", report.invalid);
                    let _ = writeln!(buf, "Edges:");
                    for e in &report.edges {
                        let _ = writeln!(buf, "  {:04} -> {:04} ({:?})", e.from, e.to, e.kind);
                    }
                    let _ = writeln!(buf, "\nListing:");
                    buf.push_str(&render_text(&listing(&prog, &report.labels), false));
                    emit(out.as_deref(), &buf)?;
                }
            }
        }
    }

    Ok(())
}
