use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use accum_vm::{assemble, report, CpuConfig, Interpreter, DEFAULT_MEMORY_SIZE};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble and run programs for the accumulator machine"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a source file into a binary and an instruction trace
    Assemble {
        #[arg(value_name = "SOURCE")]
        input: PathBuf,
        #[arg(value_name = "BINFILE")]
        output: PathBuf,
        #[arg(value_name = "TRACE")]
        trace: PathBuf,
        /// Also write the label table as JSON
        #[arg(long, value_name = "FILE")]
        symbols: Option<PathBuf>,
    },
    /// Run a binary and dump the memory cells it wrote
    Interpret {
        #[arg(value_name = "BINFILE")]
        input: PathBuf,
        #[arg(value_name = "RESULTS")]
        output: PathBuf,
        /// Initial memory image (`address,value` CSV)
        #[arg(value_name = "INIT")]
        init: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_MEMORY_SIZE)]
        memory_size: usize,
        /// Abort after this many instructions
        #[arg(long)]
        max_steps: Option<u64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn run_assemble(input: &Path, output: &Path, trace: &Path, symbols: Option<&Path>) -> Result<()> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    // Assemble fully before touching any output file
    let asm = assemble(&source).with_context(|| format!("assembling {}", input.display()))?;

    fs::write(output, asm.to_bytes()).with_context(|| format!("writing {}", output.display()))?;
    fs::write(trace, asm.trace_text()).with_context(|| format!("writing {}", trace.display()))?;
    if let Some(path) = symbols {
        let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, &asm.labels)?;
        w.flush()
            .with_context(|| format!("writing {}", path.display()))?;
    }
    info!(
        words = asm.program.len(),
        output = %output.display(),
        "wrote binary"
    );
    Ok(())
}

fn run_interpret(
    input: &Path,
    output: &Path,
    init: Option<&Path>,
    cfg: CpuConfig,
    format: OutputFormat,
) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let image = match init {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            report::read_csv(BufReader::new(f))
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => Vec::new(),
    };

    let outcome = Interpreter::new(cfg).with_image(image).run(&bytes)?;
    info!(
        stop = ?outcome.stop,
        steps = outcome.steps,
        acc = outcome.acc,
        changed = outcome.changed.len(),
        "program finished"
    );

    let f = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    let w = BufWriter::new(f);
    match format {
        OutputFormat::Csv => report::write_csv(w, &outcome.changed)?,
        OutputFormat::Json => report::write_json(w, &outcome.changed)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Assemble {
            input,
            output,
            trace,
            symbols,
        } => run_assemble(&input, &output, &trace, symbols.as_deref()),
        Command::Interpret {
            input,
            output,
            init,
            memory_size,
            max_steps,
            format,
        } => {
            let cfg = CpuConfig {
                memory_size,
                max_steps,
            };
            run_interpret(&input, &output, init.as_deref(), cfg, format)
        }
    }
}
