//! Command-line front end for the assembler.
//!
//! Reads a source file, assembles it fully in memory, and writes the
//! binary image only after the whole run succeeded — a failed run never
//! leaves a partially written output file behind.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::info;

use uvm_asm::{codec, isa, Assembler, AssemblyResult};

#[derive(Parser)]
#[command(
    name = "uvm-asm",
    version,
    about = "Assembler for the UVM educational virtual machine"
)]
struct Cli {
    /// Path to the assembly source file.
    source: PathBuf,

    /// Path to the binary output file.
    output: PathBuf,

    /// Diagnostic mode: print every parsed instruction with its field
    /// values and encoded bytes, plus a JSON dump of the record list.
    #[arg(long)]
    test_mode: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.source)
        .with_context(|| format!("cannot open source file {}", cli.source.display()))?;

    let mut asm = Assembler::new();
    asm.keep_records(cli.test_mode);
    asm.emit(&source)?;
    let result = asm.finish();

    if cli.test_mode {
        dump_records(&result)?;
    }

    fs::write(&cli.output, result.bytes())
        .with_context(|| format!("cannot write output file {}", cli.output.display()))?;

    info!(
        instructions = result.instruction_count(),
        bytes = result.len(),
        "assembly complete"
    );
    println!(
        "assembled {} instructions ({} bytes) to {}",
        result.instruction_count(),
        result.len(),
        cli.output.display()
    );
    Ok(())
}

/// Print the per-instruction field mapping and encoded bytes, verifying
/// each word decodes back to the record it came from.
fn dump_records(result: &AssemblyResult) -> Result<()> {
    for record in result.records() {
        let layout = isa::layout_of(record.instruction.mnemonic());
        let decoded = codec::decode(layout, &record.bytes)?;
        ensure!(
            decoded == record.instruction,
            "round-trip mismatch at line {}",
            record.span.line
        );

        let mut hex = String::new();
        for byte in &record.bytes {
            let _ = write!(hex, "{byte:02X} ");
        }
        println!(
            "line {:>4}  +{:04X}  {:<24} -> {}",
            record.span.line,
            record.offset,
            record.instruction.to_string(),
            hex.trim_end()
        );
    }

    println!("{}", serde_json::to_string_pretty(result.records())?);
    Ok(())
}
