//! In-order scheduling simulator CLI.
//!
//! This binary provides a single entry point for the simulator. It performs:
//! 1. **Run:** Load an assembly file, seed registers and memory, run it, and print
//!    the timeline, the trace listing, or the whole outcome as JSON.
//! 2. **Config:** Print the default configuration as JSON, as a starting point
//!    for a custom machine model.

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ilpsim_core::config::Config;
use ilpsim_core::sim::{lexer, report};
use ilpsim_core::{Memory, RegisterFile, SimOutcome, Simulator};

/// Instruction ceiling applied when neither the config file nor `--max-insts` sets one.
const DEFAULT_MAX_INSTRUCTIONS: u64 = 1_000_000;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "In-order, single-issue scheduling simulator",
    long_about = "Run an assembly program on a scoreboarded in-order machine and report when each \
                  dynamic instruction issues and completes.\n\nExamples:\n  \
                  sim run programs/max.s --reg t0=3 --reg t1=100 --mem 100=20 --mem 104=30 --mem 108=10\n  \
                  sim run programs/dot.s --config machine.json --format json\n  \
                  sim config > machine.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an assembly program.
    Run(RunArgs),

    /// Print the default configuration as JSON.
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Assembly source file.
    file: PathBuf,

    /// JSON configuration file; missing entries keep the reference machine's values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial register value, `name=value` (repeatable).
    #[arg(long = "reg", value_name = "NAME=VALUE", value_parser = parse_reg)]
    regs: Vec<(String, i64)>,

    /// Initial memory word, `addr=value` (repeatable).
    #[arg(long = "mem", value_name = "ADDR=VALUE", value_parser = parse_mem)]
    mem: Vec<(i64, i64)>,

    /// Abort after this many dynamic instructions.
    #[arg(long)]
    max_insts: Option<u64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Timeline)]
    format: Format,

    /// Print run statistics.
    #[arg(long)]
    stats: bool,

    /// Skip unrecognized source lines instead of failing.
    #[arg(long)]
    lenient: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Timeline bar chart plus final state.
    Timeline,
    /// One line per dynamic instruction plus final state.
    Trace,
    /// Full outcome as JSON.
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Config => cmd_config(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

/// Loads, runs and reports one program.
fn cmd_run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.general.max_instructions = args
        .max_insts
        .or(config.general.max_instructions)
        .or(Some(DEFAULT_MAX_INSTRUCTIONS));
    config.general.skip_unrecognized_lines |= args.lenient;

    let sim = Simulator::new(config)?;
    let program = sim.load_file(&args.file)?;
    tracing::info!(
        file = %args.file.display(),
        instructions = program.len(),
        "program loaded"
    );

    let regs: RegisterFile = args.regs.into_iter().collect();
    let mem: Memory = args.mem.into_iter().collect();
    let outcome = sim.run(program, regs, mem)?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        Format::Timeline => {
            println!("{}", report::timeline(&outcome.trace, outcome.total_cycles));
            print_state(&outcome);
        }
        Format::Trace => {
            println!("{}", report::trace_listing(&outcome.trace));
            println!("\nTOTAL CYCLES: {}", outcome.total_cycles);
            print_state(&outcome);
        }
    }
    if args.stats {
        outcome.stats.print();
    }
    Ok(())
}

fn cmd_config() -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(&Config::default())?);
    Ok(())
}

fn print_state(outcome: &SimOutcome) {
    println!("\nREGISTERS");
    print!("{}", outcome.registers.dump());
    if !outcome.memory.is_empty() {
        println!("\nMEMORY");
        for (addr, val) in outcome.memory.iter() {
            println!("[{addr:>6}] = {val}");
        }
    }
}

fn split_pair(s: &str) -> Result<(&str, i64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let value = lexer::parse_int(value).ok_or_else(|| format!("invalid integer `{value}`"))?;
    Ok((key.trim(), value))
}

fn parse_reg(s: &str) -> Result<(String, i64), String> {
    let (name, value) = split_pair(s)?;
    if !lexer::is_ident(name) {
        return Err(format!("invalid register name `{name}`"));
    }
    Ok((name.to_owned(), value))
}

fn parse_mem(s: &str) -> Result<(i64, i64), String> {
    let (addr, value) = split_pair(s)?;
    let addr = lexer::parse_int(addr).ok_or_else(|| format!("invalid address `{addr}`"))?;
    Ok((addr, value))
}
