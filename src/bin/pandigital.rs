use anyhow::{Context, Result};
use clap::Parser;
use pandigital::config::{DEFAULT_RUNS, HarnessConfig};
use pandigital::harness;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "pandigital")]
#[command(about = "Benchmark and cross-check the pandigital k || 2k searches", long_about = None)]
struct Cli {
    /// Runs per implementation
    #[arg(long, default_value_t = DEFAULT_RUNS)]
    runs: usize,

    /// Inclusive upper bound of k
    #[arg(long, default_value_t = pandigital::MAX_K)]
    max_k: u32,

    /// Log per-run timings to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    println!("Program starting...\n");
    if let Err(err) = run(&cli) {
        println!("Main error: {err:#}");
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = HarnessConfig {
        runs: cli.runs,
        max_k: cli.max_k,
    };

    let wide_lanes = harness::cpu_supports_wide_lanes();
    if !wide_lanes {
        println!("{}\n", harness::WIDE_SKIP_NOTICE);
    }
    let strategies = harness::registry(wide_lanes);

    println!("Running implementations:\n");
    let report = harness::run(&config, &strategies).context("harness could not start")?;
    print!("{report}");
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
