use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use circuit_sim::domain::simulator::reporter::{ConsoleReporter, CsvReporter, LogReporter};
use circuit_sim::logger::{self, LoggerConfig};

/// Simulates time bounded circuit allocations over a capacity limited network.
#[derive(Parser, Debug)]
#[command(name = "circuit-sim")]
#[command(about = "Run a circuit allocation simulation from a JSON network description", long_about = None)]
struct Args {
    /// Input document with links, possible circuits and the simulation block
    input: PathBuf,

    /// Write every allocation and release event to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Do not print events to stdout; they are still logged
    #[arg(short, long)]
    quiet: bool,

    /// Log level (error, warn, info, debug, trace); defaults to RUST_LOG or info
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// Log file location
    #[arg(long, default_value = "logs/circuit_sim.log")]
    log_file: PathBuf,

    /// Log to the console only
    #[arg(long)]
    no_log_file: bool,

    /// Print links and routes before simulating
    #[arg(long)]
    show_topology: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(&LoggerConfig { level: args.log_level, log_file: (!args.no_log_file).then(|| args.log_file.clone()) });

    let dto = circuit_sim::load_input(&args.input).with_context(|| format!("failed to load '{}'", args.input.display()))?;
    let mut simulation = circuit_sim::prepare_simulation(&dto).context("invalid network description")?;

    if args.show_topology {
        let topology = simulation.topology();

        println!("{}", topology.routes().len());
        for (_, route) in topology.routes().iter() {
            println!("{}", route);
        }
        for (_, link) in topology.links().iter() {
            println!("{}", link);
        }
    }

    let csv = match &args.csv {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create '{}'", path.display()))?;
            Some(CsvReporter::new(BufWriter::new(file))?)
        }
        None => None,
    };

    let console = (!args.quiet).then(ConsoleReporter::stdout);
    let mut reporter = (console, (LogReporter, csv));

    let report = simulation.run(&mut reporter).context("simulation aborted")?;

    if let Some(csv) = reporter.1.1.take() {
        let mut out = csv.finish().context("failed to flush CSV output")?;
        out.flush().context("failed to flush CSV output")?;
    }

    print!("{}", report);
    log::info!("Simulation finished after {} ticks.", report.ticks);

    Ok(())
}
