use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use regex::Regex;

use vulcan::sim::evaluate;
use vulcan::{compile, generator, verify, Assignment, Netlist, MAX_VERIFY_INPUTS};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = None,
    before_help = "\
██╗   ██╗██╗   ██╗██╗      ██████╗ █████╗ ███╗   ██╗
██║   ██║██║   ██║██║     ██╔════╝██╔══██╗████╗  ██║
██║   ██║██║   ██║██║     ██║     ███████║██╔██╗ ██║
╚██╗ ██╔╝██║   ██║██║     ██║     ██╔══██║██║╚██╗██║
 ╚████╔╝ ╚██████╔╝███████╗╚██████╗██║  ██║██║ ╚████║
  ╚═══╝   ╚═════╝ ╚══════╝ ╚═════╝╚═╝  ╚═╝╚═╝  ╚═══╝

Boolean expression to CMOS transistor netlist synthesis and simulation.
Symbols: ~ (NOT), . (AND), + (OR), e.g. ~(~(A+B).C+~D)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate an expression to its pull-up/pull-down transistor netlist
    Synth {
        /// Boolean expression, e.g. "~(A.B)+C"
        #[arg(value_name = "EXPRESSION")]
        expression: String,

        /// Directory to write the netlist report into (default: stdout only)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Simulate a synthesized netlist for one input assignment
    Sim {
        /// Boolean expression, e.g. "~(A.B)+C"
        #[arg(value_name = "EXPRESSION")]
        expression: String,

        /// Input bindings as NAME=0 or NAME=1 (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },
    /// Exhaustively check the netlist against the expression's truth table
    Verify {
        /// Boolean expression, e.g. "~(A.B)+C"
        #[arg(value_name = "EXPRESSION")]
        expression: String,

        /// Directory to write the truth table report into
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Synth { expression, output } => {
            let netlist = synthesize(expression)?;
            print!("{}", generator::render_netlist(&netlist));
            if let Some(dir) = output {
                fs::create_dir_all(dir)
                    .context(format!("Failed to create directory: {:?}", dir))?;
                let path = dir.join("netlist.txt");
                generator::write_netlist_report(&netlist, &path)?;
                println!("\nNetlist written to: {}", path.display());
            }
        }
        Commands::Sim { expression, set } => {
            let netlist = synthesize(expression)?;
            let assignment = parse_bindings(set)?;
            let outcome = evaluate(&netlist, &assignment)
                .context("Simulation failed")?;
            println!("PMOS OUTPUT : {}", outcome.pull_up);
            println!("NMOS OUTPUT : {}", outcome.pull_down);
            println!("RESOLVED    : {}", outcome.resolve());
        }
        Commands::Verify { expression, output } => {
            let netlist = synthesize(expression)?;
            if netlist.inputs.len() > MAX_VERIFY_INPUTS {
                bail!(
                    "{} inputs exceeds the exhaustive-sweep limit of {}",
                    netlist.inputs.len(),
                    MAX_VERIFY_INPUTS
                );
            }
            if netlist.inputs.len() > 12 {
                warn!("large sweep: {} combinations", 1u64 << netlist.inputs.len());
            }

            let start = Instant::now();
            let report = verify::verify(&netlist)?;
            info!("sweep finished in {:?}", start.elapsed());

            println!(
                "Checked {} combination(s): {} mismatch(es), {} contention, {} floating",
                report.combinations,
                report.mismatches.len(),
                report.contention,
                report.floating
            );
            for mismatch in &report.mismatches {
                println!(
                    "  bits {:b}: expected {}, observed {}",
                    mismatch.bits,
                    if mismatch.expected { 1 } else { 0 },
                    mismatch.observed
                );
            }

            if let Some(dir) = output {
                fs::create_dir_all(dir)
                    .context(format!("Failed to create directory: {:?}", dir))?;
                let path = dir.join("truth_table.txt");
                generator::write_truth_table(&netlist, &path)?;
                println!("Truth table written to: {}", path.display());
            }

            if report.passed() {
                println!("VERIFIED: netlist matches the expression's truth table");
            } else {
                bail!("verification failed");
            }
        }
    }
    Ok(())
}

fn synthesize(expression: &str) -> Result<Netlist> {
    info!("Synthesizing: {}", expression);
    let netlist = compile(expression)
        .context(format!("Failed to translate expression: {}", expression))?;
    info!(
        "{} PMOS / {} NMOS device(s), inputs: {}",
        netlist.pull_up.transistors.len(),
        netlist.pull_down.transistors.len(),
        netlist.inputs.join(", ")
    );
    Ok(netlist)
}

fn parse_bindings(bindings: &[String]) -> Result<Assignment> {
    let re = Regex::new(r"^\s*([^=\s]+)\s*=\s*([01])\s*$").unwrap();
    let mut assignment = Assignment::new();

    for binding in bindings {
        let caps = re
            .captures(binding)
            .with_context(|| format!("Invalid binding '{}', expected NAME=0 or NAME=1", binding))?;
        assignment.set(caps[1].to_string(), &caps[2] == "1");
    }

    Ok(assignment)
}
