//! Command line interface

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kdam::{tqdm, BarExt};
use tracing::{info, warn};

use crate::io::{
    read_network_file, read_pattern_file, read_patterns, write_evaluation_file, write_evaluations,
    write_pattern_file,
};
use crate::network::render_symbols;
use crate::network::stats::stats;
use crate::sim::{random_patterns, Evaluation};
use crate::{Gate, GateError, Symbol};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print debug information on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a network description
    ///
    /// Will print the number of inputs, outputs, gate types and gate instances in the network.
    #[clap()]
    Show(ShowArgs),

    /// Simulate a network on input vectors
    ///
    /// Input vectors are given one per line, with one value per input:
    ///    0 1 ?
    ///    1 1 0
    /// Each result line gives the number of update cycles, then the output values.
    #[clap(alias = "sim")]
    Simulate(SimulateArgs),

    /// Simulate a network on random input vectors
    ///
    /// Each line shows the input vector, the number of update cycles and the output values.
    #[clap()]
    Random(RandomArgs),
}

impl Commands {
    /// Run the command
    pub fn run(&self) -> Result<(), GateError> {
        match self {
            Commands::Show(a) => a.run(),
            Commands::Simulate(a) => a.run(),
            Commands::Random(a) => a.run(),
        }
    }
}

fn report_cycle_cap(results: &[Evaluation]) {
    let nb_capped = results.iter().filter(|e| e.hit_cycle_cap()).count();
    if nb_capped != 0 {
        warn!(
            "{} of {} evaluations reached the cycle cap without settling",
            nb_capped,
            results.len()
        );
    }
}

/// Command arguments for network informations
#[derive(Args)]
pub struct ShowArgs {
    /// Network to show
    file: PathBuf,
}

impl ShowArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), GateError> {
        let desc = read_network_file(&self.file)?;
        let t = &desc.network;
        println!(
            "Network with inputs [{}] and outputs [{}]",
            t.input_plug_names().join(" "),
            t.output_plug_names().join(" ")
        );
        println!("{}", stats(t));
        Ok(())
    }
}

/// Command arguments for simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Network to simulate
    network: PathBuf,

    /// Input vectors file; read from stdin if omitted
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output file for the results; written to stdout if omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Keep the network state between vectors instead of starting fresh for each
    #[arg(long)]
    seq: bool,
}

impl SimulateArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), GateError> {
        let desc = read_network_file(&self.network)?;
        let mut gate = desc.instantiate();
        let patterns = match &self.input {
            Some(path) => read_pattern_file(path)?,
            None => read_patterns(stdin().lock())?,
        };
        info!("Simulating {} input vectors", patterns.len());

        let results = if self.output.is_some() {
            let mut progress = tqdm!(total = patterns.len());
            progress.set_description("Vectors simulated");
            self.simulate(&mut gate, &patterns, |i| progress.update_to(i + 1))?
        } else {
            self.simulate(&mut gate, &patterns, |_| Ok(true))?
        };
        report_cycle_cap(&results);

        match &self.output {
            Some(path) => write_evaluation_file(path, &results),
            None => write_evaluations(&mut stdout().lock(), &results),
        }
    }

    fn simulate(
        &self,
        gate: &mut Gate,
        patterns: &[Vec<Symbol>],
        mut on_progress: impl FnMut(usize) -> std::io::Result<bool>,
    ) -> Result<Vec<Evaluation>, GateError> {
        let mut results = Vec::new();
        if self.seq {
            gate.initialize();
        }
        for (i, p) in patterns.iter().enumerate() {
            let res = if self.seq {
                gate.settle(p)?
            } else {
                gate.evaluate(p)?
            };
            results.push(res);
            on_progress(i)?;
        }
        Ok(results)
    }
}

/// Command arguments for random simulation
#[derive(Args)]
pub struct RandomArgs {
    /// Network to simulate
    network: PathBuf,

    /// Number of random vectors; defaults to 4 per input, plus 4
    #[arg(short = 'n', long)]
    num_patterns: Option<usize>,

    /// Random seed for vector generation
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Draw unknown values as well as 0 and 1
    #[arg(long)]
    unknown: bool,

    /// Also write the generated vectors to a file, to replay them with `simulate -i`
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl RandomArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), GateError> {
        let desc = read_network_file(&self.network)?;
        let mut gate = desc.instantiate();
        let nb_inputs = desc.network.nb_inputs();
        let nb_patterns = self.num_patterns.unwrap_or(4 * (nb_inputs + 1));
        let patterns = random_patterns(nb_inputs, nb_patterns, self.unknown, self.seed);
        if let Some(path) = &self.output {
            write_pattern_file(path, &patterns)?;
        }

        let mut results = Vec::new();
        let mut out = stdout().lock();
        for p in &patterns {
            let res = gate.evaluate(p)?;
            writeln!(out, "{} -> {}", render_symbols(p), res)?;
            results.push(res);
        }
        report_cycle_cap(&results);
        Ok(())
    }
}
