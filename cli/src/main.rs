//! Command-line driver for the example transaction circuit.
//!
//! Builds the demo circuit (two clicked inputs feeding a FIFO through
//! a concatenating transaction, drained by a copying transaction into
//! a clicked output), applies periodic button stimulus and logs the
//! per-cycle scheduling activity.

use clap::Parser;
use tracing::{event, Level};
use tracing_subscriber::prelude::*;

use bits::prelude::*;
use sched::modules::demo_circuit;
use sched::{Circuit, CycleReport};

#[derive(Debug, Parser)]
#[command(about = "Simulate the example transaction circuit")]
struct Options {
    /// Number of cycles to simulate.
    #[arg(long, default_value_t = 32)]
    cycles: u64,

    /// Press both input buttons every this many cycles (0 disables
    /// the input stimulus).
    #[arg(long, default_value_t = 6)]
    press_every: u64,

    /// Click the output button every this many cycles (0 disables
    /// draining).
    #[arg(long, default_value_t = 2)]
    drain_every: u64,
}

fn activity<'a>(circuit: &'a Circuit, report: &CycleReport) -> (Vec<&'a str>, Vec<&'a str>) {
    let granted: Vec<&str> = report
        .granted
        .iter()
        .map(|t| circuit.transaction_name(*t).unwrap_or("?"))
        .collect();
    let ran: Vec<&str> = report
        .ran
        .iter()
        .map(|m| circuit.method_name(*m).unwrap_or("?"))
        .collect();
    (granted, ran)
}

fn run_simulator(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let (mut circuit, ports) = demo_circuit()?;
    let bit = Width::new(1)?;
    let mut last_output = ports.out_probe.get();

    for cycle in 0..options.cycles {
        let press = options.press_every > 0 && cycle % options.press_every == 0;
        ports.in1_button.set(press);
        ports.in2_button.set(press);
        if press {
            // Alternate the data lines so consecutive words differ.
            let flip = (cycle / options.press_every) & 1;
            ports.in1_line.set(Word::masked(bit, flip));
            ports.in2_line.set(Word::masked(bit, flip ^ 1));
        }
        ports
            .out_button
            .set(options.drain_every > 0 && cycle % options.drain_every == 0);

        let report = circuit.step()?;
        if !report.granted.is_empty() {
            let (granted, ran) = activity(&circuit, &report);
            event!(
                Level::INFO,
                "cycle {cycle}: granted [{}], running [{}]",
                granted.join(", "),
                ran.join(", ")
            );
        }
        let output = ports.out_probe.get();
        if output != last_output {
            event!(Level::INFO, "cycle {cycle}: output latched {output:?}");
            last_output = output;
        }
    }
    Ok(())
}

fn main() {
    // See
    // https://docs.rs/tracing-subscriber/0.2.19/tracing_subscriber/fmt/index.html#filtering-events-with-environment-variables
    // for instructions on how to select which trace messages get
    // printed.
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let options = Options::parse();
    match run_simulator(&options) {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
