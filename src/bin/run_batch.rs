//! Run the computation over a population of worker records from CSV
//!
//! Writes one output row per worker with the controlling method, PIA, MFB,
//! and payable benefit. Failed records are logged and skipped.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use pia_engine::lawchange::load_overlay;
use pia_engine::worker::load_workers;
use pia_engine::{BatchRunner, LawChangeOverlay, Params};

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Batch PIA/MFB computation over a worker CSV")]
struct Args {
    /// Input worker records CSV
    input: PathBuf,

    /// Optional law-change overlay JSON
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "batch_results.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let workers = load_workers(&args.input)
        .with_context(|| format!("loading workers from {}", args.input.display()))?;
    info!("loaded {} workers in {:?}", workers.len(), start.elapsed());

    let overlay = match &args.overlay {
        Some(path) => load_overlay(path)
            .with_context(|| format!("loading overlay from {}", path.display()))?,
        None => LawChangeOverlay::present_law(),
    };
    info!("overlay: {} active entries", overlay.active_count());

    let runner = BatchRunner::new(Params::present_law(), overlay);
    let run_start = Instant::now();
    let outcomes = runner.run_all(&workers);
    info!("computed {} records in {:?}", outcomes.len(), run_start.elapsed());

    let mut out = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writeln!(out, "worker_id,method,pia,mfb,benefit")?;

    let mut failures = 0usize;
    for outcome in &outcomes {
        match outcome {
            Ok(comp) => {
                writeln!(
                    out,
                    "{},{},{:.2},{:.2},{:.2}",
                    comp.worker_id, comp.pifc, comp.high_pia, comp.high_mfb, comp.benefit
                )?;
            }
            Err(e) => {
                failures += 1;
                error!("{}", e);
            }
        }
    }

    println!(
        "Wrote {} rows to {} ({} failures) in {:?}",
        outcomes.len() - failures,
        args.output.display(),
        failures,
        start.elapsed()
    );
    Ok(())
}
