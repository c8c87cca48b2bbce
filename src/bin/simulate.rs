use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use led_chroma_sim::data::model::RunRecord;
use led_chroma_sim::data::writer::save_file;
use led_chroma_sim::sim::analysis::{cluster_summaries, separability};
use led_chroma_sim::sim::{run_simulation, SimulationParams};

const USAGE: &str = "usage: simulate [PARAMS.json] [OUTPUT.{csv,json,parquet,png}]";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    if args.len() > 2 {
        bail!("too many arguments\n{USAGE}");
    }

    let params = match args.first() {
        Some(path) => SimulationParams::from_json_file(&PathBuf::from(path))?,
        None => SimulationParams::default(),
    };
    let output = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("chromaticity.csv"));

    let run = run_simulation(&params).context("running simulation")?;
    let record = RunRecord::from_run(&run);
    save_file(&output, &record)
        .with_context(|| format!("exporting to {}", output.display()))?;

    let clusters = cluster_summaries(&run.points);
    match separability(&clusters) {
        Some(s) => log::info!("Separability over {} objects: {s:.3}", clusters.len()),
        None => log::info!("Separability undefined for {} object(s)", clusters.len()),
    }

    println!(
        "Wrote {} points (seed {}, {} skipped) to {}",
        run.points.len(),
        run.seed,
        run.skipped,
        output.display()
    );
    Ok(())
}
