use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::render::{render_scatter, ScatterStyle};
use crate::sim::ChromaticityPoint;

use super::model::RunRecord;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write a run to a file.  Dispatch by extension:
/// `.json` keeps seed and params, `.csv` / `.parquet` keep points only,
/// `.png` renders the chromaticity scatter.
pub fn save_file(path: &Path, record: &RunRecord) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => save_parquet(path, &record.points),
        "json" => save_json(path, record),
        "csv" => save_csv(path, &record.points),
        "png" => save_png(path, record),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!("Wrote {} points to {}", record.len(), path.display());
    Ok(())
}

fn save_json(path: &Path, record: &RunRecord) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), record)
        .context("writing JSON")
}

fn save_csv(path: &Path, points: &[ChromaticityPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for (row_no, p) in points.iter().enumerate() {
        writer
            .serialize(p)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn save_png(path: &Path, record: &RunRecord) -> Result<()> {
    let image = render_scatter(&record.points, record.object_count(), &ScatterStyle::default());
    image.save(path).context("writing PNG")
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

fn points_schema() -> Arc<Schema> {
    let int = |name: &str| Field::new(name, DataType::Int64, false);
    let float = |name: &str| Field::new(name, DataType::Float64, false);
    Arc::new(Schema::new(vec![
        int("machine"),
        int("led"),
        int("draw"),
        int("object"),
        float("object_height"),
        float("red_flux"),
        float("green_flux"),
        float("blue_flux"),
        float("r"),
        float("g"),
    ]))
}

fn points_batch(points: &[ChromaticityPoint]) -> Result<RecordBatch> {
    let ints = |f: fn(&ChromaticityPoint) -> usize| -> ArrayRef {
        Arc::new(Int64Array::from(
            points.iter().map(|p| f(p) as i64).collect::<Vec<_>>(),
        ))
    };
    let floats = |f: fn(&ChromaticityPoint) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(points.iter().map(f).collect::<Vec<_>>()))
    };

    RecordBatch::try_new(
        points_schema(),
        vec![
            ints(|p| p.machine),
            ints(|p| p.led),
            ints(|p| p.draw),
            ints(|p| p.object),
            floats(|p| p.object_height),
            floats(|p| p.red_flux),
            floats(|p| p.green_flux),
            floats(|p| p.blue_flux),
            floats(|p| p.r),
            floats(|p| p.g),
        ],
    )
    .context("building record batch")
}

fn save_parquet(path: &Path, points: &[ChromaticityPoint]) -> Result<()> {
    let batch = points_batch(points)?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::loader::load_file;
    use crate::sim::{run_simulation, SimulationParams};

    fn sample_record() -> RunRecord {
        let params = SimulationParams {
            n_leds: 2,
            n_samples: 3,
            n_machines: 2,
            height_draws: 2,
            seed: Some(17),
            ..Default::default()
        };
        RunRecord::from_run(&run_simulation(&params).unwrap())
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("led-chroma-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_keeps_points() {
        let record = sample_record();
        let path = temp_path("points.csv");
        save_file(&path, &record).unwrap();
        let back = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back.points, record.points);
        assert_eq!(back.params, None);
    }

    #[test]
    fn json_keeps_seed_and_params() {
        let record = sample_record();
        let path = temp_path("run.json");
        save_file(&path, &record).unwrap();
        let back = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, record);
        assert_eq!(back.params.and_then(|p| p.seed), Some(17));
    }

    #[test]
    fn parquet_keeps_points() {
        let record = sample_record();
        let path = temp_path("points.parquet");
        save_file(&path, &record).unwrap();
        let back = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back.points, record.points);
    }

    #[test]
    fn bare_params_json_opens_as_empty_run() {
        let path = temp_path("params.json");
        std::fs::write(&path, r#"{ "n_leds": 4, "seed": 99 }"#).unwrap();
        let back = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(back.is_empty());
        assert_eq!(back.seed, Some(99));
        assert_eq!(back.params.map(|p| p.n_leds), Some(4));
    }

    #[test]
    fn png_export_writes_an_image() {
        let record = sample_record();
        let path = temp_path("scatter.png");
        save_file(&path, &record).unwrap();
        let len = std::fs::metadata(&path).unwrap().len();
        std::fs::remove_file(&path).ok();
        assert!(len > 0);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let record = sample_record();
        assert!(save_file(Path::new("out.xlsx"), &record).is_err());
        assert!(load_file(Path::new("in.xlsx")).is_err());
    }
}
