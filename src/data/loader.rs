use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float64Array, Int64Array};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::sim::{ChromaticityPoint, SimulationParams};

use super::model::RunRecord;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a run (or a parameter set) from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – a full run record `{ "seed", "params", "points" }`, or a
///   bare parameter set (no `points` key)
/// * `.csv`     – one point per row, header as written by the exporter
/// * `.parquet` – one point per row, columns as written by the exporter
pub fn load_file(path: &Path) -> Result<RunRecord> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<RunRecord> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let obj = root
        .as_object()
        .context("Expected a top-level JSON object")?;

    if obj.contains_key("points") {
        let record: RunRecord = serde_json::from_value(root).context("decoding run record")?;
        if let Some(params) = &record.params {
            params.validate().context("run record parameters")?;
        }
        check_points(&record.points)?;
        return Ok(record);
    }

    let params: SimulationParams =
        serde_json::from_value(root).context("decoding simulation parameters")?;
    params.validate().context("simulation parameters")?;
    Ok(RunRecord {
        seed: params.seed,
        params: Some(params),
        points: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RunRecord> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let points = reader
        .deserialize::<ChromaticityPoint>()
        .enumerate()
        .map(|(row_no, row)| row.with_context(|| format!("CSV row {row_no}")))
        .collect::<Result<Vec<_>>>()?;
    check_points(&points)?;

    Ok(RunRecord {
        points,
        ..Default::default()
    })
}

// ---------------------------------------------------------------------------
// Point checks
// ---------------------------------------------------------------------------

/// Imported readings must be finite, with `r` and `g` on the unit interval.
fn check_points(points: &[ChromaticityPoint]) -> Result<()> {
    for (row, p) in points.iter().enumerate() {
        let fields = [
            ("object_height", p.object_height),
            ("red_flux", p.red_flux),
            ("green_flux", p.green_flux),
            ("blue_flux", p.blue_flux),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                bail!("Row {row}: '{name}' is not finite ({value})");
            }
        }
        for (name, value) in [("r", p.r), ("g", p.g)] {
            if !(0.0..=1.0).contains(&value) {
                bail!("Row {row}: '{name}' = {value} lies outside [0, 1]");
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load points from a Parquet file with the exporter's flat schema: integer
/// index columns `machine`, `led`, `draw`, `object` and float columns for
/// height, channel fluxes and `r`/`g`.
fn load_parquet(path: &Path) -> Result<RunRecord> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut points = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let machine = int_column(&batch, "machine")?;
        let led = int_column(&batch, "led")?;
        let draw = int_column(&batch, "draw")?;
        let object = int_column(&batch, "object")?;
        let height = float_column(&batch, "object_height")?;
        let red = float_column(&batch, "red_flux")?;
        let green = float_column(&batch, "green_flux")?;
        let blue = float_column(&batch, "blue_flux")?;
        let r = float_column(&batch, "r")?;
        let g = float_column(&batch, "g")?;

        for row in 0..batch.num_rows() {
            points.push(ChromaticityPoint {
                machine: index_value(machine, row, "machine")?,
                led: index_value(led, row, "led")?,
                draw: index_value(draw, row, "draw")?,
                object: index_value(object, row, "object")?,
                object_height: float_value(height, row, "object_height")?,
                red_flux: float_value(red, row, "red_flux")?,
                green_flux: float_value(green, row, "green_flux")?,
                blue_flux: float_value(blue, row, "blue_flux")?,
                r: float_value(r, row, "r")?,
                g: float_value(g, row, "g")?,
            });
        }
    }
    check_points(&points)?;

    Ok(RunRecord {
        points,
        ..Default::default()
    })
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn int_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    let col = column(batch, name)?;
    col.as_any()
        .downcast_ref::<Int64Array>()
        .with_context(|| format!("'{name}' is {:?}, expected Int64", col.data_type()))
}

fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    let col = column(batch, name)?;
    col.as_any()
        .downcast_ref::<Float64Array>()
        .with_context(|| format!("'{name}' is {:?}, expected Float64", col.data_type()))
}

fn index_value(col: &Int64Array, row: usize, name: &str) -> Result<usize> {
    if col.is_null(row) {
        bail!("Row {row}: null value in '{name}'");
    }
    usize::try_from(col.value(row))
        .with_context(|| format!("Row {row}: negative value in '{name}'"))
}

fn float_value(col: &Float64Array, row: usize, name: &str) -> Result<f64> {
    if col.is_null(row) {
        bail!("Row {row}: null value in '{name}'");
    }
    Ok(col.value(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "machine,led,draw,object,object_height,red_flux,green_flux,blue_flux,r,g";

    fn write_csv(tag: &str, rows: &[&str]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "led-chroma-load-{tag}-{}.csv",
            std::process::id()
        ));
        let text = std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        std::fs::write(&path, text + "\n").unwrap();
        path
    }

    #[test]
    fn accepts_points_in_the_unit_square() {
        let path = write_csv("ok", &["0,1,2,3,0.5,2.0,1.0,1.0,0.5,0.25"]);
        let record = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(record.points.len(), 1);
        assert_eq!(record.points[0].object, 3);
        assert_eq!(record.points[0].g, 0.25);
    }

    #[test]
    fn rejects_chromaticity_outside_unit_square() {
        let path = write_csv("range", &["0,0,0,0,0.5,1.0,1.0,1.0,8e12,0.2"]);
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("'r'"), "{err:#}");
    }

    #[test]
    fn rejects_non_finite_flux() {
        let path = write_csv("nan", &["0,0,0,0,0.5,NaN,1.0,1.0,0.3,0.2"]);
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("red_flux"), "{err:#}");
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(load_file(Path::new("points.xlsx")).is_err());
    }
}
