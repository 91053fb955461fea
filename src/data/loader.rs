use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Genre, Sample};

/// Columns every data source must provide.
pub const COLUMNS: [&str; 8] = [
    "group", "marker", "block", "genre", "time_s", "x_mm", "y_mm", "z_mm",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("expected a top-level JSON array of records")]
    NotAnArray,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load motion samples from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the [`COLUMNS`], one sample per row
/// * `.json`    – `[{ "group": "...", "time_s": 0.01, ... }, ...]`
/// * `.parquet` – one column per field, strings and floats
pub fn load_file(path: &Path) -> Result<Vec<Sample>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Outcome of loading several independent sources.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Samples of every source that loaded, one entry per source.
    /// A failed source contributes an empty vector.
    pub sources: Vec<Vec<Sample>>,
    /// Human readable failure messages, one per failed source.
    pub failures: Vec<String>,
}

/// Load every path, degrading a failed source to empty.
pub fn load_sources(paths: &[PathBuf]) -> LoadReport {
    let mut report = LoadReport::default();
    for path in paths {
        match load_file(path) {
            Ok(samples) => {
                log::info!("Loaded {} samples from {}", samples.len(), path.display());
                report.sources.push(samples);
            }
            Err(e) => {
                log::error!("Error loading {}: {e:#}", path.display());
                report.failures.push(format!("{}: {e:#}", path.display()));
                report.sources.push(Vec::new());
            }
        }
    }
    report
}

/// Resolve a configured source name to a path inside `data_dir`.
/// Names without an extension are taken to be CSV files.
pub fn source_path(data_dir: &Path, name: &str) -> PathBuf {
    let path = data_dir.join(name);
    if path.extension().is_some() {
        path
    } else {
        data_dir.join(format!("{name}.csv"))
    }
}

/// Numeric coercion: blank or malformed cells become NaN.
fn coerce_f64(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming the [`COLUMNS`] in any order.
/// Extra columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<Sample>> {
    // Short rows read their missing trailing cells as blank.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut idx = [0usize; 8];
    for (slot, name) in idx.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))?;
    }

    let mut samples = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let text = |i: usize| record.get(idx[i]).unwrap_or("");

        samples.push(Sample {
            group: text(0).to_string(),
            marker: text(1).to_string(),
            block: text(2).to_string(),
            genre: Genre::parse(text(3)),
            time_s: coerce_f64(text(4)),
            x_mm: coerce_f64(text(5)),
            y_mm: coerce_f64(text(6)),
            z_mm: coerce_f64(text(7)),
        });
    }

    Ok(samples)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "group": "NM0001", "marker": "P1", "block": 1, "genre": "salsa",
///     "time_s": 0.01, "x_mm": 1.2, "y_mm": -0.4, "z_mm": 3.3 },
///   ...
/// ]
/// ```
///
/// Identifier fields may be numbers; they are kept as their text form.
fn load_json(path: &Path) -> Result<Vec<Sample>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut samples = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for name in COLUMNS {
            if !obj.contains_key(name) {
                return Err(LoadError::MissingColumn(name))
                    .with_context(|| format!("Row {i}"));
            }
        }

        let text = |name: &str| json_to_text(obj.get(name));
        let number = |name: &str| json_to_f64(obj.get(name));

        samples.push(Sample {
            group: text("group"),
            marker: text("marker"),
            block: text("block"),
            genre: Genre::parse(&text("genre")),
            time_s: number("time_s"),
            x_mm: number("x_mm"),
            y_mm: number("y_mm"),
            z_mm: number("z_mm"),
        });
    }

    Ok(samples)
}

fn json_to_text(val: Option<&JsonValue>) -> String {
    match val {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn json_to_f64(val: Option<&JsonValue>) -> f64 {
    match val {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(JsonValue::String(s)) => coerce_f64(s),
        _ => f64::NAN,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Identifier columns may be Utf8/LargeUtf8 or integers; coordinate and
/// time columns may be Float64, Float32 or integers.  Nulls in numeric
/// columns read as NaN.
fn load_parquet(path: &Path) -> Result<Vec<Sample>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut samples = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut cols: Vec<&Arc<dyn Array>> = Vec::with_capacity(COLUMNS.len());
        for name in COLUMNS {
            let i = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name))?;
            cols.push(batch.column(i));
        }

        for row in 0..batch.num_rows() {
            samples.push(Sample {
                group: extract_text(cols[0], row),
                marker: extract_text(cols[1], row),
                block: extract_text(cols[2], row),
                genre: Genre::parse(&extract_text(cols[3], row)),
                time_s: extract_f64(cols[4], row),
                x_mm: extract_f64(cols[5], row),
                y_mm: extract_f64(cols[6], row),
                z_mm: extract_f64(cols[7], row),
            });
        }
    }

    Ok(samples)
}

// -- Parquet / Arrow helpers --

/// Read an identifier cell as text.  Nulls and unsupported types read as
/// the empty string.
fn extract_text(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string())
            .unwrap_or_default(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Read a numeric cell as `f64`.  Nulls and unsupported types read as NaN.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> f64 {
    if col.is_null(row) {
        return f64::NAN;
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        arr.value(row)
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<StringArray>() {
        coerce_f64(arr.value(row))
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("head-motion-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_columns_in_any_order_with_coercion() {
        let path = write_temp(
            "reordered.csv",
            "time_s,group,marker,genre,block,x_mm,y_mm,z_mm,extra\n\
             0.5,NM0001,P1,salsa,2,1.0,2.0,3.0,ignored\n\
             0.6,NM0001,P1,salsa,2,,abc,3.5,ignored\n",
        );
        let samples = load_file(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].group, "NM0001");
        assert_eq!(samples[0].block, "2");
        assert_eq!(samples[0].genre, Genre::Salsa);
        assert_eq!(samples[0].time_s, 0.5);
        assert!(samples[1].x_mm.is_nan());
        assert!(samples[1].y_mm.is_nan());
        assert_eq!(samples[1].z_mm, 3.5);
    }

    #[test]
    fn csv_short_row_reads_missing_cells_as_nan() {
        let path = write_temp(
            "ragged.csv",
            "group,marker,block,genre,time_s,x_mm,y_mm,z_mm\n\
             G,M,1,edm,0.0,1,2,3\n\
             G,M,1,edm,0.1,1,2\n\
             G,M,1,edm,0.2,1,2,3\n",
        );
        let samples = load_file(&path).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].y_mm, 2.0);
        assert!(samples[1].z_mm.is_nan());
        assert_eq!(samples[2].z_mm, 3.0);
    }

    #[test]
    fn csv_missing_column_is_an_error() {
        let path = write_temp("short.csv", "group,marker,block,genre,time_s,x_mm,y_mm\nG,M,1,edm,0,0,0\n");
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("z_mm"));
    }

    #[test]
    fn json_accepts_numeric_identifiers() {
        let path = write_temp(
            "records.json",
            r#"[{"group":"NM0004","marker":"P3","block":1,"genre":"silence",
                 "time_s":0.0,"x_mm":1,"y_mm":"2.5","z_mm":null}]"#,
        );
        let samples = load_file(&path).unwrap();
        assert_eq!(samples[0].block, "1");
        assert_eq!(samples[0].genre, Genre::Silence);
        assert_eq!(samples[0].x_mm, 1.0);
        assert_eq!(samples[0].y_mm, 2.5);
        assert!(samples[0].z_mm.is_nan());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains("xlsx"));
    }

    #[test]
    fn failed_sources_degrade_to_empty() {
        let good = write_temp(
            "good.csv",
            "group,marker,block,genre,time_s,x_mm,y_mm,z_mm\nG,M,1,edm,0,0,0,0\n",
        );
        let missing = std::env::temp_dir().join("head-motion-does-not-exist.csv");
        let report = load_sources(&[missing, good]);
        assert_eq!(report.sources.len(), 2);
        assert!(report.sources[0].is_empty());
        assert_eq!(report.sources[1].len(), 1);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn source_names_default_to_csv() {
        let dir = Path::new("data");
        assert_eq!(source_path(dir, "NM0001-cleaned"), dir.join("NM0001-cleaned.csv"));
        assert_eq!(source_path(dir, "all.parquet"), dir.join("all.parquet"));
    }
}
