use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{REQUIRED_COLUMNS, UsageRecord, UsageTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a usage table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the AEI column names (the published format)
/// * `.json`    – `[{ "geo_id": "US", "geography": "country", ... }, ...]`
/// * `.parquet` – flat columns, as written by `df.to_parquet()`
pub fn load_file(path: &Path) -> Result<UsageTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn check_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let present: Vec<&str> = columns.into_iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();
    if !missing.is_empty() {
        bail!("missing required column(s): {}", missing.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse a UTF-8 CSV with a header row. Columns are matched by name; extra
/// columns are kept in `column_names` only.
pub fn parse_csv<R: Read>(input: R) -> Result<UsageTable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    check_columns(headers.iter().map(String::as_str))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<UsageRecord>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let record = result.with_context(|| format!("CSV line {}", row_no + 2))?;
        records.push(record);
    }

    Ok(UsageTable::new(records, headers))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "geo_id": "US",
///     "geography": "country",
///     "date_start": "2025-08-04",
///     "date_end": "2025-08-11",
///     "facet": "country",
///     "variable": "usage_pct",
///     "cluster_name": null,
///     "value": 58.2
///   },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<UsageTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = match root {
        JsonValue::Array(rows) => rows,
        _ => bail!("Expected top-level JSON array"),
    };

    let column_names: Vec<String> = match rows.first() {
        Some(JsonValue::Object(obj)) => obj.keys().cloned().collect(),
        Some(_) => bail!("Row 0 is not a JSON object"),
        None => REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
    };
    check_columns(column_names.iter().map(String::as_str))?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            serde_json::from_value::<UsageRecord>(row).with_context(|| format!("Row {i}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(UsageTable::new(records, column_names))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// String columns may be `Utf8` or `LargeUtf8`; dates may be strings or
/// `Date32`; `value` may be any numeric type. Everything is coerced with
/// arrow's cast kernels.
fn load_parquet(path: &Path) -> Result<UsageTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    check_columns(column_names.iter().map(String::as_str))?;

    let reader = builder.build().context("building parquet reader")?;
    let mut records = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.extend(batch_records(&batch, offset)?);
        offset += batch.num_rows();
    }

    Ok(UsageTable::new(records, column_names))
}

fn batch_records(batch: &RecordBatch, offset: usize) -> Result<Vec<UsageRecord>> {
    let text = |name: &str| -> Result<ArrayRef> {
        let col = column(batch, name)?;
        cast(col, &DataType::Utf8).with_context(|| format!("column '{name}' is not text"))
    };

    let geo_id = text("geo_id")?;
    let geography = text("geography")?;
    let date_start = text("date_start")?;
    let date_end = text("date_end")?;
    let facet = text("facet")?;
    let variable = text("variable")?;
    let cluster_name = text("cluster_name")?;
    let value = cast(column(batch, "value")?, &DataType::Float64)
        .context("column 'value' is not numeric")?;

    let geo_id = geo_id.as_string::<i32>();
    let geography = geography.as_string::<i32>();
    let date_start = date_start.as_string::<i32>();
    let date_end = date_end.as_string::<i32>();
    let facet = facet.as_string::<i32>();
    let variable = variable.as_string::<i32>();
    let cluster_name = cluster_name.as_string::<i32>();
    let value = value.as_primitive::<Float64Type>();

    (0..batch.num_rows())
        .map(|row| {
            let row_no = offset + row;
            let required = |arr: &arrow::array::StringArray, name: &str| -> Result<String> {
                if arr.is_null(row) {
                    bail!("Row {row_no}: null '{name}'");
                }
                Ok(arr.value(row).to_string())
            };
            if value.is_null(row) {
                bail!("Row {row_no}: null 'value'");
            }

            Ok(UsageRecord {
                geo_id: required(geo_id, "geo_id")?,
                geography: required(geography, "geography")?,
                date_start: parse_date(&required(date_start, "date_start")?, row_no)?,
                date_end: parse_date(&required(date_end, "date_end")?, row_no)?,
                facet: required(facet, "facet")?,
                variable: required(variable, "variable")?,
                cluster_name: if cluster_name.is_null(row) {
                    String::new()
                } else {
                    cluster_name.value(row).to_string()
                },
                value: value.value(row),
            })
        })
        .collect()
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("Parquet file missing '{name}' column"))
}

fn parse_date(s: &str, row: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Row {row}: '{s}' is not a YYYY-MM-DD date"))
}
