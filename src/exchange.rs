// JSON export/import file operations
//
// The file is an array of positional rows:
//   [vehicle, task, last_date, last_mileage, notes]
// Rows are decoded into `RecordRow` one at a time, so a bad row surfaces at
// its own position and the rows before it can already be applied.

use crate::error::{Error, ImportCause};
use crate::models::RecordRow;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

const ROW_ARITY: usize = 5;

/// Write rows to an export file, pretty-printed with 2-space indentation
pub fn write_rows(path: &Path, rows: &[RecordRow]) -> Result<(), Error> {
    let io_err = |source| Error::StorageIo {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows).map_err(|e| io_err(e.into()))?;
    writer.flush().map_err(io_err)?;

    let file = writer.into_inner().map_err(|e| io_err(e.into_error()))?;
    file.sync_all().map_err(io_err)?;

    info!(file = ?path, count = rows.len(), "Wrote export file");
    Ok(())
}

/// Read an import file and return a lazy decoder over its rows
///
/// Fails up front if the file cannot be read, is not JSON, or is not an
/// array. Individual rows are checked only as the reader is advanced.
pub fn read_rows(path: &Path) -> Result<RowReader, ImportCause> {
    let content = std::fs::read_to_string(path).map_err(ImportCause::Read)?;
    let reader = parse_rows(&content)?;
    debug!(file = ?path, count = reader.len(), "Parsed import file");
    Ok(reader)
}

/// Parse import content already in memory
pub fn parse_rows(content: &str) -> Result<RowReader, ImportCause> {
    match serde_json::from_str::<Value>(content).map_err(ImportCause::Parse)? {
        Value::Array(values) => Ok(RowReader {
            values: values.into_iter(),
            index: 0,
        }),
        _ => Err(ImportCause::NotAnArray),
    }
}

/// Iterator decoding import rows in file order
pub struct RowReader {
    values: std::vec::IntoIter<Value>,
    index: usize,
}

impl RowReader {
    /// Rows not yet decoded
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.len() == 0
    }
}

impl Iterator for RowReader {
    type Item = Result<RecordRow, ImportCause>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.values.next()?;
        let index = self.index;
        self.index += 1;
        Some(decode_row(index, value))
    }
}

/// Decode one positional row
///
/// Vehicle and task must be strings. Date and notes may be null; null notes
/// decode as the empty string. Mileage must be an integer or null.
pub fn decode_row(index: usize, value: Value) -> Result<RecordRow, ImportCause> {
    let shape = |reason: String| ImportCause::RowShape { index, reason };

    match &value {
        Value::Array(fields) if fields.len() != ROW_ARITY => {
            return Err(shape(format!(
                "expected {} fields, found {}",
                ROW_ARITY,
                fields.len()
            )));
        }
        Value::Array(_) => {}
        other => return Err(shape(format!("expected an array, found {}", json_type(other)))),
    }

    let (vehicle, task, last_date, last_mileage, notes): (
        String,
        String,
        Option<String>,
        Option<i64>,
        Option<String>,
    ) = serde_json::from_value(value).map_err(|e| shape(e.to_string()))?;

    Ok(RecordRow {
        vehicle,
        task,
        last_date,
        last_mileage,
        notes: notes.unwrap_or_default(),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
