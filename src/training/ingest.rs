//! CSV input and output for raw and processed tables.

use std::fs::File;
use std::path::Path;

use ndarray::Array2;

use crate::error::{ChurnError, Result};
use crate::record::{parse_number, RawCustomerRecord};

/// Read the raw customer CSV.
pub fn read_raw_records(path: &Path) -> Result<Vec<RawCustomerRecord>> {
    let file = File::open(path)
        .map_err(|e| ChurnError::io(format!("opening raw data {}", path.display()), e))?;
    let mut reader = csv::Reader::from_reader(file);
    let rows = reader.deserialize().collect::<std::result::Result<Vec<RawCustomerRecord>, _>>()?;
    tracing::info!(path = %path.display(), rows = rows.len(), "raw records loaded");
    Ok(rows)
}

/// Write a numeric table, optionally followed by an encoded target column.
pub fn write_matrix(
    path: &Path,
    columns: &[String],
    data: &Array2<f64>,
    target: Option<(&str, &[usize])>,
) -> Result<()> {
    if data.ncols() != columns.len() {
        return Err(ChurnError::SchemaMismatch { expected: columns.len(), actual: data.ncols() });
    }
    if let Some((_, labels)) = target {
        if labels.len() != data.nrows() {
            return Err(ChurnError::Training {
                message: format!("{} rows but {} target labels", data.nrows(), labels.len()),
            });
        }
    }

    let file = File::create(path)
        .map_err(|e| ChurnError::io(format!("creating {}", path.display()), e))?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header: Vec<&str> = columns.iter().map(String::as_str).collect();
    if let Some((name, _)) = target {
        header.push(name);
    }
    writer.write_record(&header)?;

    for (idx, row) in data.rows().into_iter().enumerate() {
        let mut record: Vec<String> = row.iter().map(f64::to_string).collect();
        if let Some((_, labels)) = target {
            record.push(labels[idx].to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| ChurnError::io(format!("flushing {}", path.display()), e))?;
    Ok(())
}

/// Read a numeric table with a header row.
pub fn read_matrix(path: &Path) -> Result<(Vec<String>, Array2<f64>)> {
    let file = File::open(path)
        .map_err(|e| ChurnError::io(format!("opening {}", path.display()), e))?;
    let mut reader = csv::Reader::from_reader(file);
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut values = Vec::new();
    let mut rows = 0usize;
    for record in reader.records() {
        let record = record?;
        for (column, cell) in columns.iter().zip(record.iter()) {
            values.push(parse_number(column, cell)?);
        }
        rows += 1;
    }

    let data = Array2::from_shape_vec((rows, columns.len()), values).map_err(|e| {
        ChurnError::Serialization { message: format!("{}: {e}", path.display()) }
    })?;
    Ok((columns, data))
}
