//! Loading feature matrices and label vectors from ASCII files, and writing
//! predicted labels back out.
//!
//! One record per line. Fields are separated by commas, tabs or runs of
//! spaces; the separator is sniffed from the first non-blank line. Blank
//! lines are ignored.

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::debug;
use ndarray::{Array1, Array2, ArrayView1};
use std::path::Path;

use crate::{ClassifierError, FeatureMatrix, Float, Label, LabelVector, Result};

/// Reads a feature matrix, one sample per line.
///
/// # Errors
///
/// Returns `ClassifierError::DataLoad` if the file is missing or empty, a
/// field is not a finite number, or the rows differ in length.
pub fn load_matrix<F: Float>(path: impl AsRef<Path>) -> Result<FeatureMatrix<F>, F> {
    let path = path.as_ref();
    let records = read_records::<F>(path)?;

    let n_cols = records[0].fields.len();
    let mut values = Vec::with_capacity(records.len() * n_cols);
    for record in &records {
        if record.fields.len() != n_cols {
            return Err(ClassifierError::load(
                path,
                format!(
                    "line {} has {} values, expected {}",
                    record.line,
                    record.fields.len(),
                    n_cols
                ),
            ));
        }
        for field in &record.fields {
            values.push(parse_value::<F>(path, record.line, field)?);
        }
    }

    let matrix = Array2::from_shape_vec((records.len(), n_cols), values)
        .map_err(|e| ClassifierError::<F>::load(path, e.to_string()))?;
    debug!(
        "loaded {}x{} matrix from {}",
        matrix.nrows(),
        matrix.ncols(),
        path.display()
    );
    Ok(matrix)
}

/// Reads a label vector. Labels may be one per line or several per line;
/// they are taken in reading order.
///
/// # Errors
///
/// Returns `ClassifierError::DataLoad` if the file is missing or empty, or
/// any value is not exactly `1` or `-1`.
pub fn load_labels<F: Float>(path: impl AsRef<Path>) -> Result<LabelVector, F> {
    let path = path.as_ref();
    let records = read_records::<F>(path)?;

    let mut labels = Vec::new();
    for record in &records {
        for field in &record.fields {
            let value = parse_value::<F>(path, record.line, field)?;
            let label = Label::from_value(value).ok_or_else(|| {
                ClassifierError::<F>::load(
                    path,
                    format!("line {}: label must be 1 or -1, got `{field}`", record.line),
                )
            })?;
            labels.push(label);
        }
    }

    debug!("loaded {} labels from {}", labels.len(), path.display());
    Ok(Array1::from(labels))
}

/// Writes one label per line, as `1` or `-1`.
///
/// # Errors
///
/// Returns `ClassifierError::DataWrite` if the destination cannot be created
/// or written.
pub fn write_labels<F>(path: impl AsRef<Path>, labels: ArrayView1<Label>) -> Result<(), F> {
    let path = path.as_ref();
    let write_error = |source: std::io::Error| ClassifierError::<F>::DataWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| write_error(e.into()))?;
    for label in labels {
        writer
            .write_record([label.to_string()])
            .map_err(|e| write_error(e.into()))?;
    }
    writer.flush().map_err(write_error)?;

    debug!("wrote {} labels to {}", labels.len(), path.display());
    Ok(())
}

struct Record {
    line: u64,
    fields: Vec<String>,
}

fn read_records<F>(path: &Path) -> Result<Vec<Record>, F> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ClassifierError::<F>::load(path, e.to_string()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(sniff_delimiter(&content))
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    let mut raw = StringRecord::new();
    loop {
        match reader.read_record(&mut raw) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Err(ClassifierError::load(path, e.to_string())),
        }
        let fields: Vec<String> = raw
            .iter()
            .filter(|field| !field.is_empty())
            .map(str::to_owned)
            .collect();
        if fields.is_empty() {
            continue;
        }
        let line = raw.position().map_or(0, |p| p.line());
        records.push(Record { line, fields });
    }

    if records.is_empty() {
        return Err(ClassifierError::load(path, "no data"));
    }
    Ok(records)
}

fn sniff_delimiter(content: &str) -> u8 {
    let first = content.lines().find(|line| !line.trim().is_empty());
    match first {
        Some(line) if line.contains(',') => b',',
        Some(line) if line.trim().contains('\t') => b'\t',
        _ => b' ',
    }
}

fn parse_value<F: Float>(path: &Path, line: u64, field: &str) -> Result<F, F> {
    let value: f64 = field.parse().map_err(|_| {
        ClassifierError::<F>::load(path, format!("line {line}: `{field}` is not a number"))
    })?;
    if !value.is_finite() {
        return Err(ClassifierError::load(
            path,
            format!("line {line}: `{field}` is not finite"),
        ));
    }
    F::from_f64(value).ok_or_else(|| {
        ClassifierError::load(path, format!("line {line}: `{field}` is out of range"))
    })
}
