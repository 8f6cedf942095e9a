use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const RAW_JSON_FILE: &str = "data.json";
pub const RAW_CSV_FILE: &str = "data.csv";
pub const RESULTS_FILE: &str = "results.csv";

/// Writes the raw response body as `data.json` and as a one-column `data.csv`.
/// Failures are logged, never returned.
pub fn write_raw(dir: &Path, raw: &str) {
    let json_path = dir.join(RAW_JSON_FILE);
    match write_file(&json_path, raw.as_bytes()) {
        Ok(()) => tracing::info!(path = %json_path.display(), "saved raw JSON response"),
        Err(err) => tracing::warn!(error = %err, "failed to save raw JSON response"),
    }

    let csv_path = dir.join(RAW_CSV_FILE);
    let written = wrap_raw_csv(raw).and_then(|bytes| write_file(&csv_path, &bytes));
    match written {
        Ok(()) => tracing::info!(path = %csv_path.display(), "saved raw CSV file"),
        Err(err) => tracing::warn!(error = %err, "failed to save raw CSV file"),
    }
}

pub fn write_results(dir: &Path, delimited: &str) -> Result<PathBuf> {
    let path = dir.join(RESULTS_FILE);
    write_file(&path, delimited.as_bytes())?;
    Ok(path)
}

fn wrap_raw_csv(raw: &str) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(["RawData"])?;
    writer.write_record([raw])?;
    writer
        .into_inner()
        .map_err(|e| Error::Csv(csv::Error::from(e.into_error())))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| Error::Output {
        path: path.to_path_buf(),
        source,
    })
}
