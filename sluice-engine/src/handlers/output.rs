//! Output handler
//!
//! Writes the current dataset to its destination. The CSV sink writes into a
//! temporary file next to the destination and persists it in one step, so
//! the destination either receives the whole file or is left untouched.

use sluice_core::domain::dataset::{Dataset, text_form};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::params::OutputParams;

/// Write the dataset and hand it back unchanged
///
/// File I/O runs on the blocking pool.
pub async fn run(dataset: Option<Dataset>, params: &OutputParams) -> Result<Option<Dataset>> {
    match params {
        OutputParams::Csv {
            output_location,
            overwrite_existing,
        } => {
            let path = output_location.clone();
            let overwrite = *overwrite_existing;

            tokio::task::spawn_blocking(move || {
                write_csv(dataset.as_ref(), &path, overwrite).map(|_| dataset)
            })
            .await
            .map_err(|e| EngineError::OutputWrite {
                path: output_location.clone(),
                source: io::Error::other(e),
            })?
        }
        OutputParams::Unsupported => {
            warn!("Unsupported output_type, output stage wrote nothing");
            Ok(dataset)
        }
    }
}

/// Write the dataset as CSV to `path`
///
/// The header row is the first record's columns; every row renders those
/// columns in the same order. An absent or empty dataset yields an empty
/// file.
pub fn write_csv(dataset: Option<&Dataset>, path: &Path, overwrite: bool) -> Result<()> {
    if !overwrite && path.exists() {
        return Err(EngineError::OutputConflict(path.to_path_buf()));
    }

    let write_err = |source: io::Error| EngineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let temp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    let rows = write_rows(dataset, temp.as_file()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;

    let persisted = if overwrite {
        temp.persist(path).map(drop)
    } else {
        temp.persist_noclobber(path).map(drop)
    };

    persisted.map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            EngineError::OutputConflict(path.to_path_buf())
        } else {
            write_err(e.error)
        }
    })?;

    info!("Wrote {} row(s) to {}", rows, path.display());
    Ok(())
}

fn write_rows<W: Write>(dataset: Option<&Dataset>, out: W) -> io::Result<usize> {
    let mut writer = csv::Writer::from_writer(out);

    let Some(dataset) = dataset else {
        writer.flush()?;
        return Ok(0);
    };

    if let Some(columns) = dataset.columns() {
        writer.write_record(&columns)?;
        for record in dataset.records() {
            writer.write_record(columns.iter().map(|column| text_form(record.get(*column))))?;
        }
    }

    writer.flush()?;
    Ok(dataset.len())
}
