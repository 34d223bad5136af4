//! Whole-file JSON persistence for record lists.
//!
//! Each file holds one JSON array. Reads are fail-open: a missing or
//! unparsable file is treated as an empty list. Writes replace the whole
//! file and are not atomic.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode records for {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A JSON file holding a list of `T`.
#[derive(Debug, Clone)]
pub struct JsonFile<T> {
    path: PathBuf,
    records: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record, or an empty list if the file is absent or is not
    /// a JSON array. Individual records that fail to decode are skipped.
    pub fn load(&self) -> Vec<T> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file not found, starting empty");
                return Vec::new();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cannot read data file");
                return Vec::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&contents) {
            Ok(values) => values,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt data file");
                return Vec::new();
            }
        };

        values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(path = %self.path.display(), index, error = %err, "skipping bad record");
                    None
                }
            })
            .collect()
    }

    /// Replaces the file with `records`, pretty-printed.
    pub fn save(&self, records: &[T]) -> Result<(), StorageError> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = File::create(&self.path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records).map_err(|source| {
            StorageError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;
        writer.flush().map_err(io_err)?;

        debug!(path = %self.path.display(), count = records.len(), "saved records");
        Ok(())
    }
}
