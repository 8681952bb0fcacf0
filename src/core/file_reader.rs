//! Template file reading
//!
//! Templates are read whole. Oversized files and files that are not valid
//! UTF-8 are rejected with a typed error; nothing is truncated or converted
//! lossily.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default maximum template size in bytes (8 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 8 * 1024 * 1024;

/// Configuration for file reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FileReadConfig {
    /// Maximum file size to process (bytes)
    pub max_file_size: u64,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Why a template could not be read
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("{path}: file exceeds size limit ({size} > {limit} bytes)")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("{path}: file contains invalid UTF-8 (at byte {offset})")]
    NotUtf8 { path: PathBuf, offset: usize },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ReadError::TooLarge { .. } => "FILE_TOO_LARGE",
            ReadError::NotUtf8 { .. } => "FILE_NOT_UTF8",
            ReadError::Io { .. } => "IO_ERROR",
        }
    }
}

/// Read a template file as UTF-8 text
pub fn read_template(path: &Path, config: &FileReadConfig) -> Result<String, ReadError> {
    let io_err = |source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = fs::metadata(path).map_err(io_err)?.len();
    if size > config.max_file_size {
        return Err(ReadError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: config.max_file_size,
        });
    }

    let bytes = fs::read(path).map_err(io_err)?;
    String::from_utf8(bytes).map_err(|e| ReadError::NotUtf8 {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })
}
