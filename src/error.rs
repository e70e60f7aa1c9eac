use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while turning an input file into `knowledge_base` inserts.
///
/// Everything except [`ImportError::MetadataDecode`] aborts the run before any SQL
/// is written. A metadata decode failure is reported next to the entry it belongs
/// to and the entry falls back to an empty metadata object.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("entry {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("entry {index}: field `{field}` must be {expected}, found {found}")]
    InvalidField {
        index: usize,
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("row {index}: invalid metadata json, using empty object")]
    MetadataDecode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type ImportResult<T> = Result<T, ImportError>;
