use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the skill store and its loaders
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database not found at {}; run `alumni-matcher setup` first", .0.display())]
    StoreAbsent(PathBuf),

    #[error("schema file not found at {}", .0.display())]
    SchemaFileAbsent(PathBuf),

    #[error("store does not match the expected schema: {0}; run `alumni-matcher setup` to rebuild it")]
    SchemaMismatch(String),

    #[error("invalid record at row {row}: {reason}")]
    InvalidRecord { row: u64, reason: String },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
