use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning a source file into a
/// [`SalesTable`](super::model::SalesTable).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("source file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("XLSX read error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON layout error: {0}")]
    JsonLayout(String),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("invalid column range '{0}' (expected letters like B:R)")]
    ColumnRange(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {line}, column '{column}': {message}")]
    Cell {
        line: usize,
        column: String,
        message: String,
    },

    #[error("source contains no data rows")]
    Empty,
}
