use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchDataError {
    #[error("Failed to read CSV file '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Required column '{column}' not found in '{path}'")]
    MissingColumn {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Failed Polars column operation on '{column}': {source}")]
    ColumnOperation {
        column: String,
        #[source]
        source: PolarsError,
    },
}
