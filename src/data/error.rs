use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a log file into a dataset.
///
/// Row-level coercion problems are not represented here: the normalizer
/// drops such rows instead of failing the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no data rows", path.display())]
    Empty { path: PathBuf },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
}
