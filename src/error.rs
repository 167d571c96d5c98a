use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GvError {
    #[error("directory not found: {0}")]
    DirNotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("missing sample file: {0}")]
    MissingDataFile(PathBuf),

    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("missing or non-finite UNIX time at line {line}")]
    InvalidUnixTime { line: usize },

    #[error("no samples found")]
    EmptySampling,

    #[error("UNIX times are not unique")]
    DuplicateUnixTime,

    #[error("UNIX times are not monotonically increasing")]
    UnsortedUnixTime,

    #[error("could not render the plot: {0}")]
    Render(String),

    #[error("failed to open browser: {0}")]
    Browser(String),
}

pub type Result<T> = std::result::Result<T, GvError>;
