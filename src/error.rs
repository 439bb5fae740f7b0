//! Error taxonomy shared by both tools.
//!
//! Configuration and required-file problems are fatal and abort before any
//! processing; per-record parse problems never surface here - the segmenter
//! skips the offending record and continues.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read '{path}'")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}'")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid sort option: {0}")]
    InvalidSortOption(String),

    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write CSV report")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
