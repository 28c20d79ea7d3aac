//! Error types for rs-deboiler.
//!
//! Per-page decode and parse failures are never surfaced here: they are
//! absorbed with an empty-document fallback and a logged warning so a single
//! broken page cannot take down a whole-domain run. The variants below cover
//! the failures that must stop a run.

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid option combination, rejected before any work starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A requested URL is absent from the dataset's index.
    #[error("unknown url: {0}")]
    UnknownUrl(String),

    /// `transform` was called in performance mode with a dataset whose page
    /// cache does not cover the corpus (i.e. not the dataset passed to `fit`).
    #[error(
        "in performance mode, the same dataset passed to `fit` must be passed to `transform`"
    )]
    DatasetMismatch,

    /// The worker pool could not be constructed.
    #[error("worker pool construction failed: {0}")]
    WorkerPool(String),

    /// I/O failure while indexing or reading a dataset file.
    #[error("dataset i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A dataset record could not be deserialized.
    #[error("malformed dataset record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
