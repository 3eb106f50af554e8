use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid partition count {count} for image of height {height}")]
    InvalidPartitionCount { count: usize, height: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("worker for rows {row_start}..{row_end} terminated without delivering a result")]
    WorkerLost { row_start: usize, row_end: usize },

    #[error("filter failed for rows {row_start}..{row_end}: {detail}")]
    FilterFailure {
        row_start: usize,
        row_end: usize,
        detail: String,
    },

    #[error("incomplete result: {received} of {expected} regions delivered")]
    IncompleteResult { received: usize, expected: usize },

    #[error("unsupported channel depth {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(usize),

    #[error("cancellation hook already installed")]
    HookInstalled,

    #[error("failed to decode input image: {0}")]
    DecodeError(String),

    #[error("failed to encode output image: {0}")]
    EncodeError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EngineError {
    /// A filter-side failure. The row range is stamped in by the adapter
    /// once the failing region is known.
    pub fn filter_failure(detail: impl Into<String>) -> Self {
        Self::FilterFailure {
            row_start: 0,
            row_end: 0,
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
