//! Error types for offline jobs

use thiserror::Error;

/// Errors from offline pipeline operations
#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("sample rate mismatch: {left} Hz vs {right} Hz")]
    SampleRateMismatch { left: u32, right: u32 },

    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("loudness measurement failed: {0}")]
    Loudness(#[from] sk_dsp::MeterError),

    #[error("file error: {0}")]
    File(#[from] sk_file::FileError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for offline operations
pub type Result<T> = std::result::Result<T, OfflineError>;
