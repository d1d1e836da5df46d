//! sk-file: audio file I/O for StemKit
//!
//! Decoding (WAV via hound, FLAC/MP3/OGG via symphonia), WAV encoding, and
//! reproducible directory scanning. All audio is handed around as planar
//! `f64` channels in [`AudioData`].

pub mod audio;
pub mod decode;
pub mod encode;
pub mod scan;

pub use audio::AudioData;
pub use encode::{write_wav, BitDepth};
pub use scan::scan_audio_dir;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from file-level operations
#[derive(Error, Debug)]
pub enum FileError {
    #[error("failed to read audio file {path}: {detail}")]
    Read { path: PathBuf, detail: String },

    #[error("failed to write audio file {path}: {detail}")]
    Write { path: PathBuf, detail: String },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("no audio files with a recognized extension in {0}")]
    NoAudioFiles(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for file operations
pub type Result<T> = std::result::Result<T, FileError>;
