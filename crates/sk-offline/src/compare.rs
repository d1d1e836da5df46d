//! Two-file similarity comparison

use std::path::Path;

use serde::Serialize;

use sk_dsp::{estimate_bpm, pearson};
use sk_file::AudioData;

use crate::error::{OfflineError, Result};

/// Similarity measurements between two audio files
#[derive(Debug, Serialize)]
pub struct SimilarityReport {
    /// Pearson correlation over the common span of the first channels
    pub correlation: f64,
    /// Estimated tempo per channel of the first file
    pub tempo_a: Vec<Option<f64>>,
    /// Estimated tempo per channel of the second file
    pub tempo_b: Vec<Option<f64>>,
    pub sample_rate: u32,
}

/// Compare two files by waveform correlation and per-channel tempo
pub fn compare_files(path_a: &Path, path_b: &Path) -> Result<SimilarityReport> {
    let a = AudioData::load(path_a)?;
    let b = AudioData::load(path_b)?;

    if a.sample_rate != b.sample_rate {
        return Err(OfflineError::SampleRateMismatch {
            left: a.sample_rate,
            right: b.sample_rate,
        });
    }

    let frames = a.frames().min(b.frames());
    let correlation = match (a.channels.first(), b.channels.first()) {
        (Some(ca), Some(cb)) => pearson(&ca[..frames], &cb[..frames]),
        _ => 0.0,
    };

    let tempo_a: Vec<Option<f64>> = a
        .channels
        .iter()
        .map(|ch| estimate_bpm(ch, a.sample_rate))
        .collect();
    let tempo_b: Vec<Option<f64>> = b
        .channels
        .iter()
        .map(|ch| estimate_bpm(ch, b.sample_rate))
        .collect();

    log::info!(
        "compared {} vs {}: correlation {correlation:.4}",
        path_a.display(),
        path_b.display()
    );

    Ok(SimilarityReport {
        correlation,
        tempo_a,
        tempo_b,
        sample_rate: a.sample_rate,
    })
}
