//! 22-channel to 7.1.4 projection
//!
//! The first eight source channels map straight onto the 7.1 bed; the four
//! height outputs each sum an adjacent source pair and are clipped. The
//! whole result is peak-normalized before writing.

use std::path::PathBuf;

use serde::Serialize;

use sk_file::{write_wav, AudioData, BitDepth};

use crate::error::{OfflineError, Result};

/// Output speaker order (ITU 7.1 bed plus four heights)
pub const CHANNEL_LAYOUT_7_1_4: [&str; 12] = [
    "L", "R", "C", "LFE", "Ls", "Rs", "Lb", "Rb", "Ltf", "Rtf", "Ltr", "Rtr",
];

const MIN_SOURCE_CHANNELS: usize = 22;

/// Height output index -> the two source channels it sums
const HEIGHT_PAIRS: [(usize, usize); 4] = [(8, 9), (10, 11), (12, 13), (14, 15)];

/// Summary of one downmix run
#[derive(Debug, Serialize)]
pub struct DownmixReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_channels: usize,
    pub frames: usize,
    pub sample_rate: u32,
    /// Peak of the projection before normalization
    pub peak: f64,
}

/// Downmix a 22-channel (or wider) file onto a 7.1.4 layout
pub struct DownmixJob {
    input: PathBuf,
    output: PathBuf,
}

impl DownmixJob {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input: I, output: O) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn run(&self) -> Result<DownmixReport> {
        let source = AudioData::load(&self.input)?;
        if source.num_channels() < MIN_SOURCE_CHANNELS {
            return Err(OfflineError::ChannelMismatch {
                expected: MIN_SOURCE_CHANNELS,
                actual: source.num_channels(),
            });
        }

        let mut projected = project_7_1_4(&source);
        let peak = projected.peak();
        if peak > 0.0 {
            projected.apply_gain(1.0 / peak);
        }

        write_wav(&self.output, &projected, BitDepth::Pcm24)?;
        log::info!(
            "downmixed {} ({} ch) -> {} (12 ch, peak {peak:.4})",
            self.input.display(),
            source.num_channels(),
            self.output.display()
        );

        Ok(DownmixReport {
            input: self.input.clone(),
            output: self.output.clone(),
            source_channels: source.num_channels(),
            frames: projected.frames(),
            sample_rate: source.sample_rate,
            peak,
        })
    }
}

fn project_7_1_4(source: &AudioData) -> AudioData {
    let frames = source.frames();
    let mut out: Vec<Vec<f64>> = Vec::with_capacity(CHANNEL_LAYOUT_7_1_4.len());

    // 7.1 bed maps one-to-one
    for ch in 0..8 {
        out.push(source.channels[ch][..frames].to_vec());
    }

    for &(a, b) in &HEIGHT_PAIRS {
        let summed: Vec<f64> = source.channels[a][..frames]
            .iter()
            .zip(source.channels[b][..frames].iter())
            .map(|(&x, &y)| (x + y).clamp(-1.0, 1.0))
            .collect();
        out.push(summed);
    }

    AudioData::new(out, source.sample_rate)
}
