//! WAV encoding

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::AudioData;
use crate::{FileError, Result};

/// Output sample format for WAV files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    Pcm16,
    Pcm24,
    Float32,
}

impl Default for BitDepth {
    fn default() -> Self {
        Self::Pcm24
    }
}

impl BitDepth {
    fn spec(&self, channels: u16, sample_rate: u32) -> hound::WavSpec {
        let (bits, format) = match self {
            Self::Pcm16 => (16, hound::SampleFormat::Int),
            Self::Pcm24 => (24, hound::SampleFormat::Int),
            Self::Float32 => (32, hound::SampleFormat::Float),
        };
        hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: bits,
            sample_format: format,
        }
    }
}

/// Write a planar buffer to a WAV file, creating parent directories.
pub fn write_wav(path: &Path, audio: &AudioData, depth: BitDepth) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let write_err = |detail: String| FileError::Write {
        path: path.to_path_buf(),
        detail,
    };

    let spec = depth.spec(audio.num_channels() as u16, audio.sample_rate);
    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| write_err(e.to_string()))?;

    let frames = audio.frames();
    for frame in 0..frames {
        for channel in &audio.channels {
            let sample = channel[frame];
            match depth {
                BitDepth::Pcm16 => {
                    let s = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                    writer.write_sample(s).map_err(|e| write_err(e.to_string()))?;
                }
                BitDepth::Pcm24 => {
                    let s = (sample.clamp(-1.0, 1.0) * 8388607.0) as i32;
                    writer.write_sample(s).map_err(|e| write_err(e.to_string()))?;
                }
                BitDepth::Float32 => {
                    writer
                        .write_sample(sample as f32)
                        .map_err(|e| write_err(e.to_string()))?;
                }
            }
        }
    }

    writer.finalize().map_err(|e| write_err(e.to_string()))?;

    log::debug!(
        "wrote {} ({:?}, {} ch, {} frames)",
        path.display(),
        depth,
        audio.num_channels(),
        frames
    );
    Ok(())
}
