//! Loudness analysis and gain planning
//!
//! Each stem's gain is a blend of its LUFS distance and RMS distance to the
//! master, clamped to a musically safe range.

use std::collections::BTreeMap;

use serde::Serialize;

use sk_dsp::{integrated_loudness, linear_to_db, rms};
use sk_file::AudioData;

use crate::config::AlignConfig;
use crate::error::Result;
use crate::loader::StemSet;

/// Integrated loudness and RMS level of one signal
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LoudnessReading {
    /// Integrated loudness in LUFS (negative infinity for silence)
    pub lufs: f64,
    /// RMS level, linear
    pub rms: f64,
    pub sample_rate: u32,
}

/// Measure integrated loudness and RMS of a buffer (mono mixdown)
pub fn analyze(audio: &AudioData) -> Result<LoudnessReading> {
    let mono = audio.to_mono();
    let lufs = integrated_loudness(&[mono.clone()], audio.sample_rate)?;
    Ok(LoudnessReading {
        lufs,
        rms: rms(&mono),
        sample_rate: audio.sample_rate,
    })
}

/// Planned gain for one stem
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StemGain {
    pub gain_db: f64,
    pub reading: LoudnessReading,
}

/// Gains for every stem, computed once against a single master reading
#[derive(Debug, Serialize)]
pub struct GainPlan {
    pub master: LoudnessReading,
    pub gains: BTreeMap<String, StemGain>,
}

impl GainPlan {
    /// Compute a gain per stem from the already-loaded stem set.
    ///
    /// The master is measured exactly once by the caller; stems are measured
    /// from the coerced and clipped buffers the pipeline will render.
    pub fn compute(master: LoudnessReading, stems: &StemSet, config: &AlignConfig) -> Result<Self> {
        let mut gains = BTreeMap::new();

        for stem in &stems.stems {
            let reading = analyze(&stem.data)?;

            // Silence measures -inf LUFS; a delta between two silent signals
            // would be NaN, so treat it as no adjustment.
            let lufs_delta = if master.lufs.is_finite() || reading.lufs.is_finite() {
                master.lufs - reading.lufs
            } else {
                0.0
            };

            let rms_delta = linear_to_db(master.rms / (reading.rms + config.silence_epsilon));

            let mut blended = config.lufs_weight * lufs_delta + config.rms_weight * rms_delta;
            if blended.is_nan() {
                blended = 0.0;
            }
            let gain_db = blended.clamp(config.gain_min_db, config.gain_max_db);

            log::debug!(
                "stem '{}': lufs_delta={lufs_delta:.2} rms_delta={rms_delta:.2} gain={gain_db:.2} dB",
                stem.name
            );
            gains.insert(stem.name.clone(), StemGain { gain_db, reading });
        }

        Ok(Self { master, gains })
    }
}
