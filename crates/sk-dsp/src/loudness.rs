//! Gated integrated loudness measurement (EBU R128 / ITU-R BS.1770-4)
//!
//! Measures integrated loudness in LUFS over a complete buffer:
//! K-weight each channel, accumulate 400 ms blocks at a 100 ms hop, gate
//! absolutely at -70 LUFS, then relatively at -10 LU below the gated mean.
//!
//! Fully silent input measures `-inf` LUFS; that is a valid reading, not an
//! error. Input shorter than one gating block cannot be measured at all and
//! is rejected.

use thiserror::Error;

use crate::kweight::KWeighting;

/// Absolute gating threshold
pub const ABSOLUTE_GATE_LUFS: f64 = -70.0;

/// Relative gate sits this many LU below the absolute-gated mean
const RELATIVE_GATE_LU: f64 = 10.0;

/// Gating block length and hop (BS.1770-4: 400 ms blocks, 75% overlap)
const BLOCK_SECONDS: f64 = 0.4;
const HOP_SECONDS: f64 = 0.1;

/// Loudness measurement errors
#[derive(Error, Debug)]
pub enum MeterError {
    #[error("input of {frames} frames is shorter than one 400 ms gating block ({required} frames at {sample_rate} Hz)")]
    TooShort {
        frames: usize,
        required: usize,
        sample_rate: u32,
    },

    #[error("no channels to measure")]
    NoChannels,

    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),
}

/// Integrated loudness of a planar buffer, in LUFS.
///
/// Channel weighting follows BS.1770: unity for the first three channels
/// (L/R/C), 1.41 for surrounds. Returns `-inf` for silence.
pub fn integrated_loudness(channels: &[Vec<f64>], sample_rate: u32) -> Result<f64, MeterError> {
    if channels.is_empty() {
        return Err(MeterError::NoChannels);
    }
    if sample_rate == 0 {
        return Err(MeterError::InvalidSampleRate(sample_rate));
    }

    let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    let hop = (sample_rate as f64 * HOP_SECONDS) as usize;
    let block = (sample_rate as f64 * BLOCK_SECONDS) as usize;
    if frames < block || hop == 0 {
        return Err(MeterError::TooShort {
            frames,
            required: block,
            sample_rate,
        });
    }

    // Mean square of each 100 ms hop, per channel, after K-weighting
    let num_hops = frames / hop;
    let mut hop_power = vec![0.0_f64; num_hops];

    for (ch, samples) in channels.iter().enumerate() {
        let weight = if ch < 3 { 1.0 } else { 1.41 };
        let mut filter = KWeighting::new(sample_rate as f64);

        for (h, power) in hop_power.iter_mut().enumerate() {
            let mut sum_sq = 0.0;
            for &sample in &samples[h * hop..(h + 1) * hop] {
                let weighted = filter.process(sample);
                sum_sq += weighted * weighted;
            }
            *power += weight * sum_sq / hop as f64;
        }
    }

    // 400 ms blocks are four consecutive hops
    let hops_per_block = (block / hop).max(1);
    let block_powers: Vec<f64> = hop_power
        .windows(hops_per_block)
        .map(|w| w.iter().sum::<f64>() / hops_per_block as f64)
        .collect();

    // Absolute gate at -70 LUFS
    let gated: Vec<f64> = block_powers
        .iter()
        .copied()
        .filter(|&p| block_loudness(p) > ABSOLUTE_GATE_LUFS)
        .collect();
    if gated.is_empty() {
        return Ok(f64::NEG_INFINITY);
    }

    // Relative gate at -10 LU below the absolute-gated mean
    let abs_mean = gated.iter().sum::<f64>() / gated.len() as f64;
    let rel_threshold = block_loudness(abs_mean) - RELATIVE_GATE_LU;

    let mut rel_sum = 0.0;
    let mut rel_count = 0usize;
    for &power in &gated {
        if block_loudness(power) > rel_threshold {
            rel_sum += power;
            rel_count += 1;
        }
    }

    if rel_count == 0 {
        return Ok(f64::NEG_INFINITY);
    }
    Ok(block_loudness(rel_sum / rel_count as f64))
}

/// Loudness of a block from its weighted mean-square power
#[inline]
fn block_loudness(mean_square: f64) -> f64 {
    if mean_square > 0.0 {
        -0.691 + 10.0 * mean_square.log10()
    } else {
        f64::NEG_INFINITY
    }
}
