//! Tempo estimation from onset energy flux
//!
//! Frame the signal, take the positive first difference of frame energy as
//! an onset strength envelope, autocorrelate it, and pick the strongest lag
//! in the musically plausible BPM range.

/// Search range for the tempo lag
pub const MIN_BPM: f64 = 30.0;
pub const MAX_BPM: f64 = 240.0;

const FRAME_SIZE: usize = 1024;
const HOP_SIZE: usize = 512;

/// Estimate the tempo of a mono signal in BPM.
///
/// Returns `None` when the signal is too short to frame, has no onset
/// activity (silence, a pure steady tone), or the autocorrelation carries no
/// peak in range.
pub fn estimate_bpm(samples: &[f64], sample_rate: u32) -> Option<f64> {
    if sample_rate == 0 || samples.len() < FRAME_SIZE * 4 {
        return None;
    }

    // Frame energies (mean square per hop-spaced frame)
    let energies: Vec<f64> = samples
        .windows(FRAME_SIZE)
        .step_by(HOP_SIZE)
        .map(|frame| frame.iter().map(|s| s * s).sum::<f64>() / FRAME_SIZE as f64)
        .collect();
    if energies.len() < 8 {
        return None;
    }

    // Half-wave rectified energy flux, zero-meaned for autocorrelation
    let mut flux: Vec<f64> = energies
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();
    let mean = flux.iter().sum::<f64>() / flux.len() as f64;
    if mean <= 0.0 {
        return None;
    }
    for f in &mut flux {
        *f -= mean;
    }

    let frame_rate = sample_rate as f64 / HOP_SIZE as f64;
    let min_lag = ((60.0 * frame_rate / MAX_BPM).floor() as usize).max(1);
    let max_lag = ((60.0 * frame_rate / MIN_BPM).ceil() as usize).min(flux.len() - 1);
    if min_lag >= max_lag {
        return None;
    }

    let mut best_lag = 0usize;
    let mut best_score = 0.0_f64;
    for lag in min_lag..=max_lag {
        let score: f64 = flux[lag..]
            .iter()
            .zip(flux.iter())
            .map(|(a, b)| a * b)
            .sum();
        if score > best_score {
            best_score = score;
            best_lag = lag;
        }
    }

    if best_lag == 0 || best_score <= 0.0 {
        return None;
    }
    Some(60.0 * frame_rate / best_lag as f64)
}
