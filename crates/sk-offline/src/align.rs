//! Time-shift estimation
//!
//! Cross-correlates each channel of a signal against the reference and
//! averages the per-channel lags into a single shift for the whole stem sum.

use sk_dsp::best_lag;
use sk_file::AudioData;

use crate::error::{OfflineError, Result};

/// Estimate how many samples `signal` lags `reference`.
///
/// A positive result means `signal` starts later than `reference`; rotating
/// it left by that amount lines the two up. The per-channel lags are
/// averaged and rounded to the nearest sample.
pub fn find_shift(signal: &AudioData, reference: &AudioData) -> Result<i64> {
    if signal.sample_rate != reference.sample_rate {
        return Err(OfflineError::SampleRateMismatch {
            left: signal.sample_rate,
            right: reference.sample_rate,
        });
    }
    if signal.num_channels() != reference.num_channels() {
        return Err(OfflineError::ChannelMismatch {
            expected: reference.num_channels(),
            actual: signal.num_channels(),
        });
    }

    let mut total = 0.0;
    for (sig, refr) in signal.channels.iter().zip(reference.channels.iter()) {
        let lag = best_lag(sig, refr);
        log::debug!("channel lag: {lag} samples");
        total += lag as f64;
    }

    let shift = (total / signal.num_channels() as f64).round() as i64;
    Ok(shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(len: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let bits = state.wrapping_mul(0x2545F4914F6CDD1D) >> 11;
                bits as f64 / (1u64 << 53) as f64 - 0.5
            })
            .collect()
    }

    #[test]
    fn test_recovers_known_delay() {
        let reference = noise(4096, 7);
        let delay = 250usize;
        let mut delayed = vec![0.0; 4096];
        delayed[delay..].copy_from_slice(&reference[..4096 - delay]);

        let refr = AudioData::new(vec![reference.clone(), reference], 48000);
        let sig = AudioData::new(vec![delayed.clone(), delayed], 48000);

        assert_eq!(find_shift(&sig, &refr).unwrap(), delay as i64);
    }

    #[test]
    fn test_zero_shift_for_identical_signals() {
        let ch = noise(2048, 99);
        let a = AudioData::new(vec![ch.clone()], 44100);
        let b = AudioData::new(vec![ch], 44100);
        assert_eq!(find_shift(&a, &b).unwrap(), 0);
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let a = AudioData::new(vec![noise(512, 1)], 48000);
        let b = AudioData::new(vec![noise(512, 2), noise(512, 3)], 48000);
        let err = find_shift(&a, &b).unwrap_err();
        assert!(matches!(err, OfflineError::ChannelMismatch { .. }));
    }

    #[test]
    fn test_sample_rate_mismatch_rejected() {
        let a = AudioData::new(vec![noise(512, 1)], 48000);
        let b = AudioData::new(vec![noise(512, 2)], 44100);
        let err = find_shift(&a, &b).unwrap_err();
        assert!(matches!(err, OfflineError::SampleRateMismatch { .. }));
    }
}
