//! Linear-phase FIR filtering and integer-factor resampling helpers
//!
//! Windowed-sinc low-pass design (Hamming window, unity DC gain) plus the
//! zero-stuffing upsampler and decimator used by the oversampling demo:
//! upsample, anti-alias at the original Nyquist, decimate back.

use std::f64::consts::PI;

/// Design a low-pass FIR by the windowed-sinc method (Hamming window).
///
/// `cutoff_hz` is the -6 dB point. Coefficients are normalized to unity
/// gain at DC. Prefer an odd `num_taps` for a symmetric linear-phase filter.
pub fn lowpass_hamming(num_taps: usize, cutoff_hz: f64, sample_rate: f64) -> Vec<f64> {
    assert!(num_taps > 0, "filter needs at least one tap");
    assert!(
        cutoff_hz > 0.0 && cutoff_hz <= sample_rate / 2.0,
        "cutoff must lie in (0, Nyquist]"
    );

    let fc = cutoff_hz / sample_rate; // cycles per sample
    let center = (num_taps - 1) as f64 / 2.0;

    let mut coeffs: Vec<f64> = (0..num_taps)
        .map(|n| {
            let x = n as f64 - center;
            let sinc = if x.abs() < 1e-12 {
                2.0 * fc
            } else {
                (2.0 * PI * fc * x).sin() / (PI * x)
            };
            let window = 0.54 - 0.46 * (2.0 * PI * n as f64 / (num_taps - 1).max(1) as f64).cos();
            sinc * window
        })
        .collect();

    let sum: f64 = coeffs.iter().sum();
    if sum.abs() > 0.0 {
        for c in &mut coeffs {
            *c /= sum;
        }
    }
    coeffs
}

/// Apply an FIR filter (direct form, causal). Output length equals input.
pub fn filter(coeffs: &[f64], input: &[f64]) -> Vec<f64> {
    let mut output = vec![0.0; input.len()];
    for (i, out) in output.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (j, &c) in coeffs.iter().enumerate() {
            if j > i {
                break;
            }
            acc += c * input[i - j];
        }
        *out = acc;
    }
    output
}

/// Upsample by zero-stuffing: original samples every `factor` positions.
pub fn upsample(signal: &[f64], factor: usize) -> Vec<f64> {
    assert!(factor > 0, "factor must be positive");
    let mut out = vec![0.0; signal.len() * factor];
    for (i, &s) in signal.iter().enumerate() {
        out[i * factor] = s;
    }
    out
}

/// Downsample by keeping every `factor`-th sample.
pub fn downsample(signal: &[f64], factor: usize) -> Vec<f64> {
    assert!(factor > 0, "factor must be positive");
    signal.iter().step_by(factor).copied().collect()
}

/// Oversample, low-pass at the original Nyquist, and decimate back.
///
/// The anti-image filter gain is compensated by `factor` so the round trip
/// preserves passband amplitude.
pub fn oversample_lowpass(
    signal: &[f64],
    factor: usize,
    num_taps: usize,
    sample_rate: f64,
) -> Vec<f64> {
    let oversampled_rate = sample_rate * factor as f64;
    let cutoff = sample_rate / 2.0;

    let stuffed = upsample(signal, factor);
    let coeffs = lowpass_hamming(num_taps, cutoff, oversampled_rate);
    let mut filtered = filter(&coeffs, &stuffed);
    for s in &mut filtered {
        *s *= factor as f64;
    }
    downsample(&filtered, factor)
}
