//! Cross-correlation and signal similarity
//!
//! Full-mode cross-correlation is computed as an FFT convolution with the
//! reversed reference (O(n log n) instead of naive O(n^2)), matching the
//! index convention where `corr[k]` pairs the signal against the reference
//! delayed by `k - (reference.len() - 1)` samples.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Full cross-correlation of `signal` against `reference`.
///
/// Output length is `signal.len() + reference.len() - 1`. Empty input gives
/// an empty result.
pub fn cross_correlate(signal: &[f64], reference: &[f64]) -> Vec<f64> {
    if signal.is_empty() || reference.is_empty() {
        return Vec::new();
    }

    let out_len = signal.len() + reference.len() - 1;
    let fft_len = out_len.next_power_of_two();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_len);
    let ifft = planner.plan_fft_inverse(fft_len);

    let mut a: Vec<Complex<f64>> = signal
        .iter()
        .map(|&x| Complex::new(x, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(fft_len)
        .collect();

    // Correlation = convolution with the time-reversed reference
    let mut b: Vec<Complex<f64>> = reference
        .iter()
        .rev()
        .map(|&x| Complex::new(x, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(fft_len)
        .collect();

    fft.process(&mut a);
    fft.process(&mut b);

    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x *= *y;
    }

    ifft.process(&mut a);

    // rustfft does not normalize the inverse transform
    let scale = 1.0 / fft_len as f64;
    a.iter().take(out_len).map(|c| c.re * scale).collect()
}

/// Lag (in samples) at which `signal` best matches `reference`.
///
/// Positive means `signal` lags (is delayed relative to) the reference.
pub fn best_lag(signal: &[f64], reference: &[f64]) -> i64 {
    let corr = cross_correlate(signal, reference);
    if corr.is_empty() {
        return 0;
    }

    let mut best_idx = 0usize;
    let mut best_val = f64::NEG_INFINITY;
    for (i, &v) in corr.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = i;
        }
    }

    best_idx as i64 - (reference.len() as i64 - 1)
}

/// Pearson correlation coefficient between two equal-length prefixes.
///
/// Returns 1.0 when either signal has zero variance.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 1.0;
    }

    let mean_a: f64 = a[..len].iter().sum::<f64>() / len as f64;
    let mean_b: f64 = b[..len].iter().sum::<f64>() / len as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;

    for i in 0..len {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    // Summing a constant leaves roundoff-scale variance rather than an
    // exact zero, so the degenerate check needs a tolerance.
    let denom = (var_a * var_b).sqrt();
    if denom <= f64::EPSILON * len as f64 {
        return 1.0;
    }
    cov / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(seed: u64, len: usize, amplitude: f64) -> Vec<f64> {
        // xorshift64* keeps tests deterministic without an RNG dependency
        let mut state = seed.max(1);
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let unit = (state.wrapping_mul(0x2545F4914F6CDD1D) >> 11) as f64
                    / (1u64 << 53) as f64;
                amplitude * (2.0 * unit - 1.0)
            })
            .collect()
    }

    #[test]
    fn test_correlation_length() {
        let corr = cross_correlate(&[1.0, 0.0, 0.0], &[1.0, 0.0]);
        assert_eq!(corr.len(), 4);
    }

    #[test]
    fn test_impulse_lag() {
        // Signal is the reference delayed by 3 samples
        let reference = vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let mut signal = vec![0.0; 8];
        signal[3] = 1.0;
        assert_eq!(best_lag(&signal, &reference), 3);
    }

    #[test]
    fn test_negative_lag() {
        let mut reference = vec![0.0; 8];
        reference[5] = 1.0;
        let mut signal = vec![0.0; 8];
        signal[2] = 1.0;
        assert_eq!(best_lag(&signal, &reference), -3);
    }

    #[test]
    fn test_noise_lag_recovered_exactly() {
        let reference = noise(7, 4096, 0.5);
        let delay = 500usize;
        let mut signal = vec![0.0; reference.len()];
        signal[delay..].copy_from_slice(&reference[..reference.len() - delay]);
        assert_eq!(best_lag(&signal, &reference), delay as i64);
    }

    #[test]
    fn test_zero_lag_for_identical() {
        let reference = noise(11, 2048, 0.3);
        assert_eq!(best_lag(&reference, &reference), 0);
    }

    #[test]
    fn test_pearson_identical() {
        let a = vec![0.5, -0.3, 0.8, -0.2, 0.1];
        assert!((pearson(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_inverted() {
        let a = vec![1.0, 0.5, 0.0, -0.5, -1.0];
        let b: Vec<f64> = a.iter().map(|&s| -s).collect();
        assert!((pearson(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_constant_signal() {
        // 16 x 0.2 does not sum to an exact multiple, so the variance is a
        // roundoff residue rather than zero; still degenerate.
        let a = vec![0.2; 16];
        let b = noise(3, 16, 0.5);
        assert_eq!(pearson(&a, &b), 1.0);
        assert_eq!(pearson(&b, &a), 1.0);
        assert_eq!(pearson(&a, &[0.7; 16]), 1.0);
    }
}
