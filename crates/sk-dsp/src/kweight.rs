//! Biquad filtering and the ITU-R BS.1770-4 K-weighting prefilter
//!
//! The K-weighting curve is two cascaded biquad stages: a high shelf
//! (+4 dB around 1.5 kHz, modelling head diffraction) followed by a
//! high-pass (revised low-frequency B-curve, ~38 Hz). Coefficients are the
//! published constants at 48 kHz and 44.1 kHz and are designed analytically
//! at any other rate.

use std::f64::consts::PI;

/// Normalized biquad coefficients (a0 folded in)
#[derive(Debug, Clone, Copy, Default)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// High shelf stage of the K-weighting prefilter
    pub fn k_shelf(sample_rate: f64) -> Self {
        if (sample_rate - 48000.0).abs() < 1.0 {
            return Self {
                b0: 1.53512485958697,
                b1: -2.69169618940638,
                b2: 1.19839281085285,
                a1: -1.69065929318241,
                a2: 0.73248077421585,
            };
        }
        if (sample_rate - 44100.0).abs() < 1.0 {
            return Self {
                b0: 1.53091690990424,
                b1: -2.65253388989405,
                b2: 1.16950037399656,
                a1: -1.66360936109397,
                a2: 0.71250596184082,
            };
        }

        // Analytic design for other rates (BS.1770-4 shelf parameters)
        let gain_db = 3.999843853973347;
        let f0 = 1681.974450955533;
        let q = 0.7071752369554196;

        let k = (PI * f0 / sample_rate).tan();
        let vh = 10.0_f64.powf(gain_db / 20.0);
        let vb = vh.powf(0.4996667741545416);
        let norm = 1.0 / (1.0 + k / q + k * k);

        Self {
            b0: (vh + vb * k / q + k * k) * norm,
            b1: 2.0 * (k * k - vh) * norm,
            b2: (vh - vb * k / q + k * k) * norm,
            a1: 2.0 * (k * k - 1.0) * norm,
            a2: (1.0 - k / q + k * k) * norm,
        }
    }

    /// High-pass stage of the K-weighting prefilter
    pub fn k_highpass(sample_rate: f64) -> Self {
        if (sample_rate - 48000.0).abs() < 1.0 {
            return Self {
                b0: 1.0,
                b1: -2.0,
                b2: 1.0,
                a1: -1.99004745483398,
                a2: 0.99007225036621,
            };
        }

        let f0 = 38.13547087602444;
        let q = 0.5003270373238773;

        let k = (PI * f0 / sample_rate).tan();
        let norm = 1.0 / (1.0 + k / q + k * k);

        Self {
            b0: norm,
            b1: -2.0 * norm,
            b2: norm,
            a1: 2.0 * (k * k - 1.0) * norm,
            a2: (1.0 - k / q + k * k) * norm,
        }
    }
}

/// Biquad filter, Transposed Direct Form II
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    z1: f64,
    z2: f64,
}

impl Biquad {
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            z1: 0.0,
            z2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let c = &self.coeffs;
        let output = c.b0 * input + self.z1;
        self.z1 = c.b1 * input - c.a1 * output + self.z2;
        self.z2 = c.b2 * input - c.a2 * output;
        output
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Two-stage K-weighting prefilter for one channel
#[derive(Debug, Clone)]
pub struct KWeighting {
    shelf: Biquad,
    highpass: Biquad,
}

impl KWeighting {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            shelf: Biquad::new(BiquadCoeffs::k_shelf(sample_rate)),
            highpass: Biquad::new(BiquadCoeffs::k_highpass(sample_rate)),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        self.highpass.process(self.shelf.process(input))
    }

    pub fn reset(&mut self) {
        self.shelf.reset();
        self.highpass.reset();
    }
}
