//! sk-dsp: DSP primitives for StemKit
//!
//! Pure signal processing, no file I/O. Everything here operates on plain
//! `f64` sample buffers (planar per channel unless noted otherwise).
//!
//! ## Modules
//! - `level` - dB/linear conversion, peak, RMS, clipping
//! - `kweight` - TDF-II biquad and the BS.1770-4 K-weighting prefilter
//! - `loudness` - gated integrated loudness (LUFS) measurement
//! - `correlate` - FFT cross-correlation, lag search, Pearson correlation
//! - `shift` - circular and zero-padded sample shifting
//! - `fir` - windowed-sinc low-pass design, oversampling helpers
//! - `tempo` - onset-flux tempo estimation

pub mod correlate;
pub mod fir;
pub mod kweight;
pub mod level;
pub mod loudness;
pub mod shift;
pub mod tempo;

pub use correlate::{best_lag, cross_correlate, pearson};
pub use fir::{lowpass_hamming, oversample_lowpass};
pub use kweight::{Biquad, BiquadCoeffs, KWeighting};
pub use level::{clip_in_place, db_to_linear, linear_to_db, peak, rms};
pub use loudness::{integrated_loudness, MeterError};
pub use shift::{circular_shift, zero_padded_shift};
pub use tempo::estimate_bpm;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
