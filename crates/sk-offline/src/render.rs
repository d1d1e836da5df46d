//! Adjusted-stem rendering

use std::path::{Path, PathBuf};

use sk_dsp::{circular_shift, db_to_linear, zero_padded_shift};
use sk_file::{write_wav, AudioData};

use crate::config::{AlignConfig, ShiftPolicy};
use crate::error::Result;
use crate::loader::Stem;

/// Shift, gain, pad with headroom, clip, and write one stem.
///
/// Returns the path the adjusted stem was written to.
pub fn render_stem(
    stem: &Stem,
    shift: i64,
    gain_db: f64,
    config: &AlignConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let mut data = stem.data.clone();

    if shift != 0 {
        for channel in &mut data.channels {
            match config.shift_policy {
                ShiftPolicy::Circular => circular_shift(channel, shift),
                ShiftPolicy::ZeroPad => zero_padded_shift(channel, shift),
            }
        }
    }

    let gain = db_to_linear(gain_db) * config.headroom;
    data.apply_gain(gain);
    data.clip();

    let file_name = format!("{}{}.wav", stem.name, config.adjusted_suffix);
    let path = out_dir.join(file_name);
    write_wav(&path, &data, config.bit_depth)?;

    log::info!(
        "rendered '{}' with {gain_db:+.2} dB (shift {shift}) -> {}",
        stem.name,
        path.display()
    );
    Ok(path)
}
