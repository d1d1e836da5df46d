//! Alignment pipeline configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use sk_file::BitDepth;

use crate::error::{OfflineError, Result};

/// How a stem is moved in time to line up with the master
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftPolicy {
    /// Rotate the buffer; samples pushed off the front reappear at the end
    Circular,
    /// Shift and pad with silence; shifted-out samples are discarded
    ZeroPad,
}

impl Default for ShiftPolicy {
    fn default() -> Self {
        Self::Circular
    }
}

/// Configuration for the stem alignment pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Directory holding the individual stems
    pub stems_dir: PathBuf,
    /// Master mix the stems are aligned and gain-matched against
    pub master_path: PathBuf,
    /// Where adjusted stems and the final mix are written
    pub output_dir: PathBuf,
    /// File extensions (case-insensitive) recognized as stems
    pub extensions: Vec<String>,
    /// Weight of the LUFS delta in the blended gain
    pub lufs_weight: f64,
    /// Weight of the RMS delta in the blended gain
    pub rms_weight: f64,
    /// Lower clamp for per-stem gain, in dB
    pub gain_min_db: f64,
    /// Upper clamp for per-stem gain, in dB
    pub gain_max_db: f64,
    /// Added to RMS denominators to keep silent stems finite
    pub silence_epsilon: f64,
    /// Linear headroom factor applied after gain (-3 dB by default)
    pub headroom: f64,
    /// Time-shift behavior
    pub shift_policy: ShiftPolicy,
    /// Suffix appended to adjusted stem file names
    pub adjusted_suffix: String,
    /// File name of the re-summed mix written into the output directory
    pub mix_name: String,
    /// Sample format for rendered output
    pub bit_depth: BitDepth,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            stems_dir: PathBuf::from("audio/stems"),
            master_path: PathBuf::from("audio/master.wav"),
            output_dir: PathBuf::from("audio/adjusted"),
            extensions: vec!["wav".to_string(), "flac".to_string(), "mp3".to_string()],
            lufs_weight: 0.7,
            rms_weight: 0.3,
            gain_min_db: -6.0,
            gain_max_db: 3.0,
            silence_epsilon: 1e-6,
            headroom: 0.707,
            shift_policy: ShiftPolicy::default(),
            adjusted_suffix: "_Adj".to_string(),
            mix_name: "summed_stems_adjusted.wav".to_string(),
            bit_depth: BitDepth::Pcm24,
        }
    }
}

impl AlignConfig {
    pub fn with_stems_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.stems_dir = dir.into();
        self
    }

    pub fn with_master_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.master_path = path.into();
        self
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_shift_policy(mut self, policy: ShiftPolicy) -> Self {
        self.shift_policy = policy;
        self
    }

    pub fn with_bit_depth(mut self, depth: BitDepth) -> Self {
        self.bit_depth = depth;
        self
    }

    /// Load from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| OfflineError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(OfflineError::InvalidConfig(
                "extensions list is empty".to_string(),
            ));
        }
        if self.gain_min_db > self.gain_max_db {
            return Err(OfflineError::InvalidConfig(format!(
                "gain_min_db ({}) exceeds gain_max_db ({})",
                self.gain_min_db, self.gain_max_db
            )));
        }
        if !(self.lufs_weight.is_finite() && self.rms_weight.is_finite()) {
            return Err(OfflineError::InvalidConfig(
                "gain weights must be finite".to_string(),
            ));
        }
        if self.headroom <= 0.0 || self.headroom > 1.0 {
            return Err(OfflineError::InvalidConfig(format!(
                "headroom must be in (0, 1], got {}",
                self.headroom
            )));
        }
        if self.silence_epsilon <= 0.0 {
            return Err(OfflineError::InvalidConfig(
                "silence_epsilon must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        AlignConfig::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_gain_bounds_rejected() {
        let mut config = AlignConfig::default();
        config.gain_min_db = 4.0;
        config.gain_max_db = -4.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let mut config = AlignConfig::default();
        config.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = AlignConfig::default()
            .with_stems_dir("in/stems")
            .with_shift_policy(ShiftPolicy::ZeroPad);
        let json = serde_json::to_string(&config).unwrap();
        let back: AlignConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stems_dir, PathBuf::from("in/stems"));
        assert_eq!(back.shift_policy, ShiftPolicy::ZeroPad);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let back: AlignConfig = serde_json::from_str(r#"{"lufs_weight": 0.5}"#).unwrap();
        assert!((back.lufs_weight - 0.5).abs() < 1e-12);
        assert!((back.rms_weight - 0.3).abs() < 1e-12);
        assert_eq!(back.mix_name, "summed_stems_adjusted.wav");
    }
}
