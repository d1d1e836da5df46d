//! Stem loading and summation

use std::path::Path;

use sk_file::{scan_audio_dir, AudioData};

use crate::error::{OfflineError, Result};

/// One loaded stem: file stem name plus its audio
#[derive(Debug, Clone)]
pub struct Stem {
    pub name: String,
    pub data: AudioData,
}

/// A directory of stems loaded into memory at a common sample rate.
///
/// Loading coerces mono stems to stereo and clips every sample to [-1, 1],
/// so downstream measurement sees exactly what summation will use.
#[derive(Debug)]
pub struct StemSet {
    pub stems: Vec<Stem>,
    pub sample_rate: u32,
}

impl StemSet {
    /// Load every recognized audio file in `dir`, in lexicographic order
    pub fn load(dir: &Path, extensions: &[String]) -> Result<Self> {
        let paths = scan_audio_dir(dir, extensions)?;
        Self::from_paths(&paths)
    }

    fn from_paths(paths: &[std::path::PathBuf]) -> Result<Self> {
        let mut stems = Vec::with_capacity(paths.len());
        let mut sample_rate = None;

        for path in paths {
            let mut data = AudioData::load(path)?;
            data.coerce_stereo();
            data.clip();

            match sample_rate {
                None => sample_rate = Some(data.sample_rate),
                Some(rate) if rate != data.sample_rate => {
                    return Err(OfflineError::SampleRateMismatch {
                        left: rate,
                        right: data.sample_rate,
                    });
                }
                Some(_) => {}
            }

            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("stem")
                .to_string();

            log::debug!(
                "loaded stem '{name}' ({} ch, {} frames)",
                data.num_channels(),
                data.frames()
            );
            stems.push(Stem { name, data });
        }

        // scan_audio_dir guarantees at least one file
        let sample_rate = sample_rate.unwrap_or(0);
        Ok(Self { stems, sample_rate })
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// Sum all stems into one buffer: truncate to the shortest stem, add
    /// sample-wise, clip the result.
    pub fn composite(&self) -> AudioData {
        let min_frames = self
            .stems
            .iter()
            .map(|s| s.data.frames())
            .min()
            .unwrap_or(0);
        let channels = self
            .stems
            .iter()
            .map(|s| s.data.num_channels())
            .max()
            .unwrap_or(0);

        let mut sum = AudioData::new(vec![vec![0.0; min_frames]; channels], self.sample_rate);
        for stem in &self.stems {
            let mut data = stem.data.clone();
            data.truncate(min_frames);
            sum.add(&data);
        }
        sum.clip();
        sum
    }
}

/// Load and sum every matching file in a directory, ignoring files named in
/// `skip_names`. Used to re-sum rendered stems from disk so the final mix
/// reflects what was actually written; a mix left by a previous run must not
/// fold into the new one.
pub fn sum_directory(
    dir: &Path,
    extensions: &[String],
    skip_names: &[&str],
) -> Result<AudioData> {
    let paths: Vec<_> = scan_audio_dir(dir, extensions)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_none_or(|name| !skip_names.contains(&name))
        })
        .collect();
    if paths.is_empty() {
        return Err(sk_file::FileError::NoAudioFiles(dir.to_path_buf()).into());
    }
    let set = StemSet::from_paths(&paths)?;
    Ok(set.composite())
}
