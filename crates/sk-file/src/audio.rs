//! Planar audio buffer

use std::path::Path;

use crate::decode;
use crate::Result;

/// Audio held as one `f64` vector per channel plus a sample rate.
///
/// All channels are kept at equal length; the constructors and mutators
/// preserve that.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Sample data per channel, each in [-1, 1] once clipped
    pub channels: Vec<Vec<f64>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioData {
    pub fn new(channels: Vec<Vec<f64>>, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
        }
    }

    /// Build from an interleaved sample buffer
    pub fn from_interleaved(samples: &[f64], num_channels: usize, sample_rate: u32) -> Self {
        let frames = if num_channels == 0 {
            0
        } else {
            samples.len() / num_channels
        };
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for (i, &sample) in samples.iter().enumerate() {
            channels[i % num_channels].push(sample);
        }
        Self {
            channels,
            sample_rate,
        }
    }

    /// Decode a file (format chosen by extension/probe)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        decode::decode(path.as_ref())
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Frames per channel (channels are equal length)
    pub fn frames(&self) -> usize {
        self.channels.iter().map(|c| c.len()).min().unwrap_or(0)
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }

    /// Mono mixdown (channel mean)
    pub fn to_mono(&self) -> Vec<f64> {
        let frames = self.frames();
        let n = self.channels.len();
        if n == 0 || frames == 0 {
            return Vec::new();
        }
        if n == 1 {
            return self.channels[0].clone();
        }

        let mut mono = vec![0.0; frames];
        for channel in &self.channels {
            for (m, &s) in mono.iter_mut().zip(channel.iter()) {
                *m += s;
            }
        }
        for m in &mut mono {
            *m /= n as f64;
        }
        mono
    }

    /// Duplicate a mono buffer into two identical channels. Buffers that are
    /// already multichannel are left alone.
    pub fn coerce_stereo(&mut self) {
        if self.channels.len() == 1 {
            let copy = self.channels[0].clone();
            self.channels.push(copy);
        }
    }

    /// Clip every sample to [-1, 1]
    pub fn clip(&mut self) {
        for channel in &mut self.channels {
            for sample in channel.iter_mut() {
                *sample = sample.clamp(-1.0, 1.0);
            }
        }
    }

    /// Truncate every channel to `frames`
    pub fn truncate(&mut self, frames: usize) {
        for channel in &mut self.channels {
            channel.truncate(frames);
        }
    }

    /// Sample-wise addition of another buffer (over the common frame count)
    pub fn add(&mut self, other: &AudioData) {
        for (dst, src) in self.channels.iter_mut().zip(other.channels.iter()) {
            for (d, &s) in dst.iter_mut().zip(src.iter()) {
                *d += s;
            }
        }
    }

    /// Interleave channels into one buffer
    pub fn interleaved(&self) -> Vec<f64> {
        let frames = self.frames();
        let n = self.channels.len();
        let mut out = Vec::with_capacity(frames * n);
        for frame in 0..frames {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }

    /// Peak absolute sample across all channels
    pub fn peak(&self) -> f64 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .map(|s| s.abs())
            .fold(0.0, f64::max)
    }

    /// Scale every sample by a linear gain factor
    pub fn apply_gain(&mut self, gain: f64) {
        for channel in &mut self.channels {
            for sample in channel.iter_mut() {
                *sample *= gain;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_interleaved() {
        let audio = AudioData::from_interleaved(&[0.1, 0.2, 0.3, 0.4], 2, 48000);
        assert_eq!(audio.channels[0], vec![0.1, 0.3]);
        assert_eq!(audio.channels[1], vec![0.2, 0.4]);
        assert_eq!(audio.frames(), 2);
    }

    #[test]
    fn test_interleave_round_trip() {
        let audio = AudioData::from_interleaved(&[0.5, -0.5, 0.25, -0.25], 2, 44100);
        assert_eq!(audio.interleaved(), vec![0.5, -0.5, 0.25, -0.25]);
    }

    #[test]
    fn test_to_mono_averages() {
        let audio = AudioData::new(vec![vec![0.5, -0.5], vec![0.3, -0.3]], 48000);
        let mono = audio.to_mono();
        assert!((mono[0] - 0.4).abs() < 1e-12);
        assert!((mono[1] + 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_coerce_stereo_duplicates_mono() {
        let mut audio = AudioData::new(vec![vec![0.5, 0.25]], 48000);
        audio.coerce_stereo();
        assert_eq!(audio.num_channels(), 2);
        assert_eq!(audio.channels[0], audio.channels[1]);

        // Already-stereo audio is untouched
        audio.coerce_stereo();
        assert_eq!(audio.num_channels(), 2);
    }

    #[test]
    fn test_clip() {
        let mut audio = AudioData::new(vec![vec![1.5, -2.0, 0.3]], 48000);
        audio.clip();
        assert_eq!(audio.channels[0], vec![1.0, -1.0, 0.3]);
    }

    #[test]
    fn test_add_and_gain() {
        let mut a = AudioData::new(vec![vec![0.1, 0.2]], 48000);
        let b = AudioData::new(vec![vec![0.3, 0.4]], 48000);
        a.add(&b);
        a.apply_gain(0.5);
        assert!((a.channels[0][0] - 0.2).abs() < 1e-12);
        assert!((a.channels[0][1] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_duration() {
        let audio = AudioData::new(vec![vec![0.0; 24000]], 48000);
        assert!((audio.duration() - 0.5).abs() < 1e-12);
    }
}
