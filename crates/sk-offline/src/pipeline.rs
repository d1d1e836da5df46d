//! Stem alignment pipeline
//!
//! End-to-end pass: load stems, sum them, estimate the time shift against
//! the master, plan per-stem gains from one master measurement, render each
//! adjusted stem, then re-sum the rendered files into a final mix.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;

use sk_file::{write_wav, AudioData};

use crate::align::find_shift;
use crate::config::AlignConfig;
use crate::error::{OfflineError, Result};
use crate::gain::{analyze, GainPlan, LoudnessReading};
use crate::loader::{sum_directory, StemSet};
use crate::render::render_stem;

/// Per-stem outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct StemReport {
    pub name: String,
    pub gain_db: f64,
    pub lufs: f64,
    pub rms: f64,
    pub output: PathBuf,
}

/// Summary of one pipeline run
#[derive(Debug, Serialize)]
pub struct AlignReport {
    pub shift_samples: i64,
    pub master: LoudnessReading,
    pub stems: Vec<StemReport>,
    pub mix_path: PathBuf,
    pub elapsed_ms: u64,
}

/// Offline stem alignment and gain matching
pub struct AlignPipeline {
    config: AlignConfig,
}

impl AlignPipeline {
    pub fn new(config: AlignConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Run the whole pass. Synchronous and single-threaded.
    pub fn run(&self) -> Result<AlignReport> {
        let started = Instant::now();
        let config = &self.config;

        let stems = StemSet::load(&config.stems_dir, &config.extensions)?;
        log::info!(
            "loaded {} stems from {} at {} Hz",
            stems.len(),
            config.stems_dir.display(),
            stems.sample_rate
        );
        let composite = stems.composite();

        // The master is measured as stored; only mono coercion is applied.
        // Clipping it would skew the gain deltas for float masters that
        // exceed full scale.
        let mut master = AudioData::load(&config.master_path)?;
        master.coerce_stereo();

        if master.sample_rate != stems.sample_rate {
            return Err(OfflineError::SampleRateMismatch {
                left: stems.sample_rate,
                right: master.sample_rate,
            });
        }

        let shift = find_shift(&composite, &master)?;
        log::info!("optimal time shift: {shift} samples");

        let master_reading = analyze(&master)?;
        log::info!(
            "master: {:.2} LUFS, RMS {:.4}",
            master_reading.lufs,
            master_reading.rms
        );

        let plan = GainPlan::compute(master_reading, &stems, config)?;

        std::fs::create_dir_all(&config.output_dir)?;

        let mut reports = Vec::with_capacity(stems.len());
        for stem in &stems.stems {
            // Every stem name came from GainPlan::compute over this same set
            let Some(gain) = plan.gains.get(&stem.name) else {
                continue;
            };
            let output = render_stem(stem, shift, gain.gain_db, config, &config.output_dir)?;
            reports.push(StemReport {
                name: stem.name.clone(),
                gain_db: gain.gain_db,
                lufs: gain.reading.lufs,
                rms: gain.reading.rms,
                output,
            });
        }

        // Re-sum from disk so the mix reflects the files as written; an
        // existing mix from an earlier run is not an input.
        let mix = sum_directory(
            &config.output_dir,
            &["wav".to_string()],
            &[config.mix_name.as_str()],
        )?;
        let mix_path = config.output_dir.join(&config.mix_name);
        write_wav(&mix_path, &mix, config.bit_depth)?;
        log::info!("wrote mix {}", mix_path.display());

        Ok(AlignReport {
            shift_samples: shift,
            master: master_reading,
            stems: reports,
            mix_path,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}
