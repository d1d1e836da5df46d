//! sk-offline: batch audio jobs for StemKit
//!
//! The centerpiece is [`AlignPipeline`], which time-aligns a directory of
//! stems against a master mix and gain-matches each stem to the master's
//! loudness. Alongside it live a 22-channel to 7.1.4 downmix job and a
//! two-file similarity comparison.

pub mod align;
pub mod compare;
pub mod config;
pub mod downmix;
pub mod error;
pub mod gain;
pub mod loader;
pub mod pipeline;
pub mod render;

pub use align::find_shift;
pub use compare::{compare_files, SimilarityReport};
pub use config::{AlignConfig, ShiftPolicy};
pub use downmix::{DownmixJob, DownmixReport};
pub use error::{OfflineError, Result};
pub use gain::{analyze, GainPlan, LoudnessReading, StemGain};
pub use loader::{Stem, StemSet};
pub use pipeline::{AlignPipeline, AlignReport, StemReport};
