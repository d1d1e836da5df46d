//! End-to-end pipeline tests over synthesized fixtures.

use std::path::Path;

use sk_file::{write_wav, AudioData, BitDepth};
use sk_offline::{AlignConfig, AlignPipeline, OfflineError};
use tempfile::tempdir;

const RATE: u32 = 48000;

fn noise(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let bits = state.wrapping_mul(0x2545F4914F6CDD1D) >> 11;
            bits as f64 / (1u64 << 53) as f64 - 0.5
        })
        .collect()
}

fn write_stereo(path: &Path, channel: &[f64]) {
    let audio = AudioData::new(vec![channel.to_vec(), channel.to_vec()], RATE);
    write_wav(path, &audio, BitDepth::Float32).unwrap();
}

fn delayed(signal: &[f64], delay: usize) -> Vec<f64> {
    let mut out = vec![0.0; signal.len()];
    out[delay..].copy_from_slice(&signal[..signal.len() - delay]);
    out
}

/// Two noise stems, each delayed 500 samples relative to the master built
/// from their undelayed sum. The pipeline should recover the delay, apply
/// near-zero gains, and write one adjusted file per stem plus a mix.
#[test]
fn recovers_shift_and_matches_gain() {
    let dir = tempdir().unwrap();
    let stems_dir = dir.path().join("stems");
    let out_dir = dir.path().join("adjusted");
    let master_path = dir.path().join("master.wav");

    let len = 2 * RATE as usize;
    let delay = 500usize;

    let a: Vec<f64> = noise(len, 11).iter().map(|s| s * 0.3).collect();
    let b: Vec<f64> = noise(len, 42).iter().map(|s| s * 0.3).collect();

    // Master is the undelayed sum scaled by 1/sqrt(2), which puts its
    // loudness at each stem's level so the gains stay near zero.
    let master: Vec<f64> = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x + y) * std::f64::consts::FRAC_1_SQRT_2)
        .collect();
    write_stereo(&master_path, &master);

    write_stereo(&stems_dir.join("a.wav"), &delayed(&a, delay));
    write_stereo(&stems_dir.join("b.wav"), &delayed(&b, delay));

    let config = AlignConfig::default()
        .with_stems_dir(&stems_dir)
        .with_master_path(&master_path)
        .with_output_dir(&out_dir);

    let report = AlignPipeline::new(config).unwrap().run().unwrap();

    assert_eq!(report.shift_samples, delay as i64);
    assert_eq!(report.stems.len(), 2);

    // Two adjusted stems plus the mix
    let written: Vec<_> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(written.len(), 3);
    assert!(written.iter().any(|n| n == "a_Adj.wav"));
    assert!(written.iter().any(|n| n == "b_Adj.wav"));
    assert!(written.iter().any(|n| n == "summed_stems_adjusted.wav"));

    for stem in &report.stems {
        assert!(
            stem.gain_db.abs() < 0.2,
            "expected near-zero gain, got {}",
            stem.gain_db
        );
        let rendered = AudioData::load(&stem.output).unwrap();
        assert!(rendered.peak() <= 1.0);
    }

    let mix = AudioData::load(&report.mix_path).unwrap();
    assert_eq!(mix.sample_rate, RATE);
    assert!(mix.peak() <= 1.0);
}

/// Equal-loudness stems against an equally loud master get gains near zero.
#[test]
fn equal_loudness_yields_near_zero_gain() {
    let dir = tempdir().unwrap();
    let stems_dir = dir.path().join("stems");
    let master_path = dir.path().join("master.wav");

    let len = 2 * RATE as usize;
    let tone: Vec<f64> = noise(len, 5).iter().map(|s| s * 0.4).collect();

    write_stereo(&master_path, &tone);
    write_stereo(&stems_dir.join("only.wav"), &tone);

    let config = AlignConfig::default()
        .with_stems_dir(&stems_dir)
        .with_master_path(&master_path)
        .with_output_dir(dir.path().join("out"));

    let report = AlignPipeline::new(config).unwrap().run().unwrap();
    assert_eq!(report.shift_samples, 0);
    assert!(report.stems[0].gain_db.abs() < 0.05);
}

/// A silent stem is rendered rather than rejected, with its gain clamped.
#[test]
fn silent_stem_is_rendered() {
    let dir = tempdir().unwrap();
    let stems_dir = dir.path().join("stems");
    let master_path = dir.path().join("master.wav");

    let len = RATE as usize;
    let tone: Vec<f64> = noise(len, 3).iter().map(|s| s * 0.4).collect();

    write_stereo(&master_path, &tone);
    write_stereo(&stems_dir.join("live.wav"), &tone);
    write_stereo(&stems_dir.join("mute.wav"), &vec![0.0; len]);

    let config = AlignConfig::default()
        .with_stems_dir(&stems_dir)
        .with_master_path(&master_path)
        .with_output_dir(dir.path().join("out"));

    let report = AlignPipeline::new(config).unwrap().run().unwrap();
    assert_eq!(report.stems.len(), 2);
    let mute = report.stems.iter().find(|s| s.name == "mute").unwrap();
    assert!(mute.gain_db >= -6.0 && mute.gain_db <= 3.0);
    assert!(mute.output.exists());
}

/// A float master above full scale is measured as stored, not clipped down:
/// a master at exactly 1.2x the stem's level yields a ~1.58 dB gain. Clipping
/// the master first would flatten its crests and pull the delta under 1.3 dB.
#[test]
fn hot_master_is_measured_unclipped() {
    let dir = tempdir().unwrap();
    let stems_dir = dir.path().join("stems");
    let master_path = dir.path().join("master.wav");

    let len = 2 * RATE as usize;
    let base = noise(len, 21);
    let stem: Vec<f64> = base.iter().map(|s| s * 2.0).collect(); // peaks at 1.0
    let master: Vec<f64> = base.iter().map(|s| s * 2.4).collect(); // peaks at 1.2

    write_stereo(&stems_dir.join("full.wav"), &stem);
    write_stereo(&master_path, &master);

    let config = AlignConfig::default()
        .with_stems_dir(&stems_dir)
        .with_master_path(&master_path)
        .with_output_dir(dir.path().join("out"));

    let report = AlignPipeline::new(config).unwrap().run().unwrap();
    let gain = report.stems[0].gain_db;
    let expected = 20.0 * 1.2_f64.log10();
    assert!((gain - expected).abs() < 0.15, "gain {gain}");
}

/// Re-running into the same output directory must not fold the previous
/// run's mix back into the new one.
#[test]
fn rerun_into_same_output_is_stable() {
    let dir = tempdir().unwrap();
    let stems_dir = dir.path().join("stems");
    let master_path = dir.path().join("master.wav");
    let out_dir = dir.path().join("out");

    let len = RATE as usize;
    let tone: Vec<f64> = noise(len, 17).iter().map(|s| s * 0.4).collect();
    write_stereo(&master_path, &tone);
    write_stereo(&stems_dir.join("a.wav"), &tone);

    let config = AlignConfig::default()
        .with_stems_dir(&stems_dir)
        .with_master_path(&master_path)
        .with_output_dir(&out_dir);

    let first = AlignPipeline::new(config.clone()).unwrap().run().unwrap();
    let first_mix = AudioData::load(&first.mix_path).unwrap();

    let second = AlignPipeline::new(config).unwrap().run().unwrap();
    let second_mix = AudioData::load(&second.mix_path).unwrap();

    assert_eq!(first_mix.frames(), second_mix.frames());
    assert_eq!(first_mix.channels, second_mix.channels);
}

/// Stems at one rate and a master at another fail fast.
#[test]
fn sample_rate_mismatch_fails() {
    let dir = tempdir().unwrap();
    let stems_dir = dir.path().join("stems");
    let master_path = dir.path().join("master.wav");

    let tone: Vec<f64> = noise(RATE as usize, 8).iter().map(|s| s * 0.4).collect();
    write_stereo(&stems_dir.join("a.wav"), &tone);

    let master = AudioData::new(vec![tone.clone(), tone], 44100);
    write_wav(&master_path, &master, BitDepth::Float32).unwrap();

    let config = AlignConfig::default()
        .with_stems_dir(&stems_dir)
        .with_master_path(&master_path)
        .with_output_dir(dir.path().join("out"));

    let err = AlignPipeline::new(config).unwrap().run().unwrap_err();
    assert!(matches!(err, OfflineError::SampleRateMismatch { .. }));
}
