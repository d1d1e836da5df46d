//! StemKit command line

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use sk_dsp::oversample_lowpass;
use sk_file::{write_wav, AudioData, BitDepth};
use sk_offline::{compare_files, AlignConfig, AlignPipeline, DownmixJob, ShiftPolicy};

#[derive(Parser)]
#[command(name = "stemkit", version, about = "Stem alignment and loudness tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(clap::Args, Default)]
struct AlignArgs {
    /// Directory of stem files
    #[arg(long)]
    stems: Option<PathBuf>,

    /// Master mix to align against
    #[arg(long)]
    master: Option<PathBuf>,

    /// Output directory for adjusted stems and the mix
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON configuration file (flags override its values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shift with zero padding instead of rotation
    #[arg(long)]
    zero_pad: bool,

    /// LUFS weight in the blended gain
    #[arg(long)]
    lufs_weight: Option<f64>,

    /// RMS weight in the blended gain
    #[arg(long)]
    rms_weight: Option<f64>,

    /// Lower gain clamp in dB
    #[arg(long)]
    gain_min: Option<f64>,

    /// Upper gain clamp in dB
    #[arg(long)]
    gain_max: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Align stems to a master mix and match their loudness (the default)
    Align(AlignArgs),

    /// Project a 22-channel file onto a 7.1.4 layout
    Downmix {
        input: PathBuf,
        output: PathBuf,
    },

    /// Compare two audio files by correlation and tempo
    Compare {
        a: PathBuf,
        b: PathBuf,
    },

    /// Oversample a signal, low-pass it, and decimate back
    FilterDemo {
        /// Oversampling factor
        #[arg(long, default_value_t = 4)]
        factor: usize,

        /// FIR tap count
        #[arg(long, default_value_t = 101)]
        taps: usize,

        /// Audio file to process instead of the built-in 1 kHz test tone
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory the input and output signals are written to
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json = cli.json;

    match cli.command.unwrap_or(Commands::Align(AlignArgs::default())) {
        Commands::Align(args) => run_align(args, json),
        Commands::Downmix { input, output } => run_downmix(input, output, json),
        Commands::Compare { a, b } => run_compare(a, b, json),
        Commands::FilterDemo {
            factor,
            taps,
            input,
            out,
        } => run_filter_demo(factor, taps, input, out),
    }
}

fn run_align(args: AlignArgs, json: bool) -> anyhow::Result<()> {
    let mut config = match args.config {
        Some(path) => AlignConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AlignConfig::default(),
    };
    if let Some(dir) = args.stems {
        config.stems_dir = dir;
    }
    if let Some(path) = args.master {
        config.master_path = path;
    }
    if let Some(dir) = args.out {
        config.output_dir = dir;
    }
    if args.zero_pad {
        config.shift_policy = ShiftPolicy::ZeroPad;
    }
    if let Some(w) = args.lufs_weight {
        config.lufs_weight = w;
    }
    if let Some(w) = args.rms_weight {
        config.rms_weight = w;
    }
    if let Some(db) = args.gain_min {
        config.gain_min_db = db;
    }
    if let Some(db) = args.gain_max {
        config.gain_max_db = db;
    }

    let report = AlignPipeline::new(config)?.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("shift: {} samples", report.shift_samples);
        println!(
            "master: {:.2} LUFS, RMS {:.4}",
            report.master.lufs, report.master.rms
        );
        for stem in &report.stems {
            println!(
                "  {:<20} {:+.2} dB ({:.2} LUFS) -> {}",
                stem.name,
                stem.gain_db,
                stem.lufs,
                stem.output.display()
            );
        }
        println!("mix: {}", report.mix_path.display());
        println!("done in {} ms", report.elapsed_ms);
    }
    Ok(())
}

fn run_downmix(input: PathBuf, output: PathBuf, json: bool) -> anyhow::Result<()> {
    let report = DownmixJob::new(input, output).run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} ({} ch) -> {} (12 ch, {} Hz, peak {:.4})",
            report.input.display(),
            report.source_channels,
            report.output.display(),
            report.sample_rate,
            report.peak
        );
    }
    Ok(())
}

fn run_compare(a: PathBuf, b: PathBuf, json: bool) -> anyhow::Result<()> {
    let report = compare_files(&a, &b)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("correlation: {:.4}", report.correlation);
        print_tempo(&a, &report.tempo_a);
        print_tempo(&b, &report.tempo_b);
    }
    Ok(())
}

fn print_tempo(path: &std::path::Path, tempos: &[Option<f64>]) {
    for (ch, tempo) in tempos.iter().enumerate() {
        match tempo {
            Some(bpm) => println!("{} ch {ch}: {bpm:.1} BPM", path.display()),
            None => println!("{} ch {ch}: no stable tempo", path.display()),
        }
    }
}

fn run_filter_demo(
    factor: usize,
    taps: usize,
    input: Option<PathBuf>,
    out: PathBuf,
) -> anyhow::Result<()> {
    const RATE: u32 = 8000;
    const FREQ: f64 = 1000.0;

    if factor == 0 {
        anyhow::bail!("oversampling factor must be at least 1");
    }
    if taps == 0 {
        anyhow::bail!("tap count must be at least 1");
    }

    let (signal, rate) = match input {
        Some(path) => {
            let audio = AudioData::load(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            (audio.to_mono(), audio.sample_rate)
        }
        None => {
            let tone: Vec<f64> = (0..2 * RATE as usize)
                .map(|i| {
                    0.5 * (2.0 * std::f64::consts::PI * FREQ * i as f64 / RATE as f64).sin()
                })
                .collect();
            (tone, RATE)
        }
    };

    let filtered = oversample_lowpass(&signal, factor, taps, rate as f64);

    let in_path = out.join("sine_in.wav");
    let out_path = out.join("sine_out.wav");
    write_wav(&in_path, &AudioData::new(vec![signal], rate), BitDepth::Float32)?;
    write_wav(
        &out_path,
        &AudioData::new(vec![filtered], rate),
        BitDepth::Float32,
    )?;

    println!(
        "oversampled x{factor}, {taps}-tap low-pass: {} and {}",
        in_path.display(),
        out_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_demo_rejects_zero_factor() {
        let err = run_filter_demo(0, 101, None, PathBuf::from("unused")).unwrap_err();
        assert!(err.to_string().contains("factor"));
    }

    #[test]
    fn filter_demo_rejects_zero_taps() {
        let err = run_filter_demo(4, 0, None, PathBuf::from("unused")).unwrap_err();
        assert!(err.to_string().contains("tap"));
    }
}
