//! Audio decoding
//!
//! WAV goes through hound (exact for 32-bit float), everything else through
//! symphonia's probe/decode loop. Integer sample widths are normalized to
//! [-1, 1].

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::audio::AudioData;
use crate::{FileError, Result};

/// Decode an audio file into a planar buffer
pub fn decode(path: &Path) -> Result<AudioData> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));

    if is_wav {
        decode_wav(path)
    } else {
        decode_symphonia(path)
    }
}

fn read_err(path: &Path, detail: impl ToString) -> FileError {
    FileError::Read {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

fn decode_wav(path: &Path) -> Result<AudioData> {
    let reader = hound::WavReader::open(path).map_err(|e| read_err(path, e))?;

    let spec = reader.spec();
    let num_channels = spec.channels as usize;
    let sample_rate = spec.sample_rate;

    let samples: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| read_err(path, e))?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| read_err(path, e))?
        }
    };

    log::debug!(
        "decoded {} ({} ch, {} Hz, {} frames)",
        path.display(),
        num_channels,
        sample_rate,
        samples.len() / num_channels.max(1)
    );

    Ok(AudioData::from_interleaved(
        &samples,
        num_channels,
        sample_rate,
    ))
}

fn decode_symphonia(path: &Path) -> Result<AudioData> {
    let file = File::open(path).map_err(|e| read_err(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| read_err(path, e))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| read_err(path, "no audio track found"))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params.sample_rate.unwrap_or(44100);
    let num_channels = codec_params.channels.map(|c| c.count()).unwrap_or(2);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| read_err(path, e))?;

    let mut channels: Vec<Vec<f64>> = vec![Vec::new(); num_channels];

    loop {
        match format.next_packet() {
            Ok(packet) => {
                if packet.track_id() != track_id {
                    continue;
                }
                match decoder.decode(&packet) {
                    Ok(decoded) => append_planar(&decoded, &mut channels)?,
                    // A corrupt packet is skippable; anything else is fatal
                    Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
                    Err(e) => return Err(read_err(path, e)),
                }
            }
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(read_err(path, e)),
        }
    }

    log::debug!(
        "decoded {} ({} ch, {} Hz, {} frames)",
        path.display(),
        num_channels,
        sample_rate,
        channels.first().map(|c| c.len()).unwrap_or(0)
    );

    Ok(AudioData::new(channels, sample_rate))
}

/// Push one decoded packet onto the planar output
fn append_planar(decoded: &AudioBufferRef, channels: &mut [Vec<f64>]) -> Result<()> {
    macro_rules! copy_planes {
        ($buf:expr, $convert:expr) => {{
            let planes = $buf.planes();
            for (ch, plane) in planes.planes().iter().enumerate().take(channels.len()) {
                channels[ch].extend(plane.iter().map($convert));
            }
        }};
    }

    match decoded {
        AudioBufferRef::F32(buf) => copy_planes!(buf, |&s: &f32| s as f64),
        AudioBufferRef::F64(buf) => copy_planes!(buf, |&s: &f64| s),
        AudioBufferRef::S16(buf) => copy_planes!(buf, |&s: &i16| s as f64 / 32768.0),
        AudioBufferRef::S24(buf) => {
            copy_planes!(buf, |s: &symphonia::core::sample::i24| s.inner() as f64
                / 8388608.0)
        }
        AudioBufferRef::S32(buf) => copy_planes!(buf, |&s: &i32| s as f64 / 2147483648.0),
        AudioBufferRef::U8(buf) => copy_planes!(buf, |&s: &u8| (s as f64 - 128.0) / 128.0),
        _ => {
            return Err(FileError::UnsupportedFormat(
                "unhandled decoded sample format".to_string(),
            ))
        }
    }
    Ok(())
}
