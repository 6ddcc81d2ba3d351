//! Mono WAV import/export via `hound`.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Sample encoding for written files.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WavFormat {
    /// 32-bit IEEE float, written as-is.
    #[default]
    Float32,
    /// 16-bit PCM, clamped to [-1, 1] first.
    Pcm16,
}

impl WavFormat {
    fn spec(self, sample_rate: u32) -> WavSpec {
        match self {
            WavFormat::Float32 => WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 32,
                sample_format: SampleFormat::Float,
            },
            WavFormat::Pcm16 => WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            },
        }
    }
}

/// Write `samples` as a mono file.
pub fn write_wav(path: impl AsRef<Path>, samples: &[f64], sample_rate: u32, format: WavFormat) -> Result<()> {
    let path = path.as_ref();
    if sample_rate == 0 {
        return Err(EngineError::config("WAV sample rate must be > 0"));
    }
    let mut writer = WavWriter::create(path, format.spec(sample_rate))?;
    match format {
        WavFormat::Float32 => {
            for &s in samples {
                writer.write_sample(s as f32)?;
            }
        }
        WavFormat::Pcm16 => {
            for &s in samples {
                let v = (s.clamp(-1.0, 1.0) * f64::from(i16::MAX)).round() as i16;
                writer.write_sample(v)?;
            }
        }
    }
    writer.finalize()?;
    debug!("wrote {} samples @ {sample_rate} Hz to {}", samples.len(), path.display());
    Ok(())
}

/// Read a WAV file, averaging all channels down to mono.
///
/// Returns the samples in [-1, 1] and the file's sample rate.
pub fn read_wav_mono(path: impl AsRef<Path>) -> Result<(Vec<f64>, u32)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let full_scale = f64::from(1u32 << (spec.bits_per_sample.clamp(1, 32) - 1));
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / full_scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let mono: Vec<f64> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f64>() / frame.len() as f64)
        .collect();
    debug!(
        "read {} frames ({} ch) @ {} Hz from {}",
        mono.len(),
        channels,
        spec.sample_rate,
        path.display()
    );
    Ok((mono, spec.sample_rate))
}
