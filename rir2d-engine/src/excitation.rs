//! Test signals to push through an RIR.
//!
//! - `Impulse`    : a single unit sample (auralizing it returns the RIR itself)
//! - `Click`      : one raised-cosine bump, a softer impulse that plays well on speakers
//! - `NoiseBurst` : seeded white noise with a linear fade-out, deterministic per seed

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rir2d_core::rir::MAX_RIR_SAMPLES;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Longest excitation `render` produces, in samples.
pub const MAX_EXCITATION_SAMPLES: usize = MAX_RIR_SAMPLES;

/// Excitation signal kind.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum Excitation {
    Impulse,
    Click { duration_ms: f64 },
    NoiseBurst { duration_ms: f64, seed: u64 },
}

impl Default for Excitation {
    fn default() -> Self {
        Excitation::Click { duration_ms: 2.0 }
    }
}

fn ms_to_samples(ms: f64, sample_rate: u32) -> Result<usize> {
    if !(ms.is_finite() && ms >= 0.0) {
        return Err(EngineError::config(format!("excitation duration must be finite and >= 0 ms, got {ms}")));
    }
    let n = (ms * 0.001 * f64::from(sample_rate)).round();
    if n > MAX_EXCITATION_SAMPLES as f64 {
        return Err(EngineError::config(format!(
            "excitation of {ms} ms at {sample_rate} Hz exceeds {MAX_EXCITATION_SAMPLES} samples"
        )));
    }
    Ok((n as usize).max(1))
}

impl Excitation {
    /// Render the excitation at `sample_rate`. Always at least one sample long.
    ///
    /// Fails if the duration is negative, not finite, or longer than
    /// [`MAX_EXCITATION_SAMPLES`].
    pub fn render(&self, sample_rate: u32) -> Result<Vec<f64>> {
        match *self {
            Excitation::Impulse => Ok(vec![1.0]),
            Excitation::Click { duration_ms } => {
                let n = ms_to_samples(duration_ms, sample_rate)?;
                if n == 1 {
                    return Ok(vec![1.0]);
                }
                let denom = (n - 1) as f64;
                Ok((0..n)
                    .map(|i| 0.5 - 0.5 * (core::f64::consts::TAU * i as f64 / denom).cos())
                    .collect())
            }
            Excitation::NoiseBurst { duration_ms, seed } => {
                let n = ms_to_samples(duration_ms, sample_rate)?;
                let mut rng = StdRng::seed_from_u64(seed);
                Ok((0..n)
                    .map(|i| {
                        let fade = 1.0 - i as f64 / n as f64;
                        rng.gen_range(-1.0..=1.0) * fade
                    })
                    .collect())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Excitation::Impulse => "impulse",
            Excitation::Click { .. } => "click",
            Excitation::NoiseBurst { .. } => "noise-burst",
        }
    }
}
