//! rir2d Engine: scenes, rendering, auralization and export.
//!
//! Crate layout:
//! - [`scene`]      : JSON `SceneConfig` → validated `Scene` → `Rendering`
//! - [`convolve`]   : FFT convolution of dry signals with an RIR
//! - [`excitation`] : impulse / click / seeded noise-burst test signals
//! - [`coverage`]   : free-field SPL grid over the room interior
//! - [`wav`]        : mono WAV import/export
//! - [`graph`]      : `Generator` trait, `Engine<G>` wrapper, `BufferPlayer`
//!
//! Everything except `graph` works on whole buffers; `graph` is the
//! sample-at-a-time side used for live playback.

pub mod convolve;
pub mod coverage;
pub mod error;
pub mod excitation;
pub mod graph;
pub mod scene;
pub mod wav;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use convolve::{auralize, convolve};
pub use coverage::{coverage_grid, CoverageGrid};
pub use error::{EngineError, Result};
pub use excitation::Excitation;
pub use graph::{BufferPlayer, Engine, Generator};
pub use scene::{Rendering, Scene, SceneConfig};
pub use wav::{read_wav_mono, write_wav, WavFormat};

pub use rir2d_core;

/// Render `excitation` through the scene's RIR at the scene's sample rate.
pub fn auralize_excitation(rendering: &Rendering, excitation: &Excitation) -> Result<Vec<f64>> {
    let dry = excitation.render(rendering.sample_rate)?;
    Ok(auralize(&dry, &rendering.rir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_auralization_reproduces_the_rir() {
        let cfg = SceneConfig::from_json_str(
            r#"{ "room": { "width": 5.0, "length": 4.0 },
                 "source": { "x": -1.0, "y": -2.0 },
                 "receiver": { "x": 1.0, "y": -1.0 },
                 "order": 2, "sample_rate": 8000, "length_sec": 0.1 }"#,
        )
        .unwrap();
        let rendering = Scene::from_config(&cfg).unwrap().render().unwrap();
        let wet = auralize_excitation(&rendering, &Excitation::Impulse).unwrap();
        assert_eq!(wet.len(), rendering.rir.len());
        for (a, b) in wet.iter().zip(rendering.rir.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
