//! Scenes: a validated room plus the render settings for one RIR.
//!
//! A [`SceneConfig`] is the JSON-facing description; [`Scene::from_config`]
//! validates all of it up front so that [`Scene::render`] can only fail on
//! arguments the core re-checks.
//!
//! ```json
//! {
//!   "room": { "width": 5.0, "length": 4.0 },
//!   "source": { "x": -1.0, "y": -2.0, "power_db": 100.0 },
//!   "receiver": { "x": 1.0, "y": -1.0 },
//!   "order": 2,
//!   "sample_rate": 48000,
//!   "length_sec": 0.5
//! }
//! ```

use std::path::Path;

use log::{debug, info, warn};
use rir2d_core::prelude::*;
use rir2d_core::rir::{peak_abs, rir_len};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

fn default_order() -> u32 {
    1
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_length_sec() -> f64 {
    DEFAULT_LENGTH_SEC
}

/// Room footprint in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDims {
    pub width: f64,
    pub length: f64,
}

/// Plain `{x, y}` position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointConfig {
    pub x: f64,
    pub y: f64,
}

impl From<PointConfig> for Point2 {
    fn from(p: PointConfig) -> Self {
        Point2::new(p.x, p.y)
    }
}

/// Source position with optional emission power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_db: Option<f64>,
}

impl From<SourceConfig> for Source {
    fn from(s: SourceConfig) -> Self {
        Source { position: Point2::new(s.x, s.y), power_db: s.power_db }
    }
}

/// Scene description as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub room: RoomDims,
    pub source: SourceConfig,
    pub receiver: PointConfig,
    /// Highest reflection order to include.
    #[serde(default = "default_order")]
    pub order: u32,
    /// RIR sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// RIR duration in seconds.
    #[serde(default = "default_length_sec")]
    pub length_sec: f64,
    #[serde(default)]
    pub acoustics: Acoustics,
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading scene from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A validated scene, ready to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    room: Room,
    order: u32,
    sample_rate: u32,
    length_sec: f64,
    acoustics: Acoustics,
}

impl Scene {
    pub fn from_config(cfg: &SceneConfig) -> Result<Self> {
        let room = Room::new(cfg.room.width, cfg.room.length, cfg.source.into(), Receiver::new(Point2::from(cfg.receiver)))?;
        if cfg.order < 1 {
            return Err(RoomError::InvalidOrder { order: cfg.order }.into());
        }
        if cfg.order > MAX_REFLECTION_ORDER {
            return Err(RoomError::OrderTooLarge { order: cfg.order, max: MAX_REFLECTION_ORDER }.into());
        }
        rir_len(cfg.sample_rate, cfg.length_sec)?;
        cfg.acoustics.validate()?;
        Ok(Self {
            room,
            order: cfg.order,
            sample_rate: cfg.sample_rate,
            length_sec: cfg.length_sec,
            acoustics: cfg.acoustics,
        })
    }

    #[inline] pub fn room(&self) -> &Room { &self.room }
    #[inline] pub fn order(&self) -> u32 { self.order }
    #[inline] pub fn sample_rate(&self) -> u32 { self.sample_rate }
    #[inline] pub fn length_sec(&self) -> f64 { self.length_sec }
    #[inline] pub fn acoustics(&self) -> &Acoustics { &self.acoustics }

    /// Paths up to the scene's order.
    pub fn paths(&self) -> Result<Vec<ReflectionPath>> {
        Ok(self.room.reflection_paths_with(self.order, &self.acoustics)?)
    }

    /// Derive all paths and bin them into a normalized RIR.
    pub fn render(&self) -> Result<Rendering> {
        let paths = self.paths()?;
        let (rir, report) = build_rir_with_report(&paths, self.sample_rate, self.length_sec)?;
        info!(
            "rendered {} paths (order {}) into {} samples @ {} Hz",
            paths.len(),
            self.order,
            rir.len(),
            self.sample_rate
        );
        if report.dropped > 0 {
            warn!(
                "{} of {} paths fall beyond {:.3}s and were dropped",
                report.dropped,
                paths.len(),
                self.length_sec
            );
        }
        if peak_abs(&rir) == 0.0 {
            warn!("rendered RIR is silent");
        }
        Ok(Rendering {
            sample_rate: self.sample_rate,
            placed: report.placed,
            dropped: report.dropped,
            paths,
            rir,
        })
    }
}

impl TryFrom<&SceneConfig> for Scene {
    type Error = EngineError;

    fn try_from(cfg: &SceneConfig) -> Result<Self> {
        Scene::from_config(cfg)
    }
}

/// Output of [`Scene::render`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendering {
    pub sample_rate: u32,
    /// Paths that landed inside the buffer.
    pub placed: usize,
    /// Paths beyond the buffer end.
    pub dropped: usize,
    pub paths: Vec<ReflectionPath>,
    pub rir: Vec<f64>,
}

impl Rendering {
    pub fn duration_sec(&self) -> f64 {
        self.rir.len() as f64 / f64::from(self.sample_rate)
    }

    pub fn rir_f32(&self) -> Vec<f32> {
        self.rir.iter().map(|&s| s as f32).collect()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = r#"{
        "room": { "width": 5.0, "length": 4.0 },
        "source": { "x": -1.0, "y": -2.0 },
        "receiver": { "x": 1.0, "y": -1.0 }
    }"#;

    #[test]
    fn defaults_fill_in() {
        let cfg = SceneConfig::from_json_str(REFERENCE).unwrap();
        assert_eq!(cfg.order, 1);
        assert_eq!(cfg.sample_rate, 48_000);
        assert_eq!(cfg.length_sec, 0.5);
        assert_eq!(cfg.acoustics, Acoustics::default());
        assert_eq!(cfg.source.power_db, None);
    }

    #[test]
    fn partial_acoustics_override() {
        let json = r#"{
            "room": { "width": 5.0, "length": 4.0 },
            "source": { "x": -1.0, "y": -2.0 },
            "receiver": { "x": 1.0, "y": -1.0 },
            "acoustics": { "reflection_coefficient": 0.5 }
        }"#;
        let cfg = SceneConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.acoustics.reflection_coefficient, 0.5);
        assert_eq!(cfg.acoustics.speed_of_sound, SPEED_OF_SOUND);
    }

    #[test]
    fn render_reference_scene() {
        let cfg = SceneConfig::from_json_str(REFERENCE).unwrap();
        let r = Scene::from_config(&cfg).unwrap().render().unwrap();
        assert_eq!(r.paths.len(), 5);
        assert_eq!(r.rir.len(), 24_000);
        assert_eq!(r.placed, 5);
        assert_eq!(r.dropped, 0);
        assert!((r.duration_sec() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_scenes_are_rejected_up_front() {
        let mut cfg = SceneConfig::from_json_str(REFERENCE).unwrap();
        cfg.source.x = 3.0;
        let err = Scene::from_config(&cfg).unwrap_err();
        assert!(err.is_validation_error());

        let mut cfg = SceneConfig::from_json_str(REFERENCE).unwrap();
        cfg.order = 0;
        assert!(matches!(
            Scene::from_config(&cfg),
            Err(EngineError::Room(RoomError::InvalidOrder { order: 0 }))
        ));

        let mut cfg = SceneConfig::from_json_str(REFERENCE).unwrap();
        cfg.sample_rate = 0;
        assert!(Scene::try_from(&cfg).is_err());
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let err = SceneConfig::from_json_str("{ \"room\": ").unwrap_err();
        assert!(err.is_validation_error());
        assert!(!err.is_io_error());

        let err = SceneConfig::from_json_str(r#"{ "room": { "width": "wide", "length": 4.0 } }"#).unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn missing_scene_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_io_error());
        assert!(!err.is_validation_error());
    }

    #[test]
    fn bundled_reference_scene_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../scenes/reference.json");
        let cfg = SceneConfig::from_file(path).unwrap();
        let scene = Scene::from_config(&cfg).unwrap();
        assert_eq!(scene.order(), 2);
        assert_eq!(scene.room().source().power_db, Some(100.0));
        assert_eq!(scene.paths().unwrap().len(), 21);
    }

    #[test]
    fn config_survives_a_file() {
        let cfg = SceneConfig::from_json_str(REFERENCE).unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), cfg.to_json_pretty().unwrap()).unwrap();
        assert_eq!(SceneConfig::from_file(file.path()).unwrap(), cfg);
    }
}
