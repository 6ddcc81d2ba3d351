//! rir2d CLI: render, inspect and auralize 2D image-source room impulse responses.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use cfg_if::cfg_if;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use rir2d_engine::rir2d_core::acoustics::Acoustics;
use rir2d_engine::rir2d_core::rir::{DEFAULT_LENGTH_SEC, DEFAULT_SAMPLE_RATE};
use rir2d_engine::scene::{PointConfig, RoomDims, SourceConfig};
use rir2d_engine::{
    auralize, coverage_grid, read_wav_mono, write_wav, Excitation, Rendering, Scene, SceneConfig, WavFormat,
};

#[cfg(feature = "realtime")]
mod play;

/// Image-source room impulse responses for rectangular 2D rooms.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    scene: SceneArgs,

    #[command(subcommand)]
    command: Command,
}

/// Scene selection. `--config` provides a base; every other flag overrides it.
#[derive(Args, Debug, Default, Clone)]
struct SceneArgs {
    /// Scene JSON file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Room width in feet
    #[arg(long, global = true)]
    width: Option<f64>,

    /// Room length in feet
    #[arg(long, global = true)]
    length: Option<f64>,

    /// Source position "X,Y" in feet (room spans x in ±width/2, y in (-length, 0))
    #[arg(long, global = true, value_parser = parse_point, allow_hyphen_values = true)]
    source: Option<(f64, f64)>,

    /// Receiver position "X,Y" in feet
    #[arg(long, global = true, value_parser = parse_point, allow_hyphen_values = true)]
    receiver: Option<(f64, f64)>,

    /// Source emission power in dB (needed by `coverage`)
    #[arg(long, global = true)]
    power_db: Option<f64>,

    /// Highest reflection order
    #[arg(long, global = true)]
    order: Option<u32>,

    /// RIR sample rate in Hz
    #[arg(long, global = true)]
    sample_rate: Option<u32>,

    /// RIR length in seconds
    #[arg(long, global = true)]
    length_sec: Option<f64>,

    /// Speed of sound in feet per second
    #[arg(long, global = true)]
    speed_of_sound: Option<f64>,

    /// Per-bounce reflection coefficient in [0, 1]
    #[arg(long, global = true)]
    reflection_coefficient: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the direct path and every reflection up to the scene order
    Paths {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Render the RIR to a WAV file
    Rir {
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
        /// Write 16-bit PCM instead of 32-bit float
        #[arg(long)]
        pcm16: bool,
        /// Also dump paths and samples as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Evaluate the source's free-field SPL over the room
    Coverage {
        /// Grid cell size in feet
        #[arg(long, default_value_t = 0.5)]
        resolution: f64,
        /// Write the grid as JSON instead of printing a summary
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convolve an excitation (or a dry WAV) with the RIR
    Auralize {
        #[command(flatten)]
        dry: DryArgs,
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
        /// Write 16-bit PCM instead of 32-bit float
        #[arg(long)]
        pcm16: bool,
    },
    /// Play the auralized excitation on an output device (needs the `realtime` feature)
    Play(PlayArgs),
}

#[derive(Args, Debug, Clone)]
#[cfg_attr(not(feature = "realtime"), allow(dead_code))]
struct PlayArgs {
    #[command(flatten)]
    dry: DryArgs,
    /// Output device name (default device if omitted)
    #[arg(long)]
    device: Option<String>,
    /// List output devices and exit
    #[arg(long)]
    list_devices: bool,
    /// Playback gain
    #[arg(long, default_value_t = 0.5)]
    gain: f32,
    /// Repeat until interrupted
    #[arg(long = "loop")]
    looping: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ExcitationKind {
    Impulse,
    Click,
    Noise,
}

/// Dry signal selection shared by `auralize` and `play`.
#[derive(Args, Debug, Clone)]
struct DryArgs {
    /// Built-in excitation
    #[arg(long, value_enum, default_value_t = ExcitationKind::Click)]
    excitation: ExcitationKind,
    /// Click / noise duration in milliseconds
    #[arg(long, default_value_t = 2.0)]
    duration_ms: f64,
    /// Noise seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Dry WAV file to use instead of a built-in excitation
    #[arg(long)]
    input: Option<PathBuf>,
}

impl DryArgs {
    fn excitation(&self) -> Excitation {
        match self.excitation {
            ExcitationKind::Impulse => Excitation::Impulse,
            ExcitationKind::Click => Excitation::Click { duration_ms: self.duration_ms },
            ExcitationKind::Noise => Excitation::NoiseBurst { duration_ms: self.duration_ms, seed: self.seed },
        }
    }

    /// Dry samples at `sample_rate`.
    fn load(&self, sample_rate: u32) -> Result<Vec<f64>> {
        let Some(path) = &self.input else {
            let excitation = self.excitation();
            info!("excitation: {}", excitation.name());
            return excitation.render(sample_rate).context("Rendering the excitation failed");
        };
        let (dry, sr) = read_wav_mono(path).with_context(|| format!("Failed to read dry input {path:?}"))?;
        if sr != sample_rate {
            bail!("dry input {path:?} is {sr} Hz but the scene renders at {sample_rate} Hz; pass --sample-rate {sr}");
        }
        Ok(dry)
    }
}

fn parse_point(s: &str) -> std::result::Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"X,Y\", got {s:?}"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok((x, y))
}

/// Build the scene config from an optional file plus flag overrides.
fn scene_config(args: &SceneArgs) -> Result<SceneConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            info!("Loading scene from {path:?}");
            SceneConfig::from_file(path).with_context(|| format!("Failed to load scene {path:?}"))?
        }
        None => {
            let missing = |flag: &str| anyhow!("--{flag} is required when no --config is given");
            let width = args.width.ok_or_else(|| missing("width"))?;
            let length = args.length.ok_or_else(|| missing("length"))?;
            let (sx, sy) = args.source.ok_or_else(|| missing("source"))?;
            let (rx, ry) = args.receiver.ok_or_else(|| missing("receiver"))?;
            SceneConfig {
                room: RoomDims { width, length },
                source: SourceConfig { x: sx, y: sy, power_db: None },
                receiver: PointConfig { x: rx, y: ry },
                order: 1,
                sample_rate: DEFAULT_SAMPLE_RATE,
                length_sec: DEFAULT_LENGTH_SEC,
                acoustics: Acoustics::default(),
            }
        }
    };

    if let Some(w) = args.width { cfg.room.width = w; }
    if let Some(l) = args.length { cfg.room.length = l; }
    if let Some((x, y)) = args.source { cfg.source.x = x; cfg.source.y = y; }
    if let Some((x, y)) = args.receiver { cfg.receiver = PointConfig { x, y }; }
    if let Some(p) = args.power_db { cfg.source.power_db = Some(p); }
    if let Some(o) = args.order { cfg.order = o; }
    if let Some(sr) = args.sample_rate { cfg.sample_rate = sr; }
    if let Some(len) = args.length_sec { cfg.length_sec = len; }
    if let Some(c) = args.speed_of_sound { cfg.acoustics.speed_of_sound = c; }
    if let Some(r) = args.reflection_coefficient { cfg.acoustics.reflection_coefficient = r; }
    Ok(cfg)
}

fn wav_format(pcm16: bool) -> WavFormat {
    if pcm16 { WavFormat::Pcm16 } else { WavFormat::Float32 }
}

fn render(scene: &Scene) -> Result<Rendering> {
    scene.render().context("Rendering the RIR failed")
}

fn write_output(path: &Path, samples: &[f64], sample_rate: u32, format: WavFormat) -> Result<()> {
    write_wav(path, samples, sample_rate, format).with_context(|| format!("Failed to write {path:?}"))?;
    info!("Wrote {} samples to {path:?}", samples.len());
    Ok(())
}

fn print_paths(scene: &Scene, json: bool) -> Result<()> {
    let paths = scene.paths()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }
    println!("{:>5}  {:>10}  {:>12}", "order", "delay_ms", "gain");
    for p in &paths {
        println!("{:>5}  {:>10.4}  {:>12.6}", p.order, p.delay * 1000.0, p.gain);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    #[cfg(feature = "realtime")]
    if let Command::Play(PlayArgs { list_devices: true, .. }) = &cli.command {
        return play::list_output_devices();
    }

    let cfg = scene_config(&cli.scene)?;
    let scene = Scene::from_config(&cfg).context("Invalid scene")?;
    info!(
        "Room {} x {} ft | order {} | {} Hz, {:.3}s",
        cfg.room.width, cfg.room.length, cfg.order, cfg.sample_rate, cfg.length_sec
    );

    match cli.command {
        Command::Paths { json } => print_paths(&scene, json),
        Command::Rir { output, pcm16, json } => {
            let rendering = render(&scene)?;
            write_output(&output, &rendering.rir, rendering.sample_rate, wav_format(pcm16))?;
            if let Some(path) = json {
                std::fs::write(&path, rendering.to_json_pretty()?)
                    .with_context(|| format!("Failed to write {path:?}"))?;
                info!("Wrote JSON to {path:?}");
            }
            Ok(())
        }
        Command::Coverage { resolution, output } => {
            let grid = coverage_grid(scene.room(), resolution).context("Coverage evaluation failed")?;
            let (lo, hi) = grid.range_db();
            match output {
                Some(path) => {
                    std::fs::write(&path, serde_json::to_string_pretty(&grid)?)
                        .with_context(|| format!("Failed to write {path:?}"))?;
                    info!("Wrote {}x{} grid to {path:?}", grid.xs.len(), grid.ys.len());
                }
                None => {
                    println!("grid     : {} x {} cells", grid.xs.len(), grid.ys.len());
                    println!("range    : {lo:.2} .. {hi:.2} dB");
                    if let Some(at_rx) = grid.nearest(scene.room().receiver().position) {
                        println!("receiver : {at_rx:.2} dB");
                    }
                }
            }
            Ok(())
        }
        Command::Auralize { dry, output, pcm16 } => {
            let rendering = render(&scene)?;
            let dry = dry.load(rendering.sample_rate)?;
            if dry.is_empty() {
                warn!("Dry input is empty; output will be empty too");
            }
            let wet = auralize(&dry, &rendering.rir);
            write_output(&output, &wet, rendering.sample_rate, wav_format(pcm16))
        }
        Command::Play(args) => {
            cfg_if! {
                if #[cfg(feature = "realtime")] {
                    play::run(&scene, &args)
                } else {
                    let _ = args;
                    bail!("rir2d was built without the `realtime` feature; rebuild with --features realtime")
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}
