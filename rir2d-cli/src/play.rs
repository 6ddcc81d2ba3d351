//! Live playback of an auralized excitation through cpal.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, info};
use rir2d_engine::{auralize, BufferPlayer, Engine, Scene};

use crate::PlayArgs;

pub fn list_output_devices() -> Result<()> {
    let host = cpal::default_host();
    println!("Available output devices:");
    for dev in host.output_devices()? {
        println!("- {}", dev.name()?);
    }
    Ok(())
}

fn pick_device(name: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    if let Some(name) = name {
        for d in host.output_devices()? {
            if d.name()? == name {
                return Ok(d);
            }
        }
        bail!("requested device not found: {name}");
    }
    host.default_output_device()
        .ok_or_else(|| anyhow!("no default output device"))
}

/// Lock-free peak hold shared between the audio callback and the main thread.
///
/// Stores the bits of a non-negative `f32`; for those, integer order matches
/// float order, so `fetch_max` on the bits keeps the largest sample.
#[derive(Clone, Default)]
struct PeakMeter(Arc<AtomicU32>);

impl PeakMeter {
    #[inline]
    fn record(&self, peak: f32) {
        if peak.is_finite() {
            self.0.fetch_max(peak.abs().to_bits(), Ordering::Relaxed);
        }
    }

    /// Peak since the last call, resetting it to zero.
    fn take(&self) -> f32 {
        f32::from_bits(self.0.swap(0, Ordering::Relaxed))
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    cfg: &cpal::StreamConfig,
    mut engine: Engine<BufferPlayer>,
    meter: PeakMeter,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::FromSample<f32> + cpal::SizedSample + Send + 'static,
{
    let sr = cfg.sample_rate.0 as f32;
    let channels = usize::from(cfg.channels);

    let stream = device.build_output_stream(
        cfg,
        move |output: &mut [T], _| {
            let mut peak = 0.0_f32;
            for frame in output.chunks_mut(channels) {
                let s = engine.next(sr).clamp(-1.0, 1.0);
                let v: T = T::from_sample(s);
                for ch in frame.iter_mut() {
                    *ch = v;
                }
                peak = peak.max(s.abs());
            }
            meter.record(peak);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

pub fn run(scene: &Scene, args: &PlayArgs) -> Result<()> {
    let rendering = scene.render()?;
    let dry = args.dry.load(rendering.sample_rate)?;
    let wet = auralize(&dry, &rendering.rir);

    let mut player = BufferPlayer::from_f64(&wet, rendering.sample_rate);
    player.set_gain(args.gain);
    player.set_looping(args.looping);
    let duration = player.duration_sec();
    let engine = Engine::new(player);

    let device = pick_device(args.device.as_deref())?;
    let sup_cfg = device.default_output_config()?;
    let sample_format = sup_cfg.sample_format();
    let cfg = sup_cfg.config();

    info!("Using device: {}", device.name()?);
    info!("Stream config: {cfg:?} (sample_format: {sample_format:?})");
    info!(
        "Playing {duration:.3}s auralization rendered @ {} Hz{}",
        rendering.sample_rate,
        if args.looping { " (looping, Ctrl+C to stop)" } else { "" }
    );

    let err_fn = |e: cpal::StreamError| log::error!("[cpal] stream error: {e}");

    let meter = PeakMeter::default();
    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &cfg, engine, meter.clone(), err_fn)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &cfg, engine, meter.clone(), err_fn)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &cfg, engine, meter.clone(), err_fn)?,
        other => bail!("unsupported device sample format: {other:?}"),
    };

    stream.play()?;

    // tail so the device drains its last buffer
    let deadline = (!args.looping).then(|| Instant::now() + Duration::from_secs_f32(duration + 0.25));
    loop {
        let step = match deadline {
            Some(end) => end.saturating_duration_since(Instant::now()).min(Duration::from_secs(1)),
            None => Duration::from_secs(1),
        };
        if step.is_zero() {
            return Ok(());
        }
        std::thread::sleep(step);
        debug!("[meter] peak ~ {:.3}", meter.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_holds_the_largest_peak_until_taken() {
        let meter = PeakMeter::default();
        let writer = meter.clone();
        writer.record(0.25);
        writer.record(0.75);
        writer.record(0.5);
        writer.record(f32::NAN);
        assert_eq!(meter.take(), 0.75);
        assert_eq!(meter.take(), 0.0);
    }
}
