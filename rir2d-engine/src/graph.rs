//! Pull-based playback of rendered buffers.
//!
//! This module defines the minimal `Generator` trait and a lightweight `Engine<G>`
//! wrapper that owns a generator, tracks sample rate and time, and produces one
//! **mono** sample at a time with zero heap work per sample.
//!
//! [`BufferPlayer`] is the generator used for auralization playback: it holds a
//! buffer rendered at its own rate and resamples linearly to whatever rate the
//! host asks for.

/// Anything that can generate one sample at a time.
pub trait Generator {
    /// Called when the engine is (re)initialized or when the sample rate changes.
    fn reset(&mut self, sr: f32);

    /// Generate the next mono sample. Implementations should assume the sample
    /// rate has been communicated via `reset`.
    fn next(&mut self) -> f32;
}

/// Lightweight engine that owns a generator.
///
/// The audio callback should call `next(sr)` for every output sample. If the
/// `sr` reported by the host changes, the engine will call `reset(sr)` on the
/// inner generator once and continue.
pub struct Engine<G: Generator> {
    sr: f32,
    t: f32,
    gen: G,
}

impl<G: Generator> Engine<G> {
    /// Construct with an already-configured generator, reset to 48 kHz until
    /// the first `next(sr)` says otherwise.
    #[inline]
    pub fn new(mut gen: G) -> Self {
        let sr = 48_000.0;
        gen.reset(sr);
        Self { sr, t: 0.0, gen }
    }

    /// Produce **one** mono sample at the given sample rate.
    #[inline]
    pub fn next(&mut self, sr: f32) -> f32 {
        if sr != self.sr {
            self.sr = sr;
            self.gen.reset(sr);
        }
        self.t += 1.0 / self.sr;
        self.gen.next()
    }

    #[inline] pub fn sample_rate(&self) -> f32 { self.sr }

    /// Elapsed time (seconds) since this engine was created.
    #[inline] pub fn time(&self) -> f32 { self.t }

    #[inline] pub fn generator(&self) -> &G { &self.gen }

    #[inline] pub fn generator_mut(&mut self) -> &mut G { &mut self.gen }
}

/// Plays a mono buffer once (or looped), resampling to the host rate.
#[derive(Clone, Debug)]
pub struct BufferPlayer {
    buf: Vec<f32>,
    native_sr: f32,
    // read position in buffer samples, advanced by `step` per output sample
    pos: f64,
    step: f64,
    looping: bool,
    gain: f32,
}

impl BufferPlayer {
    pub fn new(buf: Vec<f32>, native_sr: f32) -> Self {
        let native_sr = native_sr.max(1.0);
        Self { buf, native_sr, pos: 0.0, step: 1.0, looping: false, gain: 1.0 }
    }

    pub fn from_f64(buf: &[f64], native_sr: u32) -> Self {
        Self::new(buf.iter().map(|&s| s as f32).collect(), native_sr as f32)
    }

    #[inline] pub fn set_looping(&mut self, looping: bool) { self.looping = looping; }
    #[inline] pub fn set_gain(&mut self, g: f32) { self.gain = if g.is_finite() { g.max(0.0) } else { 1.0 }; }
    #[inline] pub fn rewind(&mut self) { self.pos = 0.0; }

    /// True once a non-looping player has run past the end.
    #[inline]
    pub fn finished(&self) -> bool {
        !self.looping && self.pos >= self.buf.len() as f64
    }

    /// Buffer length in seconds at its native rate.
    pub fn duration_sec(&self) -> f32 {
        self.buf.len() as f32 / self.native_sr
    }

    #[inline]
    fn sample_at(&self, i: usize) -> f32 {
        let n = self.buf.len();
        if self.looping { self.buf[i % n] } else { self.buf.get(i).copied().unwrap_or(0.0) }
    }
}

impl Generator for BufferPlayer {
    fn reset(&mut self, sr: f32) {
        self.step = f64::from(self.native_sr) / f64::from(sr.max(1.0));
    }

    fn next(&mut self) -> f32 {
        if self.buf.is_empty() || self.finished() {
            return 0.0;
        }
        let i = self.pos.floor();
        let frac = (self.pos - i) as f32;
        let i = i as usize;
        let a = self.sample_at(i);
        let b = self.sample_at(i + 1);
        self.pos += self.step;
        if self.looping {
            let len = self.buf.len() as f64;
            if self.pos >= len {
                self.pos -= len;
            }
        }
        (a + (b - a) * frac) * self.gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_once_at_native_rate() {
        let mut e = Engine::new(BufferPlayer::new(vec![1.0, 0.5, -0.5], 8_000.0));
        let out: Vec<f32> = (0..5).map(|_| e.next(8_000.0)).collect();
        assert_eq!(out, vec![1.0, 0.5, -0.5, 0.0, 0.0]);
        assert!(e.generator().finished());
        assert!((e.time() - 5.0 / 8_000.0).abs() < 1e-6);
    }

    #[test]
    fn upsampling_interpolates() {
        let mut e = Engine::new(BufferPlayer::new(vec![0.0, 1.0], 1_000.0));
        let out: Vec<f32> = (0..4).map(|_| e.next(2_000.0)).collect();
        assert_eq!(out, vec![0.0, 0.5, 1.0, 0.5]);
    }

    #[test]
    fn looping_wraps() {
        let mut p = BufferPlayer::new(vec![1.0, 2.0], 48_000.0);
        p.set_looping(true);
        let mut e = Engine::new(p);
        let out: Vec<f32> = (0..5).map(|_| e.next(48_000.0)).collect();
        assert_eq!(out, vec![1.0, 2.0, 1.0, 2.0, 1.0]);
        assert!(!e.generator().finished());
    }

    #[test]
    fn empty_buffer_is_silent() {
        let mut e = Engine::new(BufferPlayer::new(Vec::new(), 48_000.0));
        assert_eq!(e.next(48_000.0), 0.0);
    }
}
