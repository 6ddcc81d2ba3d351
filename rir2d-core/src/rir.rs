//! RIR builder: bin reflection paths into a sampled, peak-normalized buffer.
//!
//! Rounding
//! - A path with delay `t` lands in sample `round(t * sample_rate)`.
//! - The buffer holds `round(length_sec * sample_rate)` samples.
//! - Both roundings are **half-to-even** (`f64::round_ties_even`), so a delay
//!   of exactly 2.5 samples goes to bin 2 and 3.5 samples to bin 4.
//!
//! Contributions landing on the same bin are summed. Paths outside the buffer
//! are dropped without error.

use log::debug;
use num_traits::ToPrimitive;

use crate::error::{Result, RoomError};
use crate::paths::ReflectionPath;

/// Default RIR sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Default RIR duration in seconds.
pub const DEFAULT_LENGTH_SEC: f64 = 0.5;

/// Largest buffer `rir_len` accepts (2^28 samples, about 93 minutes at 48 kHz).
pub const MAX_RIR_SAMPLES: usize = 1 << 28;

/// How many paths made it into the buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BinReport {
    pub placed: usize,
    pub dropped: usize,
}

/// Sample bin for `delay` seconds, or `None` if it is negative or not finite.
#[inline]
pub fn sample_index(delay: f64, sample_rate: u32) -> Option<usize> {
    (delay * f64::from(sample_rate)).round_ties_even().to_usize()
}

/// Buffer length for `length_sec` at `sample_rate`, validating both.
///
/// Fails with `InvalidLength` when the length rounds to zero samples or
/// exceeds [`MAX_RIR_SAMPLES`].
pub fn rir_len(sample_rate: u32, length_sec: f64) -> Result<usize> {
    if sample_rate == 0 {
        return Err(RoomError::InvalidSampleRate { sample_rate });
    }
    if !(length_sec.is_finite() && length_sec > 0.0) {
        return Err(RoomError::InvalidLength { length_sec });
    }
    match (length_sec * f64::from(sample_rate)).round_ties_even().to_usize() {
        Some(n) if n > 0 && n <= MAX_RIR_SAMPLES => Ok(n),
        _ => Err(RoomError::InvalidLength { length_sec }),
    }
}

/// Bin `paths` into a buffer and normalize its peak to 1.0.
///
/// An all-zero buffer (no path in range, or only zero gains) is returned
/// unchanged.
pub fn build_rir(paths: &[ReflectionPath], sample_rate: u32, length_sec: f64) -> Result<Vec<f64>> {
    build_rir_with_report(paths, sample_rate, length_sec).map(|(rir, _)| rir)
}

/// [`build_rir`] that also reports how many paths were placed or dropped.
pub fn build_rir_with_report(
    paths: &[ReflectionPath],
    sample_rate: u32,
    length_sec: f64,
) -> Result<(Vec<f64>, BinReport)> {
    let len = rir_len(sample_rate, length_sec)?;
    let mut rir = vec![0.0_f64; len];
    let mut report = BinReport::default();

    for path in paths {
        match sample_index(path.delay, sample_rate) {
            Some(i) if i < len => {
                rir[i] += path.gain;
                report.placed += 1;
            }
            _ => report.dropped += 1,
        }
    }

    normalize_peak(&mut rir);
    debug!(
        "binned {} paths into {} samples ({} dropped)",
        report.placed, len, report.dropped
    );
    Ok((rir, report))
}

/// Scale so the largest absolute sample is 1.0. Returns the original peak.
pub fn normalize_peak(buf: &mut [f64]) -> f64 {
    let peak = peak_abs(buf);
    if peak > 0.0 {
        for s in buf.iter_mut() {
            *s /= peak;
        }
    }
    peak
}

#[inline]
pub fn peak_abs(buf: &[f64]) -> f64 {
    buf.iter().fold(0.0_f64, |m, s| m.max(s.abs()))
}

/// Millisecond timestamp of every sample, for plotting against.
pub fn time_axis_ms(len: usize, sample_rate: u32) -> Vec<f64> {
    let sr = f64::from(sample_rate.max(1));
    (0..len).map(|i| i as f64 / sr * 1000.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_buffer_length() {
        let rir = build_rir(&[], DEFAULT_SAMPLE_RATE, DEFAULT_LENGTH_SEC).unwrap();
        assert_eq!(rir.len(), 24_000);
        assert!(rir.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn coincident_paths_accumulate() {
        let paths = [ReflectionPath::new(0.01, 0.5), ReflectionPath::new(0.01, 0.25), ReflectionPath::new(0.02, 1.5)];
        let rir = build_rir(&paths, 1000, 0.1).unwrap();
        // bin 10 holds 0.75, bin 20 holds 1.5 → normalized by 1.5
        assert!((rir[10] - 0.5).abs() < 1e-12);
        assert!((rir[20] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_paths_are_dropped() {
        let paths = [ReflectionPath::new(0.2, 1.0), ReflectionPath::new(-0.01, 1.0), ReflectionPath::new(f64::NAN, 1.0)];
        let (rir, report) = build_rir_with_report(&paths, 1000, 0.1).unwrap();
        assert_eq!(report, BinReport { placed: 0, dropped: 3 });
        assert!(rir.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn last_bin_is_inclusive_and_len_exclusive() {
        let paths = [ReflectionPath::new(0.099, 1.0), ReflectionPath::new(0.1, 1.0)];
        let (rir, report) = build_rir_with_report(&paths, 1000, 0.1).unwrap();
        assert_eq!(rir.len(), 100);
        assert_eq!(report.placed, 1);
        assert_eq!(rir[99], 1.0);
    }

    #[test]
    fn half_sample_ties_go_to_even() {
        assert_eq!(sample_index(2.5, 1), Some(2));
        assert_eq!(sample_index(3.5, 1), Some(4));
        assert_eq!(sample_index(-0.4, 1), Some(0));
        assert_eq!(sample_index(-0.6, 1), None);
    }

    #[test]
    fn peak_is_unity_with_negative_gain() {
        let paths = [ReflectionPath::new(0.001, -4.0), ReflectionPath::new(0.002, 2.0)];
        let rir = build_rir(&paths, 1000, 0.01).unwrap();
        assert_eq!(peak_abs(&rir), 1.0);
        assert_eq!(rir[1], -1.0);
        assert_eq!(rir[2], 0.5);
    }

    #[test]
    fn invalid_arguments_fail() {
        assert_eq!(build_rir(&[], 0, 0.5), Err(RoomError::InvalidSampleRate { sample_rate: 0 }));
        assert!(matches!(build_rir(&[], 48_000, 0.0), Err(RoomError::InvalidLength { .. })));
        assert!(matches!(build_rir(&[], 48_000, -1.0), Err(RoomError::InvalidLength { .. })));
        assert!(matches!(build_rir(&[], 1, 0.4), Err(RoomError::InvalidLength { .. })));
    }

    #[test]
    fn oversized_buffer_is_rejected() {
        assert!(matches!(build_rir(&[], 48_000, 1.0e14), Err(RoomError::InvalidLength { .. })));
        assert!(matches!(rir_len(1, (MAX_RIR_SAMPLES + 1) as f64), Err(RoomError::InvalidLength { .. })));
        assert_eq!(rir_len(1, MAX_RIR_SAMPLES as f64), Ok(MAX_RIR_SAMPLES));
    }

    #[test]
    fn time_axis_in_ms() {
        let t = time_axis_ms(3, 1000);
        assert_eq!(t, vec![0.0, 1.0, 2.0]);
    }
}
