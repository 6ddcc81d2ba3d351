//! Linear convolution of a dry signal with an RIR.
//!
//! FFT-based: both inputs are zero-padded to the next power of two at or
//! above `a + b - 1`, multiplied in the frequency domain and transformed
//! back. The result is the full convolution (`a + b - 1` samples).

use log::trace;
use rir2d_core::rir::normalize_peak;
use rustfft::{num_complex::Complex64, FftPlanner};

/// Full linear convolution. Empty input on either side gives an empty output.
pub fn convolve(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }
    let out_len = signal.len() + kernel.len() - 1;
    let n = out_len.next_power_of_two();
    trace!("fft convolution: {} x {} -> {} (fft size {n})", signal.len(), kernel.len(), out_len);

    let mut planner = FftPlanner::<f64>::new();
    let fwd = planner.plan_fft_forward(n);
    let inv = planner.plan_fft_inverse(n);

    let mut x = padded(signal, n);
    let mut h = padded(kernel, n);
    fwd.process(&mut x);
    fwd.process(&mut h);
    for (a, b) in x.iter_mut().zip(h.iter()) {
        *a *= *b;
    }
    inv.process(&mut x);

    // rustfft leaves the inverse unnormalized
    let scale = 1.0 / n as f64;
    x.iter().take(out_len).map(|c| c.re * scale).collect()
}

fn padded(src: &[f64], n: usize) -> Vec<Complex64> {
    let mut buf = vec![Complex64::new(0.0, 0.0); n];
    for (dst, &s) in buf.iter_mut().zip(src) {
        dst.re = s;
    }
    buf
}

/// Time-domain reference convolution, O(a·b).
pub fn convolve_direct(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; signal.len() + kernel.len() - 1];
    for (i, &s) in signal.iter().enumerate() {
        if s == 0.0 {
            continue;
        }
        for (j, &k) in kernel.iter().enumerate() {
            out[i + j] += s * k;
        }
    }
    out
}

/// Convolve `dry` with `rir` and peak-normalize the result to 1.0.
pub fn auralize(dry: &[f64], rir: &[f64]) -> Vec<f64> {
    let mut wet = convolve(dry, rir);
    normalize_peak(&mut wet);
    wet
}

#[cfg(test)]
mod tests {
    use super::*;
    use rir2d_core::rir::peak_abs;

    #[test]
    fn impulse_is_identity() {
        let kernel = [0.5, -0.25, 0.125, 0.0, 1.0];
        let y = convolve(&[1.0], &kernel);
        assert_eq!(y.len(), kernel.len());
        for (a, b) in y.iter().zip(kernel.iter()) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
    }

    #[test]
    fn fft_matches_direct() {
        let signal: Vec<f64> = (0..37).map(|i| ((i as f64) * 0.7).sin()).collect();
        let kernel: Vec<f64> = (0..11).map(|i| 1.0 / (i as f64 + 1.0)).collect();
        let fast = convolve(&signal, &kernel);
        let slow = convolve_direct(&signal, &kernel);
        assert_eq!(fast.len(), 47);
        for (a, b) in fast.iter().zip(slow.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn delayed_impulse_shifts() {
        let y = convolve(&[0.0, 0.0, 1.0], &[1.0, 0.5]);
        let expect = [0.0, 0.0, 1.0, 0.5];
        for (a, b) in y.iter().zip(expect.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_inputs() {
        assert!(convolve(&[], &[1.0]).is_empty());
        assert!(convolve_direct(&[1.0], &[]).is_empty());
    }

    #[test]
    fn auralized_output_is_normalized() {
        let y = auralize(&[0.2, 0.4, -0.1], &[1.0, 0.0, 0.6]);
        assert!((peak_abs(&y) - 1.0).abs() < 1e-12);
    }
}
