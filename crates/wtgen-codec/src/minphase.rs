//! Minimum-phase time-domain reconstruction from a magnitude half-spectrum.
//!
//! Uses the real-cepstrum method with a power-of-two complex FFT:
//!
//! 1. log|X| with Hermitian symmetry -> inverse FFT -> cepstrum,
//! 2. make the cepstrum causal (double positive quefrency, zero negative),
//! 3. forward FFT -> complex log spectrum, exponentiate,
//! 4. inverse FFT -> time signal.
//!
//! The causal shaping preserves the even part of the cepstrum, so the
//! magnitude of the result matches the input up to FFT roundoff while all
//! zeros of its z-transform move inside the unit circle.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{CodecError, CodecResult};

/// Floor applied before taking logarithms of magnitudes.
const LOG_FLOOR: f32 = 1.0e-12;

/// Largest acceptable imaginary residual relative to the real peak.
const MAX_IMAG_RATIO: f32 = 1.0e-4;

/// Minimum-phase reconstructor for one transform size.
///
/// Plans both FFT directions once; [`reconstruct`](Self::reconstruct) is then
/// called per frame.
pub struct MinimumPhase {
    size: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl MinimumPhase {
    /// Creates a reconstructor for frames of `size` samples.
    ///
    /// `size` must be a power of two, at least 2 (the framepack header
    /// guarantees this).
    pub fn new(size: usize) -> Self {
        debug_assert!(size >= 2 && size.is_power_of_two());
        let mut planner = FftPlanner::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        }
    }

    /// Transform size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reconstructs a real time-domain frame whose DFT magnitude matches
    /// `mag_half` (bins `0..=N/2`).
    ///
    /// Fails with [`CodecError::Numerical`] if the result is non-finite or
    /// the imaginary residual after the final transform exceeds the contract.
    pub fn reconstruct(&self, mag_half: &[f32]) -> CodecResult<Vec<f32>> {
        let n = self.size;
        debug_assert_eq!(mag_half.len(), n / 2 + 1);

        // Hermitian log-magnitude spectrum (purely real).
        let mut buf: Vec<Complex<f32>> = (0..n)
            .map(|k| {
                let m = mag_half[k.min(n - k)].max(LOG_FLOOR);
                Complex::new(m.ln(), 0.0)
            })
            .collect();

        // Inverse FFT to the cepstrum; rustfft does not normalize.
        self.inverse.process(&mut buf);
        let scale = 1.0 / n as f32;
        for c in buf.iter_mut() {
            *c *= scale;
        }

        // Causal shaping: keep c[0] and c[N/2], double 1..N/2, zero the rest.
        for (i, c) in buf.iter_mut().enumerate().skip(1) {
            if i < n / 2 {
                *c *= 2.0;
            } else if i > n / 2 {
                *c = Complex::new(0.0, 0.0);
            }
        }

        // Forward FFT gives the minimum-phase log spectrum; exponentiate.
        self.forward.process(&mut buf);
        for c in buf.iter_mut() {
            let mag = c.re.exp();
            *c = Complex::new(mag * c.im.cos(), mag * c.im.sin());
        }

        // Exact Hermitian symmetry so the final transform lands on the real
        // axis.
        buf[0].im = 0.0;
        buf[n / 2].im = 0.0;
        for k in n / 2 + 1..n {
            buf[k] = buf[n - k].conj();
        }

        self.inverse.process(&mut buf);

        let mut time = Vec::with_capacity(n);
        let mut max_re = 0.0f32;
        let mut max_im = 0.0f32;
        for c in &buf {
            let re = c.re * scale;
            max_re = max_re.max(re.abs());
            max_im = max_im.max((c.im * scale).abs());
            time.push(re);
        }

        if !max_re.is_finite() || !max_im.is_finite() {
            return Err(CodecError::numerical("non-finite samples"));
        }
        if max_im > MAX_IMAG_RATIO * max_re.max(LOG_FLOOR) {
            return Err(CodecError::numerical(format!(
                "imaginary residual {max_im:e} exceeds {MAX_IMAG_RATIO:e} of real peak {max_re:e}"
            )));
        }

        Ok(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Naive f64 DFT magnitude of a real signal, for verification only.
    fn dft_magnitude(x: &[f32]) -> Vec<f64> {
        let n = x.len();
        (0..=n / 2)
            .map(|k| {
                let (mut re, mut im) = (0.0f64, 0.0f64);
                for (i, &s) in x.iter().enumerate() {
                    let phi = -2.0 * std::f64::consts::PI * k as f64 * i as f64 / n as f64;
                    re += s as f64 * phi.cos();
                    im += s as f64 * phi.sin();
                }
                (re * re + im * im).sqrt()
            })
            .collect()
    }

    #[test]
    fn test_output_length_matches_size() {
        let mp = MinimumPhase::new(16);
        let mag = vec![0.5f32; 9];
        let time = mp.reconstruct(&mag).unwrap();
        assert_eq!(time.len(), 16);
        assert!(time.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_magnitude_is_preserved_for_smooth_spectrum() {
        let n = 32;
        let mp = MinimumPhase::new(n);
        let mag: Vec<f32> = (0..=n / 2).map(|k| 1.0 / (1.0 + k as f32)).collect();

        let time = mp.reconstruct(&mag).unwrap();
        let got = dft_magnitude(&time);

        for k in 0..=n / 2 {
            let want = mag[k] as f64;
            assert!(
                (got[k] - want).abs() <= 1.0e-2 * want.max(1.0e-6),
                "bin {k}: got {}, want {want}",
                got[k]
            );
        }
    }

    #[test]
    fn test_single_harmonic_spectrum() {
        let n = 16;
        let mp = MinimumPhase::new(n);
        let mut mag = vec![0.0f32; n / 2 + 1];
        mag[3] = 1.0;

        let time = mp.reconstruct(&mag).unwrap();
        let got = dft_magnitude(&time);

        assert!((got[3] - 1.0).abs() < 5.0e-3, "bin 3 was {}", got[3]);
        for (k, &m) in got.iter().enumerate() {
            if k != 3 {
                assert!(m <= 5.0e-3, "bin {k} leaked {m}");
            }
        }
    }

    #[test]
    fn test_fundamental_at_full_scale_peaks_near_one() {
        // |DFT|[1] = N/2 corresponds to a unit-amplitude sinusoid.
        let n = 8;
        let mp = MinimumPhase::new(n);
        let mut mag = vec![0.0f32; n / 2 + 1];
        mag[1] = (n / 2) as f32;

        let time = mp.reconstruct(&mag).unwrap();
        let peak = time.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!((0.9..=1.1).contains(&peak), "peak was {peak}");
    }

    #[test]
    fn test_all_zero_magnitude_is_near_silence() {
        let mp = MinimumPhase::new(8);
        let mag = vec![0.0f32; 5];
        let time = mp.reconstruct(&mag).unwrap();
        // Everything sits at the log floor.
        assert!(time.iter().all(|s| s.abs() < 1.0e-6));
    }

    #[test]
    fn test_smallest_table_size() {
        let mp = MinimumPhase::new(2);
        let time = mp.reconstruct(&[0.0, 1.0]).unwrap();
        assert_eq!(time.len(), 2);
        // Nyquist-only content: alternating-sign pair of equal magnitude.
        assert!((time[0].abs() - 0.5).abs() < 1.0e-3, "got {:?}", time);
        assert!((time[0] + time[1]).abs() < 1.0e-3, "got {:?}", time);
    }

    #[test]
    fn test_energy_is_front_loaded() {
        // Minimum-phase responses concentrate energy at small n.
        let n = 32;
        let mp = MinimumPhase::new(n);
        let mag: Vec<f32> = (0..=n / 2).map(|k| 1.0 / (1.0 + k as f32)).collect();
        let time = mp.reconstruct(&mag).unwrap();

        let front: f32 = time[..n / 2].iter().map(|s| s * s).sum();
        let back: f32 = time[n / 2..].iter().map(|s| s * s).sum();
        assert!(front > back, "front {front} <= back {back}");
    }
}
