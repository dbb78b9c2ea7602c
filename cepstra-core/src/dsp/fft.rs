use std::fmt;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::SpectralTransform;
use crate::error::{CepstraError, Result};

/// Power spectrum via a pre-planned `rustfft` forward transform.
pub struct RustFftTransform {
    size: usize,
    fft: Arc<dyn Fft<f32>>,
}

impl RustFftTransform {
    /// Plan a forward FFT of `size` points.
    ///
    /// # Errors
    /// `InvalidConfiguration` unless `size` is a non-zero power of two.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || !size.is_power_of_two() {
            return Err(CepstraError::invalid(format!(
                "FFT size must be a power of two, got {size}"
            )));
        }
        let fft = FftPlanner::<f32>::new().plan_fft_forward(size);
        Ok(Self { size, fft })
    }
}

impl fmt::Debug for RustFftTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RustFftTransform")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl SpectralTransform for RustFftTransform {
    fn fft_size(&self) -> usize {
        self.size
    }

    fn power_spectrum_into(&self, frame: &[f32], bins: &mut [f32]) -> Result<()> {
        if frame.len() > self.size {
            return Err(CepstraError::invalid(format!(
                "frame of {} samples exceeds FFT size {}",
                frame.len(),
                self.size
            )));
        }
        if bins.len() != self.num_bins() {
            return Err(CepstraError::invalid(format!(
                "power spectrum buffer holds {} bins, expected {}",
                bins.len(),
                self.num_bins()
            )));
        }

        let mut buf = vec![Complex::new(0.0f32, 0.0); self.size];
        for (slot, &s) in buf.iter_mut().zip(frame) {
            slot.re = s;
        }
        self.fft.process(&mut buf);

        for (bin, c) in bins.iter_mut().zip(&buf) {
            *bin = c.norm_sqr();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn naive_power(frame: &[f32], n: usize) -> Vec<f64> {
        (0..=n / 2)
            .map(|k| {
                let (mut re, mut im) = (0.0f64, 0.0f64);
                for (t, &x) in frame.iter().enumerate() {
                    let angle = -2.0 * PI * (k * t) as f64 / n as f64;
                    re += x as f64 * angle.cos();
                    im += x as f64 * angle.sin();
                }
                re * re + im * im
            })
            .collect()
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert!(RustFftTransform::new(0).is_err());
        assert!(RustFftTransform::new(400).is_err());
        assert!(RustFftTransform::new(512).is_ok());
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let fft = RustFftTransform::new(8).unwrap();
        let power = fft.power_spectrum(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(power.len(), 5);
        for p in power {
            assert_relative_eq!(p, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn matches_naive_dft() {
        let n = 64;
        let frame: Vec<f32> = (0..n)
            .map(|i| ((i as f32) * 0.37).sin() + 0.25 * ((i as f32) * 1.3).cos())
            .collect();
        let fft = RustFftTransform::new(n).unwrap();
        let fast = fft.power_spectrum(&frame).unwrap();
        let slow = naive_power(&frame, n);
        for (a, b) in fast.iter().zip(&slow) {
            assert_relative_eq!(*a as f64, *b, epsilon = 1e-3, max_relative = 1e-4);
        }
    }

    #[test]
    fn short_frame_is_zero_padded() {
        let fft = RustFftTransform::new(16).unwrap();
        let short = fft.power_spectrum(&[0.5, -0.25, 0.75]).unwrap();
        let mut padded = vec![0.0f32; 16];
        padded[..3].copy_from_slice(&[0.5, -0.25, 0.75]);
        let full = fft.power_spectrum(&padded).unwrap();
        assert_eq!(short, full);
    }

    #[test]
    fn parseval_holds_over_half_spectrum() {
        let n = 32;
        let frame: Vec<f32> = (0..n).map(|i| ((i * 7 % 11) as f32 - 5.0) / 5.0).collect();
        let fft = RustFftTransform::new(n).unwrap();
        let half = fft.power_spectrum(&frame).unwrap();

        // Rebuild the full spectrum from the Hermitian half.
        let full: f64 = half[0] as f64
            + half[n / 2] as f64
            + 2.0 * half[1..n / 2].iter().map(|&p| p as f64).sum::<f64>();
        let time: f64 = frame.iter().map(|&x| (x as f64) * (x as f64)).sum();
        assert_relative_eq!(full, time * n as f64, max_relative = 1e-4);
    }

    #[test]
    fn oversized_frame_rejected() {
        let fft = RustFftTransform::new(4).unwrap();
        assert!(matches!(
            fft.power_spectrum(&[0.0; 5]),
            Err(CepstraError::InvalidConfiguration(_))
        ));
    }
}
