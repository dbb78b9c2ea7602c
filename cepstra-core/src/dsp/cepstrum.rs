//! Log compression and DCT-II of mel band energies.

use std::f64::consts::PI;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{CepstraError, Result};

/// How band energies are compressed before the DCT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LogScale {
    /// `ln(energy + floor)`.
    Natural { floor: f32 },
    /// `10 · log10(max(energy, amin))`, optionally clamped to `max − top_db`
    /// over the whole clip.
    #[serde(rename_all = "camelCase")]
    Decibel { amin: f32, top_db: Option<f32> },
}

impl Default for LogScale {
    fn default() -> Self {
        Self::Natural { floor: 1e-10 }
    }
}

impl LogScale {
    /// # Errors
    /// `InvalidConfiguration` on a non-positive floor or a negative `top_db`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Natural { floor } if !(floor.is_finite() && floor > 0.0) => Err(
                CepstraError::invalid(format!("log floor must be > 0, got {floor}")),
            ),
            Self::Decibel { amin, .. } if !(amin.is_finite() && amin > 0.0) => Err(
                CepstraError::invalid(format!("decibel amin must be > 0, got {amin}")),
            ),
            Self::Decibel {
                top_db: Some(top), ..
            } if !(top.is_finite() && top >= 0.0) => Err(CepstraError::invalid(format!(
                "top_db must be >= 0, got {top}"
            ))),
            _ => Ok(()),
        }
    }

    fn compress_value(self, energy: f32) -> f32 {
        match self {
            Self::Natural { floor } => (energy + floor).ln(),
            Self::Decibel { amin, .. } => 10.0 * energy.max(amin).log10(),
        }
    }

    fn top_db(self) -> Option<f32> {
        match self {
            Self::Decibel { top_db, .. } => top_db,
            Self::Natural { .. } => None,
        }
    }
}

/// DCT-II scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DctNorm {
    /// Orthonormal basis.
    #[default]
    Ortho,
    /// `2 · Σ x[n] · cos(π k (2n + 1) / 2N)`.
    Unnormalized,
}

/// Truncated DCT-II over `num_bands` inputs, `n_mfcc` outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct CepstralCompressor {
    norm: DctNorm,
    /// `n_mfcc × num_bands`.
    basis: Array2<f32>,
}

impl CepstralCompressor {
    /// # Errors
    /// `InvalidConfiguration` unless `1 ≤ n_mfcc ≤ num_bands`.
    pub fn new(n_mfcc: usize, num_bands: usize, norm: DctNorm) -> Result<Self> {
        if n_mfcc == 0 {
            return Err(CepstraError::invalid("n_mfcc must be >= 1"));
        }
        if n_mfcc > num_bands {
            return Err(CepstraError::invalid(format!(
                "n_mfcc ({n_mfcc}) exceeds the number of mel bands ({num_bands})"
            )));
        }

        let n = num_bands as f64;
        let basis = Array2::from_shape_fn((n_mfcc, num_bands), |(k, i)| {
            let c = (PI * k as f64 * (2 * i + 1) as f64 / (2.0 * n)).cos();
            let scale = match norm {
                DctNorm::Ortho if k == 0 => (1.0 / n).sqrt(),
                DctNorm::Ortho => (2.0 / n).sqrt(),
                DctNorm::Unnormalized => 2.0,
            };
            (c * scale) as f32
        });

        Ok(Self { norm, basis })
    }

    pub fn n_mfcc(&self) -> usize {
        self.basis.nrows()
    }

    pub fn num_bands(&self) -> usize {
        self.basis.ncols()
    }

    pub fn norm(&self) -> DctNorm {
        self.norm
    }

    /// Cepstral coefficients of one frame's band energies.
    ///
    /// A `top_db` clamp, if configured, is applied relative to this frame's
    /// own maximum.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the energy vector length differs from
    /// `num_bands`.
    pub fn compress(&self, energies: ArrayView1<'_, f32>, scale: LogScale) -> Result<Array1<f32>> {
        let frame = energies.insert_axis(Axis(0)).to_owned();
        let coeffs = self.compress_frames(frame, scale)?;
        Ok(coeffs.row(0).to_owned())
    }

    /// Cepstral coefficients of a `(frames × num_bands)` energy matrix,
    /// returning `(frames × n_mfcc)`.
    ///
    /// # Errors
    /// As [`CepstralCompressor::compress`].
    pub fn compress_frames(&self, mut energies: Array2<f32>, scale: LogScale) -> Result<Array2<f32>> {
        if energies.ncols() != self.num_bands() {
            return Err(CepstraError::invalid(format!(
                "energy matrix has {} bands, compressor expects {}",
                energies.ncols(),
                self.num_bands()
            )));
        }

        energies.mapv_inplace(|e| scale.compress_value(e));
        if let Some(top_db) = scale.top_db() {
            let max_val = energies.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            if max_val.is_finite() {
                energies.mapv_inplace(|v| v.max(max_val - top_db));
            }
        }

        Ok(energies.dot(&self.basis.t()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn n_mfcc_bounds_enforced() {
        assert!(CepstralCompressor::new(0, 40, DctNorm::Ortho).is_err());
        assert!(CepstralCompressor::new(41, 40, DctNorm::Ortho).is_err());
        assert!(CepstralCompressor::new(40, 40, DctNorm::Ortho).is_ok());
    }

    #[test]
    fn ortho_basis_is_orthonormal() {
        let dct = CepstralCompressor::new(16, 16, DctNorm::Ortho).unwrap();
        let gram = dct.basis.dot(&dct.basis.t());
        for ((i, j), &v) in gram.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_relative_eq!(v, expected, epsilon = 1e-5);
        }
    }

    #[test]
    fn constant_log_energy_lands_in_c0() {
        let dct = CepstralCompressor::new(13, 40, DctNorm::Ortho).unwrap();
        let energies = Array1::from_elem(40, 1.0f32);
        let coeffs = dct
            .compress(energies.view(), LogScale::Natural { floor: 1e-10 })
            .unwrap();
        // ln(1 + 1e-10) ≈ 0 everywhere, so all coefficients vanish.
        for &c in coeffs.iter() {
            assert!(c.abs() < 1e-6);
        }

        let energies = Array1::from_elem(40, std::f32::consts::E);
        let coeffs = dct
            .compress(energies.view(), LogScale::Natural { floor: 1e-10 })
            .unwrap();
        assert_relative_eq!(coeffs[0], 40f32.sqrt(), max_relative = 1e-4);
        for &c in coeffs.iter().skip(1) {
            assert!(c.abs() < 1e-4);
        }
    }

    #[test]
    fn silence_stays_finite() {
        let energies = Array2::<f32>::zeros((4, 40));
        for scale in [
            LogScale::default(),
            LogScale::Decibel {
                amin: 1e-10,
                top_db: Some(80.0),
            },
        ] {
            let dct = CepstralCompressor::new(40, 40, DctNorm::Ortho).unwrap();
            let coeffs = dct.compress_frames(energies.clone(), scale).unwrap();
            assert_eq!(coeffs.dim(), (4, 40));
            assert!(coeffs.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn top_db_clamps_relative_to_clip_max() {
        let dct = CepstralCompressor::new(1, 2, DctNorm::Unnormalized).unwrap();
        let energies = ndarray::array![[1.0f32, 1e-12]];
        let scale = LogScale::Decibel {
            amin: 1e-10,
            top_db: Some(80.0),
        };
        let coeffs = dct.compress_frames(energies, scale).unwrap();
        // dB values 0 and -100 → clamped to 0 and -80; c0 = 2 · (0 − 80).
        assert_relative_eq!(coeffs[[0, 0]], -160.0, max_relative = 1e-5);
    }

    #[test]
    fn log_scale_validation() {
        assert!(LogScale::Natural { floor: 0.0 }.validate().is_err());
        assert!(LogScale::Decibel {
            amin: 1e-10,
            top_db: Some(-1.0)
        }
        .validate()
        .is_err());
        assert!(LogScale::default().validate().is_ok());
    }

    #[test]
    fn band_mismatch_rejected() {
        let dct = CepstralCompressor::new(4, 8, DctNorm::Ortho).unwrap();
        assert!(dct
            .compress_frames(Array2::zeros((2, 7)), LogScale::default())
            .is_err());
    }
}
