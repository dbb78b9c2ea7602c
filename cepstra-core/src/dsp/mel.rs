//! Triangular mel filter bank.
//!
//! Rows are triangles whose corners sit on `num_bands + 2` points spaced
//! evenly on the mel scale between `low_freq` and `high_freq`, evaluated at
//! the centre frequency `k · sr / fft_size` of every FFT bin.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{CepstraError, Result};

/// Hz ↔ mel conversion formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MelScale {
    /// Linear below 1 kHz, logarithmic above (Slaney's Auditory Toolbox).
    #[default]
    Slaney,
    /// `2595 · log10(1 + f / 700)`.
    Htk,
}

const SLANEY_F_SP: f64 = 200.0 / 3.0;
const SLANEY_MIN_LOG_HZ: f64 = 1_000.0;
const SLANEY_MIN_LOG_MEL: f64 = SLANEY_MIN_LOG_HZ / SLANEY_F_SP; // 15

fn slaney_logstep() -> f64 {
    6.4_f64.ln() / 27.0
}

impl MelScale {
    pub fn hz_to_mel(self, hz: f64) -> f64 {
        match self {
            Self::Htk => 2595.0 * (1.0 + hz / 700.0).log10(),
            Self::Slaney => {
                if hz >= SLANEY_MIN_LOG_HZ {
                    SLANEY_MIN_LOG_MEL + (hz / SLANEY_MIN_LOG_HZ).ln() / slaney_logstep()
                } else {
                    hz / SLANEY_F_SP
                }
            }
        }
    }

    pub fn mel_to_hz(self, mel: f64) -> f64 {
        match self {
            Self::Htk => 700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0),
            Self::Slaney => {
                if mel >= SLANEY_MIN_LOG_MEL {
                    SLANEY_MIN_LOG_HZ * (slaney_logstep() * (mel - SLANEY_MIN_LOG_MEL)).exp()
                } else {
                    mel * SLANEY_F_SP
                }
            }
        }
    }
}

/// Per-row weighting of the triangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MelNorm {
    /// Scale each triangle by `2 / (f_upper − f_lower)` (constant area).
    #[default]
    Slaney,
    /// Triangles peak at 1.
    Peak,
}

/// Everything a filter bank depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelBankSpec {
    pub sample_rate: u32,
    pub fft_size: usize,
    pub num_bands: usize,
    pub low_freq: f64,
    pub high_freq: f64,
    pub scale: MelScale,
    pub norm: MelNorm,
}

/// Hashable identity of a [`MelBankSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MelBankKey {
    sample_rate: u32,
    fft_size: usize,
    num_bands: usize,
    low_freq_bits: u64,
    high_freq_bits: u64,
    scale: MelScale,
    norm: MelNorm,
}

impl MelBankSpec {
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    pub fn key(&self) -> MelBankKey {
        MelBankKey {
            sample_rate: self.sample_rate,
            fft_size: self.fft_size,
            num_bands: self.num_bands,
            low_freq_bits: self.low_freq.to_bits(),
            high_freq_bits: self.high_freq.to_bits(),
            scale: self.scale,
            norm: self.norm,
        }
    }

    /// # Errors
    /// `InvalidConfiguration` on zero sizes or a frequency range outside
    /// `0 ≤ low < high ≤ Nyquist`.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(CepstraError::invalid("sample rate must be > 0"));
        }
        if self.fft_size == 0 {
            return Err(CepstraError::invalid("FFT size must be > 0"));
        }
        if self.num_bands == 0 {
            return Err(CepstraError::invalid("mel band count must be >= 1"));
        }
        let nyquist = self.sample_rate as f64 / 2.0;
        if !self.low_freq.is_finite() || self.low_freq < 0.0 {
            return Err(CepstraError::invalid(format!(
                "low frequency must be >= 0 Hz, got {}",
                self.low_freq
            )));
        }
        if !self.high_freq.is_finite() || self.high_freq <= self.low_freq || self.high_freq > nyquist
        {
            return Err(CepstraError::invalid(format!(
                "high frequency must lie in ({}, {nyquist}] Hz, got {}",
                self.low_freq, self.high_freq
            )));
        }
        Ok(())
    }
}

/// Immutable `num_bands × (fft_size/2 + 1)` weight matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MelFilterBank {
    spec: MelBankSpec,
    weights: Array2<f32>,
}

impl MelFilterBank {
    /// # Errors
    /// See [`MelBankSpec::validate`].
    pub fn new(spec: MelBankSpec) -> Result<Self> {
        spec.validate()?;

        let n_bins = spec.num_bins();
        let mel_low = spec.scale.hz_to_mel(spec.low_freq);
        let mel_high = spec.scale.hz_to_mel(spec.high_freq);
        let hz_pts: Vec<f64> = (0..spec.num_bands + 2)
            .map(|i| {
                let mel = mel_low + (mel_high - mel_low) * i as f64 / (spec.num_bands + 1) as f64;
                spec.scale.mel_to_hz(mel)
            })
            .collect();
        let bin_freqs: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * spec.sample_rate as f64 / spec.fft_size as f64)
            .collect();

        let mut weights = Array2::<f32>::zeros((spec.num_bands, n_bins));
        for (m, mut row) in weights.rows_mut().into_iter().enumerate() {
            let (lower, center, upper) = (hz_pts[m], hz_pts[m + 1], hz_pts[m + 2]);
            let down = (center - lower).max(f64::MIN_POSITIVE);
            let up = (upper - center).max(f64::MIN_POSITIVE);
            let enorm = match spec.norm {
                MelNorm::Slaney => 2.0 / (upper - lower).max(f64::MIN_POSITIVE),
                MelNorm::Peak => 1.0,
            };
            for (w, &freq) in row.iter_mut().zip(&bin_freqs) {
                let rising = (freq - lower) / down;
                let falling = (upper - freq) / up;
                *w = (rising.min(falling).max(0.0) * enorm) as f32;
            }
        }

        Ok(Self { spec, weights })
    }

    pub fn spec(&self) -> &MelBankSpec {
        &self.spec
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn num_bands(&self) -> usize {
        self.weights.nrows()
    }

    pub fn num_bins(&self) -> usize {
        self.weights.ncols()
    }

    /// Band energies of one power spectrum.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the spectrum length differs from `num_bins`.
    pub fn apply(&self, power: ArrayView1<'_, f32>) -> Result<Array1<f32>> {
        if power.len() != self.num_bins() {
            return Err(CepstraError::invalid(format!(
                "power spectrum has {} bins, filter bank expects {}",
                power.len(),
                self.num_bins()
            )));
        }
        Ok(self.weights.dot(&power))
    }

    /// Band energies of a `(frames × bins)` power spectrogram.
    ///
    /// # Errors
    /// As [`MelFilterBank::apply`].
    pub fn apply_frames(&self, power: &Array2<f32>) -> Result<Array2<f32>> {
        if power.ncols() != self.num_bins() {
            return Err(CepstraError::invalid(format!(
                "power spectrogram has {} bins, filter bank expects {}",
                power.ncols(),
                self.num_bins()
            )));
        }
        Ok(power.dot(&self.weights.t()))
    }
}
