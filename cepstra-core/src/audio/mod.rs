//! Decoded audio and the decoder boundary.
//!
//! The pipeline never touches files itself. An [`AudioDecoder`] turns a path
//! into a mono f32 [`Waveform`] at the rate features are computed at,
//! applying the requested [`ClipWindow`] on the way.
//!
//! # Contract
//!
//! Decoders report `AudioDecode` for unreadable input and `EmptyAudio` when
//! nothing is left after trimming. Existence of the path is checked by the
//! extractor before a decoder is invoked.

pub mod resample;
#[cfg(feature = "wav")]
pub mod wav;

#[cfg(feature = "wav")]
pub use wav::{collect_wav_files, WavDecoder};

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CepstraError, Result};

/// Mono samples at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// # Errors
    /// `InvalidConfiguration` if `sample_rate` is zero.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(CepstraError::invalid("sample rate must be > 0"));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Keep only the part of the waveform selected by `window`.
    pub fn trimmed(mut self, window: &ClipWindow) -> Self {
        let range = window.sample_range(self.samples.len(), self.sample_rate);
        self.samples.truncate(range.end);
        self.samples.drain(..range.start);
        self
    }
}

/// Portion of a recording to decode: `duration_secs` seconds starting at
/// `offset_secs`, or everything after the offset when `duration_secs` is
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipWindow {
    pub offset_secs: f64,
    pub duration_secs: Option<f64>,
}

impl ClipWindow {
    /// The whole recording.
    pub const fn full() -> Self {
        Self {
            offset_secs: 0.0,
            duration_secs: None,
        }
    }

    pub const fn new(offset_secs: f64, duration_secs: Option<f64>) -> Self {
        Self {
            offset_secs,
            duration_secs,
        }
    }

    /// # Errors
    /// `InvalidConfiguration` on a negative offset or a non-positive duration.
    pub fn validate(&self) -> Result<()> {
        if !self.offset_secs.is_finite() || self.offset_secs < 0.0 {
            return Err(CepstraError::invalid(format!(
                "clip offset must be >= 0 s, got {}",
                self.offset_secs
            )));
        }
        if let Some(d) = self.duration_secs {
            if !d.is_finite() || d <= 0.0 {
                return Err(CepstraError::invalid(format!(
                    "clip duration must be > 0 s, got {d}"
                )));
            }
        }
        Ok(())
    }

    /// Sample range selected in a recording of `len` samples at
    /// `sample_rate`, clamped to the recording.
    pub fn sample_range(&self, len: usize, sample_rate: u32) -> Range<usize> {
        let sr = sample_rate as f64;
        let start = ((self.offset_secs * sr).round() as usize).min(len);
        let end = match self.duration_secs {
            Some(d) => start.saturating_add((d * sr).round() as usize).min(len),
            None => len,
        };
        start..end
    }
}

impl Default for ClipWindow {
    fn default() -> Self {
        Self::full()
    }
}

/// Turns an audio file into a mono waveform.
///
/// Implementations must be shareable across threads; one decoder serves every
/// extraction made through an extractor.
pub trait AudioDecoder: Send + Sync {
    /// Decode the `window` portion of `path`.
    ///
    /// # Errors
    /// `AudioDecode` if the file cannot be read as audio, `EmptyAudio` if the
    /// selected portion holds no samples.
    fn decode(&self, path: &Path, window: &ClipWindow) -> Result<Waveform>;
}

/// Decoder used when the crate is built without any format support.
#[cfg(not(feature = "wav"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedDecoder;

#[cfg(not(feature = "wav"))]
impl AudioDecoder for UnsupportedDecoder {
    fn decode(&self, path: &Path, _window: &ClipWindow) -> Result<Waveform> {
        Err(CepstraError::AudioDecode {
            path: path.to_path_buf(),
            reason: "compiled without wav feature".into(),
        })
    }
}
