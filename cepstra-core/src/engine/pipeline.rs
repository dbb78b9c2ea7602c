//! Per-sample-rate analysis plan and the waveform → features pipeline.
//!
//! ```text
//! signal ─► Framer ─► power (T × bins) ─► mel (T × bands) ─► log + DCT (T × n_mfcc)
//!                                                                 │
//!                                                            mean over T
//! ```
//!
//! Everything in an `AnalysisPlan` depends only on configuration and sample
//! rate, so plans are built once and shared by every call at that rate.

use std::sync::Arc;

use ndarray::Array2;
use tracing::{debug, trace};

use crate::audio::Waveform;
use crate::chunking::Chunker;
use crate::dsp::{CepstralCompressor, Framer, LogScale, MelFilterBank, SpectralTransform};
use crate::error::{CepstraError, Result};
use crate::features::{mean_pool, ChunkFeatures, FeatureVector};

/// Frozen pipeline components for one sample rate.
pub struct AnalysisPlan {
    pub(crate) sample_rate: u32,
    pub(crate) framer: Framer,
    pub(crate) transform: Arc<dyn SpectralTransform>,
    pub(crate) mel_bank: Arc<MelFilterBank>,
    pub(crate) compressor: Arc<CepstralCompressor>,
    pub(crate) log_scale: LogScale,
}

impl std::fmt::Debug for AnalysisPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPlan")
            .field("sample_rate", &self.sample_rate)
            .field("frame_length", &self.framer.frame_length())
            .field("hop_length", &self.framer.hop_length())
            .field("fft_size", &self.transform.fft_size())
            .field("num_bands", &self.mel_bank.num_bands())
            .field("n_mfcc", &self.compressor.n_mfcc())
            .finish()
    }
}

impl AnalysisPlan {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    pub fn mel_bank(&self) -> &Arc<MelFilterBank> {
        &self.mel_bank
    }

    /// `(frames × n_mfcc)` coefficient matrix. Zero rows if the signal is
    /// too short for a single frame.
    ///
    /// # Errors
    /// `ExtractionFailure` on internal shape inconsistencies.
    pub fn feature_matrix(&self, signal: &[f32]) -> Result<Array2<f32>> {
        let frames = self.framer.frame_count(signal.len());
        let mut power = Array2::<f32>::zeros((frames, self.transform.num_bins()));

        for (frame, mut row) in self.framer.frames(signal).zip(power.rows_mut()) {
            let bins = row.as_slice_mut().ok_or_else(|| {
                CepstraError::ExtractionFailure(anyhow::anyhow!(
                    "power spectrogram row {} is not contiguous",
                    frame.offset
                ))
            })?;
            self.transform.power_spectrum_into(&frame.samples, bins)?;
        }

        let energies = self.mel_bank.apply_frames(&power)?;
        let coeffs = self.compressor.compress_frames(energies, self.log_scale)?;
        trace!(frames, n_mfcc = coeffs.ncols(), "feature matrix computed");
        Ok(coeffs)
    }

    /// Mean-pooled vector of `signal`.
    ///
    /// # Errors
    /// `EmptyInput` if the signal does not hold one analysis frame,
    /// `ExtractionFailure` if a coefficient comes out non-finite.
    pub fn pooled(&self, signal: &[f32]) -> Result<FeatureVector> {
        if self.framer.frame_count(signal.len()) == 0 {
            return Err(CepstraError::EmptyInput(format!(
                "{} samples do not fill one {}-sample frame",
                signal.len(),
                self.framer.frame_length()
            )));
        }
        let matrix = self.feature_matrix(signal)?;
        let vector = mean_pool(&matrix)?;
        vector.ensure_finite()?;
        Ok(vector)
    }

    /// One pooled vector per retained chunk of `waveform`, in chunk order.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the shortest chunk the chunker can retain
    /// does not hold one analysis frame. This depends only on the chunk size
    /// and the framer, never on the waveform length.
    pub fn pooled_chunks(
        &self,
        waveform: &Waveform,
        chunker: &Chunker,
    ) -> Result<Vec<ChunkFeatures>> {
        let shortest = chunker.min_retained_len();
        if self.framer.frame_count(shortest) == 0 {
            return Err(CepstraError::invalid(format!(
                "a retained chunk may hold only {shortest} samples, fewer than one {}-sample \
                 frame; increase the chunk duration or shorten the frame",
                self.framer.frame_length()
            )));
        }

        let mut out = Vec::with_capacity(chunker.retained_count(waveform.len()));
        for chunk in chunker.chunks(waveform) {
            trace!(
                index = chunk.index,
                start_secs = chunk.start_secs(),
                duration_secs = chunk.duration_secs(),
                "pooling chunk"
            );
            out.push(ChunkFeatures {
                index: chunk.index,
                start_secs: chunk.start_secs(),
                vector: self.pooled(chunk.samples)?,
            });
        }
        debug!(
            chunks = out.len(),
            chunk_samples = chunker.chunk_samples(),
            samples = waveform.len(),
            "chunked extraction"
        );
        Ok(out)
    }
}
