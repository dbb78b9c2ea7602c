//! Sample-rate conversion using a rubato `FastFixedIn` resampler.
//!
//! ## Design
//!
//! Files arrive at whatever rate they were recorded at; features are computed
//! at one target rate so that filter banks and frame sizes line up across
//! clips. `RateConverter` converts a whole decoded buffer in one call.
//!
//! When source rate == target rate, `RateConverter` is a passthrough and no
//! rubato session is created at all.
//!
//! ## Usage
//!
//! ```ignore
//! let mut rc = RateConverter::new(48_000, 22_050, 1024)?;
//! let out = rc.convert(&decoded)?; // Vec<f32> at 22.05 kHz
//! ```

use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::debug;

use crate::error::{CepstraError, Result};

/// Input frame count per rubato call used by decoders.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Converts f32 mono audio from one fixed sample rate to another.
pub struct RateConverter {
    /// `None` when source rate == target rate (passthrough mode).
    resampler: Option<FastFixedIn<f32>>,
    /// `target_rate / source_rate`.
    ratio: f64,
    /// How many input samples rubato expects per process call.
    chunk_size: usize,
    /// Pre-allocated output buffer: `[1][output_frames_max]`.
    output_buf: Vec<Vec<f32>>,
}

fn resample_failure(context: &str, e: impl std::error::Error + Send + Sync + 'static) -> CepstraError {
    CepstraError::ExtractionFailure(anyhow::Error::new(e).context(context.to_string()))
}

impl RateConverter {
    /// Create a new converter.
    ///
    /// # Parameters
    /// - `source_rate`: Sample rate of the decoded audio (Hz).
    /// - `target_rate`: Sample rate features are computed at (Hz).
    /// - `chunk_size`: Input frame count per rubato call (e.g. `1024`).
    ///
    /// # Errors
    /// `InvalidConfiguration` on a zero rate or chunk size,
    /// `ExtractionFailure` if rubato fails to initialise.
    pub fn new(source_rate: u32, target_rate: u32, chunk_size: usize) -> Result<Self> {
        if source_rate == 0 || target_rate == 0 {
            return Err(CepstraError::invalid("sample rates must be > 0"));
        }
        if chunk_size == 0 {
            return Err(CepstraError::invalid("resampler chunk size must be > 0"));
        }

        let ratio = target_rate as f64 / source_rate as f64;
        if source_rate == target_rate {
            return Ok(Self {
                resampler: None,
                ratio,
                chunk_size,
                output_buf: Vec::new(),
            });
        }

        let resampler = FastFixedIn::<f32>::new(
            ratio,
            1.0, // fixed ratio, no dynamic adjustment
            PolynomialDegree::Cubic,
            chunk_size,
            1, // mono
        )
        .map_err(|e| resample_failure("resampler init", e))?;

        let max_out = resampler.output_frames_max();
        let output_buf = vec![vec![0f32; max_out]; 1];

        debug!(source_rate, target_rate, chunk_size, max_out, "resampling enabled");

        Ok(Self {
            resampler: Some(resampler),
            ratio,
            chunk_size,
            output_buf,
        })
    }

    /// Convert a complete buffer.
    ///
    /// The output holds `ceil(len × target / source)` samples, aligned with
    /// the input (the resampler's output delay is removed).
    ///
    /// # Errors
    /// `ExtractionFailure` if rubato rejects a block.
    pub fn convert(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        let Some(ref mut resampler) = self.resampler else {
            return Ok(samples.to_vec());
        };
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let expected = (samples.len() as f64 * self.ratio).ceil() as usize;
        let delay = resampler.output_delay();
        let wanted = expected + delay;
        let mut out = Vec::with_capacity(wanted + self.output_buf[0].len());

        let mut blocks = samples.chunks_exact(self.chunk_size);
        for block in blocks.by_ref() {
            let (_consumed, produced) = resampler
                .process_into_buffer(&[block], &mut self.output_buf, None)
                .map_err(|e| resample_failure("resampler process", e))?;
            out.extend_from_slice(&self.output_buf[0][..produced]);
        }

        let tail = blocks.remainder();
        if !tail.is_empty() {
            let (_consumed, produced) = resampler
                .process_partial_into_buffer(Some(&[tail]), &mut self.output_buf, None)
                .map_err(|e| resample_failure("resampler tail", e))?;
            out.extend_from_slice(&self.output_buf[0][..produced]);
        }

        // Flush the filter delay line with silence.
        while out.len() < wanted {
            let (_consumed, produced) = resampler
                .process_partial_into_buffer(None::<&[&[f32]]>, &mut self.output_buf, None)
                .map_err(|e| resample_failure("resampler flush", e))?;
            if produced == 0 {
                break;
            }
            out.extend_from_slice(&self.output_buf[0][..produced]);
        }

        out.drain(..delay.min(out.len()));
        out.truncate(expected);
        Ok(out)
    }

    /// Returns `true` when source rate == target rate (no resampling occurs).
    pub fn is_passthrough(&self) -> bool {
        self.resampler.is_none()
    }
}
