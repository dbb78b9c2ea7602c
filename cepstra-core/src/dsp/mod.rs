//! Numeric building blocks of the MFCC pipeline.
//!
//! ```text
//! samples → Framer → SpectralTransform → MelFilterBank → CepstralCompressor
//!           (Hann)    (|FFT|², L/2+1)     (bands × bins)   (log + DCT-II)
//! ```
//!
//! The `SpectralTransform` trait is the seam between the pipeline and the FFT
//! backend: `RustFftTransform` is the default, any routine producing the same
//! unscaled power spectrum can replace it.

pub mod cepstrum;
pub mod fft;
pub mod frame;
pub mod mel;

pub use cepstrum::{CepstralCompressor, DctNorm, LogScale};
pub use fft::RustFftTransform;
pub use frame::{hann_window, Frame, Framer, Frames, MAX_FRAME_LENGTH};
pub use mel::{MelBankKey, MelBankSpec, MelFilterBank, MelNorm, MelScale};

use crate::error::Result;

/// Contract for power-spectrum backends.
pub trait SpectralTransform: Send + Sync {
    /// Transform length in samples. Always a power of two.
    fn fft_size(&self) -> usize;

    /// Number of non-redundant bins, `fft_size / 2 + 1`.
    fn num_bins(&self) -> usize {
        self.fft_size() / 2 + 1
    }

    /// Write `|X[k]|²` for `k = 0..=fft_size/2` into `bins`.
    ///
    /// `frame` may be shorter than `fft_size`; the remainder is treated as
    /// zeros. `bins` must hold exactly `num_bins()` values.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the frame is longer than the transform or
    /// `bins` has the wrong length.
    fn power_spectrum_into(&self, frame: &[f32], bins: &mut [f32]) -> Result<()>;

    /// Allocating variant of [`SpectralTransform::power_spectrum_into`].
    fn power_spectrum(&self, frame: &[f32]) -> Result<Vec<f32>> {
        let mut bins = vec![0f32; self.num_bins()];
        self.power_spectrum_into(frame, &mut bins)?;
        Ok(bins)
    }
}
