//! # cepstra-core
//!
//! Mel-frequency cepstral coefficient extraction for audio clips.
//!
//! ## Architecture
//!
//! ```text
//! path → AudioDecoder (trim, mono, resample) → Waveform
//!                                                 │
//!                         ┌───────────────────────┴──────────────────┐
//!                   single clip                                   Chunker
//!                         │                                  (half-chunk rule)
//!                         ▼                                          ▼
//!        Framer → SpectralTransform → MelFilterBank → CepstralCompressor
//!                                                         │
//!                                                     mean pool
//!                                                         │
//!                                     FeatureVector ──► (1, 1, n_mfcc)
//! ```
//!
//! Filter banks, FFT plans and DCT bases are built once per configuration
//! and sample rate and shared read-only across threads.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod audio;
pub mod cache;
pub mod chunking;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod features;

// Convenience re-exports for downstream crates
pub use audio::{AudioDecoder, ClipWindow, Waveform};
pub use chunking::Chunker;
pub use dsp::{DctNorm, LogScale, MelNorm, MelScale, SpectralTransform};
pub use engine::{ExtractorConfig, FrameSpan, MfccExtractor};
pub use error::{CepstraError, Result};
pub use features::{ChunkFeatures, FeatureVector};

#[cfg(feature = "wav")]
pub use audio::WavDecoder;
