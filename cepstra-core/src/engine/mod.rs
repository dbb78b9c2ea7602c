//! `MfccExtractor`, the public entry point.
//!
//! ## Paths
//!
//! ```text
//! extract(path)        → existence check → decode(clip window) → pooled vector
//! extract_chunks(path) → existence check → decode(full)        → chunk → pooled vectors
//! prepare_input(path)  → extract → (1, 1, n_mfcc) tensor
//! ```
//!
//! ## Caching
//!
//! Mel filter banks, FFT plans and DCT bases depend only on configuration and
//! sample rate. They are built on first use, frozen, and shared by every
//! clone of the extractor, so concurrent callers never rebuild them.
//!
//! ## Failures
//!
//! The path-based operations log each failure once, with the file and the
//! pipeline stage, then return it unchanged. Nothing substitutes a fallback
//! vector.

pub mod pipeline;

use std::path::Path;
use std::sync::Arc;

use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span};

use crate::audio::{AudioDecoder, ClipWindow, Waveform};
use crate::cache::FrozenCache;
use crate::chunking::Chunker;
use crate::dsp::{
    CepstralCompressor, DctNorm, Framer, LogScale, MelBankKey, MelBankSpec, MelFilterBank,
    MelNorm, MelScale, RustFftTransform, MAX_FRAME_LENGTH,
};
use crate::error::{CepstraError, Result};
use crate::features::{to_model_input, ChunkFeatures, FeatureVector};

pub use pipeline::AnalysisPlan;

/// A length given in samples or in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameSpan {
    Samples(usize),
    Seconds(f64),
}

impl FrameSpan {
    /// Length in samples at `sample_rate` (seconds are rounded).
    ///
    /// # Errors
    /// `InvalidConfiguration` if the span is not positive, rounds to zero or
    /// does not fit in `usize`.
    pub fn to_samples(self, sample_rate: u32) -> Result<usize> {
        let samples = match self {
            Self::Samples(n) => n,
            Self::Seconds(s) if s.is_finite() && s > 0.0 => {
                let exact = (s * sample_rate as f64).round();
                if exact >= usize::MAX as f64 {
                    return Err(CepstraError::invalid(format!(
                        "span of {s} s is too long at {sample_rate} Hz"
                    )));
                }
                exact as usize
            }
            Self::Seconds(s) => {
                return Err(CepstraError::invalid(format!("span must be > 0 s, got {s}")))
            }
        };
        if samples == 0 {
            return Err(CepstraError::invalid(format!(
                "{self:?} is zero samples at {sample_rate} Hz"
            )));
        }
        Ok(samples)
    }

    fn validate(self, what: &str) -> Result<()> {
        match self {
            Self::Samples(0) => Err(CepstraError::invalid(format!("{what} must be > 0 samples"))),
            Self::Seconds(s) if !(s.is_finite() && s > 0.0) => Err(CepstraError::invalid(
                format!("{what} must be > 0 s, got {s}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Configuration for `MfccExtractor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractorConfig {
    /// Coefficients per vector. Default: 40. Must not exceed `num_bands`.
    pub n_mfcc: usize,
    /// Mel bands. Default: 40.
    pub num_bands: usize,
    /// Analysis window. Default: 2048 samples.
    pub frame_length: FrameSpan,
    /// Distance between frame starts. Default: 512 samples.
    pub hop_length: FrameSpan,
    /// Center frames on `t · hop` with zero padding. Default: false.
    pub center: bool,
    /// Lowest mel edge in Hz. Default: 0.
    pub low_freq: f64,
    /// Highest mel edge in Hz; `None` = Nyquist.
    pub high_freq: Option<f64>,
    pub mel_scale: MelScale,
    pub mel_norm: MelNorm,
    pub log_scale: LogScale,
    pub dct_norm: DctNorm,
    /// Seconds per chunk on the chunked path. Default: 3.0.
    pub chunk_duration: f64,
    /// Rate features are computed at; `None` keeps each file's own rate.
    /// Default: 22050.
    pub target_sample_rate: Option<u32>,
    /// Portion of the file read on the single-clip path. Default: 3.0 s
    /// starting at 0.5 s. The chunked path always reads the whole file.
    pub clip: ClipWindow,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            n_mfcc: 40,
            num_bands: 40,
            frame_length: FrameSpan::Samples(2048),
            hop_length: FrameSpan::Samples(512),
            center: false,
            low_freq: 0.0,
            high_freq: None,
            mel_scale: MelScale::Slaney,
            mel_norm: MelNorm::Slaney,
            log_scale: LogScale::default(),
            dct_norm: DctNorm::Ortho,
            chunk_duration: 3.0,
            target_sample_rate: Some(22_050),
            clip: ClipWindow::new(0.5, Some(3.0)),
        }
    }
}

impl ExtractorConfig {
    /// Settings matching `librosa.feature.mfcc` defaults: 128 mel bands,
    /// centered frames and decibel compression clamped at 80 dB.
    pub fn librosa() -> Self {
        Self {
            num_bands: 128,
            center: true,
            log_scale: LogScale::Decibel {
                amin: 1e-10,
                top_db: Some(80.0),
            },
            ..Self::default()
        }
    }

    /// Checks everything that does not depend on the sample rate.
    ///
    /// # Errors
    /// `InvalidConfiguration` describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.num_bands == 0 {
            return Err(CepstraError::invalid("num_bands must be >= 1"));
        }
        if self.n_mfcc == 0 || self.n_mfcc > self.num_bands {
            return Err(CepstraError::invalid(format!(
                "n_mfcc must be in 1..={}, got {}",
                self.num_bands, self.n_mfcc
            )));
        }
        self.frame_length.validate("frame length")?;
        if let FrameSpan::Samples(n) = self.frame_length {
            if n > MAX_FRAME_LENGTH {
                return Err(CepstraError::invalid(format!(
                    "frame length must be <= {MAX_FRAME_LENGTH} samples, got {n}"
                )));
            }
        }
        self.hop_length.validate("hop length")?;
        if !self.low_freq.is_finite() || self.low_freq < 0.0 {
            return Err(CepstraError::invalid(format!(
                "low_freq must be >= 0 Hz, got {}",
                self.low_freq
            )));
        }
        if let Some(high) = self.high_freq {
            if !high.is_finite() || high <= self.low_freq {
                return Err(CepstraError::invalid(format!(
                    "high_freq must exceed low_freq ({}), got {high}",
                    self.low_freq
                )));
            }
        }
        self.log_scale.validate()?;
        if !self.chunk_duration.is_finite() || self.chunk_duration <= 0.0 {
            return Err(CepstraError::invalid(format!(
                "chunk_duration must be > 0 s, got {}",
                self.chunk_duration
            )));
        }
        if self.target_sample_rate == Some(0) {
            return Err(CepstraError::invalid("target_sample_rate must be > 0"));
        }
        self.clip.validate()
    }

    /// Filter bank parameters at `sample_rate`.
    pub fn mel_bank_spec(&self, sample_rate: u32, fft_size: usize) -> MelBankSpec {
        MelBankSpec {
            sample_rate,
            fft_size,
            num_bands: self.num_bands,
            low_freq: self.low_freq,
            high_freq: self.high_freq.unwrap_or(sample_rate as f64 / 2.0),
            scale: self.mel_scale,
            norm: self.mel_norm,
        }
    }
}

#[derive(Default)]
struct PlanCaches {
    plans: FrozenCache<u32, AnalysisPlan>,
    mel_banks: FrozenCache<MelBankKey, MelFilterBank>,
    transforms: FrozenCache<usize, RustFftTransform>,
    compressors: FrozenCache<(usize, usize, DctNorm), CepstralCompressor>,
}

#[cfg(feature = "wav")]
fn default_decoder(config: &ExtractorConfig) -> Arc<dyn AudioDecoder> {
    Arc::new(crate::audio::WavDecoder::new(config.target_sample_rate))
}

#[cfg(not(feature = "wav"))]
fn default_decoder(_config: &ExtractorConfig) -> Arc<dyn AudioDecoder> {
    Arc::new(crate::audio::UnsupportedDecoder)
}

/// MFCC feature extractor. Cheap to clone; clones share caches.
#[derive(Clone)]
pub struct MfccExtractor {
    config: Arc<ExtractorConfig>,
    decoder: Arc<dyn AudioDecoder>,
    caches: Arc<PlanCaches>,
}

impl std::fmt::Debug for MfccExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MfccExtractor")
            .field("config", &self.config)
            .field("cached_plans", &self.caches.plans.len())
            .finish_non_exhaustive()
    }
}

impl MfccExtractor {
    /// # Errors
    /// `InvalidConfiguration` if `config` fails [`ExtractorConfig::validate`].
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let decoder = default_decoder(&config);
        Ok(Self {
            config: Arc::new(config),
            decoder,
            caches: Arc::new(PlanCaches::default()),
        })
    }

    /// Replace the audio decoder.
    pub fn with_decoder<D: AudioDecoder + 'static>(mut self, decoder: D) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn n_mfcc(&self) -> usize {
        self.config.n_mfcc
    }

    /// Single mean-pooled vector for the configured clip window of `path`.
    ///
    /// # Errors
    /// `AudioNotFound`, `AudioDecode`, `EmptyAudio`, `InvalidConfiguration`,
    /// `EmptyInput` (clip shorter than one frame) or `ExtractionFailure`.
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<FeatureVector> {
        let path = path.as_ref();
        let _span = info_span!("extract", path = %path.display()).entered();
        let clip = self.config.clip;
        self.load(path, &clip)
            .and_then(|waveform| self.extract_waveform(&waveform))
            .inspect_err(|e| log_failure("single-clip", path, e))
    }

    /// One vector per retained chunk of the whole file at `path`. Empty when
    /// the file is shorter than half a chunk.
    ///
    /// # Errors
    /// As [`MfccExtractor::extract`], except that short input is not an
    /// error.
    pub fn extract_chunks(&self, path: impl AsRef<Path>) -> Result<Vec<FeatureVector>> {
        self.extract_chunk_features(path)
            .map(|chunks| chunks.into_iter().map(|c| c.vector).collect())
    }

    /// [`MfccExtractor::extract_chunks`] with each chunk's index and start
    /// time.
    ///
    /// # Errors
    /// As [`MfccExtractor::extract_chunks`].
    pub fn extract_chunk_features(&self, path: impl AsRef<Path>) -> Result<Vec<ChunkFeatures>> {
        let path = path.as_ref();
        let _span = info_span!("extract_chunks", path = %path.display()).entered();
        self.load(path, &ClipWindow::full())
            .and_then(|waveform| self.chunk_features_waveform(&waveform))
            .inspect_err(|e| log_failure("chunked", path, e))
    }

    /// [`MfccExtractor::extract`] reshaped to `(1, 1, n_mfcc)`.
    ///
    /// # Errors
    /// As [`MfccExtractor::extract`].
    pub fn prepare_input(&self, path: impl AsRef<Path>) -> Result<Array3<f32>> {
        let vector = self.extract(path)?;
        self.to_model_input(&vector)
    }

    /// Reshape a vector produced by this extractor into `(1, 1, n_mfcc)`.
    ///
    /// # Errors
    /// `ShapeMismatch` if `vector` does not hold `n_mfcc` values.
    pub fn to_model_input(&self, vector: &FeatureVector) -> Result<Array3<f32>> {
        to_model_input(vector, self.config.n_mfcc)
    }

    /// Mean-pooled vector of an in-memory waveform (no trimming).
    ///
    /// # Errors
    /// `EmptyInput` if the waveform does not hold one frame; configuration
    /// errors for the waveform's sample rate.
    pub fn extract_waveform(&self, waveform: &Waveform) -> Result<FeatureVector> {
        let plan = self.plan(waveform.sample_rate())?;
        let vector = plan.pooled(waveform.samples())?;
        debug!(
            samples = waveform.len(),
            sample_rate = waveform.sample_rate(),
            duration_secs = waveform.duration_secs(),
            frames = plan.framer().frame_count(waveform.len()),
            "clip extracted"
        );
        Ok(vector)
    }

    /// Chunked extraction of an in-memory waveform.
    ///
    /// # Errors
    /// Configuration errors for the waveform's sample rate or chunk size.
    pub fn extract_chunks_waveform(&self, waveform: &Waveform) -> Result<Vec<FeatureVector>> {
        self.chunk_features_waveform(waveform)
            .map(|chunks| chunks.into_iter().map(|c| c.vector).collect())
    }

    /// Chunked extraction of an in-memory waveform, keeping chunk positions.
    ///
    /// # Errors
    /// As [`MfccExtractor::extract_chunks_waveform`].
    pub fn chunk_features_waveform(&self, waveform: &Waveform) -> Result<Vec<ChunkFeatures>> {
        let plan = self.plan(waveform.sample_rate())?;
        let chunker = Chunker::from_duration(self.config.chunk_duration, waveform.sample_rate())?;
        plan.pooled_chunks(waveform, &chunker)
    }

    /// Full `(frames × n_mfcc)` matrix before pooling.
    ///
    /// # Errors
    /// Configuration errors for the waveform's sample rate.
    pub fn feature_matrix(&self, waveform: &Waveform) -> Result<Array2<f32>> {
        self.plan(waveform.sample_rate())?
            .feature_matrix(waveform.samples())
    }

    /// Frozen analysis plan for `sample_rate`, built on first use.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the configuration does not fit the rate
    /// (e.g. `high_freq` above Nyquist, frame span rounding to zero).
    pub fn plan(&self, sample_rate: u32) -> Result<Arc<AnalysisPlan>> {
        self.caches
            .plans
            .get_or_try_insert_with(sample_rate, || self.build_plan(sample_rate))
    }

    /// Shared filter bank for `sample_rate`.
    ///
    /// # Errors
    /// As [`MfccExtractor::plan`].
    pub fn mel_bank(&self, sample_rate: u32) -> Result<Arc<MelFilterBank>> {
        Ok(Arc::clone(self.plan(sample_rate)?.mel_bank()))
    }

    fn build_plan(&self, sample_rate: u32) -> Result<AnalysisPlan> {
        let cfg = &*self.config;
        let frame_length = cfg.frame_length.to_samples(sample_rate)?;
        let hop_length = cfg.hop_length.to_samples(sample_rate)?;
        let framer = Framer::new(frame_length, hop_length, cfg.center)?;
        let fft_size = framer.fft_size();

        let transform = self
            .caches
            .transforms
            .get_or_try_insert_with(fft_size, || RustFftTransform::new(fft_size))?;

        let spec = cfg.mel_bank_spec(sample_rate, fft_size);
        let mel_bank = self
            .caches
            .mel_banks
            .get_or_try_insert_with(spec.key(), || MelFilterBank::new(spec))?;

        let compressor = self.caches.compressors.get_or_try_insert_with(
            (cfg.n_mfcc, cfg.num_bands, cfg.dct_norm),
            || CepstralCompressor::new(cfg.n_mfcc, cfg.num_bands, cfg.dct_norm),
        )?;

        info!(
            sample_rate,
            frame_length,
            hop_length,
            fft_size,
            num_bands = cfg.num_bands,
            n_mfcc = cfg.n_mfcc,
            center = cfg.center,
            "analysis plan built"
        );

        Ok(AnalysisPlan {
            sample_rate,
            framer,
            transform,
            mel_bank,
            compressor,
            log_scale: cfg.log_scale,
        })
    }

    /// Existence check, decode, emptiness check.
    fn load(&self, path: &Path, window: &ClipWindow) -> Result<Waveform> {
        if !path.exists() {
            return Err(CepstraError::AudioNotFound {
                path: path.to_path_buf(),
            });
        }
        let waveform = self.decoder.decode(path, window)?;
        if waveform.is_empty() {
            return Err(CepstraError::EmptyAudio {
                path: path.to_path_buf(),
            });
        }
        Ok(waveform)
    }
}

fn log_failure(kind: &str, path: &Path, err: &CepstraError) {
    error!(
        path = %path.display(),
        stage = err.stage(),
        error = %err,
        "{kind} MFCC extraction failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(freq: f32, sample_rate: u32, len: usize) -> Waveform {
        let samples = (0..len)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();
        Waveform::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
        assert!(ExtractorConfig::librosa().validate().is_ok());
    }

    #[test]
    fn n_mfcc_above_bands_rejected() {
        let cfg = ExtractorConfig {
            n_mfcc: 41,
            ..ExtractorConfig::default()
        };
        assert!(matches!(
            MfccExtractor::new(cfg),
            Err(CepstraError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_spans_rejected() {
        for cfg in [
            ExtractorConfig {
                frame_length: FrameSpan::Samples(0),
                ..ExtractorConfig::default()
            },
            ExtractorConfig {
                hop_length: FrameSpan::Seconds(-0.01),
                ..ExtractorConfig::default()
            },
            ExtractorConfig {
                chunk_duration: 0.0,
                ..ExtractorConfig::default()
            },
        ] {
            assert!(MfccExtractor::new(cfg).is_err());
        }
    }

    #[test]
    fn spans_in_seconds_resolve_per_rate() {
        assert_eq!(FrameSpan::Seconds(0.025).to_samples(16_000).unwrap(), 400);
        assert_eq!(FrameSpan::Samples(512).to_samples(8_000).unwrap(), 512);
        assert!(FrameSpan::Seconds(1e-9).to_samples(16_000).is_err());
    }

    #[test]
    fn high_freq_above_nyquist_fails_at_plan_time() {
        let cfg = ExtractorConfig {
            high_freq: Some(10_000.0),
            ..ExtractorConfig::default()
        };
        let ex = MfccExtractor::new(cfg).unwrap();
        assert!(ex.plan(22_050).is_ok());
        assert!(matches!(
            ex.plan(16_000),
            Err(CepstraError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn plans_and_banks_are_shared() {
        let ex = MfccExtractor::new(ExtractorConfig::default()).unwrap();
        let a = ex.plan(22_050).unwrap();
        let b = ex.clone().plan(22_050).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&ex.mel_bank(22_050).unwrap(), a.mel_bank()));
        assert_eq!(ex.caches.mel_banks.len(), 1);

        ex.plan(16_000).unwrap();
        assert_eq!(ex.caches.mel_banks.len(), 2);
        // Same FFT size and DCT at both rates.
        assert_eq!(ex.caches.transforms.len(), 1);
        assert_eq!(ex.caches.compressors.len(), 1);
    }

    #[test]
    fn waveform_vector_has_n_mfcc_values() {
        let ex = MfccExtractor::new(ExtractorConfig {
            n_mfcc: 13,
            ..ExtractorConfig::default()
        })
        .unwrap();
        let v = ex.extract_waveform(&tone(440.0, 22_050, 22_050)).unwrap();
        assert_eq!(v.len(), 13);
        assert_eq!(ex.to_model_input(&v).unwrap().shape(), &[1, 1, 13]);
    }

    #[test]
    fn too_short_for_a_frame_is_empty_input() {
        let ex = MfccExtractor::new(ExtractorConfig::default()).unwrap();
        let short = tone(440.0, 22_050, 2_047);
        assert!(matches!(
            ex.extract_waveform(&short),
            Err(CepstraError::EmptyInput(_))
        ));
        let exact = tone(440.0, 22_050, 2_048);
        assert!(ex.extract_waveform(&exact).is_ok());
    }

    #[test]
    fn centered_layout_accepts_sub_frame_input() {
        let ex = MfccExtractor::new(ExtractorConfig::librosa()).unwrap();
        let short = tone(440.0, 22_050, 300);
        assert_eq!(ex.extract_waveform(&short).unwrap().len(), 40);
    }

    #[test]
    fn chunk_size_error_does_not_depend_on_length() {
        // 0.1 s is 2205 samples: full chunks hold a 2048-sample frame, but a
        // retained tail of 1103..2047 samples would not.
        let ex = MfccExtractor::new(ExtractorConfig {
            chunk_duration: 0.1,
            ..ExtractorConfig::default()
        })
        .unwrap();
        for len in [1_000, 2 * 2_205, 2 * 2_205 + 1_200, 10 * 2_205] {
            let result = ex.extract_chunks_waveform(&tone(440.0, 22_050, len));
            assert!(
                matches!(result, Err(CepstraError::InvalidConfiguration(_))),
                "{len} samples: {result:?}"
            );
        }

        // 0.2 s chunks: the shortest retained tail (2205) fills a frame.
        let ok = MfccExtractor::new(ExtractorConfig {
            chunk_duration: 0.2,
            ..ExtractorConfig::default()
        })
        .unwrap();
        for len in [1_000, 4_410 + 2_205, 3 * 4_410] {
            assert!(ok.extract_chunks_waveform(&tone(440.0, 22_050, len)).is_ok());
        }
    }

    #[test]
    fn chunk_features_report_rounded_offsets() {
        let ex = MfccExtractor::new(ExtractorConfig {
            chunk_duration: 1.0 / 3.0,
            ..ExtractorConfig::default()
        })
        .unwrap();
        // 1/3 s at 16 kHz rounds to 5333 samples.
        let chunks = ex
            .chunk_features_waveform(&tone(440.0, 16_000, 3 * 5_333))
            .unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].index, 2);
        assert_eq!(chunks[2].start_secs, 2.0 * 5_333.0 / 16_000.0);
        assert_eq!(
            ex.extract_chunks_waveform(&tone(440.0, 16_000, 3 * 5_333))
                .unwrap(),
            chunks.into_iter().map(|c| c.vector).collect::<Vec<_>>()
        );
    }

    #[test]
    fn huge_spans_are_rejected_not_panics() {
        let too_long = MfccExtractor::new(ExtractorConfig {
            frame_length: FrameSpan::Seconds(1e30),
            ..ExtractorConfig::default()
        })
        .unwrap();
        assert!(matches!(
            too_long.plan(22_050),
            Err(CepstraError::InvalidConfiguration(_))
        ));

        // 1000 s at 22.05 kHz is beyond the longest accepted frame.
        let long_frame = MfccExtractor::new(ExtractorConfig {
            frame_length: FrameSpan::Seconds(1_000.0),
            ..ExtractorConfig::default()
        })
        .unwrap();
        assert!(long_frame.plan(22_050).is_err());

        assert!(FrameSpan::Seconds(1e300).to_samples(48_000).is_err());
        assert!(MfccExtractor::new(ExtractorConfig {
            frame_length: FrameSpan::Samples(usize::MAX),
            ..ExtractorConfig::default()
        })
        .is_err());
        assert!(MfccExtractor::new(ExtractorConfig {
            hop_length: FrameSpan::Seconds(1e30),
            ..ExtractorConfig::default()
        })
        .unwrap()
        .plan(22_050)
        .is_err());
    }

    #[test]
    fn chunk_too_small_for_frame_is_config_error() {
        let ex = MfccExtractor::new(ExtractorConfig {
            chunk_duration: 0.05,
            ..ExtractorConfig::default()
        })
        .unwrap();
        // 0.05 s at 22.05 kHz is 1103 samples, less than a 2048-sample frame.
        let wave = tone(440.0, 22_050, 22_050);
        assert!(matches!(
            ex.extract_chunks_waveform(&wave),
            Err(CepstraError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let cfg = ExtractorConfig::librosa();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ExtractorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);

        let partial: ExtractorConfig =
            serde_json::from_str(r#"{"nMfcc": 13, "frameLength": {"seconds": 0.025}}"#).unwrap();
        assert_eq!(partial.n_mfcc, 13);
        assert_eq!(partial.frame_length, FrameSpan::Seconds(0.025));
        assert_eq!(partial.num_bands, 40);
    }
}
