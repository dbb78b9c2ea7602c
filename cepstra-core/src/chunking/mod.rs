//! Fixed-duration, non-overlapping segmentation.
//!
//! A waveform is cut every `chunk_samples`. The final piece is kept only if it
//! holds at least half a chunk; shorter tails are treated as residual
//! noise/silence and dropped.

pub mod chunk;

pub use chunk::Chunk;

use crate::audio::Waveform;
use crate::error::{CepstraError, Result};

/// Splits waveforms into chunks of a fixed sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_samples: usize,
}

impl Chunker {
    /// # Errors
    /// `InvalidConfiguration` if `chunk_samples` is zero.
    pub fn new(chunk_samples: usize) -> Result<Self> {
        if chunk_samples == 0 {
            return Err(CepstraError::invalid("chunk must hold at least one sample"));
        }
        Ok(Self { chunk_samples })
    }

    /// `round(chunk_duration × sample_rate)` samples per chunk.
    ///
    /// # Errors
    /// `InvalidConfiguration` on a non-positive or non-finite duration, a zero
    /// sample rate, or a duration that rounds to zero samples.
    pub fn from_duration(chunk_duration: f64, sample_rate: u32) -> Result<Self> {
        if !chunk_duration.is_finite() || chunk_duration <= 0.0 {
            return Err(CepstraError::invalid(format!(
                "chunk duration must be > 0 s, got {chunk_duration}"
            )));
        }
        if sample_rate == 0 {
            return Err(CepstraError::invalid("sample rate must be > 0"));
        }
        let exact = (chunk_duration * sample_rate as f64).round();
        if exact >= usize::MAX as f64 {
            return Err(CepstraError::invalid(format!(
                "chunk duration {chunk_duration} s is too long at {sample_rate} Hz"
            )));
        }
        Self::new(exact as usize)
    }

    pub fn chunk_samples(&self) -> usize {
        self.chunk_samples
    }

    /// Whether a chunk of `len` samples is kept (`len ≥ chunk_samples / 2`).
    pub fn is_retained(&self, len: usize) -> bool {
        2 * len >= self.chunk_samples
    }

    /// Shortest chunk that is kept, `ceil(chunk_samples / 2)`.
    pub fn min_retained_len(&self) -> usize {
        self.chunk_samples / 2 + self.chunk_samples % 2
    }

    /// Number of chunks kept for a waveform of `len` samples.
    pub fn retained_count(&self, len: usize) -> usize {
        let full = len / self.chunk_samples;
        let rest = len % self.chunk_samples;
        full + usize::from(rest > 0 && self.is_retained(rest))
    }

    /// Retained chunks of `waveform`, in order.
    pub fn chunks<'a>(&self, waveform: &'a Waveform) -> impl Iterator<Item = Chunk<'a>> + 'a {
        let this = *self;
        let sample_rate = waveform.sample_rate();
        waveform
            .samples()
            .chunks(self.chunk_samples)
            .enumerate()
            .filter(move |(_, samples)| this.is_retained(samples.len()))
            .map(move |(index, samples)| Chunk {
                index,
                start: index * this.chunk_samples,
                samples,
                sample_rate,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waveform(len: usize, sample_rate: u32) -> Waveform {
        Waveform::new(vec![0.1; len], sample_rate).unwrap()
    }

    #[test]
    fn duration_rounds_to_samples() {
        assert_eq!(Chunker::from_duration(3.0, 22_050).unwrap().chunk_samples(), 66_150);
        // 0.1 s at 44.1 kHz is 4410 samples; round, not truncate.
        assert_eq!(Chunker::from_duration(0.1, 44_100).unwrap().chunk_samples(), 4_410);
        assert_eq!(Chunker::from_duration(1.0 / 3.0, 10).unwrap().chunk_samples(), 3);
    }

    #[test]
    fn invalid_durations_rejected() {
        for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(Chunker::from_duration(d, 16_000).is_err(), "{d} accepted");
        }
        assert!(Chunker::from_duration(1e-6, 16_000).is_err());
        assert!(Chunker::from_duration(1.0, 0).is_err());
        assert!(Chunker::from_duration(1e300, 48_000).is_err());
    }

    #[test]
    fn tail_above_half_is_kept() {
        let c = 1_000;
        let chunker = Chunker::new(c).unwrap();
        let w = waveform(7 * c + 600, 16_000);
        assert_eq!(chunker.chunks(&w).count(), 8);
        assert_eq!(chunker.retained_count(w.len()), 8);
    }

    #[test]
    fn tail_below_half_is_dropped() {
        let c = 1_000;
        let chunker = Chunker::new(c).unwrap();
        let w = waveform(7 * c + 400, 16_000);
        assert_eq!(chunker.chunks(&w).count(), 7);
        assert_eq!(chunker.retained_count(w.len()), 7);
    }

    #[test]
    fn exactly_half_is_kept() {
        let chunker = Chunker::new(1_000).unwrap();
        assert!(chunker.is_retained(500));
        assert!(!chunker.is_retained(499));
        // Odd chunk size: half of 5 is 2.5.
        let odd = Chunker::new(5).unwrap();
        assert!(!odd.is_retained(2));
        assert!(odd.is_retained(3));
        assert_eq!(odd.min_retained_len(), 3);
        assert_eq!(chunker.min_retained_len(), 500);
        assert!(chunker.is_retained(chunker.min_retained_len()));
    }

    #[test]
    fn short_waveform_yields_nothing() {
        let chunker = Chunker::new(1_000).unwrap();
        let w = waveform(499, 16_000);
        assert_eq!(chunker.chunks(&w).count(), 0);
    }

    #[test]
    fn chunks_preserve_order_and_offsets() {
        let chunker = Chunker::new(4).unwrap();
        let w = Waveform::new((0..10).map(|i| i as f32).collect(), 4).unwrap();
        let chunks: Vec<Chunk<'_>> = chunker.chunks(&w).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].start, 4);
        assert_eq!(chunks[1].samples, &[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(chunks[2].samples, &[8.0, 9.0]);
        assert_eq!(chunks[2].start_secs(), 2.0);
        assert_eq!(chunks[2].duration_secs(), 0.5);
    }
}
