//! A borrowed, fixed-duration slice of a waveform.

/// One retained chunk of a waveform.
///
/// Lives only for the duration of one chunked extraction.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Position of this chunk among *all* chunks, discarded ones included.
    pub index: usize,
    /// First sample of the chunk in the source waveform.
    pub start: usize,
    /// Mono f32 samples.
    pub samples: &'a [f32],
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Chunk<'_> {
    /// Start time in seconds.
    pub fn start_secs(&self) -> f64 {
        self.start as f64 / self.sample_rate as f64
    }

    /// Returns the duration of this chunk in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the chunk contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
