//! Overlapping, windowed analysis frames.
//!
//! Two layouts are supported:
//!
//! - **left-aligned** (default): frames start at `0, H, 2H, …`. At least one
//!   full frame must fit in the signal; later frames that run past the end
//!   are zero-padded instead of dropped.
//! - **centered**: the signal is conceptually padded with `N / 2` zeros on
//!   both sides, so frame `t` is centered on sample `t · H`.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::{CepstraError, Result};

/// Longest accepted analysis frame, in samples.
pub const MAX_FRAME_LENGTH: usize = 1 << 24;

/// Periodic Hann window of length `n`.
pub fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos()))
        .collect()
}

/// One windowed frame, zero-padded to the FFT size.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Start position in the analysis signal (the padded signal when
    /// centered).
    pub offset: usize,
    /// Windowed samples, `fft_size` long.
    pub samples: Vec<f32>,
}

/// Splits a signal into frames of `frame_length` samples every `hop_length`.
#[derive(Debug, Clone)]
pub struct Framer {
    frame_length: usize,
    hop_length: usize,
    fft_size: usize,
    center: bool,
    window: Arc<[f32]>,
}

impl Framer {
    /// # Errors
    /// `InvalidConfiguration` if either length is zero or the frame exceeds
    /// [`MAX_FRAME_LENGTH`].
    pub fn new(frame_length: usize, hop_length: usize, center: bool) -> Result<Self> {
        if frame_length == 0 {
            return Err(CepstraError::invalid("frame length must be > 0"));
        }
        if frame_length > MAX_FRAME_LENGTH {
            return Err(CepstraError::invalid(format!(
                "frame length must be <= {MAX_FRAME_LENGTH} samples, got {frame_length}"
            )));
        }
        if hop_length == 0 {
            return Err(CepstraError::invalid("hop length must be > 0"));
        }
        let fft_size = frame_length.checked_next_power_of_two().ok_or_else(|| {
            CepstraError::invalid(format!("no FFT size holds {frame_length} samples"))
        })?;
        Ok(Self {
            frame_length,
            hop_length,
            fft_size,
            center,
            window: hann_window(frame_length).into(),
        })
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Smallest power of two holding one frame.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn is_centered(&self) -> bool {
        self.center
    }

    /// Number of frames produced for a signal of `len` samples.
    pub fn frame_count(&self, len: usize) -> usize {
        if self.center {
            if len == 0 {
                0
            } else {
                1 + len / self.hop_length
            }
        } else if len < self.frame_length {
            0
        } else {
            // Frames must start inside the signal when the hop exceeds the
            // frame length.
            let to_cover_end = (len - self.frame_length).div_ceil(self.hop_length);
            1 + to_cover_end.min((len - 1) / self.hop_length)
        }
    }

    /// Lazily frame `signal`.
    pub fn frames<'a>(&'a self, signal: &'a [f32]) -> Frames<'a> {
        Frames {
            framer: self,
            signal,
            index: 0,
            count: self.frame_count(signal.len()),
        }
    }
}

/// Iterator returned by [`Framer::frames`].
pub struct Frames<'a> {
    framer: &'a Framer,
    signal: &'a [f32],
    index: usize,
    count: usize,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.index >= self.count {
            return None;
        }
        let f = self.framer;
        let offset = self.index * f.hop_length;
        self.index += 1;

        let pad = if f.center { f.frame_length / 2 } else { 0 };
        let mut samples = vec![0f32; f.fft_size];
        for (i, (out, w)) in samples.iter_mut().zip(f.window.iter()).enumerate() {
            // Position in the unpadded signal; outside it reads as zero.
            let Some(pos) = (offset + i).checked_sub(pad) else {
                continue;
            };
            if let Some(&s) = self.signal.get(pos) {
                *out = s * w;
            }
        }

        Some(Frame { offset, samples })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lengths_rejected() {
        assert!(matches!(
            Framer::new(0, 10, false),
            Err(CepstraError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Framer::new(10, 0, false),
            Err(CepstraError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn fft_size_rounds_up_to_power_of_two() {
        assert_eq!(Framer::new(400, 160, false).unwrap().fft_size(), 512);
        assert_eq!(Framer::new(2048, 512, false).unwrap().fft_size(), 2048);
    }

    #[test]
    fn left_aligned_count_pads_tail() {
        let framer = Framer::new(4, 2, false).unwrap();
        assert_eq!(framer.frame_count(3), 0);
        assert_eq!(framer.frame_count(4), 1);
        // Starts at 0, 2 and a zero-padded frame at 4.
        assert_eq!(framer.frame_count(7), 3);
        assert_eq!(framer.frame_count(8), 3);
    }

    #[test]
    fn centered_count_matches_hop_grid() {
        let framer = Framer::new(2048, 512, true).unwrap();
        assert_eq!(framer.frame_count(0), 0);
        assert_eq!(framer.frame_count(1), 1);
        assert_eq!(framer.frame_count(66_150), 1 + 66_150 / 512);
    }

    #[test]
    fn frames_are_windowed_and_zero_padded() {
        let framer = Framer::new(4, 2, false).unwrap();
        let signal = [1.0f32; 7];
        let frames: Vec<Frame> = framer.frames(&signal).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].offset, 4);

        let window = hann_window(4);
        assert_eq!(frames[0].samples, window);
        // Last frame covers samples 4..7 and one padded zero.
        assert_eq!(frames[2].samples[..3], window[..3]);
        assert_eq!(frames[2].samples[3], 0.0);
    }

    #[test]
    fn centered_first_frame_starts_with_padding() {
        let framer = Framer::new(4, 2, true).unwrap();
        let signal = [1.0f32, 1.0, 1.0, 1.0];
        let first = framer.frames(&signal).next().unwrap();
        let window = hann_window(4);
        assert_eq!(first.samples, vec![0.0, 0.0, window[2], window[3]]);
    }

    #[test]
    fn frames_report_exact_size() {
        let framer = Framer::new(8, 3, false).unwrap();
        let signal = vec![0.5f32; 40];
        let frames = framer.frames(&signal);
        assert_eq!(frames.len(), framer.frame_count(40));
    }

    #[test]
    fn frames_never_start_past_the_end() {
        let framer = Framer::new(4, 10, false).unwrap();
        assert_eq!(framer.frame_count(5), 1);
        assert_eq!(framer.frame_count(11), 2);
        let signal = [1.0f32; 11];
        let last = framer.frames(&signal).last().unwrap();
        assert_eq!(last.offset, 10);
    }

    #[test]
    fn oversized_frame_rejected() {
        assert!(matches!(
            Framer::new(usize::MAX, 512, false),
            Err(CepstraError::InvalidConfiguration(_))
        ));
        assert!(Framer::new(MAX_FRAME_LENGTH + 1, 512, false).is_err());
        // A huge hop only limits the frame count.
        let sparse = Framer::new(1_000, usize::MAX, false).unwrap();
        assert_eq!(sparse.fft_size(), 1_024);
        assert_eq!(sparse.frame_count(5_000), 1);
    }

    #[test]
    fn hann_is_periodic() {
        let w = hann_window(8);
        assert_eq!(w[0], 0.0);
        assert!((w[4] - 1.0).abs() < 1e-6);
        // Periodic form: w[1] == w[7].
        assert!((w[1] - w[7]).abs() < 1e-6);
    }
}
