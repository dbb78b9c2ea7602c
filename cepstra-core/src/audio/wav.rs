//! WAV decoding via `hound`.
//!
//! Integer PCM is scaled by `2^(bits − 1)` into [-1, 1); float PCM is taken
//! as-is. Channels are averaged to mono. Only the frames selected by the
//! clip window are read, then the result is resampled to the target rate.

use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::resample::{RateConverter, DEFAULT_CHUNK_SIZE};
use super::{AudioDecoder, ClipWindow, Waveform};
use crate::error::{CepstraError, Result};

/// Decodes RIFF/WAVE files to mono f32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavDecoder {
    /// Resample to this rate; `None` keeps the file's own rate.
    target_sample_rate: Option<u32>,
}

impl WavDecoder {
    pub fn new(target_sample_rate: Option<u32>) -> Self {
        Self { target_sample_rate }
    }

    pub fn target_sample_rate(&self) -> Option<u32> {
        self.target_sample_rate
    }
}

impl Default for WavDecoder {
    fn default() -> Self {
        Self::new(None)
    }
}

fn decode_error(path: &Path, reason: impl ToString) -> CepstraError {
    CepstraError::AudioDecode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn map_hound(path: &Path, e: hound::Error) -> CepstraError {
    match e {
        hound::Error::IoError(io) if io.kind() == io::ErrorKind::NotFound => {
            CepstraError::AudioNotFound {
                path: path.to_path_buf(),
            }
        }
        other => decode_error(path, other),
    }
}

/// Every `.wav` file under `dir`, recursively, in sorted order.
///
/// # Errors
/// I/O errors from reading `dir` or any subdirectory.
pub fn collect_wav_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                walk(&path, out)?;
                continue;
            }
            let is_wav = path
                .extension()
                .and_then(|s| s.to_str())
                .map(|s| s.eq_ignore_ascii_case("wav"))
                .unwrap_or(false);
            if is_wav {
                out.push(path);
            }
        }
        Ok(())
    }

    let mut out = Vec::new();
    walk(dir, &mut out)?;
    out.sort();
    Ok(out)
}

/// Read the `window` portion of a WAV stream as mono f32.
fn read_mono_f32<R: Read + Seek>(
    reader: &mut hound::WavReader<R>,
    window: &ClipWindow,
    path: &Path,
) -> Result<(Vec<f32>, u32)> {
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));
    let total_frames = reader.duration() as usize;
    let range = window.sample_range(total_frames, spec.sample_rate);
    let frames = range.len();

    if range.start > 0 {
        reader
            .seek(range.start as u32)
            .map_err(|e| decode_error(path, e))?;
    }
    let wanted = frames * channels;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .take(wanted)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| map_hound(path, e))?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .take(wanted)
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| map_hound(path, e))?
        }
    };

    if channels == 1 {
        return Ok((interleaved, spec.sample_rate));
    }

    let mono = interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();
    Ok((mono, spec.sample_rate))
}

impl AudioDecoder for WavDecoder {
    fn decode(&self, path: &Path, window: &ClipWindow) -> Result<Waveform> {
        window.validate()?;
        let mut reader = hound::WavReader::open(path).map_err(|e| map_hound(path, e))?;
        let (samples, native_rate) = read_mono_f32(&mut reader, window, path)?;

        if samples.is_empty() {
            return Err(CepstraError::EmptyAudio {
                path: path.to_path_buf(),
            });
        }

        let (samples, rate) = match self.target_sample_rate {
            Some(target) if target != native_rate => {
                let mut rc = RateConverter::new(native_rate, target, DEFAULT_CHUNK_SIZE)?;
                (rc.convert(&samples)?, target)
            }
            _ => (samples, native_rate),
        };

        debug!(
            path = %path.display(),
            native_rate,
            sample_rate = rate,
            samples = samples.len(),
            "decoded wav"
        );
        Waveform::new(samples, rate)
    }
}
