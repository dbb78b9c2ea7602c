//! Pooled feature vectors and the model-input reshape.

use ndarray::{Array2, Array3, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{CepstraError, Result};

/// Fixed-length MFCC vector for one clip or one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    pub(crate) fn ensure_finite(&self) -> Result<()> {
        match self.0.iter().position(|v| !v.is_finite()) {
            Some(idx) => Err(CepstraError::ExtractionFailure(anyhow::anyhow!(
                "coefficient {idx} is not finite ({})",
                self.0[idx]
            ))),
            None => Ok(()),
        }
    }
}

impl AsRef<[f32]> for FeatureVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Pooled vector of one retained chunk, with its position in the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkFeatures {
    pub index: usize,
    /// Start of the chunk in seconds, from the rounded chunk size.
    pub start_secs: f64,
    pub vector: FeatureVector,
}

/// Mean over the frame axis of a `(frames × n_mfcc)` matrix.
///
/// # Errors
/// `EmptyInput` if the matrix has no frames.
pub fn mean_pool(matrix: &Array2<f32>) -> Result<FeatureVector> {
    matrix
        .mean_axis(Axis(0))
        .map(|mean| FeatureVector(mean.to_vec()))
        .ok_or_else(|| CepstraError::EmptyInput("feature matrix has zero frames".into()))
}

/// Reshape a vector into the `(batch=1, time=1, n_mfcc)` layout sequence
/// models take.
///
/// # Errors
/// `ShapeMismatch` if the vector does not hold exactly `n_mfcc` values.
pub fn to_model_input(vector: &FeatureVector, n_mfcc: usize) -> Result<Array3<f32>> {
    if vector.len() != n_mfcc {
        return Err(CepstraError::ShapeMismatch {
            expected: n_mfcc,
            actual: vector.len(),
        });
    }
    Ok(Array3::from_shape_vec((1, 1, n_mfcc), vector.as_slice().to_vec())?)
}
