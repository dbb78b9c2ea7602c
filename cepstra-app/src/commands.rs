//! CLI command handlers.
//!
//! Each handler runs one extractor operation and returns a serializable
//! report; `main` prints it as JSON.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cepstra_core::audio::collect_wav_files;
use cepstra_core::{CepstraError, ChunkFeatures, FeatureVector, MfccExtractor};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::settings::{save_settings, AppSettings};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractReport {
    pub file: String,
    pub n_mfcc: usize,
    pub vector: FeatureVector,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunksReport {
    pub file: String,
    pub chunk_duration: f64,
    pub chunks: Vec<ChunkFeatures>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInputReport {
    pub file: String,
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub file: String,
    pub chunks: usize,
    pub vectors: Vec<FeatureVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub dir: String,
    pub generated_at: DateTime<Utc>,
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<BatchEntry>,
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSettingsReport {
    pub path: String,
    pub settings: AppSettings,
}

/// Write the effective settings (file, normalization and env overrides
/// applied) back to `path`.
pub fn init_settings(path: &Path, settings: &AppSettings) -> anyhow::Result<InitSettingsReport> {
    save_settings(path, settings).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "settings written");
    Ok(InitSettingsReport {
        path: display(path),
        settings: settings.clone(),
    })
}

/// Single mean-pooled vector for the configured clip window.
pub fn extract(extractor: &MfccExtractor, path: &Path) -> anyhow::Result<ExtractReport> {
    let vector = extractor
        .extract(path)
        .with_context(|| format!("extract {}", path.display()))?;
    Ok(ExtractReport {
        file: display(path),
        n_mfcc: extractor.n_mfcc(),
        vector,
    })
}

/// One vector per retained chunk of the whole file.
pub fn chunks(extractor: &MfccExtractor, path: &Path) -> anyhow::Result<ChunksReport> {
    let chunks = extractor
        .extract_chunk_features(path)
        .with_context(|| format!("chunk {}", path.display()))?;
    Ok(ChunksReport {
        file: display(path),
        chunk_duration: extractor.config().chunk_duration,
        chunks,
    })
}

/// `(1, 1, n_mfcc)` classifier input, flattened in row-major order.
pub fn model_input(extractor: &MfccExtractor, path: &Path) -> anyhow::Result<ModelInputReport> {
    let input = extractor
        .prepare_input(path)
        .with_context(|| format!("prepare input for {}", path.display()))?;
    Ok(ModelInputReport {
        file: display(path),
        shape: input.shape().to_vec(),
        data: input.iter().copied().collect(),
    })
}

/// Chunked extraction over every `.wav` under `dir`. Per-file failures are
/// recorded in the report rather than aborting the batch.
pub async fn batch(
    extractor: &MfccExtractor,
    dir: &Path,
    concurrency: usize,
) -> anyhow::Result<BatchReport> {
    let files = collect_wav_files(dir).with_context(|| format!("scan {}", dir.display()))?;
    info!(dir = %dir.display(), files = files.len(), concurrency, "batch started");

    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for (slot, path) in files.into_iter().enumerate() {
        let permit = Arc::clone(&permits).acquire_owned().await?;
        let extractor = extractor.clone();
        tasks.spawn_blocking(move || {
            let result = extractor.extract_chunks(&path);
            drop(permit);
            (slot, path, result)
        });
    }

    let mut rows: Vec<(usize, BatchEntry)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (slot, path, result) = joined.context("batch worker panicked")?;
        rows.push((slot, batch_entry(&path, result)));
    }
    rows.sort_by_key(|(slot, _)| *slot);

    let files: Vec<BatchEntry> = rows.into_iter().map(|(_, entry)| entry).collect();
    let failed = files.iter().filter(|f| f.error.is_some()).count();
    if failed > 0 {
        warn!(failed, "some files could not be processed");
    }
    Ok(BatchReport {
        dir: display(dir),
        generated_at: Utc::now(),
        succeeded: files.len() - failed,
        failed,
        files,
    })
}

fn batch_entry(path: &Path, result: Result<Vec<FeatureVector>, CepstraError>) -> BatchEntry {
    match result {
        Ok(vectors) => BatchEntry {
            file: display(path),
            chunks: vectors.len(),
            vectors,
            error: None,
            stage: None,
        },
        Err(e) => BatchEntry {
            file: display(path),
            chunks: 0,
            vectors: Vec::new(),
            stage: Some(e.stage()),
            error: Some(e.to_string()),
        },
    }
}
