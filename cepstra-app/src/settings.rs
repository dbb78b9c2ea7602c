//! Persistent CLI settings (JSON file in the user data directory).

use std::fs;
use std::path::{Path, PathBuf};

use cepstra_core::ExtractorConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    pub extractor: ExtractorConfig,
    /// Files decoded in parallel by `batch`.
    pub batch_concurrency: usize,
    pub pretty_json: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            batch_concurrency: 4,
            pretty_json: true,
        }
    }
}

impl AppSettings {
    /// Repair values a hand-edited file may get wrong. Anything still invalid
    /// afterwards is reported by `ExtractorConfig::validate`.
    pub fn normalize(&mut self) {
        let ex = &mut self.extractor;
        if ex.num_bands == 0 {
            ex.num_bands = ExtractorConfig::default().num_bands;
        }
        ex.n_mfcc = ex.n_mfcc.clamp(1, ex.num_bands);
        if !ex.chunk_duration.is_finite() || ex.chunk_duration <= 0.0 {
            ex.chunk_duration = ExtractorConfig::default().chunk_duration;
        }
        if ex.target_sample_rate == Some(0) {
            ex.target_sample_rate = None;
        }
        if !ex.low_freq.is_finite() || ex.low_freq < 0.0 {
            ex.low_freq = 0.0;
        }
        self.batch_concurrency = self.batch_concurrency.clamp(1, 64);
    }
}

/// Apply `CEPSTRA_*` environment overrides.
pub fn apply_env_overrides(settings: &mut AppSettings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

fn apply_overrides_from(settings: &mut AppSettings, lookup: impl Fn(&str) -> Option<String>) {
    let parsed = |key: &str| lookup(key).map(|v| v.trim().to_string());

    if let Some(v) = parsed("CEPSTRA_N_MFCC").and_then(|v| v.parse().ok()) {
        settings.extractor.n_mfcc = v;
    }
    if let Some(v) = parsed("CEPSTRA_NUM_BANDS").and_then(|v| v.parse().ok()) {
        settings.extractor.num_bands = v;
    }
    if let Some(v) = parsed("CEPSTRA_CHUNK_DURATION").and_then(|v| v.parse().ok()) {
        settings.extractor.chunk_duration = v;
    }
    if let Some(v) = parsed("CEPSTRA_TARGET_SAMPLE_RATE") {
        match v.to_ascii_lowercase().as_str() {
            "native" | "none" | "0" => settings.extractor.target_sample_rate = None,
            other => {
                if let Ok(rate) = other.parse() {
                    settings.extractor.target_sample_rate = Some(rate);
                }
            }
        }
    }
    if let Some(v) = parsed("CEPSTRA_BATCH_CONCURRENCY").and_then(|v| v.parse().ok()) {
        settings.batch_concurrency = v;
    }
    settings.normalize();
}

pub fn default_settings_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Lattice Labs")
            .join("Cepstra")
            .join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("cepstra")
            .join("settings.json")
    }
}

pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<AppSettings>(&raw).ok())
        .unwrap_or_default();
    settings.normalize();
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_settings(&dir.path().join("absent.json"));
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = AppSettings::default();
        settings.extractor = ExtractorConfig::librosa();
        settings.batch_concurrency = 2;
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn partial_file_fills_defaults_and_normalizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"extractor": {"nMfcc": 80, "numBands": 26}, "batchConcurrency": 0}"#,
        )
        .unwrap();
        let settings = load_settings(&path);
        assert_eq!(settings.extractor.num_bands, 26);
        assert_eq!(settings.extractor.n_mfcc, 26);
        assert_eq!(settings.batch_concurrency, 1);
        assert!(settings.pretty_json);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_settings(&path), AppSettings::default());
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            ("CEPSTRA_N_MFCC", "13"),
            ("CEPSTRA_TARGET_SAMPLE_RATE", "native"),
            ("CEPSTRA_CHUNK_DURATION", " 1.5 "),
            ("CEPSTRA_BATCH_CONCURRENCY", "nonsense"),
        ]
        .into_iter()
        .collect();
        let mut settings = AppSettings::default();
        apply_overrides_from(&mut settings, |k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.extractor.n_mfcc, 13);
        assert_eq!(settings.extractor.target_sample_rate, None);
        assert_eq!(settings.extractor.chunk_duration, 1.5);
        assert_eq!(settings.batch_concurrency, 4);
    }
}
