#[cfg(not(feature = "wav"))]
fn main() {
    eprintln!("cepstra benchmark requires the 'wav' feature");
    std::process::exit(1);
}

#[cfg(feature = "wav")]
fn main() {
    if let Err(e) = run() {
        eprintln!("benchmark failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(feature = "wav")]
fn run() -> Result<(), String> {
    use cepstra_core::audio::collect_wav_files;
    use cepstra_core::{ExtractorConfig, MfccExtractor};
    use serde::Serialize;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::time::Instant;

    #[derive(Debug)]
    struct Args {
        fixtures_dir: PathBuf,
        iterations: usize,
        output: Option<PathBuf>,
        config: Option<PathBuf>,
    }

    #[derive(Debug, Clone, Serialize)]
    struct CaseResult {
        file: String,
        mode: &'static str,
        iteration: usize,
        latency_ms: f64,
        vectors: usize,
        failed: bool,
    }

    #[derive(Debug, Clone, Serialize)]
    struct ModeSummary {
        mode: String,
        runs: usize,
        p50_latency_ms: f64,
        p95_latency_ms: f64,
        avg_latency_ms: f64,
        failure_rate: f64,
        total_vectors: usize,
    }

    #[derive(Debug, Clone, Serialize)]
    struct Summary {
        fixtures_dir: String,
        iterations: usize,
        total_runs: usize,
        total_files: usize,
        /// Plan construction on the first file (mel bank, FFT, DCT).
        cold_start_ms: f64,
        cold_start_failed: bool,
        p50_latency_ms: f64,
        p95_latency_ms: f64,
        avg_latency_ms: f64,
        failure_rate: f64,
        modes: Vec<ModeSummary>,
        cases: Vec<CaseResult>,
    }

    fn parse_args() -> Result<Args, String> {
        let mut fixtures_dir: Option<PathBuf> = None;
        let mut iterations: usize = 1;
        let mut output: Option<PathBuf> = None;
        let mut config: Option<PathBuf> = None;

        let mut it = std::env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--fixtures" => {
                    let Some(v) = it.next() else {
                        return Err("missing value for --fixtures".into());
                    };
                    fixtures_dir = Some(PathBuf::from(v));
                }
                "--iterations" => {
                    let Some(v) = it.next() else {
                        return Err("missing value for --iterations".into());
                    };
                    iterations = v
                        .parse::<usize>()
                        .map_err(|_| "invalid value for --iterations".to_string())?
                        .clamp(1, 100);
                }
                "--output" => {
                    let Some(v) = it.next() else {
                        return Err("missing value for --output".into());
                    };
                    output = Some(PathBuf::from(v));
                }
                "--config" => {
                    let Some(v) = it.next() else {
                        return Err("missing value for --config".into());
                    };
                    config = Some(PathBuf::from(v));
                }
                "--help" | "-h" => {
                    println!(
                        "Usage: cargo run -p cepstra-core --release --bin benchmark -- \\
  --fixtures <dir> [--iterations <n>] [--config <extractor.json>] [--output <file.json>]"
                    );
                    std::process::exit(0);
                }
                other => {
                    return Err(format!("unknown argument: {other}"));
                }
            }
        }

        let fixtures_dir = fixtures_dir.unwrap_or_else(|| PathBuf::from("benchmarks/fixtures"));
        Ok(Args {
            fixtures_dir,
            iterations,
            output,
            config,
        })
    }

    fn percentile(values: &[f64], p: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let idx = ((sorted.len() - 1) as f64 * p.clamp(0.0, 1.0)).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    fn failure_rate(rows: &[CaseResult]) -> f64 {
        if rows.is_empty() {
            0.0
        } else {
            rows.iter().filter(|r| r.failed).count() as f64 / rows.len() as f64
        }
    }

    fn summarize(mode: String, rows: &[CaseResult]) -> ModeSummary {
        let latencies = rows.iter().map(|r| r.latency_ms).collect::<Vec<_>>();
        ModeSummary {
            mode,
            runs: rows.len(),
            p50_latency_ms: percentile(&latencies, 0.50),
            p95_latency_ms: percentile(&latencies, 0.95),
            avg_latency_ms: mean(&latencies),
            failure_rate: failure_rate(rows),
            total_vectors: rows.iter().map(|r| r.vectors).sum(),
        }
    }

    let args = parse_args()?;
    if !args.fixtures_dir.exists() {
        return Err(format!(
            "fixtures directory not found: {}",
            args.fixtures_dir.display()
        ));
    }

    let config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
            serde_json::from_str::<ExtractorConfig>(&raw).map_err(|e| e.to_string())?
        }
        None => ExtractorConfig::default(),
    };
    let extractor = MfccExtractor::new(config).map_err(|e| e.to_string())?;

    let wav_files = collect_wav_files(&args.fixtures_dir).map_err(|e| e.to_string())?;
    if wav_files.is_empty() {
        return Err(format!(
            "no .wav fixtures found in {}",
            args.fixtures_dir.display()
        ));
    }

    println!(
        "Running cepstra benchmark on {} fixtures (iterations={})",
        wav_files.len(),
        args.iterations
    );

    // First call builds the plan for the target rate; time it separately.
    let cold = Instant::now();
    let cold_result = extractor.extract(&wav_files[0]);
    let cold_start_ms = cold.elapsed().as_secs_f64() * 1000.0;
    if let Err(e) = &cold_result {
        eprintln!(
            "cold start on {} failed ({}): {e}",
            wav_files[0].display(),
            e.stage()
        );
    }

    let mut cases = Vec::new();
    for wav in &wav_files {
        let file = wav
            .strip_prefix(&args.fixtures_dir)
            .unwrap_or(wav)
            .display()
            .to_string();

        for iteration in 1..=args.iterations {
            let started = Instant::now();
            let clip = extractor.extract(wav);
            let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
            cases.push(CaseResult {
                file: file.clone(),
                mode: "clip",
                iteration,
                latency_ms,
                vectors: usize::from(clip.is_ok()),
                failed: clip.is_err(),
            });

            let started = Instant::now();
            let chunks = extractor.extract_chunks(wav);
            let chunk_ms = started.elapsed().as_secs_f64() * 1000.0;
            cases.push(CaseResult {
                file: file.clone(),
                mode: "chunked",
                iteration,
                latency_ms: chunk_ms,
                vectors: chunks.as_ref().map(Vec::len).unwrap_or(0),
                failed: chunks.is_err(),
            });

            println!(
                "{file} [{iteration}/{iters}] clip {latency_ms:.2} ms, chunked {chunk_ms:.2} ms",
                iters = args.iterations,
            );
        }
    }

    let mut grouped: BTreeMap<String, Vec<CaseResult>> = BTreeMap::new();
    for row in &cases {
        grouped
            .entry(row.mode.to_string())
            .or_default()
            .push(row.clone());
    }
    let modes = grouped
        .into_iter()
        .map(|(name, rows)| summarize(name, &rows))
        .collect::<Vec<_>>();

    let all_latencies = cases.iter().map(|r| r.latency_ms).collect::<Vec<_>>();
    let summary = Summary {
        fixtures_dir: args.fixtures_dir.display().to_string(),
        iterations: args.iterations,
        total_runs: cases.len(),
        total_files: wav_files.len(),
        cold_start_ms,
        cold_start_failed: cold_result.is_err(),
        p50_latency_ms: percentile(&all_latencies, 0.50),
        p95_latency_ms: percentile(&all_latencies, 0.95),
        avg_latency_ms: mean(&all_latencies),
        failure_rate: failure_rate(&cases),
        modes,
        cases,
    };

    println!(
        "Done. runs={} cold={:.1}ms p50={:.2}ms p95={:.2}ms failures={:.1}%",
        summary.total_runs,
        summary.cold_start_ms,
        summary.p50_latency_ms,
        summary.p95_latency_ms,
        summary.failure_rate * 100.0
    );

    let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    if let Some(out) = args.output {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        std::fs::write(&out, json).map_err(|e| e.to_string())?;
        println!("Wrote benchmark report: {}", out.display());
    } else {
        println!("{json}");
    }

    Ok(())
}
