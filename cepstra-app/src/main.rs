//! Cepstra command-line entry point.
//!
//! ```text
//! cepstra [--settings <file>] [--compact] extract     <file.wav>
//! cepstra [--settings <file>] [--compact] chunks      <file.wav>
//! cepstra [--settings <file>] [--compact] model-input <file.wav>
//! cepstra [--settings <file>] [--compact] batch       <dir>
//! cepstra [--settings <file>] init-settings
//! ```
//!
//! Reports go to stdout as JSON; logs go to stderr.

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::{bail, Context};
use cepstra_core::MfccExtractor;
use serde::Serialize;
use settings::{apply_env_overrides, default_settings_path, load_settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: cepstra [--settings <file>] [--compact] <extract|chunks|model-input|batch> <path>\n       cepstra [--settings <file>] init-settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Extract,
    Chunks,
    ModelInput,
    Batch,
    InitSettings,
}

impl Command {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "extract" => Some(Self::Extract),
            "chunks" => Some(Self::Chunks),
            "model-input" | "model_input" => Some(Self::ModelInput),
            "batch" => Some(Self::Batch),
            "init-settings" => Some(Self::InitSettings),
            _ => None,
        }
    }

    fn takes_target(self) -> bool {
        !matches!(self, Self::InitSettings)
    }
}

#[derive(Debug)]
struct Args {
    command: Command,
    target: Option<PathBuf>,
    settings: Option<PathBuf>,
    compact: bool,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut command = None;
    let mut target = None;
    let mut settings = None;
    let mut compact = false;

    let mut it = raw.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--settings" => {
                let Some(v) = it.next() else {
                    bail!("missing value for --settings");
                };
                settings = Some(PathBuf::from(v));
            }
            "--compact" => compact = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if command.is_none() => {
                command = Some(
                    Command::parse(other).with_context(|| format!("unknown command: {other}"))?,
                );
            }
            other if target.is_none() => target = Some(PathBuf::from(other)),
            other => bail!("unexpected argument: {other}"),
        }
    }

    let Some(command) = command else {
        bail!("{USAGE}");
    };
    match (command.takes_target(), &target) {
        (true, None) => bail!("missing path for command\n{USAGE}"),
        (false, Some(extra)) => bail!("unexpected argument: {}", extra.display()),
        _ => {}
    }
    Ok(Args {
        command,
        target,
        settings,
        compact,
    })
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cepstra=info")),
        )
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let settings_path = args.settings.clone().unwrap_or_else(default_settings_path);
    let mut app_settings = load_settings(&settings_path);
    apply_env_overrides(&mut app_settings);
    let pretty = app_settings.pretty_json && !args.compact;

    info!(
        settings = %settings_path.display(),
        command = ?args.command,
        n_mfcc = app_settings.extractor.n_mfcc,
        "cepstra starting"
    );

    let extractor = MfccExtractor::new(app_settings.extractor.clone())
        .context("invalid extractor settings")?;

    let target = || args.target.as_deref().context("missing path for command");
    match args.command {
        Command::Extract => print_json(&commands::extract(&extractor, target()?)?, pretty),
        Command::Chunks => print_json(&commands::chunks(&extractor, target()?)?, pretty),
        Command::ModelInput => print_json(&commands::model_input(&extractor, target()?)?, pretty),
        Command::Batch => {
            let report =
                commands::batch(&extractor, target()?, app_settings.batch_concurrency).await?;
            print_json(&report, pretty)
        }
        Command::InitSettings => {
            let report = commands::init_settings(&settings_path, &app_settings)?;
            print_json(&report, pretty)
        }
    }
}
