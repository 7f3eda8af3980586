//! Kinetics CLI library
//!
//! File handling for the `kinetics` binary: sample streams in, JSON reports
//! out. All analysis lives in `kinetics_core`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use kinetics_core::{AnalysisConfig, AnalysisRequest, PositionSample, SCHEMA_VERSION};

/// Input file: either a bare sample array or a full request.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputFile {
    Request(AnalysisRequest),
    Samples(Vec<PositionSample>),
}

/// Decoded input, normalized to a request.
pub fn load_request(path: &Path) -> Result<AnalysisRequest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let input: InputFile = serde_json::from_str(&text)
        .with_context(|| format!("Input is neither a sample array nor a request: {}", path.display()))?;

    let request = match input {
        InputFile::Request(request) => request,
        InputFile::Samples(samples) => AnalysisRequest {
            schema_version: SCHEMA_VERSION,
            subject_id: None,
            video_id: None,
            samples,
            config: None,
        },
    };
    debug!(samples = request.samples.len(), "input loaded");
    Ok(request)
}

/// Load a config file, picking the format from the extension.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let config = match ext.as_str() {
        "json" => AnalysisConfig::from_json_str(&text),
        "yaml" | "yml" => AnalysisConfig::from_yaml_str(&text),
        other => bail!("Unsupported config format '{}': expected .json, .yaml or .yml", other),
    };
    config.with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Config precedence: `--config` file, then a config embedded in the
/// request, then the named profile.
pub fn resolve_config(
    config_path: Option<&Path>,
    embedded: Option<AnalysisConfig>,
    profile: &str,
) -> Result<AnalysisConfig> {
    if let Some(path) = config_path {
        return load_config(path);
    }
    if let Some(config) = embedded {
        return config.validated().context("Invalid config embedded in the request");
    }
    match AnalysisConfig::preset(profile) {
        Some(config) => Ok(config),
        None => bail!("Unknown profile '{}': expected default, hd or strict", profile),
    }
}

/// Serialize a report to `out`, or stdout when `out` is `None`.
pub fn write_report<T: Serialize>(value: &T, out: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
            }
            fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Logs go to stderr so reports on stdout stay machine-readable.
/// `RUST_LOG` wins over the verbosity flag.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("failed to create log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("tracing init error: {err}"))?;
    Ok(())
}
