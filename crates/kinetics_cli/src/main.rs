//! Kinetics CLI
//!
//! Runs the movement analysis pipeline over a pose sample stream stored as
//! JSON and writes a JSON report.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "kinetics")]
#[command(version, about = "Movement analysis and trajectory prediction over pose streams", long_about = None)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct StreamArgs {
    /// Input JSON: a sample array or a full analysis request
    #[arg(long)]
    r#in: PathBuf,

    /// Output file (stdout when absent)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Config file (.json, .yaml or .yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in profile when no config is given: default, hd or strict
    #[arg(long, default_value = "default")]
    profile: String,

    /// Pretty-print the report
    #[arg(long, default_value = "false")]
    pretty: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline
    Analyze(StreamArgs),

    /// Trajectory forecast only
    Predict {
        #[command(flatten)]
        stream: StreamArgs,

        /// Spacing of predicted points (ms)
        #[arg(long)]
        horizon_ms: Option<f64>,
    },

    /// Eye / gaze analysis only
    Gaze(StreamArgs),

    /// Print the JSON schema of the full analysis report
    Schema {
        /// Output file (stdout when absent)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    use anyhow::Context;
    use kinetics_cli::{init_tracing, load_request, resolve_config, write_report};
    use kinetics_core::{analyze_gaze, analyze_request, predict_trajectory, StreamAnalysis};
    use tracing::info;

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Analyze(args) => {
            let mut request = load_request(&args.r#in)?;
            let config = resolve_config(args.config.as_deref(), request.config.take(), &args.profile)?;
            request.config = Some(config);

            let response = analyze_request(request).context("Analysis failed")?;
            write_report(&response, args.out.as_deref(), args.pretty)?;
        }

        Commands::Predict { stream: args, horizon_ms } => {
            let mut request = load_request(&args.r#in)?;
            let mut config = resolve_config(args.config.as_deref(), request.config.take(), &args.profile)?;
            if let Some(horizon) = horizon_ms {
                config.trajectory.horizon_ms = horizon;
                config = config.validated().context("Invalid --horizon-ms")?;
            }

            let prediction = predict_trajectory(&request.samples, &config);
            info!(
                status = ?prediction.status,
                points = prediction.predicted_positions.len(),
                "trajectory predicted"
            );
            write_report(&prediction, args.out.as_deref(), args.pretty)?;
        }

        Commands::Gaze(args) => {
            let mut request = load_request(&args.r#in)?;
            let config = resolve_config(args.config.as_deref(), request.config.take(), &args.profile)?;

            let gaze = analyze_gaze(&request.samples, &config);
            info!(status = ?gaze.status, records = gaze.record_count, "gaze analyzed");
            write_report(&gaze, args.out.as_deref(), args.pretty)?;
        }

        Commands::Schema { out } => {
            let schema = schemars::schema_for!(StreamAnalysis);
            write_report(&schema, out.as_deref(), true)?;
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("kinetics CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
