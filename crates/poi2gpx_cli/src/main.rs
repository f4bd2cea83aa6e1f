//! `poi2gpx` command-line entry point.
//!
//! # Responsibility
//! - Parse the input/output paths and hand them to `poi2gpx_core`.
//! - Configure logging from the environment before converting.
//! - Map conversion failure to a non-zero exit status.

use clap::Parser;
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;

const LOG_LEVEL_ENV: &str = "POI2GPX_LOG_LEVEL";
const LOG_DIR_ENV: &str = "POI2GPX_LOG_DIR";

/// Convert saved places GeoJSON into GPX waypoints.
#[derive(Debug, Parser)]
#[command(name = "poi2gpx", version)]
struct Cli {
    /// Saved places GeoJSON export to read.
    #[arg(long, alias = "inputGeoJsonFilepath", value_name = "PATH")]
    input_geojson_filepath: PathBuf,

    /// GPX file to create or replace.
    #[arg(long, alias = "outputGpxFilepath", value_name = "PATH")]
    output_gpx_filepath: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_logging();

    match poi2gpx_core::convert_file(&cli.input_geojson_filepath, &cli.output_gpx_filepath) {
        Ok(summary) => {
            if summary.link_only_comments > 0 {
                warn!(
                    "event=unresolved_positions module=cli status=ok count={}",
                    summary.link_only_comments
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("poi2gpx: {err}");
            ExitCode::FAILURE
        }
    }
}

// A bad logging setup is reported but never blocks the conversion.
fn configure_logging() {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| poi2gpx_core::default_log_level().to_string());
    let log_dir = std::env::var(LOG_DIR_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());

    if let Err(message) = poi2gpx_core::init_logging(&level, log_dir.as_deref()) {
        eprintln!("poi2gpx: logging disabled: {message}");
    }
}
