//! Drought raster renderer
//!
//! Renders one Albers USA map per weekly US Drought Monitor shapefile.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use drought_common::DroughtError;
use drought_raster::config::DEFAULT_CONCURRENCY;
use drought_raster::{
    block_on_detached, discover, weeks, BatchRunner, FailurePolicy, RasterConfig,
};
use renderer::{MapRenderer, OutputFormat};

/// Drought raster renderer
#[derive(Parser, Debug)]
#[command(name = "drought-raster")]
#[command(about = "Render weekly drought shapefiles to Albers USA map images")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 455, env = "DROUGHT_WIDTH")]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 285, env = "DROUGHT_HEIGHT")]
    height: u32,

    /// Projection scale as a multiple of the width
    #[arg(long, default_value_t = 1.3, env = "DROUGHT_SCALE")]
    scale: f64,

    /// Only render USDM_<year>*.shp
    #[arg(long)]
    year: Option<i32>,

    /// Directory holding us.json and shapefiles/
    #[arg(long, default_value = "data", env = "DROUGHT_DATA_DIR")]
    data_dir: PathBuf,

    /// Output directory for rendered maps
    #[arg(long, default_value = "img/drought", env = "DROUGHT_IMG_DIR")]
    img_dir: PathBuf,

    /// Maximum shapefiles rendered at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Stop at the first failed file
    #[arg(long)]
    fail_fast: bool,

    /// Output format: png or svg
    #[arg(long, default_value = "png")]
    format: OutputFormat,

    /// Write a weeks.js manifest of rendered PNGs here after a clean run
    #[arg(long)]
    weeks_js: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> RasterConfig {
        RasterConfig {
            width: self.width,
            height: self.height,
            scale: self.scale,
            year: self.year,
            data_dir: self.data_dir,
            img_dir: self.img_dir,
            concurrency: self.concurrency,
            policy: if self.fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::KeepGoing
            },
            format: self.format,
            weeks_js: self.weeks_js,
        }
    }
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // A fail-fast exit must not wait for renders still on the blocking pool
    match block_on_detached(runtime, run(args.into_config())) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            let discovery = e
                .downcast_ref::<DroughtError>()
                .is_some_and(DroughtError::is_discovery);
            error!(error = %format!("{:#}", e), discovery, "Run aborted");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every file rendered.
async fn run(config: RasterConfig) -> Result<bool> {
    let config = config.validate().context("Invalid configuration")?;
    info!(?config, "Starting drought raster run");

    let inputs = discover(&config).context("Failed to discover inputs")?;
    if inputs.shapefiles.is_empty() {
        warn!(dir = %config.shapefiles_dir().display(), year = ?config.year, "No shapefiles matched");
    }

    let renderer = MapRenderer::new(config.width, config.height, config.scale)
        .context("Failed to set up map renderer")?;

    let runner = BatchRunner::new(Arc::new(inputs.base), Arc::new(renderer), &config.img_dir)
        .with_format(config.format)
        .with_concurrency(config.concurrency)
        .with_policy(config.policy);

    let report = runner.run(inputs.shapefiles).await?;

    if !report.is_success() {
        for failure in &report.failed {
            eprintln!("Failed: {}", failure);
        }
        eprintln!(
            "Rendered {} files, {} failed",
            report.rendered.len(),
            report.failed.len()
        );
        return Ok(false);
    }

    println!("Rendered {} files", report.rendered.len());

    if let Some(path) = &config.weeks_js {
        let weeks = weeks::write_weeks_js(&config.img_dir, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), weeks, "Wrote weeks manifest");
    }

    Ok(true)
}
