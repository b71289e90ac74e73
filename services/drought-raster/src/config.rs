//! Run configuration for the batch renderer.

use std::path::PathBuf;

use drought_common::{DroughtError, DroughtResult};
use renderer::OutputFormat;

use crate::batch::FailurePolicy;

/// Default number of shapefiles rendered at once.
pub const DEFAULT_CONCURRENCY: usize = 52;

/// Everything a run needs, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Projection scale as a multiple of `width`
    pub scale: f64,
    /// Restrict the run to `USDM_<year>*.shp`
    pub year: Option<i32>,
    /// Holds `us.json` and `shapefiles/`
    pub data_dir: PathBuf,
    pub img_dir: PathBuf,
    pub concurrency: usize,
    pub policy: FailurePolicy,
    pub format: OutputFormat,
    /// Where to write the weeks manifest after a clean run
    pub weeks_js: Option<PathBuf>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: 455,
            height: 285,
            scale: 1.3,
            year: None,
            data_dir: PathBuf::from("data"),
            img_dir: PathBuf::from("img/drought"),
            concurrency: DEFAULT_CONCURRENCY,
            policy: FailurePolicy::KeepGoing,
            format: OutputFormat::Png,
            weeks_js: None,
        }
    }
}

impl RasterConfig {
    /// Reject configurations that cannot produce a map.
    pub fn validate(self) -> DroughtResult<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(DroughtError::InvalidConfig(format!(
                "width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(DroughtError::InvalidConfig(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if self.concurrency == 0 {
            return Err(DroughtError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    /// `<data_dir>/us.json`
    pub fn topology_path(&self) -> PathBuf {
        self.data_dir.join("us.json")
    }

    /// `<data_dir>/shapefiles`
    pub fn shapefiles_dir(&self) -> PathBuf {
        self.data_dir.join("shapefiles")
    }
}
