//! Batch rendering of weekly US Drought Monitor shapefiles.
//!
//! One PNG (or SVG) per shapefile, projected with Albers USA over a shared
//! land and state base map:
//! - `config`: validated run configuration
//! - `discovery`: base map loading and shapefile enumeration
//! - `batch`: bounded-concurrency render controller
//! - `weeks`: `weeks.js` manifest of rendered weeks

pub mod batch;
pub mod config;
pub mod discovery;
pub mod weeks;

pub use batch::{block_on_detached, BatchReport, BatchRunner, FailurePolicy, FileFailure};
pub use config::RasterConfig;
pub use discovery::{discover, Inputs};
