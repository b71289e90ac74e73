//! Locating the inputs of a run.
//!
//! Any failure here aborts the run before a single map is rendered.

use std::path::{Path, PathBuf};

use drought_common::{DroughtError, DroughtResult};
use geodata::BaseMap;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::RasterConfig;

/// Parsed base map plus the shapefiles to render, sorted by path.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub base: BaseMap,
    pub shapefiles: Vec<PathBuf>,
}

/// Load `<data>/us.json` and list `<data>/shapefiles/*.shp`.
pub fn discover(config: &RasterConfig) -> DroughtResult<Inputs> {
    let base = BaseMap::load(&config.topology_path())?;
    let shapefiles = list_shapefiles(&config.shapefiles_dir(), config.year)?;

    info!(
        data_dir = %config.data_dir.display(),
        year = ?config.year,
        shapefiles = shapefiles.len(),
        land = base.land.len(),
        states = base.states.len(),
        "Discovered inputs"
    );

    Ok(Inputs { base, shapefiles })
}

/// Shapefiles directly inside `dir`, optionally limited to one year.
pub fn list_shapefiles(dir: &Path, year: Option<i32>) -> DroughtResult<Vec<PathBuf>> {
    let mut shapefiles = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| DroughtError::ShapefileListing {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if is_shapefile(&name) && matches_year(&name, year) {
            shapefiles.push(entry.into_path());
        } else {
            debug!(file = %name, "Ignoring file");
        }
    }

    shapefiles.sort();
    Ok(shapefiles)
}

/// Whether a file name ends in `.shp`, ignoring case.
pub fn is_shapefile(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("shp"))
        .unwrap_or(false)
}

/// Whether a file name starts with `USDM_<year>`, ignoring case.
///
/// Without a year every name matches.
pub fn matches_year(name: &str, year: Option<i32>) -> bool {
    let Some(year) = year else {
        return true;
    };

    let prefix = format!("usdm_{:04}", year);
    name.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(&prefix))
        .unwrap_or(false)
}
