//! `weeks.js` manifest listing the rendered weekly maps.
//!
//! The browser view reads `var WEEKS = [...]` to know which week images
//! exist. Entries are PNG file stems, sorted.

use std::path::Path;

use drought_common::{DroughtError, DroughtResult};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use walkdir::WalkDir;

/// Sorted stems of every `*.png` directly inside `img_dir`.
pub fn week_stems(img_dir: &Path) -> DroughtResult<Vec<String>> {
    let mut stems = Vec::new();

    for entry in WalkDir::new(img_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            DroughtError::Manifest(format!("cannot list {}: {}", img_dir.display(), e))
        })?;

        let path = entry.path();
        let is_png = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);

        if entry.file_type().is_file() && is_png {
            if let Some(stem) = path.file_stem() {
                stems.push(stem.to_string_lossy().into_owned());
            }
        }
    }

    stems.sort();
    Ok(stems)
}

/// `var WEEKS = [...];` with a four-space indented array.
pub fn weeks_js(stems: &[String]) -> DroughtResult<String> {
    let mut json = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut json, PrettyFormatter::with_indent(b"    "));
    stems
        .serialize(&mut serializer)
        .map_err(|e| DroughtError::Manifest(e.to_string()))?;

    let json = String::from_utf8(json).map_err(|e| DroughtError::Manifest(e.to_string()))?;
    Ok(format!("var WEEKS = {};", json))
}

/// Write the manifest for `img_dir` to `path`; returns the number of weeks.
pub fn write_weeks_js(img_dir: &Path, path: &Path) -> DroughtResult<usize> {
    let stems = week_stems(img_dir)?;
    let js = weeks_js(&stems)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DroughtError::output(parent, e))?;
    }
    std::fs::write(path, js).map_err(|e| DroughtError::output(path, e))?;

    Ok(stems.len())
}
