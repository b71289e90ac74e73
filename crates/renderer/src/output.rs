//! Output file handling shared by the PNG and SVG writers.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use drought_common::{DroughtError, DroughtResult};

use crate::OutputFormat;

/// `<out_dir>/<source stem>.<ext>`.
pub fn output_path(source: &Path, out_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{}.{}", stem, format.extension()))
}

/// Open `path` for writing, creating its parent directory if missing.
///
/// An existing file is truncated.
pub fn create(path: &Path) -> DroughtResult<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DroughtError::output(parent, e))?;
    }

    let file = File::create(path).map_err(|e| DroughtError::output(path, e))?;
    Ok(BufWriter::new(file))
}

/// Flush buffered bytes and sync the file to disk.
pub fn finish(writer: BufWriter<File>, path: &Path) -> DroughtResult<()> {
    let file = writer
        .into_inner()
        .map_err(|e| DroughtError::output(path, e.error()))?;
    file.sync_all().map_err(|e| DroughtError::output(path, e))
}

/// Write a complete buffer to `path`.
pub fn write_all(path: &Path, bytes: &[u8]) -> DroughtResult<()> {
    let mut writer = create(path)?;
    writer
        .write_all(bytes)
        .map_err(|e| DroughtError::output(path, e))?;
    finish(writer, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_uses_stem() {
        let path = output_path(
            Path::new("data/shapefiles/USDM_20130101.shp"),
            Path::new("img/drought"),
            OutputFormat::Png,
        );
        assert_eq!(path, Path::new("img/drought/USDM_20130101.png"));

        let path = output_path(
            Path::new("usdm_20130101.shp"),
            Path::new("out"),
            OutputFormat::Svg,
        );
        assert_eq!(path, Path::new("out/usdm_20130101.svg"));
    }

    #[test]
    fn test_write_all_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("map.png");

        write_all(&path, b"first").unwrap();
        write_all(&path, b"2nd").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"2nd");
    }
}
