//! Temporary directories and output listings for tests.

use std::fs;
use std::path::Path;

/// A fresh temporary directory, removed when dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// A fresh temporary directory whose name starts with `prefix`.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// Sorted names of the files in `dir` with extension `ext`.
///
/// A missing directory lists as empty.
pub fn files_with_extension(dir: &Path, ext: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().map(|x| x == ext).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_prefix() {
        let dir = temp_test_dir_with_prefix("drought_");
        let name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("drought_"));
    }

    #[test]
    fn test_files_with_extension() {
        let dir = temp_test_dir();
        for name in ["b.png", "a.png", "a.svg", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        assert_eq!(files_with_extension(dir.path(), "png"), vec!["a.png", "b.png"]);
        assert!(files_with_extension(&dir.path().join("missing"), "png").is_empty());
    }
}
