//! Error types for the drought map pipeline.

use std::path::Path;

use thiserror::Error;

/// Result type alias using DroughtError.
pub type DroughtResult<T> = Result<T, DroughtError>;

/// Primary error type for discovery, rendering and output.
#[derive(Debug, Error)]
pub enum DroughtError {
    // === Discovery Errors ===
    #[error("Failed to read topology {path}: {message}")]
    TopologyRead { path: String, message: String },

    #[error("Invalid topology: {0}")]
    TopologyParse(String),

    #[error("Topology has no object named '{0}'")]
    MissingObject(String),

    #[error("Failed to list shapefiles in {path}: {message}")]
    ShapefileListing { path: String, message: String },

    // === Per-file Stream Errors ===
    #[error("Failed to read shapefile {path}: {message}")]
    ShapefileRead { path: String, message: String },

    // === Output Errors ===
    #[error("Failed to encode image: {0}")]
    ImageEncode(String),

    #[error("Failed to write {path}: {message}")]
    OutputWrite { path: String, message: String },

    #[error("Failed to build weeks manifest: {0}")]
    Manifest(String),

    // === Rendering Errors ===
    #[error("Canvas error: {0}")]
    Canvas(String),

    #[error("Render task failed: {0}")]
    TaskFailed(String),

    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DroughtError {
    pub fn shapefile(path: &Path, err: impl std::fmt::Display) -> Self {
        DroughtError::ShapefileRead {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn output(path: &Path, err: impl std::fmt::Display) -> Self {
        DroughtError::OutputWrite {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// True for errors raised while locating or parsing the run's inputs.
    ///
    /// These abort the whole run; everything else is scoped to one file.
    pub fn is_discovery(&self) -> bool {
        matches!(
            self,
            DroughtError::TopologyRead { .. }
                | DroughtError::TopologyParse(_)
                | DroughtError::MissingObject(_)
                | DroughtError::ShapefileListing { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_discovery_classification() {
        assert!(DroughtError::MissingObject("states".into()).is_discovery());
        assert!(DroughtError::TopologyParse("bad".into()).is_discovery());

        let path = PathBuf::from("data/shapefiles/USDM_20130101.shp");
        assert!(!DroughtError::shapefile(&path, "truncated record").is_discovery());
        assert!(!DroughtError::output(&path, "disk full").is_discovery());
    }

    #[test]
    fn test_error_messages_name_the_file() {
        let path = PathBuf::from("img/drought/USDM_20130101.png");
        let err = DroughtError::output(&path, "permission denied");
        assert_eq!(
            err.to_string(),
            "Failed to write img/drought/USDM_20130101.png: permission denied"
        );
    }
}
