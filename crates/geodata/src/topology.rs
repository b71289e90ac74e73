//! Base map geometry loaded from a TopoJSON topology.
//!
//! The topology (`us.json`) carries two named objects, `land` and
//! `states`. Both are decoded once per run and shared read-only by every
//! render task.

use std::path::Path;

use drought_common::{DroughtError, DroughtResult};
use topojson::{to_geojson, TopoJson, Topology};
use tracing::debug;

use crate::Geometry;

/// Object holding the land polygons.
pub const LAND_OBJECT: &str = "land";

/// Object holding one polygon per state.
pub const STATES_OBJECT: &str = "states";

/// Land and state geometry drawn under and over every drought layer.
#[derive(Debug, Clone, Default)]
pub struct BaseMap {
    pub land: Vec<Geometry>,
    pub states: Vec<Geometry>,
}

impl BaseMap {
    /// Read and decode a topology file.
    pub fn load(path: &Path) -> DroughtResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| DroughtError::TopologyRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let base = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            land = base.land.len(),
            states = base.states.len(),
            "Loaded base map"
        );
        Ok(base)
    }

    /// Decode a topology document.
    pub fn from_json(json: &str) -> DroughtResult<Self> {
        let topology = parse_topology(json)?;

        Ok(Self {
            land: object_geometries(&topology, LAND_OBJECT)?,
            states: object_geometries(&topology, STATES_OBJECT)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.land.is_empty() && self.states.is_empty()
    }
}

/// Parse a TopoJSON document that must be a `Topology`.
pub fn parse_topology(json: &str) -> DroughtResult<Topology> {
    let parsed = json
        .parse::<TopoJson>()
        .map_err(|e| DroughtError::TopologyParse(e.to_string()))?;

    match parsed {
        TopoJson::Topology(topology) => Ok(topology),
        _ => Err(DroughtError::TopologyParse(
            "document is not a Topology".to_string(),
        )),
    }
}

/// Names of the objects in a topology.
pub fn object_names(topology: &Topology) -> Vec<&str> {
    topology.objects.iter().map(|o| o.name.as_str()).collect()
}

/// Decode one named object into drawable geometry, one entry per feature.
///
/// Features without a drawable geometry (null or points) are dropped.
pub fn object_geometries(topology: &Topology, name: &str) -> DroughtResult<Vec<Geometry>> {
    if !topology.objects.iter().any(|o| o.name == name) {
        return Err(DroughtError::MissingObject(name.to_string()));
    }

    let collection =
        to_geojson(topology, name).map_err(|e| DroughtError::TopologyParse(e.to_string()))?;

    Ok(collection
        .features
        .iter()
        .filter_map(|feature| feature.geometry.as_ref())
        .filter_map(Geometry::from_geojson)
        .collect())
}
