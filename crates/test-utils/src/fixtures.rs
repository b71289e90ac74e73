//! Common test fixtures for drought map tests.
//!
//! Provides a temporary data directory laid out like a real run
//! (`data/us.json`, `data/shapefiles/*.shp`, `img/drought/`), a synthetic
//! base map covering the contiguous US, and shapefile writers.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing, Writer};

use crate::generators::rect_ring;

/// Default output canvas used by the batch renderer.
pub mod canvas {
    pub const WIDTH: u32 = 455;
    pub const HEIGHT: u32 = 285;
    pub const SCALE: f64 = 1.3;
}

/// Notable (lon, lat) points for testing.
pub mod coords {
    /// Center of the lower 48 sub-projection
    pub const LOWER48_CENTER: (f64, f64) = (-96.6, 38.7);

    pub const DENVER: (f64, f64) = (-104.99, 39.74);
    pub const NEW_YORK: (f64, f64) = (-74.0, 40.7);
    pub const ANCHORAGE: (f64, f64) = (-149.9, 61.2);
    pub const HONOLULU: (f64, f64) = (-157.8, 21.3);

    /// Outside every inset
    pub const PARIS: (f64, f64) = (2.35, 48.85);
}

/// Bounding boxes (min_lon, min_lat, max_lon, max_lat) of the synthetic base map.
pub mod bbox {
    /// Land rectangle roughly covering the contiguous US
    pub const CONUS: (f64, f64, f64, f64) = (-124.7, 25.0, -67.0, 49.0);

    /// Western synthetic state
    pub const WEST: (f64, f64, f64, f64) = (-124.7, 25.0, -100.0, 49.0);

    /// Eastern synthetic state
    pub const EAST: (f64, f64, f64, f64) = (-100.0, 25.0, -67.0, 49.0);
}

/// One polygon record of a drought shapefile.
#[derive(Debug, Clone)]
pub struct TestFeature {
    /// `DM` attribute; `None` writes a blank numeric field
    pub dm: Option<f64>,
    /// Exterior ring first, then holes
    pub rings: Vec<Vec<(f64, f64)>>,
}

impl TestFeature {
    pub fn new(dm: f64, ring: Vec<(f64, f64)>) -> Self {
        Self {
            dm: Some(dm),
            rings: vec![ring],
        }
    }

    pub fn without_severity(ring: Vec<(f64, f64)>) -> Self {
        Self {
            dm: None,
            rings: vec![ring],
        }
    }

    pub fn with_hole(mut self, hole: Vec<(f64, f64)>) -> Self {
        // Holes are wound opposite to the exterior
        self.rings.push(hole.into_iter().rev().collect());
        self
    }
}

/// Build a TopoJSON topology with `land` and `states` objects.
///
/// Every ring becomes its own arc and every entry one polygon.
pub fn topology_json(land: &[Vec<(f64, f64)>], states: &[Vec<(f64, f64)>]) -> String {
    let mut arcs: Vec<Value> = Vec::new();
    let land = polygon_collection(&mut arcs, land);
    let states = polygon_collection(&mut arcs, states);

    json!({
        "type": "Topology",
        "objects": {
            "land": land,
            "states": states,
        },
        "arcs": arcs,
    })
    .to_string()
}

fn polygon_collection(arcs: &mut Vec<Value>, rings: &[Vec<(f64, f64)>]) -> Value {
    let geometries: Vec<Value> = rings
        .iter()
        .map(|ring| {
            let index = arcs.len();
            arcs.push(json!(ring.iter().map(|&(x, y)| [x, y]).collect::<Vec<_>>()));
            json!({ "type": "Polygon", "arcs": [[index]] })
        })
        .collect();

    json!({ "type": "GeometryCollection", "geometries": geometries })
}

/// Synthetic base map: one land rectangle and two state rectangles.
pub fn conus_topology_json() -> String {
    let rect = |(a, b, c, d): (f64, f64, f64, f64)| rect_ring(a, b, c, d);
    topology_json(&[rect(bbox::CONUS)], &[rect(bbox::WEST), rect(bbox::EAST)])
}

/// Write a drought shapefile (`.shp`, `.shx`, `.dbf`) with a numeric `DM` field.
///
/// Zero features produce a valid, empty shapefile.
pub fn write_drought_shapefile(path: &Path, features: &[TestFeature]) {
    if features.is_empty() {
        write_empty_shapefile(path);
        return;
    }

    let table = TableWriterBuilder::new().add_numeric_field(
        FieldName::try_from("DM").expect("valid field name"),
        10,
        0,
    );
    let mut writer = Writer::from_path(path, table).expect("Failed to create shapefile");

    for feature in features {
        let rings = feature
            .rings
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                let points: Vec<Point> = ring.iter().map(|&(x, y)| Point::new(x, y)).collect();
                if i == 0 {
                    PolygonRing::Outer(points)
                } else {
                    PolygonRing::Inner(points)
                }
            })
            .collect();

        let mut record = Record::default();
        record.insert("DM".to_string(), FieldValue::Numeric(feature.dm));

        writer
            .write_shape_and_record(&Polygon::with_rings(rings), &record)
            .expect("Failed to write shapefile record");
    }
}

/// Write a polygon shapefile with no records.
///
/// Written byte by byte because shapefile writers only emit a header once
/// the first shape arrives.
pub fn write_empty_shapefile(path: &Path) {
    let header = empty_shp_header();
    fs::write(path.with_extension("shp"), &header).expect("Failed to write .shp");
    fs::write(path.with_extension("shx"), &header).expect("Failed to write .shx");
    fs::write(path.with_extension("dbf"), empty_dbf()).expect("Failed to write .dbf");
}

fn empty_shp_header() -> Vec<u8> {
    const POLYGON: i32 = 5;

    let mut header = Vec::with_capacity(100);
    header.extend_from_slice(&9994i32.to_be_bytes()); // file code
    header.extend_from_slice(&[0u8; 20]);
    header.extend_from_slice(&50i32.to_be_bytes()); // length in 16-bit words
    header.extend_from_slice(&1000i32.to_le_bytes()); // version
    header.extend_from_slice(&POLYGON.to_le_bytes());
    for _ in 0..8 {
        header.extend_from_slice(&0f64.to_le_bytes()); // bbox and z/m ranges
    }
    header
}

fn empty_dbf() -> Vec<u8> {
    let field_count = 1u16;
    let header_len = 32 + 32 * field_count + 1;
    let record_len = 1u16 + 10;

    let mut dbf = Vec::new();
    dbf.push(0x03); // dBase III without memo
    dbf.extend_from_slice(&[113, 1, 1]); // last update 2013-01-01
    dbf.extend_from_slice(&0u32.to_le_bytes()); // record count
    dbf.extend_from_slice(&header_len.to_le_bytes());
    dbf.extend_from_slice(&record_len.to_le_bytes());
    dbf.extend_from_slice(&[0u8; 20]);

    // Field descriptor: DM, numeric, width 10, no decimals
    let mut name = [0u8; 11];
    name[..2].copy_from_slice(b"DM");
    dbf.extend_from_slice(&name);
    dbf.push(b'N');
    dbf.extend_from_slice(&[0u8; 4]);
    dbf.push(10);
    dbf.push(0);
    dbf.extend_from_slice(&[0u8; 14]);

    dbf.push(0x0D); // header terminator
    dbf.push(0x1A); // end of file
    dbf
}

/// Write files that look like a shapefile by name only.
pub fn write_corrupt_shapefile(path: &Path) {
    fs::write(path.with_extension("shp"), b"this is not a shapefile").expect("Failed to write .shp");
    fs::write(path.with_extension("dbf"), b"nor is this a dbase table").expect("Failed to write .dbf");
}

/// A temporary directory laid out like a real run.
///
/// ```text
/// <root>/data/us.json
/// <root>/data/shapefiles/*.shp
/// <root>/img/drought/
/// ```
pub struct DroughtDataDir {
    root: tempfile::TempDir,
}

impl DroughtDataDir {
    /// Empty layout without a topology file.
    pub fn new() -> Self {
        let root = crate::temp_test_dir_with_prefix("drought_data_");
        fs::create_dir_all(root.path().join("data").join("shapefiles"))
            .expect("Failed to create shapefiles dir");
        Self { root }
    }

    /// Layout with the synthetic CONUS topology written to `data/us.json`.
    pub fn with_conus_topology() -> Self {
        let dir = Self::new();
        dir.write_topology(&conus_topology_json());
        dir
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn shapefiles_dir(&self) -> PathBuf {
        self.data_dir().join("shapefiles")
    }

    /// Output directory; not created until something renders into it.
    pub fn img_dir(&self) -> PathBuf {
        self.root.path().join("img").join("drought")
    }

    pub fn write_topology(&self, json: &str) -> PathBuf {
        let path = self.data_dir().join("us.json");
        fs::write(&path, json).expect("Failed to write topology");
        path
    }

    /// Write `<shapefiles>/<name>.shp` and return its path.
    pub fn add_shapefile(&self, name: &str, features: &[TestFeature]) -> PathBuf {
        let path = self.shapefiles_dir().join(format!("{}.shp", name));
        write_drought_shapefile(&path, features);
        path
    }

    pub fn add_corrupt_shapefile(&self, name: &str) -> PathBuf {
        let path = self.shapefiles_dir().join(format!("{}.shp", name));
        write_corrupt_shapefile(&path);
        path
    }
}

impl Default for DroughtDataDir {
    fn default() -> Self {
        Self::new()
    }
}
