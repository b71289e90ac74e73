//! Planar geometry in geographic coordinates.
//!
//! Both the TopoJSON base map and the drought shapefiles are reduced to this
//! model before drawing: a list of polygons (exterior ring first, then
//! holes) or a list of open lines. Coordinates are (lon, lat) in degrees.

use drought_common::BoundingBox;

/// A (lon, lat) pair in degrees.
pub type Position = (f64, f64);

/// A ring or line string.
pub type Ring = Vec<Position>;

/// Geometry of one feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Polygons, each a list of rings with the exterior first
    Polygons(Vec<Vec<Ring>>),
    /// Open line strings
    Lines(Vec<Ring>),
}

impl Geometry {
    /// Whether the geometry encloses area and can be filled.
    pub fn is_area(&self) -> bool {
        matches!(self, Geometry::Polygons(_))
    }

    /// Every ring of every polygon, or every line.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            Geometry::Polygons(polygons) => Box::new(polygons.iter().flatten()),
            Geometry::Lines(lines) => Box::new(lines.iter()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rings().all(|ring| ring.is_empty())
    }

    pub fn point_count(&self) -> usize {
        self.rings().map(Vec::len).sum()
    }

    /// Geographic bounding box; empty for empty geometry.
    pub fn bounds(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for &(lon, lat) in self.rings().flatten() {
            bbox.include(lon, lat);
        }
        bbox
    }

    /// Convert a GeoJSON geometry.
    ///
    /// Points carry no area or length and yield `None`; collections are
    /// flattened into polygons when they hold any, otherwise lines.
    pub fn from_geojson(geometry: &geojson::Geometry) -> Option<Self> {
        Self::from_geojson_value(&geometry.value)
    }

    fn from_geojson_value(value: &geojson::Value) -> Option<Self> {
        use geojson::Value;

        match value {
            Value::Polygon(rings) => Some(Geometry::Polygons(vec![convert_rings(rings)])),
            Value::MultiPolygon(polygons) => Some(Geometry::Polygons(
                polygons.iter().map(|rings| convert_rings(rings)).collect(),
            )),
            Value::LineString(line) => Some(Geometry::Lines(vec![convert_ring(line)])),
            Value::MultiLineString(lines) => Some(Geometry::Lines(convert_rings(lines))),
            Value::GeometryCollection(members) => {
                let parts: Vec<Geometry> = members
                    .iter()
                    .filter_map(|g| Self::from_geojson_value(&g.value))
                    .collect();
                Self::merge(parts)
            }
            Value::Point(_) | Value::MultiPoint(_) => None,
        }
    }

    /// Combine several geometries into one, keeping polygons over lines.
    pub fn merge(parts: Vec<Geometry>) -> Option<Geometry> {
        let mut polygons = Vec::new();
        let mut lines = Vec::new();

        for part in parts {
            match part {
                Geometry::Polygons(p) => polygons.extend(p),
                Geometry::Lines(l) => lines.extend(l),
            }
        }

        if !polygons.is_empty() {
            Some(Geometry::Polygons(polygons))
        } else if !lines.is_empty() {
            Some(Geometry::Lines(lines))
        } else {
            None
        }
    }
}

fn convert_ring(positions: &[Vec<f64>]) -> Ring {
    positions
        .iter()
        .filter_map(|p| match (p.first(), p.get(1)) {
            (Some(&lon), Some(&lat)) => Some((lon, lat)),
            _ => None,
        })
        .collect()
}

fn convert_rings(rings: &[Vec<Vec<f64>>]) -> Vec<Ring> {
    rings.iter().map(|ring| convert_ring(ring)).collect()
}
