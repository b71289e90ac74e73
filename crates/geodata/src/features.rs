//! Streaming reader for Drought Monitor shapefiles.
//!
//! Records are decoded one at a time from the `.shp`/`.dbf` pair and handed
//! to a callback in file order, so memory use does not grow with file size.
//! Paint order matters downstream: later features are drawn over earlier
//! ones.

use std::path::Path;

use drought_common::severity::SEVERITY_FIELD;
use drought_common::{DroughtError, DroughtResult, Severity};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape};
use tracing::debug;

use crate::{Geometry, Ring};

/// Severity attribute of one record.
#[derive(Debug, Clone, PartialEq)]
pub enum SeverityField {
    /// A valid category
    Category(Severity),
    /// Missing, malformed or out of range; holds the raw value for logging
    Unknown(String),
}

impl SeverityField {
    pub fn category(&self) -> Option<Severity> {
        match self {
            SeverityField::Category(s) => Some(*s),
            SeverityField::Unknown(_) => None,
        }
    }
}

/// One drought polygon read from a shapefile.
#[derive(Debug, Clone)]
pub struct DroughtFeature {
    /// Zero-based record number in the file
    pub index: usize,
    pub severity: SeverityField,
    pub geometry: Geometry,
}

/// Counts from a finished stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Records handed to the callback
    pub features: usize,
    /// Records with a null or non-drawable shape
    pub empty_shapes: usize,
}

/// Read every record of a shapefile and hand it to `on_feature` in file order.
///
/// The first read or decode error ends the stream and is returned; features
/// already delivered stay delivered.
pub fn stream_features<F>(path: &Path, mut on_feature: F) -> DroughtResult<StreamSummary>
where
    F: FnMut(DroughtFeature),
{
    let mut reader =
        shapefile::Reader::from_path(path).map_err(|e| DroughtError::shapefile(path, e))?;

    let mut summary = StreamSummary::default();

    for (index, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result.map_err(|e| DroughtError::shapefile(path, e))?;

        let Some(geometry) = shape_geometry(shape) else {
            debug!(path = %path.display(), record = index, "Skipping record without drawable shape");
            summary.empty_shapes += 1;
            continue;
        };

        on_feature(DroughtFeature {
            index,
            severity: severity_field(&record),
            geometry,
        });
        summary.features += 1;
    }

    Ok(summary)
}

/// Read the severity attribute of a record.
pub fn severity_field(record: &Record) -> SeverityField {
    let value = record
        .get(SEVERITY_FIELD)
        .or_else(|| record.get(&SEVERITY_FIELD.to_lowercase()));

    let Some(value) = value else {
        return SeverityField::Unknown("<missing>".to_string());
    };

    let category = match value {
        FieldValue::Numeric(Some(v)) => Severity::from_value(*v),
        FieldValue::Double(v) => Severity::from_value(*v),
        FieldValue::Float(Some(v)) => Severity::from_value(*v as f64),
        FieldValue::Integer(v) => Severity::from_code(*v as i64),
        FieldValue::Character(Some(s)) => s.trim().parse::<i64>().ok().and_then(Severity::from_code),
        _ => None,
    };

    match category {
        Some(severity) => SeverityField::Category(severity),
        None => SeverityField::Unknown(format!("{:?}", value)),
    }
}

/// Convert a decoded shape to lon/lat geometry.
///
/// Returns `None` for null shapes and for point-like shapes.
pub fn shape_geometry(shape: Shape) -> Option<Geometry> {
    let geometry = match shape {
        Shape::Polygon(polygon) => polygons_from_rings(polygon.rings(), |p| (p.x, p.y)),
        Shape::PolygonM(polygon) => polygons_from_rings(polygon.rings(), |p| (p.x, p.y)),
        Shape::PolygonZ(polygon) => polygons_from_rings(polygon.rings(), |p| (p.x, p.y)),
        Shape::Polyline(line) => Geometry::Lines(
            line.parts()
                .iter()
                .map(|part| part.iter().map(|p| (p.x, p.y)).collect())
                .collect(),
        ),
        Shape::PolylineM(line) => Geometry::Lines(
            line.parts()
                .iter()
                .map(|part| part.iter().map(|p| (p.x, p.y)).collect())
                .collect(),
        ),
        Shape::PolylineZ(line) => Geometry::Lines(
            line.parts()
                .iter()
                .map(|part| part.iter().map(|p| (p.x, p.y)).collect())
                .collect(),
        ),
        _ => return None,
    };

    (!geometry.is_empty()).then_some(geometry)
}

/// Group shapefile rings into polygons.
///
/// Each outer ring starts a polygon and following inner rings become its
/// holes. An inner ring with no preceding outer ring is kept as its own
/// polygon.
fn polygons_from_rings<P>(rings: &[PolygonRing<P>], xy: impl Fn(&P) -> (f64, f64)) -> Geometry {
    let mut polygons: Vec<Vec<Ring>> = Vec::new();

    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => {
                polygons.push(vec![points.iter().map(&xy).collect()]);
            }
            PolygonRing::Inner(points) => {
                let ring: Ring = points.iter().map(&xy).collect();
                match polygons.last_mut() {
                    Some(polygon) => polygon.push(ring),
                    None => polygons.push(vec![ring]),
                }
            }
        }
    }

    Geometry::Polygons(polygons)
}
