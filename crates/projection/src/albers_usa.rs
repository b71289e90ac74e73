//! Composite Albers USA projection.
//!
//! The contiguous states use an Albers equal-area conic centered on the
//! lower 48. Alaska and Hawaii are projected with their own conics and
//! moved into insets below the south-west corner. Each of the three
//! sub-projections owns a clip rectangle in pixel space; a point belongs to
//! the first sub-projection (lower 48, Alaska, Hawaii) whose rectangle
//! contains its projected position.
//!
//! Geometry is drawn through all three sub-projections, each clipped to its
//! own rectangle.

use drought_common::BoundingBox;

use crate::ConicEqualArea;

/// Epsilon shrinking the inset clip rectangles so neighbouring insets never overlap.
const EPSILON: f64 = 1e-6;

/// One of the three sub-projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Lower48,
    Alaska,
    Hawaii,
}

impl Region {
    pub fn name(&self) -> &'static str {
        match self {
            Region::Lower48 => "lower48",
            Region::Alaska => "alaska",
            Region::Hawaii => "hawaii",
        }
    }
}

/// A sub-projection and the pixel rectangle it is allowed to draw into.
#[derive(Debug, Clone)]
pub struct Inset {
    pub region: Region,
    pub projection: ConicEqualArea,
    pub clip: BoundingBox,
}

impl Inset {
    /// Project a point and keep it only if it falls inside this inset.
    pub fn project_clipped(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let (x, y) = self.projection.project(lon, lat);
        self.clip.contains_point(x, y).then_some((x, y))
    }
}

/// Composite projection for the United States.
#[derive(Debug, Clone)]
pub struct AlbersUsa {
    scale: f64,
    translate: (f64, f64),
    insets: [Inset; 3],
}

impl AlbersUsa {
    /// Conventional scale for a 960x500 map.
    pub const DEFAULT_SCALE: f64 = 1070.0;

    /// Conventional translate for a 960x500 map.
    pub const DEFAULT_TRANSLATE: (f64, f64) = (480.0, 250.0);

    /// Build the composite projection.
    ///
    /// `scale` applies to the lower 48 (Alaska uses 0.35 of it) and
    /// `translate` is where the center of the lower 48 lands.
    pub fn new(scale: f64, translate: (f64, f64)) -> Self {
        let k = scale;
        let (x, y) = translate;

        let lower48 = Inset {
            region: Region::Lower48,
            projection: ConicEqualArea::new((29.5, 45.5), 96.0, (-0.6, 38.7), k, (x, y)),
            clip: BoundingBox::new(x - 0.455 * k, y - 0.238 * k, x + 0.455 * k, y + 0.238 * k),
        };

        let alaska = Inset {
            region: Region::Alaska,
            projection: ConicEqualArea::new(
                (55.0, 65.0),
                154.0,
                (-2.0, 58.5),
                k * 0.35,
                (x - 0.307 * k, y + 0.201 * k),
            ),
            clip: BoundingBox::new(
                x - 0.425 * k + EPSILON,
                y + 0.120 * k + EPSILON,
                x - 0.214 * k - EPSILON,
                y + 0.234 * k - EPSILON,
            ),
        };

        let hawaii = Inset {
            region: Region::Hawaii,
            projection: ConicEqualArea::new(
                (8.0, 18.0),
                157.0,
                (-3.0, 19.9),
                k,
                (x - 0.205 * k, y + 0.212 * k),
            ),
            clip: BoundingBox::new(
                x - 0.214 * k + EPSILON,
                y + 0.166 * k + EPSILON,
                x - 0.115 * k - EPSILON,
                y + 0.234 * k - EPSILON,
            ),
        };

        Self {
            scale,
            translate,
            insets: [lower48, alaska, hawaii],
        }
    }

    /// Projection sized for a canvas: centered, with scale `width * scale_factor`.
    pub fn for_canvas(width: u32, height: u32, scale_factor: f64) -> Self {
        Self::new(
            width as f64 * scale_factor,
            (width as f64 / 2.0, height as f64 / 2.0),
        )
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> (f64, f64) {
        self.translate
    }

    /// The three sub-projections, in lookup order.
    pub fn insets(&self) -> &[Inset] {
        &self.insets
    }

    pub fn inset(&self, region: Region) -> &Inset {
        match region {
            Region::Lower48 => &self.insets[0],
            Region::Alaska => &self.insets[1],
            Region::Hawaii => &self.insets[2],
        }
    }

    /// Project geographic coordinates (degrees) to pixels.
    ///
    /// Returns `None` for points outside all three insets (e.g. Europe).
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        self.insets
            .iter()
            .find_map(|inset| inset.project_clipped(lon, lat))
    }

    /// Which sub-projection a geographic point is drawn by, if any.
    pub fn region_of(&self, lon: f64, lat: f64) -> Option<Region> {
        self.insets
            .iter()
            .find(|inset| inset.project_clipped(lon, lat).is_some())
            .map(|inset| inset.region)
    }

    /// Convert pixel coordinates back to geographic coordinates (lon, lat).
    ///
    /// The sub-projection is chosen from the inset rectangles; anything
    /// outside both insets is inverted through the lower 48.
    pub fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let k = self.scale;
        let rx = (x - self.translate.0) / k;
        let ry = (y - self.translate.1) / k;

        let region = if (0.120..0.234).contains(&ry) && (-0.425..-0.214).contains(&rx) {
            Region::Alaska
        } else if (0.166..0.234).contains(&ry) && (-0.214..-0.115).contains(&rx) {
            Region::Hawaii
        } else {
            Region::Lower48
        };

        let (lon, lat) = self.inset(region).projection.invert(x, y);
        (lon.is_finite() && lat.is_finite()).then_some((lon, lat))
    }
}

impl Default for AlbersUsa {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCALE, Self::DEFAULT_TRANSLATE)
    }
}
