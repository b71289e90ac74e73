//! Projected drawing surface for Albers USA maps.
//!
//! A [`MapRenderer`] owns the composite projection and one clip mask per
//! inset that intersects the canvas. Geometry is projected through every
//! inset separately and each result is drawn through that inset's mask, so
//! the lower 48, Alaska and Hawaii never bleed into each other.
//!
//! The renderer is immutable once built and is shared across render tasks;
//! each task owns its own `Pixmap`.

use std::fmt;

use drought_common::{BoundingBox, Color, DroughtError, DroughtResult};
use geodata::Geometry;
use projection::{AlbersUsa, Inset, Region};
use tiny_skia::{
    FillRule, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

/// Pixel rectangle and mask of one inset.
pub struct InsetClip {
    pub region: Region,
    /// Clip rectangle in pixels, not limited to the canvas
    pub rect: BoundingBox,
    mask: Mask,
}

impl InsetClip {
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Identifier used for SVG `clipPath` elements.
    pub fn clip_id(&self) -> String {
        format!("clip-{}", self.region.name())
    }
}

/// One projected ring in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRing {
    pub points: Vec<(f32, f32)>,
    /// Closed rings bound an area and can be filled
    pub closed: bool,
}

/// Geometry projected through a single inset.
#[derive(Debug, Clone)]
pub struct InsetShape {
    /// Index into [`MapRenderer::clips`]
    pub clip: usize,
    pub rings: Vec<ProjectedRing>,
}

impl InsetShape {
    /// Every ring, for stroking.
    pub fn outline(&self) -> Option<Path> {
        build_path(self.rings.iter())
    }

    /// Closed rings only, for filling.
    pub fn area(&self) -> Option<Path> {
        build_path(self.rings.iter().filter(|ring| ring.closed))
    }
}

fn build_path<'a>(rings: impl Iterator<Item = &'a ProjectedRing>) -> Option<Path> {
    let mut pb = PathBuilder::new();

    for ring in rings {
        let mut points = ring.points.iter();
        let Some(&(x, y)) = points.next() else {
            continue;
        };
        pb.move_to(x, y);
        for &(x, y) in points {
            pb.line_to(x, y);
        }
        if ring.closed {
            pb.close();
        }
    }

    pb.finish()
}

/// Composite projection plus precomputed inset masks for one canvas size.
pub struct MapRenderer {
    width: u32,
    height: u32,
    projection: AlbersUsa,
    clips: Vec<InsetClip>,
}

impl MapRenderer {
    /// Renderer for a `width` x `height` canvas, projection scale `width * scale`.
    pub fn new(width: u32, height: u32, scale: f64) -> DroughtResult<Self> {
        Self::with_projection(width, height, AlbersUsa::for_canvas(width, height, scale))
    }

    /// Renderer for an explicitly configured projection.
    pub fn with_projection(width: u32, height: u32, projection: AlbersUsa) -> DroughtResult<Self> {
        if width == 0 || height == 0 {
            return Err(DroughtError::Canvas(format!(
                "canvas must not be empty, got {}x{}",
                width, height
            )));
        }

        let canvas = BoundingBox::new(0.0, 0.0, width as f64, height as f64);
        let mut clips = Vec::with_capacity(projection.insets().len());

        for inset in projection.insets() {
            // Insets entirely off the canvas never draw anything
            if !inset.clip.intersects(&canvas) {
                continue;
            }
            clips.push(InsetClip {
                region: inset.region,
                rect: inset.clip,
                mask: clip_mask(width, height, &inset.clip)?,
            });
        }

        Ok(Self {
            width,
            height,
            projection,
            clips,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn projection(&self) -> &AlbersUsa {
        &self.projection
    }

    /// Insets that intersect the canvas, in projection lookup order.
    pub fn clips(&self) -> &[InsetClip] {
        &self.clips
    }

    /// A fully transparent canvas.
    pub fn new_pixmap(&self) -> DroughtResult<Pixmap> {
        Pixmap::new(self.width, self.height).ok_or_else(|| {
            DroughtError::Canvas(format!(
                "failed to allocate {}x{} canvas",
                self.width, self.height
            ))
        })
    }

    /// Project geometries through every inset.
    ///
    /// Straight segments between projected vertices, no resampling. Insets
    /// whose clip rectangle the projected bounds miss are left out.
    pub fn project_layer(&self, geometries: &[Geometry]) -> Vec<InsetShape> {
        self.clips
            .iter()
            .enumerate()
            .filter_map(|(index, clip)| {
                let inset = self.projection.inset(clip.region);
                project_through(inset, geometries).map(|rings| InsetShape { clip: index, rings })
            })
            .collect()
    }

    /// Fill the closed rings of `shapes` with the nonzero rule.
    pub fn fill(&self, pixmap: &mut Pixmap, shapes: &[InsetShape], color: Color) {
        let paint = paint(color);

        for shape in shapes {
            if let Some(path) = shape.area() {
                pixmap.fill_path(
                    &path,
                    &paint,
                    FillRule::Winding,
                    Transform::identity(),
                    Some(self.clips[shape.clip].mask()),
                );
            }
        }
    }

    /// Stroke every ring of `shapes` with round joins.
    pub fn stroke(&self, pixmap: &mut Pixmap, shapes: &[InsetShape], color: Color, width: f32) {
        let paint = paint(color);
        let stroke = Stroke {
            width,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        for shape in shapes {
            if let Some(path) = shape.outline() {
                pixmap.stroke_path(
                    &path,
                    &paint,
                    &stroke,
                    Transform::identity(),
                    Some(self.clips[shape.clip].mask()),
                );
            }
        }
    }
}

impl fmt::Debug for MapRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapRenderer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.projection.scale())
            .field(
                "clips",
                &self.clips.iter().map(|c| c.region.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn clip_mask(width: u32, height: u32, rect: &BoundingBox) -> DroughtResult<Mask> {
    let mut mask = Mask::new(width, height)
        .ok_or_else(|| DroughtError::Canvas(format!("failed to allocate {}x{} mask", width, height)))?;

    let rect = Rect::from_ltrb(
        rect.min_x as f32,
        rect.min_y as f32,
        rect.max_x as f32,
        rect.max_y as f32,
    )
    .ok_or_else(|| DroughtError::Canvas(format!("invalid clip rectangle {:?}", rect)))?;

    mask.fill_path(
        &PathBuilder::from_rect(rect),
        FillRule::Winding,
        true,
        Transform::identity(),
    );
    Ok(mask)
}

fn project_through(inset: &Inset, geometries: &[Geometry]) -> Option<Vec<ProjectedRing>> {
    let mut rings = Vec::new();
    let mut bounds = BoundingBox::empty();

    for geometry in geometries {
        let closed = geometry.is_area();

        for ring in geometry.rings() {
            let points: Vec<(f32, f32)> = ring
                .iter()
                .map(|&(lon, lat)| inset.projection.project(lon, lat))
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .inspect(|&(x, y)| bounds.include(x, y))
                .map(|(x, y)| (x as f32, y as f32))
                .collect();

            if points.len() >= 2 {
                rings.push(ProjectedRing { points, closed });
            }
        }
    }

    (!rings.is_empty() && bounds.intersects(&inset.clip)).then_some(rings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lon: f64, lat: f64, size: f64) -> Geometry {
        Geometry::Polygons(vec![vec![vec![
            (lon, lat),
            (lon, lat + size),
            (lon + size, lat + size),
            (lon + size, lat),
            (lon, lat),
        ]]])
    }

    #[test]
    fn test_default_canvas_keeps_all_insets() {
        let renderer = MapRenderer::new(455, 285, 1.3).unwrap();
        let regions: Vec<Region> = renderer.clips().iter().map(|c| c.region).collect();
        assert_eq!(regions, vec![Region::Lower48, Region::Alaska, Region::Hawaii]);
    }

    #[test]
    fn test_empty_canvas_is_rejected() {
        assert!(matches!(
            MapRenderer::new(0, 285, 1.3),
            Err(DroughtError::Canvas(_))
        ));
    }

    #[test]
    fn test_offscreen_insets_are_dropped() {
        // Translate pushes everything far to the right of a small canvas
        let projection = AlbersUsa::new(100.0, (5000.0, 5000.0));
        let renderer = MapRenderer::with_projection(100, 100, projection).unwrap();
        assert!(renderer.clips().is_empty());
    }

    #[test]
    fn test_lower48_square_projects_once() {
        let renderer = MapRenderer::new(455, 285, 1.3).unwrap();
        let shapes = renderer.project_layer(&[square(-98.0, 37.0, 2.0)]);

        assert_eq!(shapes.len(), 1);
        assert_eq!(renderer.clips()[shapes[0].clip].region, Region::Lower48);
        assert_eq!(shapes[0].rings[0].points.len(), 5);
        assert!(shapes[0].rings[0].closed);
    }

    #[test]
    fn test_alaska_square_projects_into_alaska() {
        let renderer = MapRenderer::new(455, 285, 1.3).unwrap();
        let shapes = renderer.project_layer(&[square(-155.0, 59.0, 2.0)]);

        assert_eq!(shapes.len(), 1);
        assert_eq!(renderer.clips()[shapes[0].clip].region, Region::Alaska);
    }

    #[test]
    fn test_lines_have_no_area() {
        let renderer = MapRenderer::new(455, 285, 1.3).unwrap();
        let line = Geometry::Lines(vec![vec![(-100.0, 35.0), (-95.0, 40.0)]]);
        let shapes = renderer.project_layer(&[line]);

        assert_eq!(shapes.len(), 1);
        assert!(shapes[0].outline().is_some());
        assert!(shapes[0].area().is_none());
    }

    #[test]
    fn test_new_pixmap_is_transparent() {
        let renderer = MapRenderer::new(40, 30, 1.3).unwrap();
        let pixmap = renderer.new_pixmap().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 30));
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }
}
