//! SVG rendition of a drought map.
//!
//! Same layers, colors and widths as the raster output, as vector paths.
//! Each inset gets a `clipPath` and every projected shape references the
//! clip of the inset it was projected through.

use std::path::Path;

use drought_common::{DroughtResult, Severity};
use geodata::{BaseMap, Geometry};

use crate::canvas::{InsetShape, MapRenderer, ProjectedRing};
use crate::layers::{LayerStyle, PaintOrder};
use crate::output;

/// Incrementally built SVG document.
pub struct SvgDocument<'a> {
    renderer: &'a MapRenderer,
    body: String,
}

impl<'a> SvgDocument<'a> {
    pub fn new(renderer: &'a MapRenderer) -> Self {
        Self {
            renderer,
            body: String::new(),
        }
    }

    /// `<g class="land">` with every land polygon.
    pub fn land(&mut self, base: &BaseMap) {
        self.push_layer("land", &base.land, &LayerStyle::LAND);
    }

    /// `<g class="drought DM-n">` for one feature.
    pub fn feature(&mut self, severity: Severity, geometry: &Geometry) {
        let class = format!("drought {}", severity.class_name());
        self.push_layer(
            &class,
            std::slice::from_ref(geometry),
            &LayerStyle::drought(severity),
        );
    }

    /// `<g class="states">` with every state outline.
    pub fn states(&mut self, base: &BaseMap) {
        self.push_layer("states", &base.states, &LayerStyle::STATES);
    }

    fn push_layer(&mut self, class: &str, geometries: &[Geometry], style: &LayerStyle) {
        let shapes = self.renderer.project_layer(geometries);

        let fill = style
            .fill
            .map(|c| c.to_hex())
            .unwrap_or_else(|| "none".to_string());
        self.body.push_str(&format!(
            r#"<g class="{}" fill="{}" stroke="{}" stroke-width="{}" stroke-linejoin="round""#,
            class,
            fill,
            style.stroke.to_hex(),
            style.stroke_width
        ));
        if style.order == PaintOrder::StrokeThenFill {
            self.body.push_str(r#" paint-order="stroke""#);
        }
        self.body.push_str(">\n");

        for shape in &shapes {
            self.push_shape(shape);
        }
        self.body.push_str("</g>\n");
    }

    fn push_shape(&mut self, shape: &InsetShape) {
        let clip = &self.renderer.clips()[shape.clip];
        self.body.push_str(&format!(
            "<path clip-path=\"url(#{})\" d=\"{}\"/>\n",
            clip.clip_id(),
            path_data(&shape.rings)
        ));
    }

    /// The complete document.
    pub fn finish(self) -> String {
        let (width, height) = (self.renderer.width(), self.renderer.height());
        let mut svg = String::with_capacity(self.body.len() + 512);

        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = width,
            h = height
        ));

        svg.push_str("<defs>\n");
        for clip in self.renderer.clips() {
            svg.push_str(&format!(
                "<clipPath id=\"{}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>\n",
                clip.clip_id(),
                coord(clip.rect.min_x as f32),
                coord(clip.rect.min_y as f32),
                coord(clip.rect.width() as f32),
                coord(clip.rect.height() as f32)
            ));
        }
        svg.push_str("</defs>\n");

        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the document to `path`, flushed and synced on success.
    pub fn write(self, path: &Path) -> DroughtResult<()> {
        output::write_all(path, self.finish().as_bytes())
    }
}

/// SVG path data: `M` to the first point, `L` to the rest, `Z` if closed.
pub fn path_data(rings: &[ProjectedRing]) -> String {
    let mut d = String::new();

    for ring in rings {
        for (i, &(x, y)) in ring.points.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            d.push(command);
            d.push_str(&coord(x));
            d.push(',');
            d.push_str(&coord(y));
        }
        if ring.closed {
            d.push('Z');
        }
    }

    d
}

/// Two decimals, trailing zeros trimmed.
fn coord(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
