//! Map layers and their paint styles.
//!
//! Every map is painted in three passes: the land base, one pass per
//! drought feature in file order, and the state lines on top.

use drought_common::{Color, Severity};
use geodata::{BaseMap, Geometry};
use tiny_skia::Pixmap;

use crate::canvas::MapRenderer;

/// Which of fill and stroke is painted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOrder {
    FillThenStroke,
    StrokeThenFill,
}

/// Paint style of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    /// `None` leaves the interior untouched
    pub fill: Option<Color>,
    pub stroke: Color,
    pub stroke_width: f32,
    pub order: PaintOrder,
}

impl LayerStyle {
    /// Land base: light grey fill with a thin border.
    pub const LAND: LayerStyle = LayerStyle {
        fill: Some(Color::LAND),
        stroke: Color::BORDER,
        stroke_width: 0.5,
        order: PaintOrder::FillThenStroke,
    };

    /// State lines drawn over the drought layer.
    pub const STATES: LayerStyle = LayerStyle {
        fill: None,
        stroke: Color::BORDER,
        stroke_width: 1.5,
        order: PaintOrder::FillThenStroke,
    };

    /// A drought area, outlined and filled in its severity color.
    pub fn drought(severity: Severity) -> Self {
        let color = severity.color();
        LayerStyle {
            fill: Some(color),
            stroke: color,
            stroke_width: Self::LAND.stroke_width,
            order: PaintOrder::StrokeThenFill,
        }
    }
}

/// Project `geometries` and paint them with `style`.
pub fn paint_layer(
    renderer: &MapRenderer,
    pixmap: &mut Pixmap,
    geometries: &[Geometry],
    style: &LayerStyle,
) {
    let shapes = renderer.project_layer(geometries);
    if shapes.is_empty() {
        return;
    }

    let fill = |pixmap: &mut Pixmap| {
        if let Some(color) = style.fill {
            renderer.fill(pixmap, &shapes, color);
        }
    };
    let stroke = |pixmap: &mut Pixmap| {
        renderer.stroke(pixmap, &shapes, style.stroke, style.stroke_width);
    };

    match style.order {
        PaintOrder::FillThenStroke => {
            fill(pixmap);
            stroke(pixmap);
        }
        PaintOrder::StrokeThenFill => {
            stroke(pixmap);
            fill(pixmap);
        }
    }
}

pub fn draw_land(renderer: &MapRenderer, pixmap: &mut Pixmap, base: &BaseMap) {
    paint_layer(renderer, pixmap, &base.land, &LayerStyle::LAND);
}

pub fn draw_drought(
    renderer: &MapRenderer,
    pixmap: &mut Pixmap,
    severity: Severity,
    geometry: &Geometry,
) {
    paint_layer(
        renderer,
        pixmap,
        std::slice::from_ref(geometry),
        &LayerStyle::drought(severity),
    );
}

pub fn draw_states(renderer: &MapRenderer, pixmap: &mut Pixmap, base: &BaseMap) {
    paint_layer(renderer, pixmap, &base.states, &LayerStyle::STATES);
}
