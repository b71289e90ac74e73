//! Drought map rendering.
//!
//! - `canvas`: composite projection and per-inset clip masks
//! - `layers`: land, drought and state layer styles and painting
//! - `png` / `svg`: output encodings
//! - `render`: one shapefile to one map file

pub mod canvas;
pub mod layers;
pub mod output;
pub mod png;
pub mod render;
pub mod svg;

pub use canvas::MapRenderer;
pub use layers::LayerStyle;
pub use render::{
    paint_map, render_shapefile, MapSurface, OutputFormat, PaintCounts, RasterMap, RenderOutcome,
};
pub use svg::SvgDocument;
