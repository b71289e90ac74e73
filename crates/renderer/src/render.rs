//! One shapefile in, one map out.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use drought_common::{DroughtResult, Severity};
use geodata::{stream_features, BaseMap, Geometry, SeverityField};
use tiny_skia::Pixmap;
use tracing::{debug, info, warn};

use crate::canvas::MapRenderer;
use crate::svg::SvgDocument;
use crate::{layers, output, png};

/// Encoding of the output map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(format!("unknown output format '{}', expected png or svg", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Result of rendering one shapefile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    pub features_drawn: usize,
    /// Features without a valid severity
    pub features_skipped: usize,
}

/// A target the three map layers are painted onto.
pub trait MapSurface {
    fn draw_land(&mut self, base: &BaseMap);
    fn draw_feature(&mut self, severity: Severity, geometry: &Geometry);
    fn draw_states(&mut self, base: &BaseMap);
    fn save(self, path: &Path) -> DroughtResult<()>;
}

/// Raster surface backed by a tiny-skia pixmap.
pub struct RasterMap<'a> {
    renderer: &'a MapRenderer,
    pixmap: Pixmap,
}

impl<'a> RasterMap<'a> {
    pub fn new(renderer: &'a MapRenderer) -> DroughtResult<Self> {
        Ok(Self {
            renderer,
            pixmap: renderer.new_pixmap()?,
        })
    }
}

impl MapSurface for RasterMap<'_> {
    fn draw_land(&mut self, base: &BaseMap) {
        layers::draw_land(self.renderer, &mut self.pixmap, base);
    }

    fn draw_feature(&mut self, severity: Severity, geometry: &Geometry) {
        layers::draw_drought(self.renderer, &mut self.pixmap, severity, geometry);
    }

    fn draw_states(&mut self, base: &BaseMap) {
        layers::draw_states(self.renderer, &mut self.pixmap, base);
    }

    fn save(self, path: &Path) -> DroughtResult<()> {
        png::write_png(&self.pixmap, path)
    }
}

impl MapSurface for SvgDocument<'_> {
    fn draw_land(&mut self, base: &BaseMap) {
        self.land(base);
    }

    fn draw_feature(&mut self, severity: Severity, geometry: &Geometry) {
        self.feature(severity, geometry);
    }

    fn draw_states(&mut self, base: &BaseMap) {
        self.states(base);
    }

    fn save(self, path: &Path) -> DroughtResult<()> {
        self.write(path)
    }
}

/// Counts from painting one shapefile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintCounts {
    pub drawn: usize,
    pub skipped: usize,
}

/// Paint land, every feature of `source` in file order, then state lines.
///
/// Features without a valid severity are skipped and counted. A read error
/// aborts the map.
pub fn paint_map<S: MapSurface>(
    surface: &mut S,
    source: &Path,
    base: &BaseMap,
) -> DroughtResult<PaintCounts> {
    let mut counts = PaintCounts::default();

    surface.draw_land(base);

    let summary = stream_features(source, |feature| match &feature.severity {
        SeverityField::Category(severity) => {
            surface.draw_feature(*severity, &feature.geometry);
            counts.drawn += 1;
        }
        SeverityField::Unknown(raw) => {
            warn!(
                file = %source.display(),
                record = feature.index,
                value = %raw,
                "Skipping feature with unknown drought severity"
            );
            counts.skipped += 1;
        }
    })?;

    surface.draw_states(base);

    debug!(
        file = %source.display(),
        features = summary.features,
        empty_shapes = summary.empty_shapes,
        "Painted map"
    );
    Ok(counts)
}

/// Render `source` into `<out_dir>/<stem>.<format>`, overwriting any existing file.
pub fn render_shapefile(
    source: &Path,
    base: &BaseMap,
    renderer: &MapRenderer,
    out_dir: &Path,
    format: OutputFormat,
) -> DroughtResult<RenderOutcome> {
    let output = output::output_path(source, out_dir, format);

    let counts = match format {
        OutputFormat::Png => render_to(RasterMap::new(renderer)?, source, base, &output)?,
        OutputFormat::Svg => render_to(SvgDocument::new(renderer), source, base, &output)?,
    };

    info!(
        file = %source.display(),
        output = %output.display(),
        drawn = counts.drawn,
        skipped = counts.skipped,
        "Rendered"
    );

    Ok(RenderOutcome {
        source: source.to_path_buf(),
        output,
        features_drawn: counts.drawn,
        features_skipped: counts.skipped,
    })
}

fn render_to<S: MapSurface>(
    mut surface: S,
    source: &Path,
    base: &BaseMap,
    output: &Path,
) -> DroughtResult<PaintCounts> {
    let counts = paint_map(&mut surface, source, base)?;
    surface.save(output)?;
    Ok(counts)
}
