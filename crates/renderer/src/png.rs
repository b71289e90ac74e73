//! PNG encoding of finished canvases.
//!
//! tiny-skia stores premultiplied RGBA; PNG wants straight alpha, so every
//! pixel is demultiplied before encoding.

use std::io::Write;
use std::path::Path;

use drought_common::{DroughtError, DroughtResult};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use tiny_skia::Pixmap;

use crate::output;

/// Straight-alpha RGBA8 bytes of a pixmap, row-major.
pub fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    rgba
}

/// Encode a pixmap as an RGBA PNG into `writer`.
pub fn encode_png<W: Write>(pixmap: &Pixmap, writer: W) -> DroughtResult<()> {
    PngEncoder::new(writer)
        .write_image(
            &straight_rgba(pixmap),
            pixmap.width(),
            pixmap.height(),
            ColorType::Rgba8,
        )
        .map_err(|e| DroughtError::ImageEncode(e.to_string()))
}

/// Encode a pixmap as PNG bytes.
pub fn png_bytes(pixmap: &Pixmap) -> DroughtResult<Vec<u8>> {
    let mut buffer = Vec::new();
    encode_png(pixmap, &mut buffer)?;
    Ok(buffer)
}

/// Encode and write a pixmap to `path`, flushed and synced on success.
pub fn write_png(pixmap: &Pixmap, path: &Path) -> DroughtResult<()> {
    let mut writer = output::create(path)?;
    encode_png(pixmap, &mut writer)?;
    output::finish(writer, path)
}
