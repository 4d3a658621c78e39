//! PNG rasterization through resvg.
//!
//! Labels are shaped with the fonts bundled in `typst-assets`, the same set
//! the PDF sheet compiles with, so raster and PDF output never depend on the
//! fonts installed on the host.

use std::sync::Arc;

use once_cell::sync::Lazy;
use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};
use tracing::debug;

use crate::drawing::primitives::RenderedDrawing;
use crate::drawing::style::DrawingStyle;
use crate::errors::{SectionError, SectionResult};
use crate::export::svg::{pixel_size, to_svg};

/// Largest raster edge accepted (pixels)
pub const MAX_PIXMAP_DIM: u32 = 16384;

static FONT_DB: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    for data in typst_assets::fonts() {
        db.load_font_data(data.to_vec());
    }
    db.set_monospace_family("DejaVu Sans Mono");
    db.set_sans_serif_family("DejaVu Sans Mono");
    debug!(faces = db.len(), "loaded raster fonts");
    Arc::new(db)
});

/// Rasterize a drawing to PNG bytes on a white background.
///
/// # Errors
///
/// [`SectionError::ExportError`] when the raster size is zero or above
/// [`MAX_PIXMAP_DIM`], or when the SVG cannot be parsed or encoded.
pub fn to_png(drawing: &RenderedDrawing, style: &DrawingStyle) -> SectionResult<Vec<u8>> {
    style.validate()?;
    let (width_px, height_px) = pixel_size(&drawing.bounds(), style);
    if !(width_px >= 1.0 && height_px >= 1.0) {
        return Err(SectionError::export("png", "drawing has no area"));
    }
    let limit = f64::from(MAX_PIXMAP_DIM);
    if width_px > limit || height_px > limit {
        return Err(SectionError::export(
            "png",
            format!(
                "{}x{} px exceeds the {} px limit; lower dpi or raise paper_scale",
                width_px, height_px, MAX_PIXMAP_DIM
            ),
        ));
    }
    let (width, height) = (width_px as u32, height_px as u32);

    let svg = to_svg(drawing, style);
    let mut options = usvg::Options::default();
    options.fontdb = FONT_DB.clone();
    options.font_family = style.font_family.clone();
    let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| SectionError::export("png", e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SectionError::export("png", format!("cannot allocate {}x{} pixmap", width, height)))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(width as f32 / size.width(), height as f32 / size.height());
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let png = pixmap.encode_png().map_err(|e| SectionError::export("png", e.to_string()))?;
    debug!(width, height, bytes = png.len(), "rasterized section");
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::render::{render, ViewMode};
    use crate::section::{compute_layout, SectionParameters};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn reference_drawing(view: ViewMode) -> RenderedDrawing {
        let layout = compute_layout(&SectionParameters::default()).unwrap();
        render(&layout, &DrawingStyle::default(), view).unwrap()
    }

    #[test]
    fn test_png_signature() {
        let style = DrawingStyle {
            dpi: 50.0,
            ..DrawingStyle::default()
        };
        for view in [ViewMode::Orthographic, ViewMode::oblique()] {
            let png = to_png(&reference_drawing(view), &style).unwrap();
            assert!(png.starts_with(&PNG_SIGNATURE));
        }
    }

    #[test]
    fn test_oversized_raster_rejected() {
        let style = DrawingStyle {
            dpi: 100_000.0,
            ..DrawingStyle::default()
        };
        let err = to_png(&reference_drawing(ViewMode::Orthographic), &style).unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_ERROR");
    }

    #[test]
    fn test_invalid_style_rejected() {
        let style = DrawingStyle {
            paper_scale: 0.0,
            ..DrawingStyle::default()
        };
        let err = to_png(&reference_drawing(ViewMode::Orthographic), &style).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
