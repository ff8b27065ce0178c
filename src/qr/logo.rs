//! Logo loading and compositing onto a rendered code

use crate::error::{Error, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::path::Path;

/// Logo box (including padding) as a fraction of the code image edge
const LOGO_BOX_RATIO: f32 = 0.3;

/// White margin around the logo, in pixels
const LOGO_PADDING: u32 = 10;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Largest logo edge, in pixels, that fits a code image of `code_edge` pixels.
pub fn logo_fit_edge(code_edge: u32) -> u32 {
    ((code_edge as f32 * LOGO_BOX_RATIO) as u32).saturating_sub(2 * LOGO_PADDING)
}

/// Load a logo, reporting any failure as an asset error.
///
/// Raster formats are sniffed by `image`. SVG files (`.svg`, `.svgz`) are
/// rasterised so that their longer side equals `fit_edge`.
pub fn load_logo(path: &Path, fit_edge: u32) -> Result<DynamicImage> {
    if !path.is_file() {
        return Err(Error::Asset(format!(
            "Logo file not found: {}",
            path.display()
        )));
    }

    if is_svg(path) {
        return render_svg(path, fit_edge);
    }

    image::ImageReader::open(path)
        .map_err(|e| Error::Asset(format!("Failed to open logo {}: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| Error::Asset(format!("Failed to read logo {}: {e}", path.display())))?
        .decode()
        .map_err(|e| Error::Asset(format!("Failed to decode logo {}: {e}", path.display())))
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg") || ext.eq_ignore_ascii_case("svgz"))
}

fn render_svg(path: &Path, fit_edge: u32) -> Result<DynamicImage> {
    if fit_edge == 0 {
        return Err(Error::Asset("No room for an SVG logo".to_string()));
    }

    let data = std::fs::read(path)
        .map_err(|e| Error::Asset(format!("Failed to read logo {}: {e}", path.display())))?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default())
        .map_err(|e| Error::Asset(format!("Failed to parse SVG logo {}: {e}", path.display())))?;

    let size = tree.size();
    let scale = fit_edge as f32 / size.width().max(size.height());
    let width = ((size.width() * scale).round() as u32).max(1);
    let height = ((size.height() * scale).round() as u32).max(1);

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        Error::Asset(format!("Cannot allocate {width}x{height} pixmap for SVG logo"))
    })?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // pixmap storage is premultiplied
    let mut image = RgbaImage::new(width, height);
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    tracing::debug!(width, height, path = %path.display(), "Rasterised SVG logo");
    Ok(DynamicImage::ImageRgba8(image))
}

/// Paste `logo` centered on `code` over a white pad.
///
/// Logos larger than the box are shrunk, keeping their aspect ratio, so that
/// logo plus padding spans roughly a third (30%) of the code image edge.
/// Smaller logos are used as they are.
pub fn embed_logo(code: &DynamicImage, logo: &DynamicImage) -> Result<DynamicImage> {
    let edge = code.width().min(code.height());
    let max_logo = logo_fit_edge(edge);
    if max_logo == 0 || logo.width() == 0 || logo.height() == 0 {
        return Err(Error::Asset(format!(
            "Logo cannot be fitted into a {edge}px code"
        )));
    }

    let logo = if logo.width() > max_logo || logo.height() > max_logo {
        logo.resize(max_logo, max_logo, FilterType::Lanczos3).to_rgba8()
    } else {
        logo.to_rgba8()
    };

    let mut pad = RgbaImage::from_pixel(
        logo.width() + 2 * LOGO_PADDING,
        logo.height() + 2 * LOGO_PADDING,
        WHITE,
    );
    imageops::overlay(&mut pad, &logo, i64::from(LOGO_PADDING), i64::from(LOGO_PADDING));

    let mut canvas = code.to_rgba8();
    let x = (i64::from(canvas.width()) - i64::from(pad.width())) / 2;
    let y = (i64::from(canvas.height()) - i64::from(pad.height())) / 2;
    imageops::overlay(&mut canvas, &pad, x, y);

    tracing::debug!(
        logo_width = logo.width(),
        logo_height = logo.height(),
        "Embedded logo into QR code"
    );

    Ok(DynamicImage::ImageRgb8(
        DynamicImage::ImageRgba8(canvas).to_rgb8(),
    ))
}
