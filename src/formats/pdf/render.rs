//! First-page rendering for PDF covers

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix, Pixmap};

use crate::content::{ExtractError, Result};

/// JPEG quality used for every generated cover
pub const JPEG_QUALITY: u8 = 90;

/// Render page 0 of `doc` as a JPEG
///
/// With `target_width` the page is scaled so its width matches and the
/// aspect ratio is kept; without it the page renders at 1:1.
pub fn render_first_page(doc: &Document, target_width: Option<u32>, quality: u8) -> Result<Vec<u8>> {
    if doc.page_count()? == 0 {
        return Err(ExtractError::EmptyPdf);
    }
    let page = doc.load_page(0)?;
    let bounds = page.bounds()?;
    let scale = scale_for_width(bounds.x1 - bounds.x0, target_width);

    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();
    let pixmap = page.to_pixmap(&matrix, &colorspace, false, false)?;

    let image = pixmap_to_rgb(&pixmap)?;
    encode_jpeg(&DynamicImage::ImageRgb8(image), quality)
}

/// Scale factor turning a page `width` into `target_width` pixels
pub fn scale_for_width(width: f32, target_width: Option<u32>) -> f32 {
    match target_width {
        Some(target) if width > 0.0 => target as f32 / width,
        _ => 1.0,
    }
}

fn pixmap_to_rgb(pixmap: &Pixmap) -> Result<RgbImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| ExtractError::Pdf("failed to create image buffer".to_string()))
}

/// Encode any image as baseline JPEG
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut output = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut output), quality);
    rgb.write_with_encoder(encoder)?;
    Ok(output)
}
