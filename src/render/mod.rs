//! Debug overlay rendering: strokes every detected block onto the source image.
//!
//! Stroke color follows a red-to-green hue gradient driven by block confidence.

mod loader;

pub use loader::load_image_bytes;

use std::future::Future;
use std::io::Cursor;

use aws_sdk_textract::operation::analyze_document::AnalyzeDocumentOutput;
use aws_sdk_textract::types::{Block, BoundingBox};
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::AnalyzeError;

pub const STROKE_WIDTH: i32 = 4;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Analysis(#[from] AnalyzeError),
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("Failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Waits for `analysis`, then draws its blocks over the image at `image_source`
/// (local path or `http(s)://` URI) and returns the result as PNG bytes.
///
/// If the analysis fails its error is returned and the image is never loaded.
pub async fn generate_debug_image<F>(
    image_source: &str,
    analysis: F,
) -> Result<Vec<u8>, RenderError>
where
    F: Future<Output = Result<AnalyzeDocumentOutput, AnalyzeError>>,
{
    let analysis = analysis.await?;
    let encoded = load_image_bytes(image_source).await?;
    tokio::task::spawn_blocking(move || render_overlay(&encoded, analysis.blocks())).await?
}

fn render_overlay(encoded: &[u8], blocks: &[Block]) -> Result<Vec<u8>, RenderError> {
    let source = image::load_from_memory(encoded).map_err(RenderError::Decode)?;
    let (width, height) = (source.width(), source.height());

    let mut canvas = RgbaImage::new(width, height);
    imageops::overlay(&mut canvas, &source.to_rgba8(), 0, 0);
    let drawn = draw_blocks(&mut canvas, blocks);

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(RenderError::Encode)?;

    info!(width, height, drawn, bytes = png.len(), "Debug image rendered");
    Ok(png)
}

/// Strokes one rectangle per block that has a bounding box. Returns how many were drawn.
pub fn draw_blocks(canvas: &mut RgbaImage, blocks: &[Block]) -> usize {
    let (width, height) = canvas.dimensions();
    let mut drawn = 0;

    for block in blocks {
        let Some(bbox) = block.geometry().and_then(|g| g.bounding_box()) else {
            continue;
        };
        let color = confidence_color(block.confidence().unwrap_or(0.0));
        stroke_rect(canvas, pixel_box(bbox, width, height), color);
        drawn += 1;
    }

    debug!(blocks = blocks.len(), drawn, "Blocks drawn");
    drawn
}

/// Pixel-space (x, y, width, height). Absent fields count as 0 before scaling.
///
/// Values are clamped to just outside the canvas so the stroke arithmetic
/// stays in range for any fraction the service returns.
fn pixel_box(bbox: &BoundingBox, width: u32, height: u32) -> (i32, i32, i32, i32) {
    let margin = STROKE_WIDTH as f32;
    let position = |fraction: Option<f32>, extent: u32| {
        let extent = extent as f32;
        (fraction.unwrap_or(0.0) * extent)
            .round()
            .clamp(-margin, extent + margin) as i32
    };
    let span = |fraction: Option<f32>, extent: u32| {
        let limit = extent as f32 + 2.0 * margin;
        (fraction.unwrap_or(0.0) * extent as f32)
            .round()
            .clamp(-limit, limit) as i32
    };
    (
        position(Some(bbox.left()), width),
        position(Some(bbox.top()), height),
        span(Some(bbox.width()), width),
        span(Some(bbox.height()), height),
    )
}

/// Emulates a canvas `strokeRect` with a 4px line centred on the box edge.
fn stroke_rect(canvas: &mut RgbaImage, (x, y, w, h): (i32, i32, i32, i32), color: Rgba<u8>) {
    let half = STROKE_WIDTH / 2;
    for inset in -half..half {
        let rect = Rect::at(x + inset, y + inset)
            .of_size((w - 2 * inset).max(1) as u32, (h - 2 * inset).max(1) as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

/// `hsl((confidence / 100) * 120, 100%, 50%)`: 0 is red, 100 is green.
pub fn confidence_color(confidence: f32) -> Rgba<u8> {
    let hue = (confidence.clamp(0.0, 100.0) / 100.0) * 120.0;
    let [r, g, b] = hsl_to_rgb(hue, 1.0, 0.5);
    Rgba([r, g, b, 255])
}

/// `hue` in degrees, `saturation` and `lightness` in 0..=1.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [u8; 3] {
    let hue = hue.rem_euclid(360.0);
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = lightness - chroma / 2.0;

    let (r, g, b) = match hue {
        h if h < 60.0 => (chroma, x, 0.0),
        h if h < 120.0 => (x, chroma, 0.0),
        h if h < 180.0 => (0.0, chroma, x),
        h if h < 240.0 => (0.0, x, chroma),
        h if h < 300.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_byte(r), to_byte(g), to_byte(b)]
}
