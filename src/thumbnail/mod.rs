use std::path::Path;

use image::Rgba;

use crate::error::LapseError;
use crate::render::{draw_text_block, subtitle_px, title_px, Canvas, TypeFace};

/// Compose the promotional still: a representative frame with a darkened
/// middle band and the title/subtitle drawn over it. Deterministic for a
/// fixed input frame and text.
pub fn compose(
    source: &Path,
    out: &Path,
    title: &str,
    subtitle: &str,
    face: &TypeFace,
) -> Result<(), LapseError> {
    let mut canvas = Canvas::load(source)?;
    let height = canvas.height();
    let width = canvas.width();

    // Darken the middle 48% of the image, starting at 26% down.
    canvas.fill_rect(
        0,
        (height as i64) * 26 / 100,
        width,
        height * 48 / 100,
        Rgba([0, 0, 0, 204]),
    );

    let white = Rgba([255, 255, 255, 255]);
    draw_text_block(&mut canvas, face, title, title_px(height), white, height as f32 / 3.0);
    draw_text_block(
        &mut canvas,
        face,
        subtitle,
        subtitle_px(height),
        white,
        height as f32 / 100.0 * 55.0,
    );

    canvas.save(out)
}
