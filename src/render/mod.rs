mod canvas;
mod typeface;

pub use canvas::Canvas;
pub use typeface::TypeFace;

use image::Rgba;

/// Draw a horizontally centered, width-wrapped block of text. `top` is the
/// top edge of the first line; successive lines advance by the face's line
/// height. This is the layout shared by title frames and thumbnails.
pub fn draw_text_block(
    canvas: &mut Canvas,
    face: &TypeFace,
    text: &str,
    px: f32,
    color: Rgba<u8>,
    top: f32,
) {
    let max_width = canvas.width() as f32;
    let line_height = face.line_height(px);
    let ascent = face.ascent(px);

    for (row, line) in face.wrap(text, px, max_width).iter().enumerate() {
        let line_width = face.measure(line, px);
        let x = (max_width - line_width) / 2.0;
        let baseline = top + ascent + row as f32 * line_height;
        face.draw(canvas, line, px, color, x, baseline);
    }
}

/// Title font size used for title frames and thumbnails, scaled from the
/// canvas height (32px at a 200px-tall canvas).
pub fn title_px(height: u32) -> f32 {
    height as f32 / 200.0 * 32.0
}

/// Subtitle font size, scaled the same way (20px at 200px tall).
pub fn subtitle_px(height: u32) -> f32 {
    height as f32 / 200.0 * 20.0
}
