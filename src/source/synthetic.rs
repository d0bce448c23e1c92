use std::f32::consts::PI;
use std::path::PathBuf;

use image::Rgba;
use rayon::prelude::*;

use crate::error::LapseError;
use crate::render::Canvas;
use crate::source::FrameSource;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 200;
const BACKGROUND: Rgba<u8> = Rgba([0x6d, 0x8a, 0xff, 0xff]);
const OBJECTS: Rgba<u8> = Rgba([0x19, 0x1d, 0x7c, 0xff]);

/// Demo stand-in for a real photo source: renders ten seconds worth of
/// frames with a spinning star and a rectangle sliding across the screen.
pub struct SyntheticSource {
    dir: PathBuf,
    fps: u32,
}

impl SyntheticSource {
    pub fn new(dir: PathBuf, fps: u32) -> Self {
        Self { dir, fps }
    }

    fn render_frame(&self, index: usize) -> Result<PathBuf, LapseError> {
        let fps = self.fps as i64;
        let mut canvas = Canvas::new(WIDTH, HEIGHT, BACKGROUND);

        let rotation = -(PI * 2.0 * index as f32 / self.fps as f32 / 6.0);
        let star = star_vertices(
            WIDTH as f32 - HEIGHT as f32 * 0.15,
            HEIGHT as f32 * 0.85,
            4,
            HEIGHT as f32 * 0.05,
            HEIGHT as f32 * 0.10,
            rotation,
        );
        fill_polygon(&mut canvas, &star, OBJECTS);

        let object_width = (WIDTH / 3) as i64;
        let frames_to_pass = fps * 2;
        let x = -object_width
            + (WIDTH as i64 + object_width) * ((index as i64 + 1) % frames_to_pass)
                / frames_to_pass;
        if x > -object_width {
            canvas.fill_rect(
                x,
                (HEIGHT / 3) as i64,
                object_width as u32,
                HEIGHT / 3,
                OBJECTS,
            );
        }

        let path = self.dir.join(format!("{:07}.png", index));
        canvas.save(&path)?;
        Ok(path)
    }
}

impl FrameSource for SyntheticSource {
    fn frames(&mut self) -> Result<Vec<PathBuf>, LapseError> {
        let count = self.fps as usize * 10;
        (0..count)
            .into_par_iter()
            .map(|i| self.render_frame(i))
            .collect()
    }
}

/// Vertices of a star polygon: prong tips on the outer radius interleaved
/// with valleys on the inner radius.
fn star_vertices(
    cx: f32,
    cy: f32,
    prongs: u32,
    inner_radius: f32,
    outer_radius: f32,
    rotation: f32,
) -> Vec<(f32, f32)> {
    let step = PI / prongs as f32;
    (0..prongs * 2)
        .map(|k| {
            let radius = if k % 2 == 0 { outer_radius } else { inner_radius };
            let angle = rotation + k as f32 * step;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

fn fill_polygon(canvas: &mut Canvas, vertices: &[(f32, f32)], color: Rgba<u8>) {
    let min_x = vertices.iter().map(|v| v.0).fold(f32::INFINITY, f32::min).floor() as i64;
    let max_x = vertices.iter().map(|v| v.0).fold(f32::NEG_INFINITY, f32::max).ceil() as i64;
    let min_y = vertices.iter().map(|v| v.1).fold(f32::INFINITY, f32::min).floor() as i64;
    let max_y = vertices.iter().map(|v| v.1).fold(f32::NEG_INFINITY, f32::max).ceil() as i64;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if point_in_polygon(x as f32 + 0.5, y as f32 + 0.5, vertices) {
                canvas.blend_pixel(x, y, color);
            }
        }
    }
}

fn point_in_polygon(px: f32, py: f32, vertices: &[(f32, f32)]) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
