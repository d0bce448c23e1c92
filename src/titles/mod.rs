use std::path::{Path, PathBuf};

use image::Rgba;
use rayon::prelude::*;

use crate::error::LapseError;
use crate::render::{draw_text_block, subtitle_px, title_px, Canvas, TypeFace};

/// Generates the intro: title and subtitle fading in over a black background
/// for one second, then holding the fully visible frame for another second.
pub struct TitleScreen<'a> {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub title: &'a str,
    pub subtitle: &'a str,
    pub face: &'a TypeFace,
}

impl TitleScreen<'_> {
    /// Render the fade frames in parallel (opacity is a pure function of the
    /// frame index) and append the held repeats as path copies, never as new
    /// renders. Returns exactly `2 * fps` paths.
    pub fn generate(&self, dir: &Path) -> Result<Vec<PathBuf>, LapseError> {
        let fade_frames = self.fps as usize;

        let paths: Vec<PathBuf> = (1..=fade_frames)
            .into_par_iter()
            .map(|i| self.render_frame(dir, i, fade_frames))
            .collect::<Result<Vec<_>, _>>()?;

        hold_final_frame(paths, fade_frames)
    }

    fn render_frame(&self, dir: &Path, index: usize, fade_frames: usize) -> Result<PathBuf, LapseError> {
        let mut canvas = Canvas::new(self.width, self.height, Rgba([0, 0, 0, 255]));
        let color = Rgba([255, 255, 255, title_alpha(index, fade_frames)]);

        draw_text_block(
            &mut canvas,
            self.face,
            self.title,
            title_px(self.height),
            color,
            self.height as f32 / 3.0,
        );
        draw_text_block(
            &mut canvas,
            self.face,
            self.subtitle,
            subtitle_px(self.height),
            color,
            self.height as f32 / 100.0 * 55.0,
        );

        let path = dir.join(format!("{:03}.png", index));
        canvas.save(&path)?;
        Ok(path)
    }
}

/// Hold the finished title card for a second of playback: append `count`
/// repeats of the final entry as path copies, never as new renders.
fn hold_final_frame(mut paths: Vec<PathBuf>, count: usize) -> Result<Vec<PathBuf>, LapseError> {
    let last = paths
        .last()
        .cloned()
        .ok_or_else(|| LapseError::InvalidConfig("frame rate must be at least 1".into()))?;
    paths.extend(std::iter::repeat(last).take(count));
    Ok(paths)
}

/// Text opacity for fade frame `index` (1-based): round(255 * index / count).
/// The first frame is nearly transparent, the last fully opaque.
pub fn title_alpha(index: usize, fade_frames: usize) -> u8 {
    (255.0 * index as f32 / fade_frames as f32).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_ramp_is_strictly_increasing_and_ends_opaque() {
        // 255 is the highest frame rate the config layer accepts.
        for fps in [1usize, 6, 24, 30, 255] {
            let ramp: Vec<u8> = (1..=fps).map(|i| title_alpha(i, fps)).collect();
            assert_eq!(*ramp.last().unwrap(), 255, "fps={}", fps);
            for pair in ramp.windows(2) {
                assert!(pair[0] < pair[1], "ramp not strictly increasing at fps={}", fps);
            }
        }
    }

    #[test]
    fn sequence_is_one_second_fade_plus_one_second_hold() {
        for fps in [1usize, 6, 30] {
            let fade: Vec<PathBuf> = (1..=fps)
                .map(|i| PathBuf::from(format!("{:03}.png", i)))
                .collect();
            let all = hold_final_frame(fade, fps).unwrap();
            assert_eq!(all.len(), 2 * fps, "fps={}", fps);
            for held in &all[fps..] {
                assert_eq!(held, &all[fps - 1], "fps={}", fps);
            }
        }
    }

    #[test]
    fn empty_fade_sequence_is_rejected() {
        assert!(hold_final_frame(Vec::new(), 6).is_err());
    }

    #[test]
    fn alpha_rounds_to_nearest() {
        // 255 * 1 / 6 = 42.5 -> 43 (round half away from zero)
        assert_eq!(title_alpha(1, 6), 43);
        assert_eq!(title_alpha(3, 6), 128);
        assert_eq!(title_alpha(6, 6), 255);
    }
}
