use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use image::Rgba;
use rayon::prelude::*;

use crate::error::LapseError;
use crate::render::{Canvas, TypeFace};

const STAMP_X: i64 = 4;
const STAMP_Y: i64 = 5;
const STAMP_W: u32 = 139;
const STAMP_H: u32 = 20;
const STAMP_PX: f32 = 14.0;

/// Stamps each source frame with a wall-clock label and blends the finished
/// title card over the first frames so the intro fades into the footage.
pub struct OverlayComposer<'a> {
    pub fps: u32,
    pub face: &'a TypeFace,
    /// Displayed time of frame 0; each following frame adds one simulated
    /// minute. Passed by value so per-frame rendering stays a pure function
    /// of the index.
    pub start: NaiveDateTime,
}

impl OverlayComposer<'_> {
    /// Compose one output frame per source frame, in source order. Outputs
    /// keep their source base name inside `out_dir`. A failed frame aborts
    /// the run; earlier outputs are left in place.
    pub fn compose_all(
        &self,
        sources: &[PathBuf],
        title_frame: &Path,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, LapseError> {
        let title = Canvas::load(title_frame)?;

        sources
            .par_iter()
            .enumerate()
            .map(|(index, src)| self.compose_one(index, src, &title, out_dir))
            .collect()
    }

    fn compose_one(
        &self,
        index: usize,
        source: &Path,
        title: &Canvas,
        out_dir: &Path,
    ) -> Result<PathBuf, LapseError> {
        let mut canvas = Canvas::load(source)?;

        canvas.fill_rect(STAMP_X, STAMP_Y, STAMP_W, STAMP_H, Rgba([0, 0, 0, 224]));
        canvas.stroke_rect(STAMP_X, STAMP_Y, STAMP_W, STAMP_H, Rgba([0, 0, 255, 255]));

        let label = timestamp_at(self.start, index)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        self.face.draw(
            &mut canvas,
            &label,
            STAMP_PX,
            Rgba([255, 255, 255, 255]),
            8.0,
            7.0 + self.face.ascent(STAMP_PX),
        );

        let ratio = fade_ratio(index, self.fps);
        if ratio > 0.0 {
            canvas.blend_over(title, ratio);
        }

        let name = source.file_name().ok_or_else(|| {
            LapseError::InvalidConfig(format!("source frame has no file name: '{}'", source.display()))
        })?;
        let out = out_dir.join(name);
        canvas.save(&out)?;
        Ok(out)
    }
}

/// Title blend weight at overlay position `index` (0-based):
/// max(1 - (index+1)/fps, 0). Non-increasing, exactly 0 from index fps-1 on.
pub fn fade_ratio(index: usize, fps: u32) -> f32 {
    (1.0 - (index as f32 + 1.0) / fps as f32).max(0.0)
}

/// Displayed clock for overlay frame `index`: one simulated minute per frame.
pub fn timestamp_at(base: NaiveDateTime, index: usize) -> NaiveDateTime {
    base + Duration::minutes(index as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fade_ratio_matches_formula_and_clamps() {
        let fps = 6;
        for i in 0..20usize {
            let expected = (1.0 - (i as f32 + 1.0) / fps as f32).max(0.0);
            assert_eq!(fade_ratio(i, fps), expected);
        }
        // Zero from fps-1 onward, never negative.
        assert_eq!(fade_ratio(5, fps), 0.0);
        assert_eq!(fade_ratio(100, fps), 0.0);
    }

    #[test]
    fn fade_ratio_is_non_increasing() {
        let ratios: Vec<f32> = (0..30).map(|i| fade_ratio(i, 10)).collect();
        for pair in ratios.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn timestamp_advances_one_minute_per_frame() {
        let base = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 58, 0)
            .unwrap();
        assert_eq!(
            timestamp_at(base, 0).format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-01 12:58"
        );
        assert_eq!(
            timestamp_at(base, 2).format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-01 13:00"
        );
        // Pure function of the index: recomputing an earlier frame is stable.
        assert_eq!(timestamp_at(base, 0), timestamp_at(base, 0));
    }
}
