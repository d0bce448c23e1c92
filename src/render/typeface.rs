use std::path::{Path, PathBuf};

use font_kit::family_name::FamilyName;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use fontdue::{Font as FontdueFont, FontSettings};
use image::Rgba;

use crate::error::LapseError;
use crate::render::Canvas;

/// TrueType/OpenType face used for all text layers. Rasterization is done by
/// fontdue; vertical metrics come from ttf-parser so baselines line up the
/// same way at every requested pixel size.
pub struct TypeFace {
    font: FontdueFont,
    ascender: f32,
    descender: f32,
    units_per_em: f32,
}

impl TypeFace {
    /// Load a face from a system font name or a file path.
    pub fn from_system(font_name: &str) -> Result<Self, LapseError> {
        let path = Path::new(font_name);
        if path.is_file() {
            return Self::from_file(path);
        }

        let families = if font_name.eq_ignore_ascii_case("sans-serif")
            || font_name.eq_ignore_ascii_case("default")
            || font_name.eq_ignore_ascii_case("system")
        {
            vec![FamilyName::SansSerif]
        } else if font_name.eq_ignore_ascii_case("serif") {
            vec![FamilyName::Serif]
        } else if font_name.eq_ignore_ascii_case("monospace") {
            vec![FamilyName::Monospace]
        } else {
            // Try the specific name, then fall back to the system sans face.
            vec![
                FamilyName::Title(font_name.to_string()),
                FamilyName::SansSerif,
            ]
        };

        let handle = SystemSource::new()
            .select_best_match(&families, &Properties::default())
            .map_err(|_| LapseError::AssetMissing {
                path: PathBuf::from(font_name),
            })?;

        let font_data = handle.load().map_err(|_| LapseError::AssetMissing {
            path: PathBuf::from(font_name),
        })?;

        let font_bytes = font_data
            .copy_font_data()
            .ok_or_else(|| LapseError::AssetMissing {
                path: PathBuf::from(font_name),
            })?;

        Self::from_bytes(&font_bytes)
    }

    pub fn from_file(path: &Path) -> Result<Self, LapseError> {
        let data = std::fs::read(path).map_err(|_| LapseError::AssetMissing {
            path: path.to_path_buf(),
        })?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, LapseError> {
        let font = FontdueFont::from_bytes(data, FontSettings::default())
            .map_err(|e| LapseError::InvalidConfig(format!("failed to parse font: {}", e)))?;

        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| LapseError::InvalidConfig(format!("failed to parse font metrics: {:?}", e)))?;

        Ok(Self {
            font,
            ascender: face.ascender() as f32,
            descender: face.descender() as f32,
            units_per_em: face.units_per_em() as f32,
        })
    }

    /// Baseline distance from the top of a line at the given pixel size.
    pub fn ascent(&self, px: f32) -> f32 {
        self.ascender * px / self.units_per_em
    }

    pub fn line_height(&self, px: f32) -> f32 {
        (self.ascender - self.descender) * px / self.units_per_em
    }

    /// Advance width of a string at the given pixel size.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, px).advance_width)
            .sum()
    }

    /// Greedy word wrap against a pixel budget. A word wider than the budget
    /// gets a line of its own rather than being split.
    pub fn wrap(&self, text: &str, px: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if current.is_empty() || self.measure(&candidate, px) <= max_width {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Draw one line of text with its baseline at `baseline`, blending glyph
    /// coverage with the color's own alpha.
    pub fn draw(&self, canvas: &mut Canvas, text: &str, px: f32, color: Rgba<u8>, x: f32, baseline: f32) {
        let mut pen = x;
        let baseline = baseline.round() as i64;

        for ch in text.chars() {
            let (metrics, coverage) = self.font.rasterize(ch, px);

            // fontdue's ymin is the distance from the baseline to the BOTTOM
            // of the glyph, so the top row sits at baseline - ymin - height.
            let glyph_x = pen.round() as i64 + metrics.xmin as i64;
            let glyph_y = baseline - metrics.ymin as i64 - metrics.height as i64;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let cov = coverage[gy * metrics.width + gx];
                    if cov == 0 {
                        continue;
                    }
                    let alpha = ((cov as u16 * color[3] as u16 + 127) / 255) as u8;
                    canvas.blend_pixel(
                        glyph_x + gx as i64,
                        glyph_y + gy as i64,
                        Rgba([color[0], color[1], color[2], alpha]),
                    );
                }
            }

            pen += metrics.advance_width;
        }
    }
}
