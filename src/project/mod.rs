use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::LapseError;

/// One title fade step per frame needs a distinct 8-bit opacity, which caps
/// the usable frame rate at 255.
pub const MAX_FPS: u32 = 255;

/// Project file: titles, audio, and fades for one render, loadable from YAML
/// or JSON so a video series can keep its settings next to its footage.
/// Command-line flags override whatever the file says.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub subtitle: String,
    pub fps: u32,

    /// Background audio file; omitted means a silent video.
    pub audio: Option<PathBuf>,
    pub audio_fade_in: f64,
    pub audio_fade_out: f64,

    /// Displayed timestamp of the first overlay frame, `YYYY-MM-DD HH:MM`.
    /// Omitted means the wall clock at render time.
    pub start_time: Option<String>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            title: "Hello world!".to_string(),
            subtitle: "Have a nice day".to_string(),
            fps: 6,
            audio: None,
            audio_fade_in: 0.0,
            audio_fade_out: 0.0,
            start_time: None,
        }
    }
}

impl Project {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let project = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse project JSON: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse project YAML: {}", path.display()))?
        };

        Ok(project)
    }

    /// Check the merged settings before any rendering starts.
    pub fn validate(&self) -> Result<(), LapseError> {
        if self.fps < 1 || self.fps > MAX_FPS {
            return Err(LapseError::InvalidConfig(format!(
                "frame rate must be between 1 and {}, got {}",
                MAX_FPS, self.fps
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let project: Project = serde_yaml::from_str("title: Sprouting peas").unwrap();
        assert_eq!(project.title, "Sprouting peas");
        assert_eq!(project.subtitle, "Have a nice day");
        assert_eq!(project.fps, 6);
        assert!(project.audio.is_none());
        assert_eq!(project.audio_fade_in, 0.0);
    }

    #[test]
    fn full_yaml_round_trip() {
        let yaml = "\
title: Garden
subtitle: One week
fps: 12
audio: assets/background.mp3
audio_fade_in: 2
audio_fade_out: 3.5
start_time: \"2024-05-01 12:00\"
";
        let project: Project = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(project.fps, 12);
        assert_eq!(project.audio, Some(PathBuf::from("assets/background.mp3")));
        assert_eq!(project.audio_fade_in, 2.0);
        assert_eq!(project.audio_fade_out, 3.5);
        assert_eq!(project.start_time.as_deref(), Some("2024-05-01 12:00"));
    }

    #[test]
    fn frame_rate_bounds_are_enforced() {
        let mut project = Project::default();
        assert!(project.validate().is_ok());
        project.fps = 0;
        assert!(project.validate().is_err());
        project.fps = MAX_FPS;
        assert!(project.validate().is_ok());
        project.fps = MAX_FPS + 1;
        assert!(project.validate().is_err());
    }

    #[test]
    fn json_projects_parse_too() {
        let json = r#"{"title": "Garden", "fps": 24}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.title, "Garden");
        assert_eq!(project.fps, 24);
    }
}
