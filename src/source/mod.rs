mod synthetic;

pub use synthetic::SyntheticSource;

use std::path::{Path, PathBuf};

use crate::error::LapseError;

/// Supplies the ordered, non-empty list of source frames. Paths are returned
/// first-to-last in presentation order; every frame must share the dimensions
/// of the first (the whole output canvas is derived from that probe).
pub trait FrameSource {
    fn frames(&mut self) -> Result<Vec<PathBuf>, LapseError>;
}

/// Reads an existing directory of stills, sorted by file name.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl FrameSource for DirectorySource {
    fn frames(&mut self) -> Result<Vec<PathBuf>, LapseError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| LapseError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut frames: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LapseError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
                .unwrap_or(false);
            if is_image && path.is_file() {
                frames.push(path);
            }
        }

        frames.sort();

        if frames.is_empty() {
            return Err(LapseError::InvalidConfig(format!(
                "no source images (*.png, *.jpg) found in '{}'",
                self.dir.display()
            )));
        }

        Ok(frames)
    }
}

/// Read only the header of the first frame to establish the output size.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), LapseError> {
    image::image_dimensions(path).map_err(|source| LapseError::SourceRead {
        path: path.to_path_buf(),
        source,
    })
}
