use std::path::{Path, PathBuf};

use crate::error::LapseError;

/// Body of the concat-demuxer file list: one `file '<path>'` line followed by
/// a fixed `duration 1` record per frame, in final sequence order.
pub fn manifest_body(frames: &[PathBuf]) -> String {
    frames
        .iter()
        .map(|frame| format!("file '{}'\nduration 1", frame.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn write_manifest(path: &Path, frames: &[PathBuf]) -> Result<(), LapseError> {
    let mut body = manifest_body(frames);
    body.push('\n');
    std::fs::write(path, body).map_err(|source| LapseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_pairs_every_frame_with_a_duration_record() {
        let frames = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        assert_eq!(
            manifest_body(&frames),
            "file 'a.png'\nduration 1\nfile 'b.png'\nduration 1"
        );
    }

    #[test]
    fn single_frame_body() {
        let frames = vec![PathBuf::from("only.png")];
        assert_eq!(manifest_body(&frames), "file 'only.png'\nduration 1");
    }
}
