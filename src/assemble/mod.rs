mod command;
mod manifest;
mod process;

pub use command::{format_timecode, AudioFade, EncodeSpec, StreamRole};
pub use manifest::{manifest_body, write_manifest};
pub use process::{EncoderRunner, ExecReport, FfmpegRunner};

use std::path::{Path, PathBuf};

use crate::error::LapseError;

/// One full encoder run: frame manifest, optional attached cover, optional
/// audio with fades. Absent optional inputs narrow the command instead of
/// failing.
pub struct RenderRequest<'a> {
    pub frames: &'a [PathBuf],
    pub cover: Option<&'a Path>,
    pub audio: Option<&'a Path>,
    pub fade: AudioFade,
    pub manifest_path: &'a Path,
    pub out_path: &'a Path,
}

/// Drives the external encoder: writes the manifest, builds the typed
/// command, runs it once (no retries), and maps the outcome.
pub struct Assembler<R: EncoderRunner> {
    pub fps: u32,
    pub ffmpeg: String,
    pub runner: R,
}

impl<R: EncoderRunner> Assembler<R> {
    /// Returns the absolute path of the finished video on success.
    pub fn render(&self, request: &RenderRequest<'_>) -> Result<PathBuf, LapseError> {
        if request.frames.is_empty() {
            return Err(LapseError::InvalidConfig("frame list is empty".into()));
        }
        if self.fps < 1 {
            return Err(LapseError::InvalidConfig("frame rate must be at least 1".into()));
        }

        write_manifest(request.manifest_path, request.frames)?;

        let mut spec = EncodeSpec::new(
            self.fps,
            request.manifest_path,
            request.frames.len(),
            request.out_path,
        );
        if let Some(cover) = request.cover {
            spec = spec.with_cover(cover);
        }
        if let Some(audio) = request.audio {
            if !audio.exists() {
                return Err(LapseError::AssetMissing {
                    path: audio.to_path_buf(),
                });
            }
            spec = spec.with_audio(audio, request.fade);
        }

        let report = self.runner.run(&self.ffmpeg, &spec.to_args())?;
        if report.code != 0 {
            return Err(LapseError::EncoderFailed {
                code: report.code,
                log: report.log,
            });
        }

        std::path::absolute(request.out_path).map_err(|source| LapseError::Io {
            path: request.out_path.to_path_buf(),
            source,
        })
    }
}
