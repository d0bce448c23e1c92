use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a render run. All variants are fatal for the
/// current run; there are no retries.
#[derive(Debug, Error)]
pub enum LapseError {
    /// A source or intermediate image could not be loaded or decoded.
    #[error("failed to read image '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A rendered frame or thumbnail could not be written.
    #[error("failed to write image '{path}': {source}")]
    FrameWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A font or audio asset path does not resolve.
    #[error("asset not found: '{path}'")]
    AssetMissing { path: PathBuf },

    /// The encoder executable could not be started. Kept distinct from a
    /// non-zero exit so the operator gets install guidance instead of a log.
    #[error(
        "could not start '{program}': {source}\n\
         Install ffmpeg and make sure it is on PATH, or point --ffmpeg at the executable."
    )]
    EncoderNotFound {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The encoder started but exited non-zero. Carries the full stderr
    /// transcript in emission order.
    #[error("ffmpeg failed with exit code {code}. Log:\n{}", .log.join("\n"))]
    EncoderFailed { code: i32, log: Vec<String> },

    /// Rejected before any work begins (empty frame list, bad fps, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Plain filesystem failure outside of image codecs.
    #[error("i/o failure on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
