use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::LapseError;

/// Result of one encoder invocation: the exit code and every stderr line in
/// emission order.
#[derive(Debug, Clone)]
pub struct ExecReport {
    pub code: i32,
    pub log: Vec<String>,
}

/// Seam between command construction and process execution. Production uses
/// [`FfmpegRunner`]; tests inject a fake that returns canned reports.
pub trait EncoderRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ExecReport, LapseError>;
}

/// Runs the real ffmpeg binary, blocking until it exits. ffmpeg writes all
/// diagnostics to stderr and leaves stdout unused, so only stderr is read.
pub struct FfmpegRunner {
    /// Echo encoder output to our own stderr while collecting it.
    pub echo: bool,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self { echo: true }
    }
}

impl EncoderRunner for FfmpegRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ExecReport, LapseError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    LapseError::EncoderNotFound {
                        program: program.to_string(),
                        source,
                    }
                } else {
                    LapseError::Io {
                        path: PathBuf::from(program),
                        source,
                    }
                }
            })?;

        let stderr = child.stderr.take().ok_or_else(|| LapseError::Io {
            path: PathBuf::from(program),
            source: io::Error::other("stderr pipe was not captured"),
        })?;

        // Single reader keeps the log in emission order.
        let mut log = Vec::new();
        for line in BufReader::new(stderr).lines() {
            let line = line.map_err(|source| LapseError::Io {
                path: PathBuf::from(program),
                source,
            })?;
            if self.echo {
                eprintln!("{}", line);
            }
            log.push(line);
        }

        let status = child.wait().map_err(|source| LapseError::Io {
            path: PathBuf::from(program),
            source,
        })?;

        Ok(ExecReport {
            code: status.code().unwrap_or(-1),
            log,
        })
    }
}
