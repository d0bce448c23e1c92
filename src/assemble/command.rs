use std::path::{Path, PathBuf};

/// Logical role of one encoder input. The declaration order is the stream
/// allocation order: video first, then cover, then audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StreamRole {
    Video,
    Cover,
    Audio,
}

/// Optional audio fade durations in seconds. Zero means no fade. The two
/// durations are independent: each clause is guarded and sized by its own
/// value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioFade {
    pub fade_in: f64,
    pub fade_out: f64,
}

impl AudioFade {
    pub fn is_none(&self) -> bool {
        self.fade_in <= 0.0 && self.fade_out <= 0.0
    }
}

#[derive(Debug, Clone)]
struct InputStream {
    role: StreamRole,
    path: PathBuf,
}

/// Fully-specified ffmpeg invocation. Inputs are kept sorted by role, so a
/// stream's index is its position in the list (frames manifest always 0,
/// cover before audio) no matter which order the builder calls arrive in,
/// and `to_args` emits every `-map` and per-stream option from that same
/// allocation.
#[derive(Debug)]
pub struct EncodeSpec {
    fps: u32,
    frame_count: usize,
    inputs: Vec<InputStream>,
    fade: AudioFade,
    out_path: PathBuf,
}

impl EncodeSpec {
    pub fn new(fps: u32, manifest: &Path, frame_count: usize, out_path: &Path) -> Self {
        Self {
            fps,
            frame_count,
            inputs: vec![InputStream {
                role: StreamRole::Video,
                path: manifest.to_path_buf(),
            }],
            fade: AudioFade::default(),
            out_path: out_path.to_path_buf(),
        }
    }

    /// Attach a cover image, stream-copied into the container as an
    /// attached picture (not part of the playable timeline).
    pub fn with_cover(mut self, path: &Path) -> Self {
        self.push_input(StreamRole::Cover, path);
        self
    }

    pub fn with_audio(mut self, path: &Path, fade: AudioFade) -> Self {
        self.push_input(StreamRole::Audio, path);
        self.fade = fade;
        self
    }

    fn push_input(&mut self, role: StreamRole, path: &Path) {
        let pos = self.inputs.iter().take_while(|i| i.role <= role).count();
        self.inputs.insert(
            pos,
            InputStream {
                role,
                path: path.to_path_buf(),
            },
        );
    }

    pub fn stream_index(&self, role: StreamRole) -> Option<usize> {
        self.inputs.iter().position(|i| i.role == role)
    }

    /// Nominal output length in seconds: one frame slot per manifest entry.
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.fps as f64
    }

    /// Comma-joined afade graph, or `None` when the audio should be
    /// stream-copied untouched. Fade-in starts at 0; fade-out ends exactly at
    /// the trimmed output duration.
    pub fn audio_filter(&self) -> Option<String> {
        self.stream_index(StreamRole::Audio)?;
        if self.fade.is_none() {
            return None;
        }

        let mut clauses = Vec::new();
        if self.fade.fade_in > 0.0 {
            clauses.push(format!("afade=in:start_time=0s:duration={}s", self.fade.fade_in));
        }
        if self.fade.fade_out > 0.0 {
            // A fade longer than the output starts at 0, not at a negative time.
            let start = (self.duration_seconds() - self.fade.fade_out).max(0.0);
            clauses.push(format!(
                "afade=out:start_time={:.3}s:duration={}s",
                start, self.fade.fade_out
            ));
        }
        Some(clauses.join(","))
    }

    /// Render the argument list in the order ffmpeg's parser requires:
    /// input clauses, stream maps with per-stream options, video codec,
    /// trim, output path, overwrite flag.
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-r".into(),
            self.fps.to_string(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            self.inputs[0].path.display().to_string(),
        ];
        for input in &self.inputs[1..] {
            args.push("-i".into());
            args.push(input.path.display().to_string());
        }

        args.push("-map".into());
        args.push("0".into());

        if let Some(index) = self.stream_index(StreamRole::Cover) {
            args.push("-map".into());
            args.push(index.to_string());
            args.push(format!("-c:v:{}", index));
            args.push("copy".into());
            args.push(format!("-disposition:v:{}", index));
            args.push("attached_pic".into());
        }

        if let Some(index) = self.stream_index(StreamRole::Audio) {
            args.push("-map".into());
            args.push(index.to_string());
            match self.audio_filter() {
                Some(graph) => {
                    args.push("-af".into());
                    args.push(graph);
                }
                None => {
                    args.push("-c:a".into());
                    args.push("copy".into());
                }
            }
        }

        args.push("-c:v:0".into());
        args.push("libx264".into());
        args.push("-pix_fmt".into());
        args.push("yuv420p".into());
        args.push("-to".into());
        args.push(format_timecode(self.duration_seconds()));
        args.push(self.out_path.display().to_string());
        args.push("-y".into());

        args
    }
}

/// Format seconds as `H:MM:SS.mmm`: hours unpadded, minutes/seconds padded
/// to two digits, milliseconds to three. Seconds are converted to whole
/// milliseconds by rounding half away from zero before decomposing.
pub fn format_timecode(total_seconds: f64) -> String {
    let total_ms = (total_seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    format!("{}:{:02}:{:02}.{:03}", hours, minutes, secs, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(frame_count: usize) -> EncodeSpec {
        EncodeSpec::new(6, Path::new("framelist.txt"), frame_count, Path::new("out.mp4"))
    }

    #[test]
    fn timecode_formats_hours_minutes_seconds_millis() {
        assert_eq!(format_timecode(3661.125), "1:01:01.125");
        assert_eq!(format_timecode(0.0), "0:00:00.000");
    }

    #[test]
    fn timecode_rounds_to_nearest_millisecond() {
        // 22 frames at 6 fps: 3.666... seconds rounds up to .667.
        assert_eq!(format_timecode(22.0 / 6.0), "0:00:03.667");
    }

    #[test]
    fn video_only_allocation() {
        let spec = spec(10);
        assert_eq!(spec.stream_index(StreamRole::Video), Some(0));
        assert_eq!(spec.stream_index(StreamRole::Cover), None);
        assert_eq!(spec.stream_index(StreamRole::Audio), None);
    }

    #[test]
    fn cover_then_audio_allocation() {
        let spec = spec(10)
            .with_cover(Path::new("thumb.png"))
            .with_audio(Path::new("bg.mp3"), AudioFade::default());
        assert_eq!(spec.stream_index(StreamRole::Video), Some(0));
        assert_eq!(spec.stream_index(StreamRole::Cover), Some(1));
        assert_eq!(spec.stream_index(StreamRole::Audio), Some(2));
    }

    #[test]
    fn allocation_order_ignores_builder_call_order() {
        let spec = spec(10)
            .with_audio(Path::new("bg.mp3"), AudioFade::default())
            .with_cover(Path::new("thumb.png"));
        assert_eq!(spec.stream_index(StreamRole::Cover), Some(1));
        assert_eq!(spec.stream_index(StreamRole::Audio), Some(2));

        // The input clauses come out in the same order as the indices.
        let args = spec.to_args();
        let cover = args.iter().position(|a| a == "thumb.png").unwrap();
        let audio = args.iter().position(|a| a == "bg.mp3").unwrap();
        assert!(cover < audio);
    }

    #[test]
    fn audio_without_cover_takes_index_one() {
        let spec = spec(10).with_audio(Path::new("bg.mp3"), AudioFade::default());
        assert_eq!(spec.stream_index(StreamRole::Audio), Some(1));
        assert_eq!(spec.stream_index(StreamRole::Cover), None);
    }

    #[test]
    fn video_only_args_have_no_extra_inputs() {
        let args = spec(12).to_args();
        assert_eq!(
            args,
            vec![
                "-r", "6", "-f", "concat", "-safe", "0", "-i", "framelist.txt", "-map", "0",
                "-c:v:0", "libx264", "-pix_fmt", "yuv420p", "-to", "0:00:02.000", "out.mp4", "-y",
            ]
        );
    }

    #[test]
    fn cover_is_stream_copied_as_attached_pic() {
        let args = spec(12).with_cover(Path::new("thumb.png")).to_args();
        let map_pos = args.iter().position(|a| a == "thumb.png").unwrap();
        // Input appears before the maps, and the map references index 1.
        assert_eq!(args[map_pos - 1], "-i");
        let joined = args.join(" ");
        assert!(joined.contains("-map 1 -c:v:1 copy -disposition:v:1 attached_pic"));
    }

    #[test]
    fn audio_without_fades_is_copied() {
        let args = spec(12).with_audio(Path::new("bg.mp3"), AudioFade::default()).to_args();
        let joined = args.join(" ");
        assert!(joined.contains("-map 1 -c:a copy"));
        assert!(!joined.contains("-af"));
    }

    #[test]
    fn audio_fades_build_independent_clauses() {
        let fade = AudioFade { fade_in: 2.0, fade_out: 3.0 };
        let spec = spec(60).with_audio(Path::new("bg.mp3"), fade);
        // 60 frames at 6 fps = 10s; fade-out starts at 10 - 3 = 7.
        assert_eq!(
            spec.audio_filter().unwrap(),
            "afade=in:start_time=0s:duration=2s,afade=out:start_time=7.000s:duration=3s"
        );
    }

    #[test]
    fn fade_out_alone_omits_the_fade_in_clause() {
        let fade = AudioFade { fade_in: 0.0, fade_out: 1.5 };
        let spec = spec(60).with_audio(Path::new("bg.mp3"), fade);
        assert_eq!(
            spec.audio_filter().unwrap(),
            "afade=out:start_time=8.500s:duration=1.5s"
        );
    }

    #[test]
    fn overlong_fade_out_starts_at_zero() {
        // 60 frames at 6 fps = 10s of video, but a 30s fade-out.
        let fade = AudioFade { fade_in: 0.0, fade_out: 30.0 };
        let spec = spec(60).with_audio(Path::new("bg.mp3"), fade);
        assert_eq!(
            spec.audio_filter().unwrap(),
            "afade=out:start_time=0.000s:duration=30s"
        );
    }

    #[test]
    fn no_audio_means_no_filter() {
        let fade = AudioFade { fade_in: 2.0, fade_out: 2.0 };
        let mut spec = spec(60);
        spec.fade = fade;
        assert_eq!(spec.audio_filter(), None);
    }
}
