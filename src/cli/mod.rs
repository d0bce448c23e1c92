use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lapsevid")]
#[command(version)]
#[command(about = "Assemble a time-lapse video from still images", long_about = None)]
pub struct Args {
    /// Directory of source images (a synthetic demo sequence is generated if omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output video file
    #[arg(short, long, default_value = "video/out.mp4")]
    pub output: PathBuf,

    /// Staging directory for generated frames and the manifest
    #[arg(long, default_value = "video")]
    pub work_dir: PathBuf,

    /// Project file (YAML or JSON) with titles, audio, and fades
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Title text (overrides the project file)
    #[arg(long)]
    pub title: Option<String>,

    /// Subtitle text (overrides the project file)
    #[arg(long)]
    pub subtitle: Option<String>,

    /// Frames per second (overrides the project file)
    #[arg(long)]
    pub fps: Option<u32>,

    /// Font name or path to a .ttf/.otf file
    #[arg(short = 'f', long, default_value = "sans-serif")]
    pub font: String,

    /// Background audio file (overrides the project file)
    #[arg(short, long)]
    pub audio: Option<PathBuf>,

    /// Audio fade-in duration in seconds
    #[arg(long)]
    pub audio_fade_in: Option<f64>,

    /// Audio fade-out duration in seconds
    #[arg(long)]
    pub audio_fade_out: Option<f64>,

    /// Skip the attached cover thumbnail
    #[arg(long)]
    pub no_thumbnail: bool,

    /// Path to the ffmpeg executable
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: String,

    /// Displayed timestamp of the first frame (YYYY-MM-DD HH:MM, defaults to now)
    #[arg(long)]
    pub start_time: Option<String>,

    /// Worker threads for frame rendering (defaults to the CPU count)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}
