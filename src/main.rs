use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Parser;

mod assemble;
mod cli;
mod error;
mod overlay;
mod project;
mod render;
mod source;
mod thumbnail;
mod titles;

use assemble::{Assembler, AudioFade, FfmpegRunner, RenderRequest};
use error::LapseError;
use overlay::OverlayComposer;
use project::Project;
use render::TypeFace;
use source::{DirectorySource, FrameSource, SyntheticSource};
use titles::TitleScreen;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    println!("lapsevid version {}\n", env!("CARGO_PKG_VERSION"));

    run(&args)
}

fn run(args: &cli::Args) -> Result<()> {
    let total_timer = Instant::now();

    // Project file settings, overridden by explicit flags.
    let mut project = match &args.project {
        Some(path) => Project::load(path)?,
        None => Project::default(),
    };
    if let Some(title) = &args.title {
        project.title = title.clone();
    }
    if let Some(subtitle) = &args.subtitle {
        project.subtitle = subtitle.clone();
    }
    if let Some(fps) = args.fps {
        project.fps = fps;
    }
    if args.audio.is_some() {
        project.audio = args.audio.clone();
    }
    if let Some(fade_in) = args.audio_fade_in {
        project.audio_fade_in = fade_in;
    }
    if let Some(fade_out) = args.audio_fade_out {
        project.audio_fade_out = fade_out;
    }
    if args.start_time.is_some() {
        project.start_time = args.start_time.clone();
    }

    project.validate()?;

    let jobs = args.jobs.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()?;

    let start_time = match &project.start_time {
        Some(text) => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").map_err(|e| {
            LapseError::InvalidConfig(format!(
                "start time '{}' is not in YYYY-MM-DD HH:MM form: {}",
                text, e
            ))
        })?,
        None => chrono::Local::now().naive_local(),
    };

    // Staging layout: original stills, composited frames, title frames, and
    // the manifest all live under the work directory.
    let originals_dir = args.work_dir.join("original");
    let frames_dir = args.work_dir.join("frames");
    let titles_dir = args.work_dir.join("titleframes");
    for dir in [&args.work_dir, &originals_dir, &frames_dir, &titles_dir] {
        fs::create_dir_all(dir).map_err(|source| LapseError::Io {
            path: dir.clone(),
            source,
        })?;
    }
    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent).map_err(|source| LapseError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let face = TypeFace::from_system(&args.font)?;

    println!("Getting images...");
    let stage_timer = Instant::now();
    let mut frame_source: Box<dyn FrameSource> = match &args.input {
        Some(dir) => Box::new(DirectorySource::new(dir.clone())),
        None => Box::new(SyntheticSource::new(originals_dir.clone(), project.fps)),
    };
    let originals = frame_source.frames()?;
    println!("Done. {}\n", fmt_elapsed(stage_timer.elapsed()));

    // The first still decides the output dimensions; every canvas derives
    // from it, which keeps the whole sequence uniform.
    let first = originals
        .first()
        .ok_or_else(|| LapseError::InvalidConfig("frame source returned no frames".into()))?;
    let (width, height) = source::probe_dimensions(first)?;

    println!("Creating title frames...");
    let stage_timer = Instant::now();
    let title_frames = TitleScreen {
        width,
        height,
        fps: project.fps,
        title: &project.title,
        subtitle: &project.subtitle,
        face: &face,
    }
    .generate(&titles_dir)?;
    println!("Done. {}\n", fmt_elapsed(stage_timer.elapsed()));

    println!("Creating frames...");
    let stage_timer = Instant::now();
    let held_title = title_frames
        .last()
        .ok_or_else(|| LapseError::InvalidConfig("title sequence is empty".into()))?;
    let composer = OverlayComposer {
        fps: project.fps,
        face: &face,
        start: start_time,
    };
    let overlay_frames = composer.compose_all(&originals, held_title, &frames_dir)?;

    let thumbnail_path = if args.no_thumbnail {
        None
    } else {
        let path = args.work_dir.join("thumbnail.png");
        thumbnail::compose(
            &originals[originals.len() / 2],
            &path,
            &project.title,
            &project.subtitle,
            &face,
        )?;
        Some(path)
    };
    println!("Done. {}\n", fmt_elapsed(stage_timer.elapsed()));

    println!("Rendering...\n");
    let stage_timer = Instant::now();
    let mut frames: Vec<PathBuf> = title_frames;
    frames.extend(overlay_frames);

    let assembler = Assembler {
        fps: project.fps,
        ffmpeg: args.ffmpeg.clone(),
        runner: FfmpegRunner::default(),
    };
    let manifest_path = args.work_dir.join("framelist.txt");
    let request = RenderRequest {
        frames: &frames,
        cover: thumbnail_path.as_deref(),
        audio: project.audio.as_deref(),
        fade: AudioFade {
            fade_in: project.audio_fade_in,
            fade_out: project.audio_fade_out,
        },
        manifest_path: &manifest_path,
        out_path: &args.output,
    };
    let final_path = assembler.render(&request)?;
    println!("\nDone. {}", fmt_elapsed(stage_timer.elapsed()));

    println!(
        "\nVideo was successfully created. It is available at: {}",
        final_path.display()
    );
    println!(
        "\nAll steps completed in {}",
        fmt_elapsed(total_timer.elapsed())
    );

    Ok(())
}

fn fmt_elapsed(elapsed: Duration) -> String {
    if elapsed.as_secs() < 60 {
        format!("{:.1}s", elapsed.as_secs_f64())
    } else {
        let minutes = elapsed.as_secs() / 60;
        let seconds = elapsed.as_secs() % 60;
        format!("{}m {}s", minutes, seconds)
    }
}
