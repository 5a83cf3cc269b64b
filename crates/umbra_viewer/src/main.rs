//! Umbra - render signed distance field scenes to PNG frames.
//!
//! Loads a JSON scene (or a built-in preset), advances its animations at a
//! fixed frame rate and writes one image per frame.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use umbra_core::{presets, RenderParams, SceneDescription};
use umbra_renderer::{render_image, ImageBuffer};

#[derive(Parser, Debug)]
#[command(name = "umbra", version)]
/// Sphere-trace signed distance field scenes to PNG
struct Args {
    #[arg(long, conflicts_with = "preset")]
    /// Scene file (JSON)
    scene: Option<PathBuf>,

    #[arg(long, default_value = "sphere-plane")]
    /// Built-in scene: "sphere-plane" or "blend"
    preset: String,

    #[arg(long, default_value_t = 480)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    /// Number of frames to render, starting at t = 0
    frames: u32,

    #[arg(long, default_value_t = 30.0)]
    /// Frames per second of animation time
    fps: f32,

    #[arg(long)]
    /// Worker threads (defaults to one per core)
    threads: Option<usize>,

    #[arg(short, long, default_value = "umbra")]
    /// Output path prefix. A single frame is written to `<prefix>.png`,
    /// sequences to `<prefix>_0000.png`, `<prefix>_0001.png`, ...
    output: PathBuf,

    #[arg(long)]
    /// Also write the resolved scene as JSON
    dump_scene: Option<PathBuf>,

    #[arg(long)]
    /// Override the scene's sphere-tracing step limit
    max_steps: Option<u32>,

    #[arg(long)]
    /// Override the scene's pixels per parallel work item
    chunk_size: Option<usize>,
}

impl Args {
    fn load_scene(&self) -> Result<SceneDescription> {
        if let Some(path) = &self.scene {
            return SceneDescription::load(path).with_context(|| format!("failed to load scene {}", path.display()));
        }

        match presets::by_name(&self.preset) {
            Some(scene) => {
                log::info!("Using preset '{}'", scene.name);
                Ok(scene)
            }
            None => bail!(
                "unknown preset '{}' (available: {})",
                self.preset,
                presets::PRESET_NAMES.join(", ")
            ),
        }
    }

    fn apply_overrides(&self, params: &mut RenderParams) {
        if let Some(max_steps) = self.max_steps {
            params.max_steps = max_steps;
        }
        if let Some(chunk_size) = self.chunk_size {
            params.chunk_size = chunk_size;
        }
    }
}

/// Output path for `frame` of a `frames`-long sequence.
fn frame_path(prefix: &Path, frame: u32, frames: u32) -> PathBuf {
    let stem = prefix.with_extension("");
    if frames == 1 {
        return stem.with_extension("png");
    }
    let mut name = stem.into_os_string();
    name.push(format!("_{:04}.png", frame));
    PathBuf::from(name)
}

fn save_png(image: ImageBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let (width, height) = (image.width, image.height);
    let rgba = image::RgbaImage::from_raw(width, height, image.into_bytes())
        .context("pixel buffer does not match image size")?;
    rgba.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn render_frames(args: &Args, scene: &SceneDescription) -> Result<()> {
    for frame in 0..args.frames {
        let time = frame as f32 / args.fps;
        let poses = scene.frame_at(time);

        let (image, stats) = render_image(args.width, args.height, &scene.root, &scene.params, &poses)?;

        let path = frame_path(&args.output, frame, args.frames);
        save_png(image, &path)?;

        log::info!(
            "Frame {}/{} (t={:.2}s) rendered in {:.2?} -> {}",
            frame + 1,
            args.frames,
            time,
            stats.elapsed,
            path.display()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    if !args.fps.is_finite() || args.fps <= 0.0 {
        bail!("--fps must be a positive number, got {}", args.fps);
    }

    let mut scene = args.load_scene()?;
    args.apply_overrides(&mut scene.params);
    scene.validate()?;

    log::info!(
        "Rendering '{}': {}x{}, {} frame(s), {} shapes",
        scene.name,
        args.width,
        args.height,
        args.frames,
        scene.root.primitive_count()
    );

    if let Some(path) = &args.dump_scene {
        fs::write(path, scene.to_json()?).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Wrote scene to {}", path.display());
    }

    match args.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            log::debug!("Using a pool of {} threads", pool.current_num_threads());
            pool.install(|| render_frames(&args, &scene))
        }
        None => render_frames(&args, &scene),
    }
}
