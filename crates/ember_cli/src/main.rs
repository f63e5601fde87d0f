use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ember_core::load_scene;
use ember_renderer::{render, save_image, Color, RenderConfig, DEFAULT_BUCKET_SIZE};

/// Background used by `--solid-background`.
const SOLID_BACKGROUND: Color = Color::new(0.5, 0.7, 1.0);

/// Render a scene file with the Ember path tracer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene description file.
    #[arg(value_name = "SCENE")]
    scene: PathBuf,

    /// Output image. `.ppm` writes ASCII PPM, other extensions use their format.
    #[arg(short, long, value_name = "FILE", default_value = "output.ppm")]
    output: PathBuf,

    /// Image width in pixels.
    #[arg(long, value_name = "NUM", default_value_t = 400)]
    width: u32,

    /// Image height in pixels. Derived from the camera aspect ratio if omitted.
    #[arg(long, value_name = "NUM")]
    height: Option<u32>,

    /// Samples per pixel.
    #[arg(short, long, value_name = "NUM", default_value_t = 16)]
    samples: u32,

    /// Maximum number of bounces per path.
    #[arg(long, value_name = "NUM", default_value_t = 8)]
    max_depth: u32,

    /// Seed for a reproducible render.
    #[arg(long, value_name = "NUM")]
    seed: Option<u64>,

    /// Edge length of the square tiles rendered per task.
    #[arg(long, value_name = "NUM", default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,

    /// Use a flat background color instead of the sky gradient.
    #[arg(long)]
    solid_background: bool,
}

impl Args {
    fn render_config(&self, aspect_ratio: f32) -> RenderConfig {
        let height = self
            .height
            .unwrap_or_else(|| height_for_aspect(self.width, aspect_ratio));

        let mut config = RenderConfig::default()
            .with_resolution(self.width, height)
            .with_quality(self.samples, self.max_depth)
            .with_bucket_size(self.bucket_size);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.solid_background {
            config = config.with_background(SOLID_BACKGROUND);
        }
        config
    }
}

fn height_for_aspect(width: u32, aspect_ratio: f32) -> u32 {
    ((width as f32 / aspect_ratio).round() as u32).max(1)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let scene = load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    let config = args.render_config(scene.camera().aspect_ratio());
    let image = render(&scene, &config);

    save_image(&image, &args.output)
        .with_context(|| format!("Failed to save image {}", args.output.display()))?;

    Ok(())
}
