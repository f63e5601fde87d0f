//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - Parallel bucket rendering with rayon

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use ember_core::Scene;
use ember_math::{lerp, Interval, Ray};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use rand::RngCore;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::RayCamera;
use crate::material::Scatter;
use crate::{Color, Hittable};

/// Minimum hit distance for rays, suppressing shadow acne.
pub const T_MIN: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
    /// Seed for reproducible renders (random when None)
    pub seed: Option<u64>,
    /// Edge length of the square render buckets
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            samples_per_pixel: 16,
            max_depth: 8,
            background: Color::ZERO,
            use_sky_gradient: true,
            seed: None,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Use a solid background color instead of the sky gradient.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self.use_sky_gradient = false;
        self
    }

    /// Fix the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the bucket size.
    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }
}

/// Counters gathered while tracing a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Number of times a material was asked to scatter
    pub scatter_calls: u64,
    /// Deepest bounce at which a scatter happened
    pub max_scatter_depth: u32,
}

/// Compute the color seen by a ray.
///
/// `depth` is the number of bounces already taken; tracing starts at 0.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    ray_color_traced(ray, world, depth, config, rng, &mut TraceStats::default())
}

/// [`ray_color`] that also records scatter statistics into `stats`.
pub fn ray_color_traced(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
    stats: &mut TraceStats,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth >= config.max_depth {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY)) else {
        return background(ray, config);
    };

    stats.scatter_calls += 1;
    stats.max_scatter_depth = stats.max_scatter_depth.max(depth);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color =
                ray_color_traced(&result.scattered, world, depth + 1, config, rng, stats);
            result.attenuation * scattered_color
        }
        // Absorbed
        None => Color::ZERO,
    }
}

fn background(ray: &Ray, config: &RenderConfig) -> Color {
    if config.use_sky_gradient {
        sky_gradient(ray)
    } else {
        config.background
    }
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    lerp(Color::ONE, Color::new(0.5, 0.7, 1.0), a)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let intensity = Interval::new(0.0, 0.999);
    let quantize = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}

/// Render a single pixel with multi-sampling.
///
/// Returns the average linear color of the samples.
pub fn render_pixel(
    camera: &RayCamera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        // get_pixel_ray adds a random offset for anti-aliasing
        let ray = camera.get_pixel_ray(x, y, config.width, config.height, rng);
        pixel_color += ray_color(&ray, world, 0, config, rng);
    }

    // Average the samples
    pixel_color / samples as f32
}

/// Linear color image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, chunk) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = self.offset(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&color| color_to_rgba(color))
            .collect()
    }

    /// Convert to an 8-bit RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| Rgba(color_to_rgba(self.get(x, y))))
    }

    /// Convert to an 8-bit RGB image, for formats without alpha.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let [r, g, b, _] = color_to_rgba(self.get(x, y));
            Rgb([r, g, b])
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the entire scene to an image buffer.
pub fn render(scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    render_with_cancel(scene, config, &AtomicBool::new(false))
}

/// Render the scene, stopping early once `cancel` is set.
///
/// Workers check the flag between pixels. Pixels not rendered before the
/// flag was raised stay black.
pub fn render_with_cancel(scene: &Scene, config: &RenderConfig, cancel: &AtomicBool) -> ImageBuffer {
    let start = Instant::now();
    let camera = RayCamera::new(scene.camera());
    let seed = config.seed.unwrap_or_else(rand::random);
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} buckets (seed {})",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        seed
    );

    let finished = AtomicUsize::new(0);
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, &camera, scene, config, seed, cancel);
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} done ({}/{})", bucket.index, done, buckets.len());
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    if cancel.load(Ordering::Relaxed) {
        log::warn!("Render cancelled after {:?}", start.elapsed());
    } else {
        log::info!("Rendered in {:?}", start.elapsed());
    }

    image
}
