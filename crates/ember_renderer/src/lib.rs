//! Ember Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for sphere scenes loaded by `ember_core`.
//! Diffuse, metal and dielectric materials are supported. Rendering is
//! split into buckets that run in parallel with rayon.

mod bucket;
mod camera;
mod hittable;
mod image_io;
mod material;
mod renderer;
mod sampling;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::RayCamera;
pub use hittable::{HitRecord, Hittable};
pub use image_io::{save_image, write_ppm, ImageError, ImageResult};
pub use material::{cannot_refract, reflect, reflectance, refract, Scatter, ScatterResult};
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, ray_color_traced, render, render_pixel,
    render_with_cancel, sky_gradient, ImageBuffer, RenderConfig, TraceStats, T_MIN,
};
pub use sampling::pixel_rng;
pub use sphere::intersect_sphere;

/// Re-export scene and math types used in the renderer API
pub use ember_core::{Color, Material, Scene};
pub use ember_math::{Interval, Ray, Vec3};
