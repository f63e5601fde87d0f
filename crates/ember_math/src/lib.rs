// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}
