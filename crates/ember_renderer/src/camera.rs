//! Camera ray generation.

use ember_core::Camera;
use ember_math::{Ray, Vec3};
use rand::RngCore;

use crate::sampling::sample_square;

/// Viewport geometry derived once per render from a scene camera.
#[derive(Debug, Clone, Copy)]
pub struct RayCamera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl RayCamera {
    /// Derive the viewport for a camera looking down -Z.
    pub fn new(camera: &Camera) -> Self {
        let origin = camera.origin();
        let horizontal = Vec3::new(camera.viewport_width(), 0.0, 0.0);
        let vertical = Vec3::new(0.0, Camera::VIEWPORT_HEIGHT, 0.0);
        let lower_left_corner = origin
            - horizontal / 2.0
            - vertical / 2.0
            - Vec3::new(0.0, 0.0, Camera::FOCAL_LENGTH);

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
        }
    }

    /// Ray through normalized viewport coordinates.
    ///
    /// (0, 0) is the lower left corner of the viewport, (1, 1) the upper right.
    pub fn get_ray(&self, u: f32, v: f32) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + u * self.horizontal + v * self.vertical - self.origin,
        )
    }

    /// Generate a ray for pixel (x, y) with random sampling.
    ///
    /// Row 0 is the top of the image. The sample is jittered uniformly
    /// within the pixel for anti-aliasing.
    pub fn get_pixel_ray(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rng: &mut dyn RngCore,
    ) -> Ray {
        let (dx, dy) = sample_square(rng);
        let u = (x as f32 + 0.5 + dx) / width as f32;
        let v = ((height - 1 - y) as f32 + 0.5 + dy) / height as f32;
        self.get_ray(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn camera(origin: Vec3, aspect: f32) -> RayCamera {
        RayCamera::new(&Camera::new(origin, aspect).unwrap())
    }

    #[test]
    fn test_center_ray_points_down_negative_z() {
        let cam = camera(Vec3::ZERO, 16.0 / 9.0);
        let ray = cam.get_ray(0.5, 0.5);

        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_viewport_corners() {
        let cam = camera(Vec3::ZERO, 2.0);

        // Viewport is 4 x 2 at focal length 1
        let lower_left = cam.get_ray(0.0, 0.0).direction();
        let upper_right = cam.get_ray(1.0, 1.0).direction();
        assert!((lower_left - Vec3::new(-2.0, -1.0, -1.0)).length() < 1e-6);
        assert!((upper_right - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_directions_are_relative_to_origin() {
        let origin = Vec3::new(3.0, -1.0, 5.0);
        let cam = camera(origin, 1.0);
        let ray = cam.get_ray(0.5, 0.5);

        assert_eq!(ray.origin(), origin);
        assert!((ray.direction() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_pixel_rays_stay_in_pixel_footprint() {
        let cam = camera(Vec3::ZERO, 1.0);
        let mut rng = StdRng::seed_from_u64(42);
        let (width, height) = (10, 10);

        for _ in 0..200 {
            // Top-left pixel covers u in [0, 0.1), v in (0.9, 1]
            let d = cam.get_pixel_ray(0, 0, width, height, &mut rng).direction();
            assert!((-1.0..=-0.8).contains(&d.x), "x={}", d.x);
            assert!((0.8..=1.0).contains(&d.y), "y={}", d.y);
            assert_eq!(d.z, -1.0);
        }
    }

    #[test]
    fn test_bottom_row_maps_to_bottom_of_viewport() {
        let cam = camera(Vec3::ZERO, 1.0);
        let mut rng = StdRng::seed_from_u64(1);

        let d = cam.get_pixel_ray(5, 9, 10, 10, &mut rng).direction();
        assert!(d.y < -0.7);
    }

    #[test]
    fn test_single_pixel_image() {
        let cam = camera(Vec3::ZERO, 1.0);
        let mut rng = StdRng::seed_from_u64(9);

        let d = cam.get_pixel_ray(0, 0, 1, 1, &mut rng).direction();
        assert!(d.x.abs() <= 1.0 && d.y.abs() <= 1.0);
    }
}
