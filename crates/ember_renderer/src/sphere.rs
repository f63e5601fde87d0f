//! Ray-sphere intersection.

use ember_core::Sphere;
use ember_math::{Interval, Ray, Vec3};

/// Intersect a ray with a sphere.
///
/// Returns the nearest root of the ray/sphere quadratic that lies strictly
/// inside `ray_t`, falling back to the far root when the near one is out of
/// range.
#[inline]
pub fn intersect_sphere(sphere: &Sphere, ray: &Ray, ray_t: Interval) -> Option<f32> {
    let oc = sphere.center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    Some(root)
}

/// Unit normal pointing out of the sphere at surface point `p`.
#[inline]
pub fn outward_normal(sphere: &Sphere, p: Vec3) -> Vec3 {
    (p - sphere.center) / sphere.radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::SceneBuilder;
    use ember_core::{Color, Material};

    /// Build a sphere through a scene so it carries a real material handle.
    fn sphere(center: Vec3, radius: f32) -> Sphere {
        let mut builder = SceneBuilder::new();
        builder.camera(Vec3::ZERO, 1.0).unwrap();
        builder
            .material("grey", Material::diffuse(Color::splat(0.5)))
            .unwrap();
        builder.sphere(center, radius, "grey").unwrap();
        let scene = builder.build().unwrap();
        scene.spheres()[0]
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let s = sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let t = intersect_sphere(&s, &ray, forward()).unwrap();
        assert!((t - 0.5).abs() < 0.001); // Should hit at t=0.5
    }

    #[test]
    fn test_sphere_miss() {
        let s = sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(intersect_sphere(&s, &ray, forward()).is_none());
    }

    #[test]
    fn test_hit_distance_is_center_distance_minus_radius() {
        let cases = [
            (Vec3::new(0.0, 0.0, -5.0), 1.0, Vec3::ZERO),
            (Vec3::new(3.0, -2.0, 7.0), 0.25, Vec3::new(-1.0, 4.0, 2.0)),
            (Vec3::new(0.0, -100.5, -1.0), 100.0, Vec3::new(0.0, 10.0, 0.0)),
            (Vec3::new(10.0, 10.0, 10.0), 3.0, Vec3::new(-2.0, 0.5, 1.0)),
        ];

        for (center, radius, origin) in cases {
            let s = sphere(center, radius);
            // Unit direction so t is a world-space distance
            let direction = (center - origin).normalize();
            let ray = Ray::new(origin, direction);

            let t = intersect_sphere(&s, &ray, forward()).unwrap();
            let expected = (center - origin).length() - radius;
            assert!(
                (t - expected).abs() < 1e-3 * expected.max(1.0),
                "t={t}, expected={expected}"
            );
        }
    }

    #[test]
    fn test_unnormalized_direction_scales_t() {
        let s = sphere(Vec3::new(0.0, 0.0, -3.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));

        let t = intersect_sphere(&s, &ray, forward()).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_inside_sphere_uses_far_root() {
        let s = sphere(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let t = intersect_sphere(&s, &ray, forward()).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_interval_bounds_are_exclusive() {
        let s = sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // Both roots (0.5 and 1.5) beyond t_max
        assert!(intersect_sphere(&s, &ray, Interval::new(0.001, 0.4)).is_none());

        // Near root excluded, far root accepted
        let t = intersect_sphere(&s, &ray, Interval::new(0.6, 10.0)).unwrap();
        assert!((t - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_behind_ray() {
        let s = sphere(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_sphere(&s, &ray, forward()).is_none());
    }

    #[test]
    fn test_outward_normal_is_unit() {
        let s = sphere(Vec3::new(1.0, 2.0, 3.0), 2.0);
        let n = outward_normal(&s, Vec3::new(1.0, 4.0, 3.0));
        assert_eq!(n, Vec3::Y);
    }
}
