//! Hittable trait and HitRecord for ray-object intersection.

use ember_core::{Material, Scene, Sphere};
use ember_math::{Interval, Ray, Vec3};

use crate::sphere::{intersect_sphere, outward_normal};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Create a record for a hit at `t`, orienting the normal against the ray.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        // Normal always points against the ray
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the closest hit strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<(&Sphere, f32)> = None;
        let mut interval = ray_t;

        // Shrink the interval as we go so farther spheres can't win
        for sphere in self.spheres() {
            if let Some(t) = intersect_sphere(sphere, ray, interval) {
                interval = interval.with_max(t);
                closest = Some((sphere, t));
            }
        }

        let (sphere, t) = closest?;
        let normal = outward_normal(sphere, ray.at(t));
        Some(HitRecord::new(ray, t, normal, self.material(sphere.material)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Color, SceneBuilder};

    fn scene(spheres: &[(Vec3, f32, &str)]) -> Scene {
        let mut builder = SceneBuilder::new();
        builder.camera(Vec3::ZERO, 1.0).unwrap();
        builder
            .material("near", Material::diffuse(Color::new(1.0, 0.0, 0.0)))
            .unwrap();
        builder
            .material("far", Material::metal(Color::new(0.0, 0.0, 1.0), 0.0))
            .unwrap();
        for &(center, radius, material) in spheres {
            builder.sphere(center, radius, material).unwrap();
        }
        builder.build().unwrap()
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_nearest_hit_wins_regardless_of_order() {
        let near = (Vec3::new(0.0, 0.0, -2.0), 0.5, "near");
        let far = (Vec3::new(0.0, 0.0, -5.0), 0.5, "far");
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        for world in [scene(&[near, far]), scene(&[far, near])] {
            let rec = world.hit(&ray, forward()).unwrap();
            assert!((rec.t - 1.5).abs() < 1e-5);
            assert_eq!(rec.material, world.material_by_name("near").unwrap());
        }
    }

    #[test]
    fn test_miss_returns_none() {
        let world = scene(&[(Vec3::new(0.0, 0.0, -2.0), 0.5, "near")]);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(world.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_empty_scene_never_hits() {
        let world = scene(&[]);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(world.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_front_face_from_outside() {
        let world = scene(&[(Vec3::new(0.0, 0.0, -2.0), 0.5, "near")]);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = world.hit(&ray, forward()).unwrap();
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert!((rec.p - Vec3::new(0.0, 0.0, -1.5)).length() < 1e-5);
    }

    #[test]
    fn test_back_face_from_inside() {
        let world = scene(&[(Vec3::ZERO, 2.0, "near")]);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let rec = world.hit(&ray, forward()).unwrap();
        assert!(!rec.front_face);
        // Flipped to face the incoming ray
        assert!((rec.normal - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn test_t_min_suppresses_self_intersection() {
        let world = scene(&[(Vec3::new(0.0, 0.0, -1.0), 0.5, "near")]);

        // Start exactly on the surface, heading out of the sphere
        let ray = Ray::new(Vec3::new(0.0, 0.0, -0.5), Vec3::Z);
        assert!(world.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_interval_max_is_respected() {
        let world = scene(&[(Vec3::new(0.0, 0.0, -10.0), 0.5, "far")]);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(world.hit(&ray, Interval::new(0.001, 5.0)).is_none());
    }
}
