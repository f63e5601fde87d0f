//! Scattering models for scene materials.

use ember_core::{Color, Material};
use ember_math::{Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};

/// Outcome of a ray scattering off a surface.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color filter applied to light returning along `scattered`
    pub attenuation: Color,
    pub scattered: Ray,
}

/// How light interacts with a surface.
pub trait Scatter {
    /// Scatter an incoming ray.
    ///
    /// Returns Some(result) if the ray scatters,
    /// or None if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;
}

impl Scatter for Material {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match *self {
            Material::Diffuse { albedo } => Some(scatter_diffuse(albedo, rec, rng)),
            Material::Metal { albedo, fuzz } => scatter_metal(albedo, fuzz, ray_in, rec, rng),
            Material::Dielectric { refraction_index } => {
                Some(scatter_dielectric(refraction_index, ray_in, rec, rng))
            }
        }
    }
}

/// Lambertian scatter: a random direction around the normal.
fn scatter_diffuse(albedo: Color, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
    let direction = diffuse_direction(rec.normal, random_unit_vector(rng));
    ScatterResult {
        attenuation: albedo,
        scattered: Ray::new(rec.p, direction),
    }
}

/// Offset the normal by a unit vector, falling back to the normal itself
/// when the two nearly cancel out.
#[inline]
fn diffuse_direction(normal: Vec3, offset: Vec3) -> Vec3 {
    let direction = normal + offset;
    if direction.length_squared() < 1e-8 {
        normal
    } else {
        direction
    }
}

fn scatter_metal(
    albedo: Color,
    fuzz: f32,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Option<ScatterResult> {
    let reflected = reflect(ray_in.direction().normalize(), rec.normal);
    let direction = reflected + fuzz * random_in_unit_sphere(rng);

    // Fuzzed rays that end up below the surface are absorbed
    if direction.dot(rec.normal) > 0.0 {
        Some(ScatterResult {
            attenuation: albedo,
            scattered: Ray::new(rec.p, direction),
        })
    } else {
        None
    }
}

fn scatter_dielectric(
    refraction_index: f32,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> ScatterResult {
    let refraction_ratio = if rec.front_face {
        1.0 / refraction_index
    } else {
        refraction_index
    };

    let unit_direction = ray_in.direction().normalize();
    let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);

    let direction = if cannot_refract(cos_theta, refraction_ratio)
        || reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
    {
        reflect(unit_direction, rec.normal)
    } else {
        refract(unit_direction, rec.normal, refraction_ratio)
    };

    ScatterResult {
        attenuation: Color::ONE,
        scattered: Ray::new(rec.p, direction),
    }
}

/// Total internal reflection test from Snell's law.
#[inline]
pub fn cannot_refract(cos_theta: f32, refraction_ratio: f32) -> bool {
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    refraction_ratio * sin_theta > 1.0
}

/// Schlick's approximation for reflectance
#[inline]
pub fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
