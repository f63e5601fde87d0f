//! Random sampling helpers.
//!
//! All generators take the RNG as a parameter so renders stay reproducible
//! and parallel workers never share generator state.

use ember_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Mixing constant used to spread consecutive pixel indices across seeds.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Uniform random number in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform random number in [-1, 1).
#[inline]
fn gen_bilateral(rng: &mut dyn RngCore) -> f32 {
    gen_f32(rng) * 2.0 - 1.0
}

/// Random point inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_bilateral(rng), gen_bilateral(rng), gen_bilateral(rng));
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random unit vector, uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        // Points too close to the center lose precision when normalized
        if len_sq > 1e-6 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random offset in the square [-0.5, 0.5) x [-0.5, 0.5).
pub fn sample_square(rng: &mut dyn RngCore) -> (f32, f32) {
    (gen_f32(rng) - 0.5, gen_f32(rng) - 0.5)
}

/// Generator for one pixel of a render.
///
/// The sequence depends only on the render seed and the pixel index, not on
/// which worker thread picks the pixel up.
pub fn pixel_rng(seed: u64, pixel_index: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ pixel_index.wrapping_mul(SEED_STRIDE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_random_in_unit_sphere() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
        }
    }

    #[test]
    fn test_random_unit_vector_is_normalized() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1_000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_random_unit_vector_covers_sphere() {
        // Mean of a uniform distribution on the sphere is the origin
        let mut rng = StdRng::seed_from_u64(3);
        let n = 20_000;
        let sum: Vec3 = (0..n).map(|_| random_unit_vector(&mut rng)).sum();
        assert!((sum / n as f32).length() < 0.05);
    }

    #[test]
    fn test_sample_square_range() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..1_000 {
            let (x, y) = sample_square(&mut rng);
            assert!((-0.5..0.5).contains(&x));
            assert!((-0.5..0.5).contains(&y));
        }
    }

    #[test]
    fn test_pixel_rng_is_deterministic() {
        let a: Vec<u64> = (0..4).map(|_| pixel_rng(42, 17).next_u64()).collect();
        let mut rng = pixel_rng(42, 17);
        let first = rng.next_u64();
        assert!(a.iter().all(|&x| x == first));

        // Neighbouring pixels get different streams
        assert_ne!(pixel_rng(42, 17).next_u64(), pixel_rng(42, 18).next_u64());
        assert_ne!(pixel_rng(42, 17).next_u64(), pixel_rng(43, 17).next_u64());
    }
}
