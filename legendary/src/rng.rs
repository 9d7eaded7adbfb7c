//! Random draws shared by genome creation, mutation
//! and network initialization. Every function takes
//! the random source explicitly, so seeded runs are
//! reproducible.
use rand::Rng;

/// Returns a float drawn uniformly from `[1, 2)`.
pub fn random_float<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    1.0 + rng.gen::<f32>()
}

/// Returns the difference of two [`random_float`] draws.
///
/// The result lies in `(-1, 1)`, but is *not* uniform:
/// it follows a triangular distribution peaking at 0.
///
/// # Examples
/// ```
/// use legendary::rng::random_clamped;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let weight = random_clamped(&mut rng);
/// assert!(weight > -1.0 && weight < 1.0);
/// ```
pub fn random_clamped<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    random_float(rng) - random_float(rng)
}

/// Returns `true` with probability `chance`.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, chance: f32) -> bool {
    rng.gen::<f32>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_float_range() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..1000 {
            let f = random_float(&mut rng);
            assert!((1.0..2.0).contains(&f));
        }
    }

    #[test]
    fn random_clamped_is_triangular() {
        const SAMPLES: usize = 20_000;
        let mut rng = StdRng::seed_from_u64(1);
        let samples: Vec<f32> = (0..SAMPLES).map(|_| random_clamped(&mut rng)).collect();

        assert!(samples.iter().all(|s| s.abs() < 1.0));
        // A uniform distribution on (-1, 1) puts half its mass in
        // (-0.5, 0.5); the triangular one puts three quarters there.
        let central = samples.iter().filter(|s| s.abs() < 0.5).count() as f32 / SAMPLES as f32;
        assert!(central > 0.7, "central mass was {}", central);
        let mean = samples.iter().sum::<f32>() / SAMPLES as f32;
        assert!(mean.abs() < 0.05);
    }

    #[test]
    fn chance_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!((0..1000).all(|_| chance(&mut rng, 1.0)));
        assert!((0..1000).all(|_| !chance(&mut rng, 0.0)));
    }
}
