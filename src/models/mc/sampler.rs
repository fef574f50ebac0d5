//! Standard normal sampling with the Marsaglia polar method.
//!
//! All working values live on the stack of the call, so the sampler is
//! reentrant; the only state is the caller's generator.

use rand::Rng;

/// Draw one N(0, 1) variate from `rng`.
///
/// Pairs of uniforms are mapped to the square [-1, 1)², rejected unless they
/// fall strictly inside the unit circle (and off the origin), then transformed.
/// About 21.5% of pairs are rejected. There is no iteration cap: a degenerate
/// generator that never lands inside the circle would spin forever.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let v1 = 2.0 * rng.gen::<f64>() - 1.0;
        let v2 = 2.0 * rng.gen::<f64>() - 1.0;
        let s = v1 * v1 + v2 * v2;
        if s > 0.0 && s < 1.0 {
            return v1 * (-2.0 * s.ln() / s).sqrt();
        }
    }
}

/// Draw one N(mean, sd²) variate.
pub fn normal_sample<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    standard_normal(rng) * sd + mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sampler_moments() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 200_000;
        let samples: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!(mean.abs() < 0.01, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.02, "variance = {var}");
    }

    #[test]
    fn test_shift_and_scale() {
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let z = standard_normal(&mut a);
            let x = normal_sample(&mut b, 3.0, 2.0);
            assert!((x - (2.0 * z + 3.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(standard_normal(&mut a), standard_normal(&mut b));
        }
    }
}
