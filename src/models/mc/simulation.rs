use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

use super::sampler::standard_normal;
use crate::calibration::config::MonteCarloConfig;
use crate::contract::OptionContract;
use crate::error::{PricingError, PricingResult};
use crate::models::utils::round_price;

/// Reject zero path or step counts before any simulation work.
pub fn validate_counts(paths: usize, steps: usize) -> PricingResult<()> {
    if paths == 0 {
        return Err(PricingError::invalid_parameter(
            "paths",
            "must be at least 1, got 0",
        ));
    }
    if steps == 0 {
        return Err(PricingError::invalid_parameter(
            "steps",
            "must be at least 1, got 0",
        ));
    }
    Ok(())
}

/// Per-step log-price increment `(drift, diffusion)` for `steps` equal sub-intervals.
fn step_coefficients(contract: &OptionContract, steps: usize) -> (f64, f64) {
    let sigma = contract.volatility();
    let dt = contract.time_to_maturity() / steps as f64;
    let drift = (contract.risk_free_rate() - sigma * sigma / 2.0) * dt;
    let diffusion = sigma * dt.sqrt();
    (drift, diffusion)
}

/// Sum of undiscounted call payoffs over `len` paths driven by one RNG stream.
fn chunk_payoff_sum(
    contract: &OptionContract,
    len: usize,
    steps: usize,
    seed: u64,
    coefficients: (f64, f64),
) -> f64 {
    let (drift, diffusion) = coefficients;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sum = 0.0;

    for _ in 0..len {
        let mut price = contract.spot();
        for _ in 0..steps {
            let x = standard_normal(&mut rng);
            price *= (drift + diffusion * x).exp();
        }
        sum += (price - contract.strike()).max(0.0);
    }

    sum
}

/// Monte-Carlo estimate of the call price, not rounded.
///
/// Simulates `paths` geometric Brownian motion paths of `steps` exact
/// log-space increments each and averages the discounted payoff.
///
/// Paths are grouped into chunks of `config.chunk_size`; chunk `i` draws from
/// its own generator seeded with `base_seed + i`, and chunk sums are added in
/// chunk order. The result for a given seed is therefore identical with or
/// without the `parallel` feature.
pub fn simulate_call(
    contract: &OptionContract,
    paths: usize,
    steps: usize,
    config: &MonteCarloConfig,
) -> PricingResult<f64> {
    validate_counts(paths, steps)?;
    config.validate()?;

    let base_seed = config.seed.unwrap_or_else(rand::random::<u64>);
    let chunk_size = config.chunk_size;
    let n_chunks = paths.div_ceil(chunk_size);
    let coefficients = step_coefficients(contract, steps);

    let run_chunk = |i: usize| -> f64 {
        let len = chunk_size.min(paths - i * chunk_size);
        let sum = chunk_payoff_sum(
            contract,
            len,
            steps,
            base_seed.wrapping_add(i as u64),
            coefficients,
        );
        trace!(chunk = i, paths = len, payoff_sum = sum, "simulated chunk");
        sum
    };

    let chunk_sums = collect_chunk_sums(n_chunks, config.parallel, run_chunk);
    let total: f64 = chunk_sums.iter().sum();

    Ok(total * contract.discount_factor() / paths as f64)
}

#[cfg(feature = "parallel")]
fn collect_chunk_sums<F>(n_chunks: usize, parallel: bool, run_chunk: F) -> Vec<f64>
where
    F: Fn(usize) -> f64 + Sync + Send,
{
    use rayon::prelude::*;

    if parallel && n_chunks > 1 {
        (0..n_chunks).into_par_iter().map(run_chunk).collect()
    } else {
        (0..n_chunks).map(run_chunk).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn collect_chunk_sums<F>(n_chunks: usize, _parallel: bool, run_chunk: F) -> Vec<f64>
where
    F: Fn(usize) -> f64,
{
    (0..n_chunks).map(run_chunk).collect()
}

/// Monte-Carlo price of the call, rounded to 4 decimals.
pub fn monte_carlo_price(
    contract: &OptionContract,
    paths: usize,
    steps: usize,
    config: &MonteCarloConfig,
) -> PricingResult<f64> {
    simulate_call(contract, paths, steps, config).map(round_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> MonteCarloConfig {
        MonteCarloConfig {
            seed: Some(seed),
            ..MonteCarloConfig::default()
        }
    }

    #[test]
    fn test_zero_counts_rejected() {
        let c = OptionContract::sample();
        assert!(matches!(
            monte_carlo_price(&c, 0, 1, &seeded(1)),
            Err(PricingError::InvalidParameter { name: "paths", .. })
        ));
        assert!(matches!(
            monte_carlo_price(&c, 1, 0, &seeded(1)),
            Err(PricingError::InvalidParameter { name: "steps", .. })
        ));
    }

    #[test]
    fn test_minimum_counts() {
        let price = monte_carlo_price(&OptionContract::sample(), 1, 1, &seeded(3)).unwrap();
        assert!(price.is_finite() && price >= 0.0);
    }

    #[test]
    fn test_step_coefficients() {
        let c = OptionContract::sample();
        let (drift, diffusion) = step_coefficients(&c, 4);
        assert!((drift - (0.05 - 0.02) * 0.25).abs() < 1e-15);
        assert!((diffusion - 0.2 * 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_deep_in_the_money_near_forward_intrinsic() {
        // With K tiny, the call is worth S - K·e^{-rT} almost surely.
        let c = OptionContract::new(100.0, 1e-6, 0.05, 1.0, 0.2).unwrap();
        let price = simulate_call(&c, 50_000, 1, &seeded(9)).unwrap();
        assert!((price - 100.0).abs() < 0.5, "price = {price}");
    }

    #[test]
    fn test_partial_last_chunk() {
        let c = OptionContract::sample();
        let cfg = MonteCarloConfig {
            seed: Some(5),
            chunk_size: 3,
            ..MonteCarloConfig::default()
        };
        let a = simulate_call(&c, 10, 2, &cfg).unwrap();
        let b = simulate_call(&c, 10, 2, &cfg).unwrap();
        assert_eq!(a, b);
    }
}
