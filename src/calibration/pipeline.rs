use tracing::{debug, info};

use crate::calibration::config::{CalibrationConfig, MonteCarloConfig};
use crate::calibration::types::{CalibrationResult, CalibrationStep, StopReason};
use crate::contract::OptionContract;
use crate::error::{PricingError, PricingResult};
use crate::models::bs::black_scholes_price;
use crate::models::mc::monte_carlo_price;

/// A configured calibration run for one contract
pub struct CalibrationProcess {
    contract: OptionContract,
    threshold: f64,
    config: CalibrationConfig,
}

impl CalibrationProcess {
    pub fn new(contract: OptionContract, threshold: f64) -> Self {
        Self {
            contract,
            threshold,
            config: CalibrationConfig::default(),
        }
    }

    /// Replace the default (reference) loop settings
    pub fn with_config(mut self, config: CalibrationConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the Monte-Carlo seed, keeping the rest of the configuration
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.monte_carlo.seed = Some(seed);
        self
    }

    pub fn run(&self) -> PricingResult<CalibrationResult> {
        calibrate_model(&self.contract, self.threshold, &self.config)
    }
}

pub fn validate_threshold(threshold: f64) -> PricingResult<()> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(PricingError::invalid_parameter(
            "threshold",
            format!("must be positive and finite, got {threshold}"),
        ));
    }
    Ok(())
}

/// Double a count, refusing to wrap around.
fn double(name: &'static str, count: usize) -> PricingResult<usize> {
    count.checked_mul(2).ok_or_else(|| {
        PricingError::invalid_parameter(name, format!("{name} count overflow at {count}"))
    })
}

/// Seed for the `index`-th evaluation so successive evaluations use distinct streams.
fn evaluation_config(base: &MonteCarloConfig, index: u64) -> MonteCarloConfig {
    MonteCarloConfig {
        seed: base.seed.map(|s| s ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        ..base.clone()
    }
}

/// Evaluates Monte-Carlo prices for the growing (m, n) schedule and records them.
struct Search<'a> {
    contract: &'a OptionContract,
    config: &'a CalibrationConfig,
    bs_price: f64,
    threshold: f64,
    history: Vec<CalibrationStep>,
}

impl Search<'_> {
    /// Price with (paths, time_steps); returns true once within threshold.
    fn evaluate(&mut self, paths: usize, time_steps: usize) -> PricingResult<bool> {
        let mc_config = evaluation_config(&self.config.monte_carlo, self.history.len() as u64);
        let mc_price = monte_carlo_price(self.contract, paths, time_steps, &mc_config)?;
        let abs_diff = (mc_price - self.bs_price).abs();

        debug!(paths, time_steps, mc_price, abs_diff, "monte-carlo evaluation");

        self.history.push(CalibrationStep {
            paths,
            time_steps,
            mc_price,
            abs_diff,
        });
        Ok(abs_diff <= self.threshold)
    }

    fn last_price(&self) -> f64 {
        self.history.last().map_or(f64::NAN, |s| s.mc_price)
    }
}

/// Grow the Monte-Carlo effort until its price is within `threshold` of Black-Scholes.
///
/// Each outer iteration doubles the path count, re-prices, then doubles the
/// step count and re-prices, stopping as soon as a price lands within the
/// threshold. The head of the loop also stops once the step count exceeds
/// `config.max_steps`. Only steps are capped by default: path growth is
/// unbounded unless `config.max_paths` is set. All prices are compared after
/// rounding to 4 decimals.
pub fn calibrate_model(
    contract: &OptionContract,
    threshold: f64,
    config: &CalibrationConfig,
) -> PricingResult<CalibrationResult> {
    validate_threshold(threshold)?;
    config.validate()?;

    let bs_price = black_scholes_price(contract);
    let mut search = Search {
        contract,
        config,
        bs_price,
        threshold,
        history: Vec::new(),
    };

    let mut m = config.initial_paths;
    let mut n = config.initial_steps;
    let mut within = search.evaluate(m, n)?;

    let stop_reason = loop {
        if within {
            break StopReason::WithinThreshold;
        }
        if n > config.max_steps {
            break StopReason::StepCapReached;
        }
        if config.max_paths.is_some_and(|cap| m > cap) {
            break StopReason::PathCapReached;
        }

        m = double("paths", m)?;
        if search.evaluate(m, n)? {
            break StopReason::WithinThreshold;
        }

        n = double("time_steps", n)?;
        within = search.evaluate(m, n)?;
    };

    let mc_price = search.last_price();
    info!(
        bs_price,
        mc_price,
        paths = m,
        time_steps = n,
        evaluations = search.history.len(),
        ?stop_reason,
        "monte-carlo calibration finished"
    );

    Ok(CalibrationResult {
        bs_price,
        mc_price,
        paths: m,
        time_steps: n,
        threshold,
        stop_reason,
        history: search.history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_validation() {
        let c = OptionContract::sample();
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = calibrate_model(&c, bad, &CalibrationConfig::reproducible(1)).unwrap_err();
            assert!(matches!(err, PricingError::InvalidParameter { name: "threshold", .. }));
        }
    }

    #[test]
    fn test_double_overflow() {
        assert_eq!(double("paths", 4).unwrap(), 8);
        assert!(double("paths", usize::MAX).is_err());
    }

    #[test]
    fn test_evaluation_seeds_differ() {
        let base = MonteCarloConfig::seeded(42);
        assert_eq!(evaluation_config(&base, 0).seed, Some(42));
        assert_ne!(evaluation_config(&base, 1).seed, Some(42));
        assert_eq!(evaluation_config(&MonteCarloConfig::default(), 3).seed, None);
    }

    #[test]
    fn test_huge_threshold_stops_immediately() {
        let result = calibrate_model(
            &OptionContract::sample(),
            1e6,
            &CalibrationConfig::reproducible(7),
        )
        .unwrap();
        assert_eq!(result.paths, 1);
        assert_eq!(result.time_steps, 1);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.stop_reason, StopReason::WithinThreshold);
    }

    #[test]
    fn test_schedule_doubles_paths_then_steps() {
        // A tiny step cap forces the schedule to run to the cap.
        let config = CalibrationConfig {
            max_steps: 4,
            ..CalibrationConfig::reproducible(11)
        };
        let result = calibrate_model(&OptionContract::sample(), 1e-9, &config).unwrap();

        let schedule: Vec<(usize, usize)> = result
            .history
            .iter()
            .map(|s| (s.paths, s.time_steps))
            .collect();
        assert_eq!(
            schedule,
            vec![(1, 1), (2, 1), (2, 2), (4, 2), (4, 4), (8, 4), (8, 8)]
        );
        assert_eq!(result.stop_reason, StopReason::StepCapReached);
        assert_eq!((result.paths, result.time_steps), (8, 8));
    }

    #[test]
    fn test_path_cap_guard() {
        let config = CalibrationConfig {
            max_paths: Some(2),
            ..CalibrationConfig::reproducible(13)
        };
        let result = calibrate_model(&OptionContract::sample(), 1e-9, &config).unwrap();
        assert_eq!(result.stop_reason, StopReason::PathCapReached);
        assert_eq!(result.paths, 4);
    }

    #[test]
    fn test_process_builder() {
        let result = CalibrationProcess::new(OptionContract::sample(), 1e6)
            .with_seed(3)
            .run()
            .unwrap();
        assert!(result.converged());
        assert_eq!(result.bs_price, 8.0214);
    }
}
