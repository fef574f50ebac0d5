//! # Callprice-Lib: European Call Pricing and Monte-Carlo Calibration
//!
//! `callprice-lib` prices a European call option two ways and reconciles them:
//!
//! - **Black-Scholes**: closed-form price using a double-precision rational
//!   approximation of the normal CDF
//! - **Monte-Carlo**: plain simulation of geometric Brownian motion paths with a
//!   polar-method normal sampler over seedable RNG streams
//! - **Calibration**: adaptive search for a path/step count whose Monte-Carlo
//!   price lands within a tolerance of the closed form
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use callprice_lib::{
//!     black_scholes_price, calibrate_monte_carlo, monte_carlo_price, OptionContract,
//! };
//!
//! let contract = OptionContract::new(100.0, 105.0, 0.05, 1.0, 0.20)?;
//!
//! let bs = black_scholes_price(&contract);
//! let mc = monte_carlo_price(&contract, 1000, 500)?;
//! let report = calibrate_monte_carlo(&contract, 0.15)?;
//!
//! println!("{bs} {mc}\n{report}");
//! # Ok::<(), callprice_lib::PricingError>(())
//! ```
//!
//! All prices are rounded to 4 decimals before they are returned or compared.
//!
//! ## Configuration Presets
//!
//! - `reference()`: the exact reference search, unseeded
//! - `reproducible(seed)`: the reference search with a fixed seed
//! - `fast()`: lower step cap, bounded path growth, parallel paths

// ================================================================================================
// MODULES
// ================================================================================================

pub mod calibration;
pub mod contract;
pub mod error;
pub mod models;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

pub use calibration::{
    config::{CalibrationConfig, MonteCarloConfig},
    pipeline::CalibrationProcess,
    types::{CalibrationResult, CalibrationStep, StopReason},
};
pub use contract::OptionContract;
pub use error::{PricingError, PricingResult};
pub use models::bs::normal_cdf;
pub use models::mc::{normal_sample, standard_normal};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured calibration settings.
///
/// - [`reference()`]: Reproduces the reference search exactly
/// - [`reproducible()`]: Reference search with a fixed seed
/// - [`fast()`]: Bounded search for interactive use
pub mod default_configs {
    use crate::calibration::config::CalibrationConfig;

    /// Reference search: start at one path and one step, stop once the step
    /// count exceeds 20,000, no path cap, fresh entropy on every run.
    pub fn reference() -> CalibrationConfig {
        CalibrationConfig::reference()
    }

    /// Reference search with every Monte-Carlo evaluation derived from `seed`.
    ///
    /// ```rust
    /// use callprice_lib::{calibrate_monte_carlo_with_config, default_configs, OptionContract};
    ///
    /// let contract = OptionContract::sample();
    /// let config = default_configs::reproducible(9);
    /// let a = calibrate_monte_carlo_with_config(&contract, 1.0, &config)?;
    /// let b = calibrate_monte_carlo_with_config(&contract, 1.0, &config)?;
    /// assert_eq!(a, b);
    /// # Ok::<(), callprice_lib::PricingError>(())
    /// ```
    pub fn reproducible(seed: u64) -> CalibrationConfig {
        CalibrationConfig::reproducible(seed)
    }

    /// Step cap of 256 and path cap of 2^20, paths simulated in parallel when
    /// the `parallel` feature is enabled.
    pub fn fast() -> CalibrationConfig {
        CalibrationConfig::fast()
    }
}

// ================================================================================================
// PRICING API
// ================================================================================================

/// Black-Scholes price of the European call, rounded to 4 decimals.
///
/// ```text
/// d1 = (ln(S/K) + T(r + σ²/2)) / (σ√T)
/// d2 = d1 - σ√T
/// C  = S·N(d1) - K·e^{-rT}·N(d2)
/// ```
///
/// The contract's invariants (`T > 0`, `σ > 0`) guarantee the formula is defined,
/// so this never fails.
///
/// # Example
///
/// ```rust
/// use callprice_lib::{black_scholes_price, OptionContract};
///
/// assert_eq!(black_scholes_price(&OptionContract::sample()), 8.0214);
/// ```
pub fn black_scholes_price(contract: &OptionContract) -> f64 {
    models::bs::black_scholes_price(contract)
}

/// Monte-Carlo price of the European call, rounded to 4 decimals.
///
/// Simulates `paths` (m) independent price paths with `steps` (n) log-normal
/// increments each and averages the discounted payoff `max(S_T - K, 0)`.
/// Cost is O(m·n). Uses fresh entropy; see [`monte_carlo_price_with_config`]
/// for seeded runs.
///
/// # Errors
///
/// [`PricingError::InvalidParameter`] if `paths` or `steps` is zero.
pub fn monte_carlo_price(
    contract: &OptionContract,
    paths: usize,
    steps: usize,
) -> PricingResult<f64> {
    monte_carlo_price_with_config(contract, paths, steps, &MonteCarloConfig::default())
}

/// [`monte_carlo_price`] with explicit engine settings (seed, parallelism).
///
/// ```rust
/// use callprice_lib::{monte_carlo_price_with_config, MonteCarloConfig, OptionContract};
///
/// let contract = OptionContract::sample();
/// let cfg = MonteCarloConfig::seeded(42);
/// let a = monte_carlo_price_with_config(&contract, 500, 10, &cfg)?;
/// let b = monte_carlo_price_with_config(&contract, 500, 10, &cfg)?;
/// assert_eq!(a, b);
/// # Ok::<(), callprice_lib::PricingError>(())
/// ```
pub fn monte_carlo_price_with_config(
    contract: &OptionContract,
    paths: usize,
    steps: usize,
    config: &MonteCarloConfig,
) -> PricingResult<f64> {
    models::mc::monte_carlo_price(contract, paths, steps, config)
}

/// Find a Monte-Carlo size whose price is within `threshold` of Black-Scholes.
///
/// Starting from one path and one step, repeatedly doubles the path count and
/// then the step count, re-pricing after each doubling, until the rounded
/// Monte-Carlo price is within `threshold` of the rounded Black-Scholes price.
/// The search also stops at the head of an iteration once the step count
/// exceeds 20,000.
///
/// Only the step count is capped. If the estimate never converges, path
/// growth is bounded only by running time; set
/// [`CalibrationConfig::max_paths`] through
/// [`calibrate_monte_carlo_with_config`] to guard against that.
///
/// # Errors
///
/// [`PricingError::InvalidParameter`] if `threshold` is not positive and finite.
pub fn calibrate_monte_carlo(
    contract: &OptionContract,
    threshold: f64,
) -> PricingResult<CalibrationResult> {
    calibrate_monte_carlo_with_config(contract, threshold, &CalibrationConfig::default())
}

/// [`calibrate_monte_carlo`] with explicit search and engine settings.
pub fn calibrate_monte_carlo_with_config(
    contract: &OptionContract,
    threshold: f64,
    config: &CalibrationConfig,
) -> PricingResult<CalibrationResult> {
    calibration::pipeline::calibrate_model(contract, threshold, config)
}
