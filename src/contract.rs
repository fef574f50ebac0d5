//! The option contract priced by every model in this crate.
//!
//! An [`OptionContract`] is an immutable European call: spot, strike, rate,
//! maturity and volatility. It can only be built through [`OptionContract::new`]
//! (or deserialized, which goes through the same validation), so every pricing
//! function may assume the invariants below hold.

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

/// European call option contract.
///
/// Invariants: all fields finite, `spot > 0`, `strike > 0`,
/// `time_to_maturity > 0`, `volatility > 0`. The risk-free rate may be zero
/// or negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawContract")]
pub struct OptionContract {
    spot: f64,
    strike: f64,
    risk_free_rate: f64,
    time_to_maturity: f64,
    volatility: f64,
}

/// Unvalidated field set used as the serde entry point.
#[derive(Deserialize)]
struct RawContract {
    spot: f64,
    strike: f64,
    risk_free_rate: f64,
    time_to_maturity: f64,
    volatility: f64,
}

impl TryFrom<RawContract> for OptionContract {
    type Error = PricingError;

    fn try_from(raw: RawContract) -> PricingResult<Self> {
        OptionContract::new(
            raw.spot,
            raw.strike,
            raw.risk_free_rate,
            raw.time_to_maturity,
            raw.volatility,
        )
    }
}

impl OptionContract {
    /// Build a contract, rejecting any value that would make pricing undefined.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidContract`] naming the first offending field.
    pub fn new(
        spot: f64,
        strike: f64,
        risk_free_rate: f64,
        time_to_maturity: f64,
        volatility: f64,
    ) -> PricingResult<Self> {
        check_positive("spot", spot)?;
        check_positive("strike", strike)?;
        if !risk_free_rate.is_finite() {
            return Err(PricingError::invalid_contract(
                "risk_free_rate",
                risk_free_rate,
                "must be finite",
            ));
        }
        check_positive("time_to_maturity", time_to_maturity)?;
        check_positive("volatility", volatility)?;

        Ok(Self {
            spot,
            strike,
            risk_free_rate,
            time_to_maturity,
            volatility,
        })
    }

    /// Sample contract used by the demo: S=100, K=105, r=5%, T=1y, σ=20%.
    pub fn sample() -> Self {
        Self {
            spot: 100.0,
            strike: 105.0,
            risk_free_rate: 0.05,
            time_to_maturity: 1.0,
            volatility: 0.20,
        }
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn time_to_maturity(&self) -> f64 {
        self.time_to_maturity
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Discount factor `exp(-r·T)` applied to the payoff at maturity.
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_maturity).exp()
    }
}

fn check_positive(field: &'static str, value: f64) -> PricingResult<()> {
    if !value.is_finite() {
        return Err(PricingError::invalid_contract(
            field,
            value,
            "must be finite",
        ));
    }
    if value <= 0.0 {
        return Err(PricingError::invalid_contract(
            field,
            value,
            "must be positive",
        ));
    }
    Ok(())
}
