// Closed-form Black-Scholes pricing for the European call and the rational
// normal CDF approximation it is built on.

use crate::contract::OptionContract;
use crate::models::utils::round_price;

/// sqrt(2π) as sqrt(4·acos(0)).
fn rt2pi() -> f64 {
    (4.0 * 0.0_f64.acos()).sqrt()
}

/// Boundary between the rational approximation and the continued fraction.
const SPLIT: f64 = 7.07106781186547;

/// Beyond this |x| the tail probability underflows and is treated as zero.
const TAIL_CUTOFF: f64 = 37.0;

/// Numerator coefficients, ascending powers of z.
const NUM: [f64; 7] = [
    220.206867912376,
    221.213596169931,
    112.079291497871,
    33.912866078383,
    6.37396220353165,
    0.700383064443688,
    3.52624965998911e-02,
];

/// Denominator coefficients, ascending powers of z.
const DEN: [f64; 8] = [
    440.413735824752,
    793.826512519948,
    637.333633378831,
    296.564248779674,
    86.7807322029461,
    16.064177579207,
    1.75566716318264,
    8.83883476483184e-02,
];

/// Horner evaluation, coefficients in ascending order.
fn horner(coeffs: &[f64], z: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * z + c)
}

/// Standard normal cumulative distribution function P(Z <= x).
///
/// Accurate to roughly double precision. Returns exactly `0.5` at zero and
/// clamps to exactly `0.0` / `1.0` once `|x| > 37`.
pub fn normal_cdf(x: f64) -> f64 {
    let z = x.abs();

    let tail = if z > TAIL_CUTOFF {
        0.0
    } else {
        let e = (-z * z / 2.0).exp();
        if z < SPLIT {
            e * horner(&NUM, z) / horner(&DEN, z)
        } else {
            let f = z + 1.0 / (z + 2.0 / (z + 3.0 / (z + 4.0 / (z + 13.0 / 20.0))));
            e / (rt2pi() * f)
        }
    };

    if x <= 0.0 {
        tail
    } else {
        1.0 - tail
    }
}

/// The standardized variables `(d1, d2)` of the Black-Scholes formula.
pub fn d1_d2(contract: &OptionContract) -> (f64, f64) {
    let s = contract.spot();
    let k = contract.strike();
    let r = contract.risk_free_rate();
    let t = contract.time_to_maturity();
    let sigma = contract.volatility();

    let vol_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + t * (r + sigma * sigma / 2.0)) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Unrounded closed-form price of the European call.
pub fn bs_call_price(contract: &OptionContract) -> f64 {
    let (d1, d2) = d1_d2(contract);
    contract.spot() * normal_cdf(d1)
        - contract.strike() * contract.discount_factor() * normal_cdf(d2)
}

/// Black-Scholes price of the European call, rounded to 4 decimals.
pub fn black_scholes_price(contract: &OptionContract) -> f64 {
    round_price(bs_call_price(contract))
}
