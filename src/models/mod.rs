pub mod bs;
pub mod mc;

/// Numeric helpers shared by the pricers
pub mod utils {
    /// Number of decimals every reported price is rounded to.
    pub const PRICE_DECIMALS: i32 = 4;

    /// Round half away from zero to `decimals` places.
    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let scale = 10f64.powi(decimals);
        (value * scale).round() / scale
    }

    /// Round a price to [`PRICE_DECIMALS`] places.
    pub fn round_price(value: f64) -> f64 {
        round_to(value, PRICE_DECIMALS)
    }

}
