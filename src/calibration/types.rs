use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the calibration loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// |mc - bs| <= threshold
    WithinThreshold,
    /// Step count exceeded `max_steps` at the head of the loop
    StepCapReached,
    /// Path count exceeded the optional `max_paths` guard
    PathCapReached,
}

/// One Monte-Carlo evaluation made during calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationStep {
    pub paths: usize,
    pub time_steps: usize,
    /// Rounded Monte-Carlo price
    pub mc_price: f64,
    /// |mc_price - bs_price|, both rounded
    pub abs_diff: f64,
}

/// Outcome of the adaptive Monte-Carlo search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Closed-form reference price
    pub bs_price: f64,
    /// Last Monte-Carlo price evaluated
    pub mc_price: f64,
    /// Final number of simulated paths (m)
    pub paths: usize,
    /// Final number of time steps per path (n)
    pub time_steps: usize,
    /// Threshold the search was run with
    pub threshold: f64,
    pub stop_reason: StopReason,
    /// Every evaluation, in order; the last entry matches the final fields
    pub history: Vec<CalibrationStep>,
}

impl CalibrationResult {
    pub fn converged(&self) -> bool {
        self.stop_reason == StopReason::WithinThreshold
    }

    pub fn abs_diff(&self) -> f64 {
        (self.mc_price - self.bs_price).abs()
    }
}

impl fmt::Display for CalibrationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Black-Scholes price: {}", self.bs_price)?;
        writeln!(f, "Monte-Carlo price: {}", self.mc_price)?;
        writeln!(f, "Num MC iterations: {}", self.paths)?;
        writeln!(f, "Num price time steps: {}", self.time_steps)?;
        write!(f, "Minimum price difference: {}", self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_report() {
        let result = CalibrationResult {
            bs_price: 8.0214,
            mc_price: 8.1,
            paths: 256,
            time_steps: 128,
            threshold: 0.15,
            stop_reason: StopReason::WithinThreshold,
            history: Vec::new(),
        };
        let text = result.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Black-Scholes price: 8.0214",
                "Monte-Carlo price: 8.1",
                "Num MC iterations: 256",
                "Num price time steps: 128",
                "Minimum price difference: 0.15",
            ]
        );
        assert!(result.converged());
        assert!((result.abs_diff() - 0.0786).abs() < 1e-12);
    }
}
