//! Error types for option pricing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("Invalid contract: {field}={value} ({reason})")]
    InvalidContract {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl PricingError {
    pub fn invalid_contract(field: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidContract {
            field,
            value,
            reason,
        }
    }

    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
