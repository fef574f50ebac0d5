//! Monte-Carlo pricing module
//!
//! Plain Monte-Carlo pricing of the European call under geometric Brownian
//! motion, driven by a polar-method normal sampler over seedable RNG streams.

pub mod sampler;
pub mod simulation;

pub use sampler::*;
pub use simulation::*;
