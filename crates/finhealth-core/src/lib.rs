pub mod assessment;
pub mod benchmarks;
pub mod error;
pub mod forecast;
pub mod ratios;
pub mod recommendations;
pub mod risk;
pub mod scoring;
pub mod types;

pub use error::FinHealthError;
pub use types::*;

/// Standard result type for all finhealth operations
pub type FinHealthResult<T> = Result<T, FinHealthError>;
