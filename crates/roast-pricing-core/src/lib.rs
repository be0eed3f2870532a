pub mod error;
pub mod fees;
pub mod limits;
pub mod pricing;
pub mod rounding;
pub mod types;

#[cfg(feature = "discount")]
pub mod discount;

#[cfg(feature = "blend")]
pub mod blend;

#[cfg(feature = "market")]
pub mod market;

pub use error::RoastPricingError;
pub use types::*;

/// Standard result type for all roast-pricing operations
pub type RoastPricingResult<T> = Result<T, RoastPricingError>;
