use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoastPricingError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient yield: '{bean}' produces {sellable_units} sellable bags")]
    InsufficientYield {
        bean: String,
        sellable_units: Decimal,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RoastPricingError {
    fn from(e: serde_json::Error) -> Self {
        RoastPricingError::SerializationError(e.to_string())
    }
}
