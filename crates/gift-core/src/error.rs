//! Error Types

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for gift validation
pub type Result<T> = std::result::Result<T, GiftError>;

/// Gift validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GiftError {
    /// No amount supplied
    #[error("Amount is required")]
    MissingAmount,

    /// Amount below the minimum gift
    #[error("Amount {amount} is below the minimum of {min}")]
    AmountTooSmall { amount: Decimal, min: Decimal },

    /// Amount above what the processor accepts in a single charge
    #[error("Amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge { amount: Decimal, max: Decimal },
}

impl GiftError {
    /// Message safe to show the guest
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::MissingAmount | Self::AmountTooSmall { .. } => "Invalid amount",
            Self::AmountTooLarge { .. } => "Amount is too large for a single card payment",
        }
    }
}
