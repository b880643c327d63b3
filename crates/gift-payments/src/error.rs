//! Payment Error Types

use thiserror::Error;

use gift_core::GiftError;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Gift request failed validation
    #[error("Invalid gift: {0}")]
    InvalidGift(#[from] GiftError),

    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Email delivery failed
    #[error("Email error: {0}")]
    Email(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Whether the caller sent something it can correct
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidGift(_) | Self::WebhookSignature(_) | Self::WebhookParse(_)
        )
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidGift(e) => e.user_message(),
            Self::Stripe(_) => "Failed to create payment intent",
            Self::WebhookSignature(_) => "Invalid signature",
            Self::Config(_) => "Service configuration error.",
            _ => "An error occurred processing your request.",
        }
    }
}
