//! Payment Intents
//!
//! Turns a validated gift into a chargeable intent at the payment processor.
//! The processor is reached through [`PaymentGateway`] so handlers can run
//! against Stripe in production and an in-memory gateway in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gift_core::{FeeSchedule, GiftQuote, GiftRequest};

use crate::error::Result;

/// Intent creation parameters, already in processor units
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRequest {
    /// Charge in minor units (cents)
    pub amount_minor: i64,

    /// Lowercase ISO currency code
    pub currency: String,

    pub description: String,

    /// String-typed metadata stored on the intent
    pub metadata: BTreeMap<String, String>,
}

/// Intent as returned by the processor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedIntent {
    pub id: String,

    /// Token the browser uses to confirm the payment
    pub client_secret: String,
}

/// Payment processor client trait
///
/// Implement this for each processor. [`crate::StripeGateway`] is the
/// production implementation.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent. Called once per gift; never retried.
    async fn create_intent(&self, request: IntentRequest) -> Result<CreatedIntent>;

    /// Gateway name
    fn name(&self) -> &str;
}

/// A created gift intent and the amounts it charges
#[derive(Clone, Debug)]
pub struct GiftIntent {
    pub intent: CreatedIntent,
    pub quote: GiftQuote,
}

impl GiftIntent {
    /// Total charged, in major units
    pub const fn total(&self) -> Decimal {
        self.quote.total
    }
}

/// Validates gifts, prices them and creates intents
pub struct GiftCheckout {
    fees: FeeSchedule,
    currency: String,
}

impl GiftCheckout {
    pub fn new(fees: FeeSchedule, currency: impl Into<String>) -> Self {
        Self {
            fees,
            currency: currency.into().to_lowercase(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub const fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Build the processor request for a gift without contacting the processor.
    pub fn prepare(&self, request: &GiftRequest) -> Result<(IntentRequest, GiftQuote)> {
        let gift = request.validate()?;
        let quote = self.fees.quote(gift.amount, gift.cover_fees);

        let intent = IntentRequest {
            amount_minor: quote.total_minor_units(),
            currency: self.currency.clone(),
            description: gift.description(),
            metadata: gift.metadata(),
        };

        Ok((intent, quote))
    }

    /// Validate, price and create the intent.
    ///
    /// Invalid gifts fail before the gateway is called.
    pub async fn create(&self, gateway: &dyn PaymentGateway, request: &GiftRequest) -> Result<GiftIntent> {
        let (intent_request, quote) = self.prepare(request)?;

        tracing::debug!(
            gateway = gateway.name(),
            amount_minor = intent_request.amount_minor,
            currency = %intent_request.currency,
            fees_covered = quote.covers_fees(),
            "Creating payment intent"
        );

        let intent = gateway.create_intent(intent_request).await?;

        tracing::info!(
            intent_id = %intent.id,
            gift = %quote.gift,
            total = %quote.total,
            "Created payment intent"
        );

        Ok(GiftIntent { intent, quote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaymentError;
    use crate::mock::MockGateway;
    use gift_core::GiftError;
    use rust_decimal_macros::dec;

    fn checkout() -> GiftCheckout {
        GiftCheckout::new(FeeSchedule::default(), "AUD")
    }

    #[test]
    fn test_prepare_grosses_up_and_lowercases_currency() {
        let request = GiftRequest {
            amount: Some(dec!(100)),
            guest_name: Some("Jo".into()),
            cover_fees: true,
            ..Default::default()
        };

        let (intent, quote) = checkout().prepare(&request).unwrap();
        assert_eq!(intent.amount_minor, 10_209);
        assert_eq!(intent.currency, "aud");
        assert_eq!(intent.description, "Wedding gift from Jo");
        assert_eq!(intent.metadata["originalAmount"], "100");
        assert_eq!(quote.total, dec!(102.09));
    }

    #[tokio::test]
    async fn test_create_calls_gateway_once() {
        let gateway = MockGateway::new();
        let request = GiftRequest {
            amount: Some(dec!(50)),
            ..Default::default()
        };

        let created = checkout().create(&gateway, &request).await.unwrap();
        assert_eq!(created.total(), dec!(50));
        assert!(created.intent.client_secret.starts_with("pi_mock_"));

        let calls = gateway.requests().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].amount_minor, 5_000);
        assert_eq!(calls[0].metadata["guestName"], "Anonymous");
    }

    #[tokio::test]
    async fn test_invalid_gift_never_reaches_gateway() {
        let gateway = MockGateway::new();
        let request = GiftRequest {
            amount: Some(Decimal::ZERO),
            ..Default::default()
        };

        let err = checkout().create(&gateway, &request).await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::InvalidGift(GiftError::AmountTooSmall { .. })
        ));
        assert!(gateway.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let gateway = MockGateway::failing("card network unavailable");
        let request = GiftRequest {
            amount: Some(dec!(20)),
            ..Default::default()
        };

        let err = checkout().create(&gateway, &request).await.unwrap_err();
        assert!(matches!(err, PaymentError::Stripe(_)));
        assert!(!err.is_client_error());
    }
}
