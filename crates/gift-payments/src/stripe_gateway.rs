//! Stripe Gateway
//!
//! Creates card payment intents through `async-stripe`. The browser confirms
//! them with Stripe.js using the returned client secret.

use async_trait::async_trait;
use stripe::{Client, CreatePaymentIntent, Currency, Metadata, PaymentIntent};

use crate::error::{PaymentError, Result};
use crate::intent::{CreatedIntent, IntentRequest, PaymentGateway};

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
    test_mode: bool,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            test_mode: secret_key.starts_with("sk_test"),
        }
    }

    /// Whether the key is a test-mode key
    pub const fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    /// Get the underlying Stripe client
    pub const fn inner(&self) -> &Client {
        &self.client
    }
}

/// Parse a currency code into Stripe's currency type.
pub fn parse_currency(code: &str) -> Result<Currency> {
    serde_json::from_value(serde_json::Value::String(code.to_lowercase()))
        .map_err(|_| PaymentError::Config(format!("Unsupported currency: {code}")))
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, request: IntentRequest) -> Result<CreatedIntent> {
        let currency = parse_currency(&request.currency)?;

        let mut params = CreatePaymentIntent::new(request.amount_minor, currency);
        params.description = Some(&request.description);
        params.metadata = Some(request.metadata.clone().into_iter().collect::<Metadata>());

        let intent = PaymentIntent::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let client_secret = intent
            .client_secret
            .ok_or_else(|| PaymentError::Stripe("No client secret returned".into()))?;

        Ok(CreatedIntent {
            id: intent.id.to_string(),
            client_secret,
        })
    }

    fn name(&self) -> &str {
        "stripe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("aud").unwrap(), Currency::AUD);
        assert_eq!(parse_currency("USD").unwrap(), Currency::USD);
    }

    #[tokio::test]
    async fn test_mode_detection() {
        assert!(StripeGateway::new("sk_test_123").is_test_mode());
        assert!(!StripeGateway::new("sk_live_123").is_test_mode());
    }
}
