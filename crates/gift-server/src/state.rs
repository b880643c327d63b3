//! Application State

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use gift_payments::{GiftCheckout, PaymentGateway, WebhookHandler};

use crate::config::BankDetails;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Gift validation and pricing
    pub checkout: Arc<GiftCheckout>,

    /// Payment processor (None if Stripe is not configured)
    pub gateway: Option<Arc<dyn PaymentGateway>>,

    /// Webhook verification and notifications (None if Stripe is not configured)
    pub webhooks: Option<Arc<WebhookHandler>>,

    /// Settings the browser needs
    pub public: Arc<PublicConfig>,
}

impl AppState {
    pub fn payments_configured(&self) -> bool {
        self.gateway.is_some() && self.webhooks.is_some()
    }

    pub fn email_configured(&self) -> bool {
        self.webhooks
            .as_ref()
            .is_some_and(|w| w.notifications_enabled())
    }
}

/// Client-side configuration served at `/api/config`
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub publishable_key: String,
    pub currency: String,
    pub fee_rate: Decimal,
    pub fixed_fee: Decimal,
    pub bank_details: Option<BankDetails>,
}
