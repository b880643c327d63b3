//! Stripe Webhook Handling
//!
//! Verifies inbound events against the raw body and reacts to succeeded
//! payments. Every verified event is acknowledged, whatever happens to the
//! notifications it triggers.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use gift_core::ANONYMOUS_GUEST;

use crate::error::{PaymentError, Result};
use crate::notify::{GiftNotifier, NotificationReport};
use crate::signature::{self, DEFAULT_TOLERANCE_SECS};

/// The only event type acted upon
pub const PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";

/// Parsed webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    /// Payment intent succeeded - log and notify
    PaymentSucceeded(ReceivedGift),

    /// Unhandled event type
    Other { event_type: String },
}

/// A gift whose payment went through
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedGift {
    pub intent_id: String,

    /// Amount charged, in minor units
    pub amount_minor: i64,

    pub currency: String,
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_message: String,

    /// Gift amount before fee gross-up, when recorded
    pub original_amount: Option<Decimal>,

    pub fees_covered: bool,
}

impl ReceivedGift {
    /// Amount charged in major units
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.amount_minor, 2)
    }

    /// e.g. `$50.00 AUD`
    pub fn display_amount(&self) -> String {
        format!("${:.2} {}", self.amount(), self.currency.to_uppercase())
    }
}

/// Result of handling a verified event
#[derive(Clone, Debug)]
pub enum WebhookOutcome {
    GiftReceived {
        gift: ReceivedGift,
        /// `None` when email is not configured
        notifications: Option<NotificationReport>,
    },
    Ignored {
        event_type: String,
    },
}

#[derive(Deserialize)]
struct EventEnvelope {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Deserialize)]
struct EventData {
    object: serde_json::Value,
}

#[derive(Deserialize)]
struct PaymentIntentObject {
    id: String,
    amount: i64,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl PaymentIntentObject {
    fn meta(&self, key: &str) -> Option<String> {
        let value = match self.metadata.get(key)? {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Null => return None,
            other => other.to_string(),
        };
        (!value.is_empty()).then_some(value)
    }

    fn into_gift(self) -> ReceivedGift {
        ReceivedGift {
            guest_name: self.meta("guestName").unwrap_or_else(|| ANONYMOUS_GUEST.into()),
            guest_email: self.meta("guestEmail"),
            guest_message: self.meta("guestMessage").unwrap_or_default(),
            original_amount: self.meta("originalAmount").and_then(|a| a.parse().ok()),
            fees_covered: self.meta("feesCovered").is_some_and(|f| f == "true"),
            intent_id: self.id,
            amount_minor: self.amount,
            currency: self.currency,
        }
    }
}

/// Webhook handler
pub struct WebhookHandler {
    secret: String,
    tolerance_secs: i64,
    notifier: Option<GiftNotifier>,
}

impl WebhookHandler {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            notifier: None,
        }
    }

    /// Send gift notifications on succeeded payments
    #[must_use]
    pub fn with_notifier(mut self, notifier: GiftNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub const fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    pub const fn notifications_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Verify webhook signature and parse event
    pub fn parse_event(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent> {
        self.parse_event_at(payload, signature, chrono::Utc::now().timestamp())
    }

    /// As [`Self::parse_event`], with an explicit unix time for the tolerance check.
    pub fn parse_event_at(&self, payload: &[u8], signature: &str, now: i64) -> Result<WebhookEvent> {
        signature::verify(payload, signature, &self.secret, now, self.tolerance_secs)?;

        let envelope: EventEnvelope = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::WebhookParse(e.to_string()))?;

        tracing::debug!(event_id = %envelope.id, event_type = %envelope.event_type, "Verified webhook event");

        if envelope.event_type != PAYMENT_SUCCEEDED {
            return Ok(WebhookEvent::Other {
                event_type: envelope.event_type,
            });
        }

        let intent: PaymentIntentObject = serde_json::from_value(envelope.data.object)
            .map_err(|e| PaymentError::WebhookParse(format!("Invalid payment intent data: {e}")))?;

        Ok(WebhookEvent::PaymentSucceeded(intent.into_gift()))
    }

    /// Process a verified event. Never fails.
    pub async fn handle(&self, event: WebhookEvent) -> WebhookOutcome {
        match event {
            WebhookEvent::PaymentSucceeded(gift) => {
                tracing::info!(
                    intent_id = %gift.intent_id,
                    guest = %gift.guest_name,
                    amount = %gift.display_amount(),
                    message = %gift.guest_message,
                    fees_covered = gift.fees_covered,
                    "✅ Payment received"
                );

                let notifications = match &self.notifier {
                    Some(notifier) => Some(notifier.notify(&gift).await),
                    None => {
                        tracing::debug!("Email not configured - skipping notifications");
                        None
                    }
                };

                WebhookOutcome::GiftReceived { gift, notifications }
            }

            WebhookEvent::Other { event_type } => {
                tracing::debug!(event_type = %event_type, "Unhandled webhook event");
                WebhookOutcome::Ignored { event_type }
            }
        }
    }
}
