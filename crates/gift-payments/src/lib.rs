//! # gift-payments
//!
//! Payment processing and gift notifications for the wishing well.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐ POST /create-payment-intent ┌──────────────┐  create   ┌────────┐
//! │ Gift form│────────────────────────────▶│ GiftCheckout │──────────▶│ Stripe │
//! │          │◀──────── client secret ─────│              │           │        │
//! │          │──── confirmCardPayment ─────────────────────────────────▶│        │
//! └──────────┘                             ┌──────────────┐  signed   │        │
//!                                          │WebhookHandler│◀──────────│        │
//!                                          └──────┬───────┘   event   └────────┘
//!                                                 │ GiftNotifier
//!                                                 ▼
//!                                     guest thank-you + couple notice
//! ```
//!
//! Processor and email clients sit behind the [`PaymentGateway`] and
//! [`Mailer`] traits. Construct them once at startup and hand them to the
//! handlers; [`mock`] provides in-memory versions for tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gift_payments::{GiftCheckout, StripeGateway};
//! use gift_core::{FeeSchedule, GiftRequest};
//!
//! let gateway = StripeGateway::new("sk_test_xxx");
//! let checkout = GiftCheckout::new(FeeSchedule::default(), "aud");
//!
//! let created = checkout.create(&gateway, &request).await?;
//! // Hand created.intent.client_secret to Stripe.js
//! ```

mod error;
mod intent;
mod notify;
mod resend;
pub mod signature;
mod stripe_gateway;
mod webhook;
pub mod mock;

pub use error::{PaymentError, Result};
pub use intent::{CreatedIntent, GiftCheckout, GiftIntent, IntentRequest, PaymentGateway};
pub use notify::{Delivery, GiftNotifier, Mailer, NotificationReport, OutgoingEmail};
pub use resend::{ResendConfig, ResendMailer};
pub use stripe_gateway::{parse_currency, StripeGateway};
pub use webhook::{ReceivedGift, WebhookEvent, WebhookHandler, WebhookOutcome, PAYMENT_SUCCEEDED};
