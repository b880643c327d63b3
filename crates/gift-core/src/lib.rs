//! # gift-core
//!
//! Domain types for the wishing-well gift form.
//!
//! Both the server (authoritative charge) and the WASM form (live preview)
//! compute totals through [`FeeSchedule::quote`], so the amount shown to the
//! guest is always the amount charged.
//!
//! ```text
//! ┌────────────┐   GiftRequest    ┌──────────────┐   Gift + GiftQuote   ┌──────────┐
//! │  Web form  │─────────────────▶│  validate()  │─────────────────────▶│  Stripe  │
//! │ (preview)  │                  │  quote()     │   (minor units)      │  intent  │
//! └────────────┘                  └──────────────┘                      └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use gift_core::{FeeSchedule, GiftRequest};
//! use rust_decimal_macros::dec;
//!
//! let request = GiftRequest {
//!     amount: Some(dec!(100)),
//!     cover_fees: true,
//!     ..Default::default()
//! };
//! let gift = request.validate().unwrap();
//! let quote = FeeSchedule::default().quote(gift.amount, gift.cover_fees);
//!
//! assert_eq!(quote.total, dec!(102.09));
//! assert_eq!(quote.total_minor_units(), 10_209);
//! ```

pub mod error;
pub mod fee;
pub mod gift;

pub use error::{GiftError, Result};
pub use fee::{FeeSchedule, GiftQuote};
pub use gift::{Gift, GiftRequest, ANONYMOUS_GUEST, MAX_AMOUNT, MIN_AMOUNT};
