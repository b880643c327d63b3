//! Gift Requests
//!
//! The form payload as submitted by the guest, and its validated form.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{GiftError, Result};

/// Smallest gift accepted, in major units
pub const MIN_AMOUNT: Decimal = dec!(1.00);

/// Largest single card charge the processor accepts, in major units
pub const MAX_AMOUNT: Decimal = dec!(999999.99);

/// Name recorded when the guest leaves it blank
pub const ANONYMOUS_GUEST: &str = "Anonymous";

/// Gift form submission
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftRequest {
    /// Gift amount in major units
    #[serde(default)]
    pub amount: Option<Decimal>,

    #[serde(default)]
    pub guest_name: Option<String>,

    #[serde(default)]
    pub guest_email: Option<String>,

    #[serde(default)]
    pub guest_message: Option<String>,

    /// Gross the charge up so the couple receives the full amount
    #[serde(default)]
    pub cover_fees: bool,
}

impl GiftRequest {
    /// Validate and normalize the submission.
    ///
    /// Blank optional fields count as absent.
    pub fn validate(&self) -> Result<Gift> {
        let amount = self.amount.ok_or(GiftError::MissingAmount)?;

        if amount < MIN_AMOUNT {
            return Err(GiftError::AmountTooSmall {
                amount,
                min: MIN_AMOUNT,
            });
        }

        if amount > MAX_AMOUNT {
            return Err(GiftError::AmountTooLarge {
                amount,
                max: MAX_AMOUNT,
            });
        }

        Ok(Gift {
            amount,
            guest_name: non_blank(self.guest_name.as_deref())
                .unwrap_or(ANONYMOUS_GUEST)
                .to_string(),
            guest_email: non_blank(self.guest_email.as_deref()).map(String::from),
            guest_message: non_blank(self.guest_message.as_deref())
                .unwrap_or_default()
                .to_string(),
            cover_fees: self.cover_fees,
        })
    }
}

/// A validated gift
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gift {
    pub amount: Decimal,
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_message: String,
    pub cover_fees: bool,
}

impl Gift {
    /// Processor metadata. Every value is a string; `guestEmail` only when given.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        metadata.insert("guestName".to_string(), self.guest_name.clone());
        if let Some(ref email) = self.guest_email {
            metadata.insert("guestEmail".to_string(), email.clone());
        }
        metadata.insert("guestMessage".to_string(), self.guest_message.clone());
        metadata.insert("originalAmount".to_string(), self.amount.to_string());
        metadata.insert("feesCovered".to_string(), self.cover_fees.to_string());
        metadata
    }

    /// Charge description shown in the processor dashboard
    pub fn description(&self) -> String {
        format!("Wedding gift from {}", self.guest_name)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
