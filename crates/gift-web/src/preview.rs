//! Form preview and submission helpers

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use gift_core::{FeeSchedule, GiftRequest, MAX_AMOUNT};

/// Amount breakdown shown under the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    pub gift: String,
    pub fee: String,
    pub total: String,
    pub show_fee: bool,
}

impl Preview {
    /// Unparseable or out-of-range input previews as zero.
    pub fn from_input(amount: &str, cover_fees: bool, fees: &FeeSchedule) -> Self {
        let amount = parse_amount(amount)
            .filter(|a| *a <= MAX_AMOUNT)
            .unwrap_or_default();
        let quote = fees.quote(amount, cover_fees);

        Self {
            gift: format_money(quote.gift),
            fee: format_money(quote.fee),
            total: format_money(quote.total),
            show_fee: cover_fees && amount > Decimal::ZERO,
        }
    }
}

pub fn parse_amount(input: &str) -> Option<Decimal> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Decimal::from_str(input).ok()
}

/// `$12.30`
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

/// `1.75% + $0.30`
pub fn fee_terms(fees: &FeeSchedule) -> String {
    let percent = (fees.rate * Decimal::ONE_HUNDRED).normalize();
    format!("{percent}% + {}", format_money(fees.fixed))
}

/// Build the request sent to the server, rejecting what it would reject.
pub fn build_request(
    amount: &str,
    guest_name: &str,
    guest_email: &str,
    guest_message: &str,
    cover_fees: bool,
) -> Result<GiftRequest, &'static str> {
    let request = GiftRequest {
        amount: parse_amount(amount),
        guest_name: Some(guest_name.to_string()),
        guest_email: Some(guest_email.to_string()),
        guest_message: Some(guest_message.to_string()),
        cover_fees,
    };

    request
        .validate()
        .map(|_| request.clone())
        .map_err(|_| "Please enter a valid gift amount")
}
