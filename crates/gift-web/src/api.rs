//! API Client

use rust_decimal::Decimal;
use serde::Deserialize;

use gift_core::{FeeSchedule, GiftRequest};

/// Settings served by `/api/config`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub publishable_key: String,
    pub currency: String,
    pub fee_rate: Decimal,
    pub fixed_fee: Decimal,
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
}

impl PublicConfig {
    pub const fn fees(&self) -> FeeSchedule {
        FeeSchedule::new(self.fee_rate, self.fixed_fee)
    }
}

/// Direct bank transfer details
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(default)]
    pub payid: Option<String>,
    pub bsb: String,
    pub account: String,
    pub account_name: String,
}

/// Response from `/create-payment-intent`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentCreated {
    pub client_secret: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

fn endpoint(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

/// Fetch the publishable key, fee schedule and bank details
pub async fn fetch_config() -> Result<PublicConfig, String> {
    let response = reqwest::Client::new()
        .get(endpoint("/api/config"))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        Err("Failed to load payment settings".into())
    }
}

/// Create a payment intent for the gift
pub async fn create_payment_intent(request: &GiftRequest) -> Result<IntentCreated, String> {
    let response = reqwest::Client::new()
        .post(endpoint("/create-payment-intent"))
        .json(request)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        let data: serde_json::Value = response.json().await.unwrap_or_default();
        Err(data["error"]
            .as_str()
            .unwrap_or("Failed to create payment intent")
            .to_string())
    }
}
