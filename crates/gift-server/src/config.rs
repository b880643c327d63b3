//! Server Configuration
//!
//! Read from the environment (and `.env`). Stripe and email are optional:
//! without them the server still serves the page and bank details.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use gift_payments::parse_currency;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not a valid port")]
    InvalidPort(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("{0} must be set when {1} is set")]
    Missing(&'static str, &'static str),
}

/// Stripe credentials
#[derive(Clone)]
pub struct StripeSettings {
    pub secret_key: String,
    pub webhook_secret: String,
}

impl StripeSettings {
    pub fn mode(&self) -> &'static str {
        if self.secret_key.starts_with("sk_test") {
            "TEST"
        } else {
            "LIVE"
        }
    }
}

impl std::fmt::Debug for StripeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeSettings")
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .finish()
    }
}

/// Resend credentials and addresses
#[derive(Clone)]
pub struct EmailSettings {
    pub api_key: String,

    /// Sender address
    pub from: String,

    /// The couple's address for gift notices
    pub notify_to: Option<String>,
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("api_key", &"[REDACTED]")
            .field("from", &self.from)
            .field("notify_to", &self.notify_to)
            .finish()
    }
}

/// Direct bank transfer details shown beside the card form
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payid: Option<String>,
    pub bsb: String,
    pub account: String,
    pub account_name: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub static_dir: PathBuf,

    /// Lowercase ISO code charged in
    pub currency: String,

    /// Exposed to the browser
    pub publishable_key: String,

    pub stripe: Option<StripeSettings>,
    pub email: Option<EmailSettings>,
    pub bank: Option<BankDetails>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get("BIND_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("PORT") {
            Some(p) => p.parse::<u16>().map_err(|_| ConfigError::InvalidPort(p))?,
            None => 3000,
        };

        let currency = get("CURRENCY").unwrap_or_else(|| "aud".into()).to_lowercase();
        parse_currency(&currency).map_err(|_| ConfigError::UnsupportedCurrency(currency.clone()))?;

        let stripe = match (get("STRIPE_SECRET_KEY"), get("STRIPE_WEBHOOK_SECRET")) {
            (Some(secret_key), Some(webhook_secret)) => Some(StripeSettings {
                secret_key,
                webhook_secret,
            }),
            _ => None,
        };

        let email = match get("RESEND_API_KEY") {
            Some(api_key) => Some(EmailSettings {
                api_key,
                from: get("EMAIL_FROM").ok_or(ConfigError::Missing("EMAIL_FROM", "RESEND_API_KEY"))?,
                notify_to: get("NOTIFY_EMAIL"),
            }),
            None => None,
        };

        let bank = match (get("BANK_BSB"), get("BANK_ACCOUNT")) {
            (Some(bsb), Some(account)) => Some(BankDetails {
                payid: get("BANK_PAYID"),
                bsb,
                account,
                account_name: get("BANK_ACCOUNT_NAME").unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(Self {
            bind_addr: format!("{host}:{port}"),
            static_dir: get("STATIC_DIR").map_or_else(|| PathBuf::from("static"), PathBuf::from),
            currency,
            publishable_key: get("STRIPE_PUBLISHABLE_KEY").unwrap_or_default(),
            stripe,
            email,
            bank,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.currency, "aud");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(config.stripe.is_none());
        assert!(config.email.is_none());
        assert!(config.bank.is_none());
    }

    #[test]
    fn test_full_configuration() {
        let config = config(&[
            ("PORT", "8080"),
            ("CURRENCY", "USD"),
            ("STRIPE_SECRET_KEY", "sk_test_abc"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_abc"),
            ("STRIPE_PUBLISHABLE_KEY", "pk_test_abc"),
            ("RESEND_API_KEY", "re_abc"),
            ("EMAIL_FROM", "gifts@example.com"),
            ("NOTIFY_EMAIL", "couple@example.com"),
            ("BANK_BSB", "123-456"),
            ("BANK_ACCOUNT", "987654321"),
            ("BANK_ACCOUNT_NAME", "A & B"),
            ("BANK_PAYID", ""),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.currency, "usd");
        assert_eq!(config.stripe.as_ref().unwrap().mode(), "TEST");
        assert_eq!(config.email.unwrap().notify_to.as_deref(), Some("couple@example.com"));

        let bank = config.bank.unwrap();
        assert_eq!(bank.payid, None);
        assert_eq!(bank.bsb, "123-456");
    }

    #[test]
    fn test_partial_stripe_disables_payments() {
        let config = config(&[("STRIPE_SECRET_KEY", "sk_live_abc")]).unwrap();
        assert!(config.stripe.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(config(&[("PORT", "http")]), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(
            config(&[("RESEND_API_KEY", "re_abc")]),
            Err(ConfigError::Missing("EMAIL_FROM", _))
        ));
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let config = config(&[
            ("STRIPE_SECRET_KEY", "sk_live_supersecret"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_supersecret"),
        ])
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("supersecret"));
    }
}
