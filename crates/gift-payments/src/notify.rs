//! Gift Notifications
//!
//! Two emails go out for every successful gift: a thank-you to the guest
//! (when they left an address) and a notice to the couple. Delivery is best
//! effort. Failures are reported and logged, never returned as errors.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::webhook::ReceivedGift;

/// A rendered email ready for delivery
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Email delivery trait
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one email
    async fn send(&self, email: OutgoingEmail) -> Result<()>;

    /// Mailer name
    fn name(&self) -> &str;
}

/// Outcome of one notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No address to send to
    Skipped,
    Failed(String),
}

/// Outcome of both notifications for a gift
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationReport {
    pub guest: Delivery,
    pub couple: Delivery,
}

/// Composes and sends gift notifications
pub struct GiftNotifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    couple_address: Option<String>,
}

impl GiftNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, couple_address: Option<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            couple_address,
        }
    }

    /// Send both notifications. Never fails.
    pub async fn notify(&self, gift: &ReceivedGift) -> NotificationReport {
        let guest = match gift.guest_email.as_deref() {
            Some(address) => self.deliver("guest", guest_thank_you(&self.from, address, gift)).await,
            None => Delivery::Skipped,
        };

        let couple = match self.couple_address.as_deref() {
            Some(address) => self.deliver("couple", couple_notice(&self.from, address, gift)).await,
            None => Delivery::Skipped,
        };

        NotificationReport { guest, couple }
    }

    async fn deliver(&self, recipient: &'static str, email: OutgoingEmail) -> Delivery {
        match self.mailer.send(email).await {
            Ok(()) => {
                tracing::info!(recipient, mailer = self.mailer.name(), "Sent gift notification");
                Delivery::Sent
            }
            Err(e) => {
                tracing::warn!(recipient, error = %e, "Gift notification failed");
                Delivery::Failed(e.to_string())
            }
        }
    }
}

fn guest_thank_you(from: &str, to: &str, gift: &ReceivedGift) -> OutgoingEmail {
    let amount = gift.display_amount();
    let name = escape_html(&gift.guest_name);

    let mut html = format!(
        "<h2>Thank you, {name}!</h2>\
         <p>Your wedding gift of <strong>{amount}</strong> has been received.</p>"
    );
    let mut text = format!(
        "Thank you, {}!\n\nYour wedding gift of {amount} has been received.\n",
        gift.guest_name
    );

    if !gift.guest_message.is_empty() {
        html.push_str(&format!(
            "<p>Your message:</p><blockquote>{}</blockquote>",
            escape_html(&gift.guest_message)
        ));
        text.push_str(&format!("\nYour message:\n{}\n", gift.guest_message));
    }

    html.push_str("<p>With love and gratitude.</p>");
    text.push_str("\nWith love and gratitude.\n");

    OutgoingEmail {
        from: from.to_string(),
        to: vec![to.to_string()],
        subject: "Thank you for your wedding gift".into(),
        html,
        text,
    }
}

fn couple_notice(from: &str, to: &str, gift: &ReceivedGift) -> OutgoingEmail {
    let amount = gift.display_amount();
    let name = escape_html(&gift.guest_name);
    let email = gift.guest_email.as_deref().unwrap_or("not provided");
    let message = if gift.guest_message.is_empty() {
        "(no message)"
    } else {
        gift.guest_message.as_str()
    };
    let fees = if gift.fees_covered { "yes" } else { "no" };

    let html = format!(
        "<h2>You received a wedding gift!</h2>\
         <p><strong>From:</strong> {name}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Amount:</strong> {amount}</p>\
         <p><strong>Fees covered by guest:</strong> {fees}</p>\
         <p><strong>Message:</strong></p><blockquote>{}</blockquote>\
         <p><small>Payment {}</small></p>",
        escape_html(email),
        escape_html(message),
        escape_html(&gift.intent_id),
    );
    let text = format!(
        "You received a wedding gift!\n\n\
         From: {}\nEmail: {email}\nAmount: {amount}\nFees covered by guest: {fees}\n\n\
         Message:\n{message}\n\nPayment {}\n",
        gift.guest_name, gift.intent_id,
    );

    OutgoingEmail {
        from: from.to_string(),
        to: vec![to.to_string()],
        subject: format!("New wedding gift from {}", gift.guest_name),
        html,
        text,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryMailer;

    fn gift(email: Option<&str>, message: &str) -> ReceivedGift {
        ReceivedGift {
            intent_id: "pi_123".into(),
            amount_minor: 5000,
            currency: "aud".into(),
            guest_name: "Jo".into(),
            guest_email: email.map(String::from),
            guest_message: message.into(),
            original_amount: None,
            fees_covered: false,
        }
    }

    #[tokio::test]
    async fn test_sends_both_notifications() {
        let mailer = Arc::new(MemoryMailer::new());
        let notifier = GiftNotifier::new(mailer.clone(), "gifts@example.com", Some("couple@example.com".into()));

        let report = notifier.notify(&gift(Some("jo@example.com"), "Congrats")).await;
        assert_eq!(report.guest, Delivery::Sent);
        assert_eq!(report.couple, Delivery::Sent);

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, vec!["jo@example.com".to_string()]);
        assert!(sent[0].text.contains("$50.00 AUD"));
        assert_eq!(sent[1].to, vec!["couple@example.com".to_string()]);
        assert_eq!(sent[1].subject, "New wedding gift from Jo");
        assert!(sent[1].text.contains("Congrats"));
    }

    #[tokio::test]
    async fn test_skips_guest_without_email() {
        let mailer = Arc::new(MemoryMailer::new());
        let notifier = GiftNotifier::new(mailer.clone(), "gifts@example.com", Some("couple@example.com".into()));

        let report = notifier.notify(&gift(None, "")).await;
        assert_eq!(report.guest, Delivery::Skipped);
        assert_eq!(report.couple, Delivery::Sent);
        assert_eq!(mailer.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_reported_not_raised() {
        let mailer = Arc::new(MemoryMailer::failing("quota exceeded"));
        let notifier = GiftNotifier::new(mailer, "gifts@example.com", Some("couple@example.com".into()));

        let report = notifier.notify(&gift(Some("jo@example.com"), "")).await;
        assert!(matches!(report.guest, Delivery::Failed(_)));
        assert!(matches!(report.couple, Delivery::Failed(_)));
    }

    #[test]
    fn test_html_fields_are_escaped() {
        let mut received = gift(None, "<script>alert('hi')</script>");
        received.guest_name = "Tom & Jerry".into();

        let email = couple_notice("gifts@example.com", "couple@example.com", &received);
        assert!(email.html.contains("Tom &amp; Jerry"));
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(!email.html.contains("<script>"));
        assert!(email.text.contains("Tom & Jerry"));
    }
}
