//! In-Memory Gateway and Mailer
//!
//! For tests and local demos without Stripe or Resend credentials.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{PaymentError, Result};
use crate::intent::{CreatedIntent, IntentRequest, PaymentGateway};
use crate::notify::{Mailer, OutgoingEmail};

/// Records intent requests and returns fake client secrets
#[derive(Default)]
pub struct MockGateway {
    requests: Mutex<Vec<IntentRequest>>,
    counter: AtomicU64,
    failure: Option<String>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every call fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Requests received so far
    pub async fn requests(&self) -> Vec<IntentRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_intent(&self, request: IntentRequest) -> Result<CreatedIntent> {
        self.requests.lock().await.push(request);

        if let Some(ref reason) = self.failure {
            return Err(PaymentError::Stripe(reason.clone()));
        }

        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(CreatedIntent {
            id: format!("pi_mock_{n}"),
            client_secret: format!("pi_mock_{n}_secret_{n}"),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Keeps sent emails in memory
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failure: Option<String>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Emails delivered so far
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        if let Some(ref reason) = self.failure {
            return Err(PaymentError::Email(reason.clone()));
        }
        self.sent.lock().await.push(email);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
