//! Wishing Well HTTP Server
//!
//! Axum-based server for the wedding gift form: creates Stripe payment
//! intents, receives Stripe webhooks and serves the WASM front end.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gift_core::FeeSchedule;
use gift_payments::{
    GiftCheckout, GiftNotifier, PaymentGateway, ResendConfig, ResendMailer, StripeGateway,
    WebhookHandler,
};

use crate::config::ServerConfig;
use crate::routes::router;
use crate::state::{AppState, PublicConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let fees = FeeSchedule::default();

    // Initialize email
    let notifier = match &config.email {
        Some(email) => {
            let mailer = ResendMailer::new(ResendConfig::new(&email.api_key))?;
            if email.notify_to.is_none() {
                tracing::warn!("⚠ NOTIFY_EMAIL not set - couple notifications disabled");
            }
            tracing::info!("✓ Resend configured (from {})", email.from);
            Some(GiftNotifier::new(Arc::new(mailer), &email.from, email.notify_to.clone()))
        }
        None => {
            tracing::warn!("⚠ Email not configured - notifications disabled");
            tracing::warn!("  Set RESEND_API_KEY and EMAIL_FROM in .env");
            None
        }
    };

    // Initialize payments
    let (gateway, webhooks) = match &config.stripe {
        Some(stripe) => {
            let gateway: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(&stripe.secret_key));
            let mut webhooks = WebhookHandler::new(&stripe.webhook_secret);
            if let Some(notifier) = notifier {
                webhooks = webhooks.with_notifier(notifier);
            }
            tracing::info!("✓ Stripe configured");
            tracing::info!("📝 Stripe mode: {}", stripe.mode());
            (Some(gateway), Some(Arc::new(webhooks)))
        }
        None => {
            tracing::warn!("⚠ Stripe not configured - payments disabled");
            tracing::warn!("  Set STRIPE_SECRET_KEY and STRIPE_WEBHOOK_SECRET in .env");
            if notifier.is_some() {
                tracing::warn!("⚠ Resend is configured but no webhooks will arrive - gift emails disabled");
            }
            (None, None)
        }
    };

    if config.publishable_key.is_empty() {
        tracing::warn!("⚠ STRIPE_PUBLISHABLE_KEY not set - the card form cannot load");
    }

    // Build application state
    let state = AppState {
        checkout: Arc::new(GiftCheckout::new(fees, &config.currency)),
        gateway,
        webhooks,
        public: Arc::new(PublicConfig {
            publishable_key: config.publishable_key.clone(),
            currency: config.currency.clone(),
            fee_rate: fees.rate,
            fixed_fee: fees.fixed,
            bank_details: config.bank.clone(),
        }),
    };

    let app = router(state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🎉 Wishing Well server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                - Health check");
    tracing::info!("  GET  /api/config            - Publishable key & bank details");
    tracing::info!("  POST /create-payment-intent - Create Stripe payment intent");
    tracing::info!("  POST /webhook               - Stripe webhook");
    tracing::info!("  GET  /*                     - Static files from {}", config.static_dir.display());
    tracing::info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
