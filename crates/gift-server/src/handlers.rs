//! HTTP Handlers

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;

use gift_core::GiftRequest;
use gift_payments::PaymentError;

use crate::state::{AppState, PublicConfig};

const SIGNATURE_HEADER: &str = "stripe-signature";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
    pub email_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn payments_disabled() -> ApiError {
    api_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "PAYMENTS_DISABLED",
        "Payments not configured",
    )
}

fn webhook_rejection(reason: &str) -> Response {
    (StatusCode::BAD_REQUEST, format!("Webhook Error: {reason}")).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.payments_configured(),
        email_configured: state.email_configured(),
    })
}

/// Publishable key, currency, fee schedule and bank details for the page
pub async fn public_config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(state.public.as_ref().clone())
}

/// Create a payment intent for a gift
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<GiftRequest>, JsonRejection>,
) -> Result<Json<CreateIntentResponse>, ApiError> {
    let gateway = state.gateway.as_ref().ok_or_else(payments_disabled)?;

    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected gift payload");
        api_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", "Invalid amount")
    })?;

    let created = state
        .checkout
        .create(gateway.as_ref(), &request)
        .await
        .map_err(|e| match e {
            PaymentError::InvalidGift(ref gift_error) => {
                tracing::debug!(error = %gift_error, "Rejected gift");
                api_error(StatusCode::BAD_REQUEST, "INVALID_AMOUNT", e.user_message())
            }
            _ => {
                tracing::error!("Error creating payment intent: {}", e);
                api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTENT_FAILED",
                    "Failed to create payment intent",
                )
            }
        })?;

    Ok(Json(CreateIntentResponse {
        client_secret: created.intent.client_secret.clone(),
        total_amount: created.total(),
    }))
}

/// Stripe webhook handler
///
/// Takes the body as raw bytes: the signature covers them exactly.
pub async fn stripe_webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(handler) = state.webhooks.as_ref() else {
        return payments_disabled().into_response();
    };

    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("Webhook rejected: missing Stripe-Signature header");
        return webhook_rejection("Missing Stripe-Signature header");
    };

    let event = match handler.parse_event(&body, signature) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Webhook rejected: {}", e);
            let reason = match e {
                PaymentError::WebhookSignature(reason) | PaymentError::WebhookParse(reason) => reason,
                other => other.to_string(),
            };
            return webhook_rejection(&reason);
        }
    };

    handler.handle(event).await;

    Json(WebhookAck { received: true }).into_response()
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request},
        Router,
    };
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use gift_core::FeeSchedule;
    use gift_payments::{
        mock::{MemoryMailer, MockGateway},
        signature, GiftCheckout, GiftNotifier, WebhookHandler,
    };

    use super::*;
    use crate::config::BankDetails;
    use crate::routes::router;

    const SECRET: &str = "whsec_test123secret456";

    struct Harness {
        app: Router,
        gateway: Arc<MockGateway>,
        mailer: Arc<MemoryMailer>,
    }

    fn harness_with(gateway: MockGateway, mailer: MemoryMailer) -> Harness {
        let gateway = Arc::new(gateway);
        let mailer = Arc::new(mailer);

        let notifier = GiftNotifier::new(mailer.clone(), "gifts@example.com", Some("couple@example.com".into()));
        let webhooks = WebhookHandler::new(SECRET).with_notifier(notifier);

        let state = AppState {
            checkout: Arc::new(GiftCheckout::new(FeeSchedule::default(), "aud")),
            gateway: Some(gateway.clone()),
            webhooks: Some(Arc::new(webhooks)),
            public: Arc::new(PublicConfig {
                publishable_key: "pk_test_123".into(),
                currency: "aud".into(),
                fee_rate: dec!(0.0175),
                fixed_fee: dec!(0.30),
                bank_details: None,
            }),
        };

        Harness {
            app: router(state, Path::new("does-not-exist")),
            gateway,
            mailer,
        }
    }

    fn harness() -> Harness {
        harness_with(MockGateway::new(), MemoryMailer::new())
    }

    fn disabled_app(bank_details: Option<BankDetails>) -> Router {
        let state = AppState {
            checkout: Arc::new(GiftCheckout::new(FeeSchedule::default(), "aud")),
            gateway: None,
            webhooks: None,
            public: Arc::new(PublicConfig {
                publishable_key: String::new(),
                currency: "aud".into(),
                fee_rate: dec!(0.0175),
                fixed_fee: dec!(0.30),
                bank_details,
            }),
        };
        router(state, Path::new("does-not-exist"))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json_post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn webhook_post(payload: Vec<u8>, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(signature) = signature {
            builder = builder.header("stripe-signature", signature);
        }
        builder.body(Body::from(payload)).unwrap()
    }

    fn succeeded_event(guest_email: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_test",
            "type": "payment_intent.succeeded",
            "data": {
                "object": {
                    "id": "pi_test",
                    "amount": 5000,
                    "currency": "aud",
                    "metadata": {
                        "guestName": "Jo",
                        "guestEmail": guest_email,
                        "guestMessage": "Congratulations!",
                    }
                }
            }
        }))
        .unwrap()
    }

    fn sign_now(payload: &[u8], secret: &str) -> String {
        signature::sign(payload, secret, unix_now()).unwrap()
    }

    fn unix_now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_secs()).unwrap())
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_intent_with_fees() {
        let h = harness();
        let (status, body) = send(
            h.app,
            json_post(
                "/create-payment-intent",
                &json!({"amount": 100, "guestName": "Jo", "guestMessage": "", "coverFees": true}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["clientSecret"], "pi_mock_1_secret_1");
        assert_eq!(body["totalAmount"], json!(102.09));

        let requests = h.gateway.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount_minor, 10_209);
        assert_eq!(requests[0].currency, "aud");
        assert_eq!(requests[0].metadata["feesCovered"], "true");
    }

    #[tokio::test]
    async fn test_create_intent_rejects_bad_amounts_without_calling_gateway() {
        for body in [
            json!({"guestName": "Jo"}),
            json!({"amount": 0}),
            json!({"amount": -20}),
            json!({"amount": 0.5}),
            json!({"amount": "lots"}),
        ] {
            let h = harness();
            let (status, response) = send(h.app, json_post("/create-payment-intent", &body)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
            let response: Value = serde_json::from_slice(&response).unwrap();
            assert_eq!(response["error"], "Invalid amount");
            assert!(h.gateway.requests().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_create_intent_gateway_failure_is_500() {
        let h = harness_with(MockGateway::failing("boom"), MemoryMailer::new());
        let (status, body) = send(h.app, json_post("/create-payment-intent", &json!({"amount": 25}))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Failed to create payment intent");
    }

    #[tokio::test]
    async fn test_webhook_bad_signature_sends_nothing() {
        let h = harness();
        let payload = succeeded_event("jo@example.com");
        let signature = sign_now(&payload, "whsec_wrong");

        let (status, body) = send(h.app, webhook_post(payload, Some(signature))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().starts_with("Webhook Error:"));
        assert!(h.mailer.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_webhook_missing_signature() {
        let h = harness();
        let (status, _) = send(h.app, webhook_post(succeeded_event(""), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_webhook_succeeded_without_guest_email_notifies_couple() {
        let h = harness();
        let payload = succeeded_event("");
        let signature = sign_now(&payload, SECRET);

        let (status, body) = send(h.app, webhook_post(payload, Some(signature))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({"received": true}));

        let sent = h.mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["couple@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_webhook_email_failure_still_acknowledged() {
        let h = harness_with(MockGateway::new(), MemoryMailer::failing("down"));
        let payload = succeeded_event("jo@example.com");
        let signature = sign_now(&payload, SECRET);

        let (status, body) = send(h.app, webhook_post(payload, Some(signature))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({"received": true}));
    }

    #[tokio::test]
    async fn test_webhook_other_events_acknowledged() {
        let h = harness();
        let payload = br#"{"id":"evt_x","type":"payment_intent.created","data":{"object":{}}}"#.to_vec();
        let signature = sign_now(&payload, SECRET);

        let (status, _) = send(h.app, webhook_post(payload, Some(signature))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(h.mailer.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_payments_disabled() {
        let (status, body) = send(disabled_app(None), json_post("/create-payment-intent", &json!({"amount": 10}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], "PAYMENTS_DISABLED");

        let (status, _) = send(disabled_app(None), webhook_post(b"{}".to_vec(), Some("t=1,v1=00".into()))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_public_config_and_bank_details() {
        let request = || Request::builder().uri("/api/config").body(Body::empty()).unwrap();

        let (status, body) = send(disabled_app(None), request()).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["currency"], "aud");
        assert_eq!(body["feeRate"], "0.0175");
        assert!(body["bankDetails"].is_null());

        let bank = BankDetails {
            payid: None,
            bsb: "182-182".into(),
            account: "12345678".into(),
            account_name: "A & B".into(),
        };
        let (_, body) = send(disabled_app(Some(bank)), request()).await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["bankDetails"]["bsb"], "182-182");
        assert_eq!(body["bankDetails"]["accountName"], "A & B");
        assert!(body["bankDetails"].get("payid").is_none());
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness();
        let (status, body) = send(h.app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["paymentsConfigured"], true);
        assert_eq!(body["emailConfigured"], true);
    }
}
