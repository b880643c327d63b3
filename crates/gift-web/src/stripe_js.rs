//! Stripe.js Bridge
//!
//! Stripe.js is loaded by a `<script>` tag in `index.html`. It is reached
//! through `Reflect` rather than generated bindings, so every call returns a
//! plain `Result<_, String>` the page can show.

use js_sys::{Array, Function, Object, Promise, Reflect, JSON};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

const CARD_OPTIONS: &str = r##"{
    "style": {
        "base": {
            "fontSize": "16px",
            "color": "#2d1b2e",
            "fontFamily": "Outfit, -apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif",
            "::placeholder": { "color": "#9d8ba3" }
        },
        "invalid": { "color": "#721c24", "iconColor": "#721c24" }
    }
}"##;

fn global() -> JsValue {
    js_sys::global().into()
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, String> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(describe)
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), String> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(describe)
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, String> {
    let function: Function = get(target, method)?
        .dyn_into()
        .map_err(|_| format!("{method} is not a function"))?;
    let args: Array = args.iter().collect();
    Reflect::apply(&function, target, &args).map_err(describe)
}

/// `undefined` and `null` become `None`
fn present(value: JsValue) -> Option<JsValue> {
    (!value.is_undefined() && !value.is_null()).then_some(value)
}

/// Best human-readable text for a thrown value or Stripe error object
fn describe(value: JsValue) -> String {
    Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "An error occurred. Please try again.".into())
}

async fn settle(promise: JsValue) -> Result<JsValue, String> {
    let promise: Promise = promise
        .dyn_into()
        .map_err(|_| "Expected a promise".to_string())?;
    JsFuture::from(promise).await.map_err(describe)
}

/// A mounted Stripe card element
#[derive(Clone)]
pub struct StripeCard {
    stripe: JsValue,
    card: JsValue,
}

impl StripeCard {
    /// Create the card element and mount it at `selector`.
    pub fn mount(publishable_key: &str, selector: &str) -> Result<Self, String> {
        let constructor: Function = get(&global(), "Stripe")?
            .dyn_into()
            .map_err(|_| "Stripe.js failed to load".to_string())?;

        let stripe = constructor
            .call1(&JsValue::NULL, &JsValue::from_str(publishable_key))
            .map_err(describe)?;
        let elements = call(&stripe, "elements", &[])?;
        let options = JSON::parse(CARD_OPTIONS).map_err(describe)?;
        let card = call(&elements, "create", &[JsValue::from_str("card"), options])?;
        call(&card, "mount", &[JsValue::from_str(selector)])?;

        Ok(Self { stripe, card })
    }

    /// Report card validation errors as the guest types. `None` clears.
    pub fn on_change(&self, mut callback: impl FnMut(Option<String>) + 'static) -> Result<(), String> {
        let handler = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let error = get(&event, "error").ok().and_then(present);
            callback(error.map(describe));
        });

        call(&self.card, "on", &[JsValue::from_str("change"), handler.as_ref().clone()])?;

        // Lives as long as the card element
        handler.forget();
        Ok(())
    }

    /// Confirm the intent with the entered card. Returns the intent id.
    pub async fn confirm(&self, client_secret: &str, name: &str) -> Result<String, String> {
        let billing_details = Object::new();
        set(&billing_details, "name", &JsValue::from_str(name))?;

        let payment_method = Object::new();
        set(&payment_method, "card", &self.card)?;
        set(&payment_method, "billing_details", &billing_details)?;

        let options = Object::new();
        set(&options, "payment_method", &payment_method)?;

        let pending = call(
            &self.stripe,
            "confirmCardPayment",
            &[JsValue::from_str(client_secret), options.into()],
        )?;
        let result = settle(pending).await?;

        if let Some(error) = present(get(&result, "error")?) {
            return Err(describe(error));
        }

        let intent = get(&result, "paymentIntent")?;
        let status = get(&intent, "status")?.as_string().unwrap_or_default();
        if status == "succeeded" {
            Ok(get(&intent, "id")?.as_string().unwrap_or_default())
        } else {
            Err(format!("Payment not completed ({status})"))
        }
    }

    pub fn clear(&self) {
        let _ = call(&self.card, "clear", &[]);
    }
}

/// Write `text` to the system clipboard
pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let navigator = get(&global(), "navigator")?;
    let clipboard = present(get(&navigator, "clipboard")?).ok_or("Clipboard unavailable")?;
    let pending = call(&clipboard, "writeText", &[JsValue::from_str(text)])?;
    settle(pending).await.map(|_| ())
}

/// `window.alert`
pub fn alert(message: &str) {
    if let Ok(window) = get(&global(), "window") {
        let _ = call(&window, "alert", &[JsValue::from_str(message)]);
    }
}
