//! Gift Page

use std::time::Duration;

use leptos::leptos_dom::helpers::set_timeout;
use leptos::prelude::*;

use crate::api::{self, PublicConfig};
use crate::components::{AmountSummary, BankDetailsPanel};
use crate::preview::{self, Preview};
use crate::stripe_js::{self, StripeCard};

const CARD_UNAVAILABLE: &str = "Card payments are not available right now";

#[component]
pub fn GiftPage() -> impl IntoView {
    let (config, set_config) = signal(None::<PublicConfig>);
    let (load_error, set_load_error) = signal(None::<String>);

    let (amount, set_amount) = signal(String::new());
    let (cover_fees, set_cover_fees) = signal(false);
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (message, set_message) = signal(String::new());

    let (card_error, set_card_error) = signal(None::<String>);
    let (submitting, set_submitting) = signal(false);
    let (succeeded, set_succeeded) = signal(false);
    let (charged, set_charged) = signal(String::new());
    let card = StoredValue::new_local(None::<StripeCard>);

    let fees = move || config.get().map(|c| c.fees()).unwrap_or_default();
    let preview = Signal::derive(move || Preview::from_input(&amount.get(), cover_fees.get(), &fees()));

    // Settings first, then the card element once the key is known
    leptos::task::spawn_local(async move {
        match api::fetch_config().await {
            Ok(loaded) => {
                if loaded.publishable_key.is_empty() {
                    set_card_error.set(Some(CARD_UNAVAILABLE.into()));
                } else {
                    match StripeCard::mount(&loaded.publishable_key, "#card-element") {
                        Ok(mounted) => {
                            if let Err(e) = mounted.on_change(move |error| set_card_error.set(error)) {
                                set_card_error.set(Some(e));
                            }
                            card.set_value(Some(mounted));
                        }
                        Err(e) => set_card_error.set(Some(e)),
                    }
                }
                set_config.set(Some(loaded));
            }
            Err(e) => set_load_error.set(Some(e)),
        }
    });

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let request = match preview::build_request(
            &amount.get_untracked(),
            &name.get_untracked(),
            &email.get_untracked(),
            &message.get_untracked(),
            cover_fees.get_untracked(),
        ) {
            Ok(request) => request,
            Err(msg) => {
                stripe_js::alert(msg);
                return;
            }
        };

        let Some(stripe_card) = card.get_value() else {
            set_card_error.set(Some(CARD_UNAVAILABLE.into()));
            return;
        };

        set_submitting.set(true);
        set_card_error.set(None);
        let guest_name = name.get_untracked();
        let currency = config
            .get_untracked()
            .map(|c| c.currency.to_uppercase())
            .unwrap_or_default();

        leptos::task::spawn_local(async move {
            let result = match api::create_payment_intent(&request).await {
                Ok(created) => stripe_card
                    .confirm(&created.client_secret, &guest_name)
                    .await
                    .map(|_| created.total_amount),
                Err(e) => Err(e),
            };

            match result {
                Ok(total) => {
                    set_charged.set(format!("{} {currency}", preview::format_money(total)));
                    set_succeeded.set(true);
                    set_timeout(
                        move || {
                            set_amount.set(String::new());
                            set_cover_fees.set(false);
                            set_name.set(String::new());
                            set_email.set(String::new());
                            set_message.set(String::new());
                            stripe_card.clear();
                        },
                        Duration::from_secs(1),
                    );
                }
                Err(e) => set_card_error.set(Some(e)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="gift">
            <header class="hero">
                <h1>"Wishing Well"</h1>
                <p class="tagline">"Thank you for celebrating with us. Your love and presence mean the world."</p>
            </header>

            <Show when=move || load_error.get().is_some()>
                <div class="notice error">{move || load_error.get().unwrap_or_default()}</div>
            </Show>

            <form id="payment-form" class:hidden=move || succeeded.get() on:submit=submit>
                <div class="field">
                    <label for="amount">"Gift amount"</label>
                    <input
                        id="amount"
                        type="number"
                        min="1"
                        step="0.01"
                        placeholder="100.00"
                        required
                        prop:value=move || amount.get()
                        on:input=move |ev| set_amount.set(event_target_value(&ev))
                    />
                </div>

                <div class="field">
                    <label for="guest-name">"Your name"</label>
                    <input
                        id="guest-name"
                        type="text"
                        placeholder="Optional"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </div>

                <div class="field">
                    <label for="guest-email">"Email (for a thank-you note)"</label>
                    <input
                        id="guest-email"
                        type="email"
                        placeholder="Optional"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>

                <div class="field">
                    <label for="guest-message">"Message for the couple"</label>
                    <textarea
                        id="guest-message"
                        rows="3"
                        placeholder="Optional"
                        prop:value=move || message.get()
                        on:input=move |ev| set_message.set(event_target_value(&ev))
                    />
                </div>

                <label class="checkbox">
                    <input
                        id="cover-fees"
                        type="checkbox"
                        prop:checked=move || cover_fees.get()
                        on:change=move |ev| set_cover_fees.set(event_target_checked(&ev))
                    />
                    {move || format!("Cover the card processing fee ({})", preview::fee_terms(&fees()))}
                </label>

                <AmountSummary preview=preview />

                <div class="field">
                    <label for="card-element">"Card details"</label>
                    <div id="card-element"></div>
                    <div id="card-errors" role="alert">{move || card_error.get().unwrap_or_default()}</div>
                </div>

                <button id="submit-button" type="submit" disabled=move || submitting.get()>
                    <Show
                        when=move || submitting.get()
                        fallback=|| view! { <span id="button-text">"Send gift"</span> }
                    >
                        <span class="spinner"></span>
                    </Show>
                </button>
            </form>

            <Show when=move || succeeded.get()>
                <div id="payment-result" class="success">
                    <h2>"Thank you! 💝"</h2>
                    <p>"Your gift has been received. We are so grateful."</p>
                    <p class="charged">{move || format!("Amount charged: {}", charged.get())}</p>
                </div>
            </Show>

            {move || config.get().and_then(|c| c.bank_details).map(|bank| view! { <BankDetailsPanel bank=bank /> })}
        </div>
    }
}
