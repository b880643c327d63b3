//! UI Components

use std::time::Duration;

use leptos::leptos_dom::helpers::set_timeout;
use leptos::prelude::*;

use crate::api::BankDetails;
use crate::preview::Preview;
use crate::stripe_js;

/// Gift / fee / total breakdown. The fee row only shows when fees are covered.
#[component]
pub fn AmountSummary(preview: Signal<Preview>) -> impl IntoView {
    view! {
        <div class="amount-summary">
            <div class="summary-row">
                <span>"Gift amount"</span>
                <span>{move || preview.get().gift}</span>
            </div>
            <Show when=move || preview.get().show_fee>
                <div class="summary-row fee-row">
                    <span>"Processing fee"</span>
                    <span>{move || preview.get().fee}</span>
                </div>
            </Show>
            <div class="summary-row total-row">
                <span>"Total"</span>
                <span>{move || preview.get().total}</span>
            </div>
        </div>
    }
}

/// Bank transfer details with copy buttons
#[component]
pub fn BankDetailsPanel(bank: BankDetails) -> impl IntoView {
    let payid = bank.payid.clone();

    view! {
        <section class="bank-details">
            <h2>"Prefer a bank transfer?"</h2>
            {payid.map(|payid| view! {
                <CopyRow label="PayID" value=payid />
                <div class="divider"><span>"or"</span></div>
            })}
            <CopyRow label="BSB" value=bank.bsb />
            <CopyRow label="Account" value=bank.account />
            <CopyRow label="Account name" value=bank.account_name />
        </section>
    }
}

/// Labelled value with a copy-to-clipboard button
#[component]
pub fn CopyRow(label: &'static str, value: String) -> impl IntoView {
    let (copied, set_copied) = signal(false);
    let text = value.clone();

    let copy = move |_| {
        let text = text.clone();
        leptos::task::spawn_local(async move {
            match stripe_js::copy_to_clipboard(&text).await {
                Ok(()) => {
                    set_copied.set(true);
                    set_timeout(move || set_copied.set(false), Duration::from_secs(2));
                }
                Err(_) => stripe_js::alert("Failed to copy. Please select and copy manually."),
            }
        });
    };

    view! {
        <div class="detail-item">
            <span class="detail-label">{label}</span>
            <span class="detail-value">{value}</span>
            <button type="button" class="copy-button" class:copied=move || copied.get() on:click=copy>
                {move || if copied.get() { "✓ Copied!" } else { "Copy" }}
            </button>
        </div>
    }
}
