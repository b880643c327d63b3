//! Wishing Well Web Frontend
//!
//! Leptos-based WASM gift form. Fee previews use `gift-core`, the same code
//! the server charges with.

mod api;
mod app;
mod components;
mod pages;
mod preview;
mod stripe_js;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
