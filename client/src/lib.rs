//! # client
//!
//! Leptos + WASM frontend for the Informatics Festival site: the public
//! landing page, sign-in flows, and the team dashboard.
//!
//! Session handling lives in `auth`: a provider-agnostic guard state machine
//! (`auth::guard`), its async driver, and the hosted identity-provider
//! client. Pages wrap their content in the single `AuthGuard` component.

pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: attach to the server-rendered markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
