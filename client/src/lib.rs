//! # client
//!
//! Leptos + WASM single-page frontend for the auth service: sign-up, sign-in,
//! and a protected dashboard with profile and password management.
//!
//! SYSTEM CONTEXT
//! ==============
//! All session logic lives in the `authapp` crate. This crate supplies the
//! browser pieces it plugs into (`localStorage`, `fetch`, router navigation)
//! and the views that render the controller's state.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install console logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
