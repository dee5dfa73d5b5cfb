//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared page chrome and read/write state from Leptos
//! context providers.

pub mod auth_guard;
pub mod sponsor_marquee;
