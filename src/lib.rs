//! Payment bridge between a shop checkout and Raiffeisen Bank's hosted payment page.
//!
//! Payment outcomes are always re-verified against the bank's order status API
//! before a shop order is marked completed; neither the webhook payload nor
//! the browser redirect is trusted on its own.

pub mod api;
pub mod config;
#[cfg(feature = "database")]
pub mod database;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod orders;
pub mod payments;
pub mod services;
