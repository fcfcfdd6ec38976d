//! # Tradepost server
//! This module hosts the HTTP surface for the Tradepost marketplace. It is responsible for:
//! * Registration, login and logout, backed by cookie sessions.
//! * The per-session shopping cart.
//! * Product listing with multipart image upload, and serving the stored images back.
//! * Checkout, which hands the session's cart snapshots to the engine's atomic order flow.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
pub mod sessions;
pub mod uploads;

#[cfg(test)]
mod endpoint_tests;
