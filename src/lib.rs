//! Coindash - analytics API for a crypto trading strategy dashboard
//!
//! Serves portfolio composition, live prices, chart-ready valuation
//! data and strategy metadata (analysis text, decision log) over HTTP.
//! Balances and prices are proxied from the exchange with signed
//! requests; strategy rows come from an external Postgres-compatible
//! store.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

pub use error::Error;
