//! Boundary data models for the exchange and the strategy store.

pub mod exchange;
pub mod strategy;

pub use exchange::{AccountInformation, Balance, TickerPrice};
pub use strategy::{AnalysisKind, AnalysisRecord, Decision, Strategy};
