//! Service layer: exchange access, portfolio valuation, dashboard
//! derivation.

pub mod dashboard;
pub mod exchange;
pub mod portfolio;

pub use exchange::{BinanceClient, ExchangeApi};
pub use portfolio::PortfolioService;
