//! Portfolio valuation pipeline
//!
//! Combines signed balance data with live prices into a USD-valued,
//! dust-filtered mapping. Every call re-fetches from the exchange; a
//! single upstream failure aborts the whole call.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::warn;

use crate::error::{Error, Result};
use crate::services::exchange::{ExchangeApi, QUOTE_ASSET};

/// Entries below this USD value are dropped as dust. Exactly 1.0 is
/// retained.
pub const DUST_THRESHOLD_USD: f64 = 1.0;

/// The stable quote asset is pinned at 1.0 USD and never priced via
/// the ticker feed.
pub const PINNED_ASSET: &str = QUOTE_ASSET;

pub struct PortfolioService {
    exchange: Arc<dyn ExchangeApi>,
}

impl PortfolioService {
    pub fn new(exchange: Arc<dyn ExchangeApi>) -> Self {
        Self { exchange }
    }

    /// Base assets of interest for a target list: the first three
    /// characters of each target plus the pinned quote asset.
    ///
    /// Known limitation: the 3-character truncation is wrong for base
    /// assets that are not exactly three letters (e.g. `DOGE`), and is
    /// preserved for compatibility with the upstream pair naming.
    pub fn interest_set(targets: &[String]) -> BTreeSet<String> {
        let mut set: BTreeSet<String> = targets
            .iter()
            .map(|t| t.chars().take(3).collect::<String>())
            .collect();
        set.insert(PINNED_ASSET.to_string());
        set
    }

    fn validate_targets(targets: &[String]) -> Result<()> {
        if targets.is_empty() {
            return Err(Error::input("Symbols parameter is required"));
        }
        Ok(())
    }

    /// Raw free quantities for the assets of interest.
    ///
    /// Rows with unparsable quantities are skipped with a warning so a
    /// sparse upstream row cannot fail the whole set.
    pub async fn balances(&self, targets: &[String]) -> Result<BTreeMap<String, f64>> {
        Self::validate_targets(targets)?;
        let interest = Self::interest_set(targets);

        let mut portfolio = BTreeMap::new();
        for balance in self.exchange.fetch_balances().await? {
            if !interest.contains(&balance.asset) {
                continue;
            }
            match balance.free_quantity() {
                Ok(quantity) => {
                    portfolio.insert(balance.asset, quantity);
                }
                Err(e) => {
                    warn!(asset = %balance.asset, error = %e, "skipping balance row");
                }
            }
        }
        Ok(portfolio)
    }

    /// Live prices for the assets of interest, excluding the pinned
    /// asset (which is never priced via the feed).
    pub async fn prices(&self, targets: &[String]) -> Result<BTreeMap<String, f64>> {
        Self::validate_targets(targets)?;
        let mut interest = Self::interest_set(targets);
        interest.remove(PINNED_ASSET);
        self.exchange.fetch_prices(&interest).await
    }

    /// Full valuation: USD value per asset with dust entries removed.
    ///
    /// usd = quantity x price, with the pinned asset fixed at 1.0 and
    /// missing prices defaulting to 0.
    pub async fn valuations(&self, targets: &[String]) -> Result<BTreeMap<String, f64>> {
        let balances = self.balances(targets).await?;
        let prices = self.prices(targets).await?;

        let mut valued = BTreeMap::new();
        for (asset, quantity) in balances {
            let price = if asset == PINNED_ASSET {
                1.0
            } else {
                prices.get(&asset).copied().unwrap_or(0.0)
            };
            let usd_value = quantity * price;
            if usd_value >= DUST_THRESHOLD_USD {
                valued.insert(asset, usd_value);
            }
        }
        Ok(valued)
    }
}
