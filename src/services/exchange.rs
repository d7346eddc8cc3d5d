//! Signed REST client for the exchange
//!
//! Two calls: the authenticated account-balance endpoint (timestamped
//! query string signed with HMAC-SHA256) and the public ticker-price
//! endpoint. One attempt per call, no caching; failures carry the
//! upstream status and body.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use tracing::{debug, warn};

use crate::config::ExchangeConfig;
use crate::error::{Error, Result};
use crate::models::exchange::{AccountInformation, Balance, TickerPrice};

type HmacSha256 = Hmac<Sha256>;

/// Fixed quote asset appended to every base symbol to form a trading
/// pair.
pub const QUOTE_ASSET: &str = "USDT";

/// Access to the exchange's balance and price data.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Fetch all account balances via a signed request.
    async fn fetch_balances(&self) -> Result<Vec<Balance>>;

    /// Fetch last prices for the given base assets, keyed by base
    /// asset (quote suffix stripped).
    async fn fetch_prices(&self, symbols: &BTreeSet<String>) -> Result<BTreeMap<String, f64>>;
}

pub struct BinanceClient {
    config: ExchangeConfig,
    client: Client,
}

impl BinanceClient {
    pub fn new(config: ExchangeConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: ExchangeConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// HMAC-SHA256 over the query string, rendered as lowercase hex.
    fn sign(&self, query: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.config.api_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn timestamp_millis() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default()
    }

    async fn upstream_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Error::Upstream { status, body }
    }
}

#[async_trait]
impl ExchangeApi for BinanceClient {
    async fn fetch_balances(&self) -> Result<Vec<Balance>> {
        // Credentials are checked before any network I/O so a
        // misconfigured deployment fails fast and diagnosably.
        let missing = self.config.missing_fields();
        if !missing.is_empty() {
            return Err(Error::Configuration { missing });
        }

        let query = format!("timestamp={}", Self::timestamp_millis());
        let signature = self.sign(&query);
        let url = format!(
            "{}/api/v3/account?{}&signature={}",
            self.config.base_url, query, signature
        );

        let response = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", &self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let account: AccountInformation = response.json().await?;
        debug!(balances = account.balances.len(), "fetched account balances");
        Ok(account.balances)
    }

    async fn fetch_prices(&self, symbols: &BTreeSet<String>) -> Result<BTreeMap<String, f64>> {
        if symbols.is_empty() {
            return Err(Error::input("symbol set must not be empty"));
        }
        if self.config.base_url.is_empty() {
            return Err(Error::Configuration {
                missing: vec!["BINANCE_END_POINT"],
            });
        }

        // The ticker endpoint takes a JSON array of pair names. The
        // commas inside the value must stay literal on the wire, so
        // the query string is assembled by hand instead of going
        // through query serialization (which would percent-encode
        // them).
        let pairs: Vec<String> = symbols
            .iter()
            .map(|s| format!("\"{}{}\"", s, QUOTE_ASSET))
            .collect();
        let url = format!(
            "{}/api/v3/ticker/price?symbols=[{}]",
            self.config.base_url,
            pairs.join(",")
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let tickers: Vec<TickerPrice> = response.json().await?;
        let mut prices = BTreeMap::new();
        for ticker in tickers {
            let asset = ticker
                .symbol
                .strip_suffix(QUOTE_ASSET)
                .unwrap_or(&ticker.symbol)
                .to_string();
            match ticker.last_price() {
                Ok(price) => {
                    prices.insert(asset, price);
                }
                Err(e) => {
                    // Tolerate a sparse row instead of failing the
                    // whole response.
                    warn!(symbol = %ticker.symbol, error = %e, "skipping unparsable ticker price");
                }
            }
        }
        Ok(prices)
    }
}
