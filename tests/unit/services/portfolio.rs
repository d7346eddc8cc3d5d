//! Unit tests for the portfolio valuation pipeline

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coindash::error::Result;
use coindash::models::exchange::Balance;
use coindash::services::exchange::ExchangeApi;
use coindash::services::portfolio::PortfolioService;
use coindash::Error;

/// Fixture exchange serving canned balances/prices and recording the
/// price requests it receives.
struct FixtureExchange {
    balances: Vec<(&'static str, &'static str)>,
    prices: Vec<(&'static str, f64)>,
    price_requests: Mutex<Vec<BTreeSet<String>>>,
}

impl FixtureExchange {
    fn new(
        balances: Vec<(&'static str, &'static str)>,
        prices: Vec<(&'static str, f64)>,
    ) -> Arc<Self> {
        Arc::new(Self {
            balances,
            prices,
            price_requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ExchangeApi for FixtureExchange {
    async fn fetch_balances(&self) -> Result<Vec<Balance>> {
        Ok(self
            .balances
            .iter()
            .map(|(asset, free)| Balance {
                asset: asset.to_string(),
                free: free.to_string(),
                locked: String::new(),
            })
            .collect())
    }

    async fn fetch_prices(&self, symbols: &BTreeSet<String>) -> Result<BTreeMap<String, f64>> {
        self.price_requests
            .lock()
            .expect("lock")
            .push(symbols.clone());
        Ok(self
            .prices
            .iter()
            .map(|(asset, price)| (asset.to_string(), *price))
            .collect())
    }
}

fn targets(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

#[test]
fn interest_set_always_contains_usdt() {
    let set = PortfolioService::interest_set(&targets(&["BTC"]));
    assert!(set.contains("USDT"));
}

#[test]
fn interest_set_truncates_pair_names_to_base_codes() {
    let set = PortfolioService::interest_set(&targets(&["BTCUSDT", "ETHUSDT"]));
    let expected: BTreeSet<String> = targets(&["BTC", "ETH", "USDT"]).into_iter().collect();
    assert_eq!(set, expected);
}

#[test]
fn interest_set_truncation_mangles_four_letter_assets() {
    // Documented limitation: DOGE truncates to DOG, which matches no
    // real balance row.
    let set = PortfolioService::interest_set(&targets(&["DOGEUSDT"]));
    assert!(set.contains("DOG"));
    assert!(!set.contains("DOGE"));
}

#[tokio::test]
async fn valuations_round_trip_with_dust_filter() {
    let exchange = FixtureExchange::new(
        vec![("BTC", "0.5"), ("USDT", "100"), ("ETH", "0.001")],
        vec![("BTC", 50000.0), ("ETH", 2000.0)],
    );
    let service = PortfolioService::new(exchange);

    let valued = service
        .valuations(&targets(&["BTC", "ETH"]))
        .await
        .expect("valuations");

    assert_eq!(valued.len(), 3);
    assert_eq!(valued["BTC"], 25000.0);
    assert_eq!(valued["USDT"], 100.0);
    assert_eq!(valued["ETH"], 2.0);
}

#[tokio::test]
async fn valuations_retain_exactly_one_dollar() {
    let exchange = FixtureExchange::new(
        vec![("BTC", "0.0001"), ("ETH", "0.00049")],
        vec![("BTC", 10000.0), ("ETH", 2000.0)],
    );
    let service = PortfolioService::new(exchange);

    let valued = service
        .valuations(&targets(&["BTC", "ETH"]))
        .await
        .expect("valuations");

    // BTC is worth exactly 1.0 and stays; ETH is 0.98 and is dust.
    assert_eq!(valued.get("BTC"), Some(&1.0));
    assert!(!valued.contains_key("ETH"));
}

#[tokio::test]
async fn usdt_is_valued_at_one_regardless_of_feed() {
    // Even if the feed claims a depegged USDT price, valuation pins it
    // at 1.0.
    let exchange = FixtureExchange::new(vec![("USDT", "250")], vec![("USDT", 0.5)]);
    let service = PortfolioService::new(exchange);

    let valued = service
        .valuations(&targets(&["BTC"]))
        .await
        .expect("valuations");
    assert_eq!(valued["USDT"], 250.0);
}

#[tokio::test]
async fn assets_without_a_price_value_to_zero_and_drop_out() {
    let exchange = FixtureExchange::new(vec![("BTC", "2.0")], vec![]);
    let service = PortfolioService::new(exchange);

    let valued = service
        .valuations(&targets(&["BTC"]))
        .await
        .expect("valuations");
    assert!(valued.is_empty());
}

#[tokio::test]
async fn malformed_balance_rows_are_skipped_not_fatal() {
    let exchange = FixtureExchange::new(
        vec![("BTC", "oops"), ("USDT", "50")],
        vec![("BTC", 50000.0)],
    );
    let service = PortfolioService::new(exchange);

    let balances = service
        .balances(&targets(&["BTC"]))
        .await
        .expect("balances");
    assert_eq!(balances.len(), 1);
    assert_eq!(balances["USDT"], 50.0);
}

#[tokio::test]
async fn balances_filter_to_the_interest_set() {
    let exchange = FixtureExchange::new(
        vec![("BTC", "1"), ("SHIB", "9999999"), ("USDT", "10")],
        vec![],
    );
    let service = PortfolioService::new(exchange);

    let balances = service
        .balances(&targets(&["BTC"]))
        .await
        .expect("balances");
    assert!(balances.contains_key("BTC"));
    assert!(balances.contains_key("USDT"));
    assert!(!balances.contains_key("SHIB"));
}

#[tokio::test]
async fn empty_targets_are_rejected_before_any_fetch() {
    let exchange = FixtureExchange::new(vec![], vec![]);
    let service = PortfolioService::new(exchange.clone());

    assert!(matches!(service.valuations(&[]).await, Err(Error::Input(_))));
    assert!(exchange.price_requests.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn price_requests_exclude_usdt() {
    let exchange = FixtureExchange::new(vec![], vec![]);
    let service = PortfolioService::new(exchange.clone());

    service
        .prices(&targets(&["BTC", "USDT"]))
        .await
        .expect("prices");

    let requests = exchange.price_requests.lock().expect("lock");
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].contains("USDT"));
    assert!(requests[0].contains("BTC"));
}
