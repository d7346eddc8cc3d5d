//! Unit tests for exchange wire types

use coindash::models::exchange::{Balance, TickerPrice};
use coindash::Error;

#[test]
fn balance_parses_decimal_free_quantity() {
    let balance: Balance =
        serde_json::from_str(r#"{"asset":"BTC","free":"0.50000000","locked":"0"}"#)
            .expect("deserialize");
    assert_eq!(balance.free_quantity().expect("parse"), 0.5);
}

#[test]
fn balance_tolerates_missing_locked_field() {
    let balance: Balance =
        serde_json::from_str(r#"{"asset":"USDT","free":"100"}"#).expect("deserialize");
    assert_eq!(balance.free_quantity().expect("parse"), 100.0);
}

#[test]
fn malformed_free_quantity_is_a_parse_error() {
    let balance: Balance =
        serde_json::from_str(r#"{"asset":"BTC","free":"not-a-number"}"#).expect("deserialize");
    assert!(matches!(
        balance.free_quantity(),
        Err(Error::Parse { field: "free", .. })
    ));
}

#[test]
fn ticker_price_parses_string_price() {
    let ticker: TickerPrice =
        serde_json::from_str(r#"{"symbol":"BTCUSDT","price":"50000.00000000"}"#)
            .expect("deserialize");
    assert_eq!(ticker.last_price().expect("parse"), 50000.0);
}

#[test]
fn malformed_ticker_price_is_a_parse_error() {
    let ticker: TickerPrice =
        serde_json::from_str(r#"{"symbol":"BTCUSDT","price":""}"#).expect("deserialize");
    assert!(matches!(
        ticker.last_price(),
        Err(Error::Parse { field: "price", .. })
    ));
}
