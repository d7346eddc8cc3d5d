//! Wire types for the exchange REST API
//!
//! The exchange renders numeric fields as strings; parsing happens
//! explicitly at this boundary so malformed rows can be skipped
//! instead of failing a whole response.

use serde::Deserialize;

use crate::error::Error;

/// One asset row from the account endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: String,
    #[serde(default)]
    pub locked: String,
}

impl Balance {
    /// Parse the free quantity, which the exchange serializes as a
    /// decimal string.
    pub fn free_quantity(&self) -> Result<f64, Error> {
        self.free.parse().map_err(|_| Error::Parse {
            field: "free",
            value: self.free.clone(),
        })
    }
}

/// Response shape of `GET /api/v3/account` (fields we consume).
#[derive(Debug, Deserialize)]
pub struct AccountInformation {
    pub balances: Vec<Balance>,
}

/// One entry from the ticker price endpoint, e.g.
/// `{"symbol":"BTCUSDT","price":"96123.45000000"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

impl TickerPrice {
    pub fn last_price(&self) -> Result<f64, Error> {
        self.price.parse().map_err(|_| Error::Parse {
            field: "price",
            value: self.price.clone(),
        })
    }
}
