//! Chart-ready view state derived from portfolio valuations
//!
//! Mirrors what the dashboard's pie chart expects: one slice per
//! asset with a stable color tag. Well-known assets get a fixed
//! palette entry; anything else falls back to a small cyclic palette
//! indexed by position.

use std::collections::BTreeMap;

use serde::Serialize;

/// Fixed palette assignments for the assets the dashboard knows about.
const ASSET_COLORS: &[(&str, &str)] = &[
    ("BTC", "chart-1"),
    ("USDT", "chart-2"),
    ("XRP", "chart-3"),
    ("SOL", "chart-4"),
    ("ETH", "chart-5"),
];

/// Size of the cyclic fallback palette (chart-1 .. chart-5).
const PALETTE_SIZE: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSlice {
    pub asset: String,
    pub usd_value: f64,
    pub color: String,
}

fn color_for(asset: &str, position: usize) -> String {
    ASSET_COLORS
        .iter()
        .find(|(known, _)| *known == asset)
        .map(|(_, color)| color.to_string())
        .unwrap_or_else(|| format!("chart-{}", (position % PALETTE_SIZE) + 1))
}

/// Shape a valued portfolio into ordered chart slices.
///
/// Entries with non-positive value are excluded.
pub fn chart_slices(portfolio: &BTreeMap<String, f64>) -> Vec<ChartSlice> {
    portfolio
        .iter()
        .filter(|(_, value)| **value > 0.0)
        .enumerate()
        .map(|(position, (asset, value))| ChartSlice {
            asset: asset.clone(),
            usd_value: *value,
            color: color_for(asset, position),
        })
        .collect()
}
