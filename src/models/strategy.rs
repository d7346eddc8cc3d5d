//! Strategy store data models
//!
//! These rows are owned by the external store and read-only from this
//! service; we hold request-scoped copies only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trading strategy row from the `strategy` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub description: String,
    pub short_description: String,
    /// Serialized target list as stored upstream, e.g.
    /// `"['BTC','XRP','SOL']"`.
    pub targets: String,
    pub created: DateTime<Utc>,
}

impl Strategy {
    /// Decode the serialized target list.
    ///
    /// The store writes Python-style single-quoted lists; normalize to
    /// JSON before decoding. A malformed value yields an empty list
    /// rather than an error, matching the dashboard's behavior.
    pub fn parse_targets(&self) -> Vec<String> {
        serde_json::from_str(&self.targets.replace('\'', "\"")).unwrap_or_default()
    }
}

/// Kind of analysis text attached to a (strategy, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Technical,
    Sentimental,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Technical => "technical",
            AnalysisKind::Sentimental => "sentimental",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "technical" => Some(AnalysisKind::Technical),
            "sentimental" => Some(AnalysisKind::Sentimental),
            _ => None,
        }
    }
}

/// Free-text analysis row from the `analysis` table. Multiple rows may
/// exist per (strategy, kind, target); only the most recent matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Strategy name this analysis belongs to.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AnalysisKind,
    /// Quote-pair target, e.g. `BTCUSDT`.
    pub target: String,
    pub content: String,
    pub created: DateTime<Utc>,
}

/// One trading decision from the `decision` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub created: DateTime<Utc>,
    pub target: String,
    pub decision: String,
    pub reason: String,
}
