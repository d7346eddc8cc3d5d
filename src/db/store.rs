//! Read-only client for the strategy store
//!
//! The store owns the `strategy`, `analysis` and `decision` tables;
//! this service only queries them. Connection is established once at
//! startup and the driver task runs for the life of the process.

use tokio_postgres::{Client, NoTls};
use tracing::error;

use crate::error::Result;
use crate::models::strategy::{AnalysisKind, AnalysisRecord, Decision, Strategy};

pub struct Database {
    client: Client,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;

        // Driver task; the client half errors out if this dies.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "strategy store connection error");
            }
        });

        Ok(Self { client })
    }

    /// All strategies, newest first.
    pub async fn get_strategies(&self) -> Result<Vec<Strategy>> {
        let rows = self
            .client
            .query(
                "SELECT name, description, short_description, targets, created
                 FROM strategy
                 ORDER BY created DESC",
                &[],
            )
            .await?;

        let strategies = rows
            .iter()
            .map(|row| Strategy {
                name: row.get(0),
                description: row.get(1),
                short_description: row.get(2),
                targets: row.get(3),
                created: row.get(4),
            })
            .collect();
        Ok(strategies)
    }

    /// Most recent analysis text for a (strategy, kind, target)
    /// triple, or None when nothing has been written yet.
    pub async fn get_latest_analysis(
        &self,
        strategy: &str,
        kind: AnalysisKind,
        target: &str,
    ) -> Result<Option<AnalysisRecord>> {
        let rows = self
            .client
            .query(
                "SELECT name, target, content, created
                 FROM analysis
                 WHERE name = $1 AND type = $2 AND target = $3
                 ORDER BY created DESC
                 LIMIT 1",
                &[&strategy, &kind.as_str(), &target],
            )
            .await?;

        Ok(rows.first().map(|row| AnalysisRecord {
            name: row.get(0),
            kind,
            target: row.get(1),
            content: row.get(2),
            created: row.get(3),
        }))
    }

    /// The `limit` most recent trading decisions, newest first.
    pub async fn get_recent_decisions(&self, limit: usize) -> Result<Vec<Decision>> {
        let query = format!(
            "SELECT created, target, decision, reason
             FROM decision
             ORDER BY created DESC
             LIMIT {}",
            limit
        );
        let rows = self.client.query(&query, &[]).await?;

        let decisions = rows
            .iter()
            .map(|row| Decision {
                created: row.get(0),
                target: row.get(1),
                decision: row.get(2),
                reason: row.get(3),
            })
            .collect();
        Ok(decisions)
    }
}
