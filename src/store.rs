//! Report persistence: one SQLite table, one row per completed run.
//!
//! Reports are immutable once created; there is no update, delete, or
//! search-by-query. Concurrent writers are serialized by SQLite itself.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::pipeline::SourceLink;

pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Row shape for the index listing.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    pub id: i64,
    pub query: String,
    pub created_at: String,
}

/// A full persisted report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: i64,
    pub query: String,
    /// RFC-3339 UTC creation timestamp.
    pub created_at: String,
    pub summary: String,
    pub sources: Vec<SourceLink>,
}

#[derive(Clone)]
pub struct ReportStore {
    pool: SqlitePool,
}

impl ReportStore {
    /// Open (and create if missing) the database file behind `database_url`,
    /// e.g. `sqlite:searchbrief.db`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("parsing database url {database_url}"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .context("opening sqlite database")?;
        Ok(Self { pool })
    }

    /// In-memory store for tests. Single connection: each `:memory:`
    /// connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("opening in-memory sqlite")?;
        Ok(Self { pool })
    }

    /// Create the table if absent. No migrations beyond this.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT NOT NULL,
                created_at TEXT NOT NULL,
                summary TEXT NOT NULL,
                sources_json TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("creating reports table")?;
        Ok(())
    }

    /// Insert a new report and return its identifier.
    pub async fn save(&self, query: &str, summary: &str, sources: &[SourceLink]) -> Result<i64> {
        let created_at = Utc::now().to_rfc3339();
        let sources_json = serde_json::to_string(sources).context("serializing sources")?;
        let result = sqlx::query(
            "INSERT INTO reports (query, created_at, summary, sources_json)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(query)
        .bind(&created_at)
        .bind(summary)
        .bind(&sources_json)
        .execute(&self.pool)
        .await
        .context("inserting report")?;
        Ok(result.last_insert_rowid())
    }

    /// Newest first by identifier, up to `limit` rows.
    pub async fn list(&self, limit: i64) -> Result<Vec<ReportMeta>> {
        sqlx::query_as::<_, ReportMeta>(
            "SELECT id, query, created_at FROM reports ORDER BY id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("listing reports")
    }

    /// Full report for one identifier, or `None` if it does not exist.
    pub async fn get(&self, id: i64) -> Result<Option<Report>> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i64,
            query: String,
            created_at: String,
            summary: String,
            sources_json: String,
        }

        let row = sqlx::query_as::<_, Row>(
            "SELECT id, query, created_at, summary, sources_json
             FROM reports WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetching report")?;

        let Some(row) = row else {
            return Ok(None);
        };
        let sources: Vec<SourceLink> =
            serde_json::from_str(&row.sources_json).context("deserializing sources")?;
        Ok(Some(Report {
            id: row.id,
            query: row.query,
            created_at: row.created_at,
            summary: row.summary,
            sources,
        }))
    }

    /// Total row count. Used by tests asserting failed runs persist nothing.
    pub async fn count(&self) -> Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await
            .context("counting reports")?;
        Ok(n)
    }
}
