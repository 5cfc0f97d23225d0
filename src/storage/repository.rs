use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Record, RecordId, RecordKind};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying ledger records.
/// Exclusively owns the stored record set; aggregation and the merged
/// feed are computed by callers from what it returns.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Save a new record to the database.
    /// Automatically assigns the next sequence number.
    pub async fn save_record(&self, record: &mut Record) -> Result<()> {
        // Get and increment sequence number atomically
        let sequence = self.next_sequence().await?;
        record.sequence = sequence;

        sqlx::query(
            r#"
            INSERT INTO records (id, kind, sequence, title, amount_cents, category, description, date, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.kind.as_str())
        .bind(record.sequence)
        .bind(&record.title)
        .bind(record.amount_cents)
        .bind(&record.category)
        .bind(&record.description)
        .bind(record.date.format("%Y-%m-%d").to_string())
        .bind(record.recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save record")?;

        Ok(())
    }

    /// Get the next sequence number and increment the counter.
    async fn next_sequence(&self) -> Result<i64> {
        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + 1
            WHERE name = 'record_sequence'
            RETURNING value
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to get next sequence number")?;

        Ok(row.get("value"))
    }

    /// Get a record by kind and id.
    pub async fn get_record(&self, kind: RecordKind, id: RecordId) -> Result<Option<Record>> {
        let row = sqlx::query(
            r#"
            SELECT id, kind, sequence, title, amount_cents, category, description, date, recorded_at
            FROM records
            WHERE kind = ? AND id = ?
            "#,
        )
        .bind(kind.as_str())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch record")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    /// Hard-delete a record by kind and id.
    /// Returns true if a record was deleted, false if the id was not present.
    pub async fn delete_record(&self, kind: RecordKind, id: RecordId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM records WHERE kind = ? AND id = ?")
            .bind(kind.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete record")?;

        Ok(result.rows_affected() > 0)
    }

    /// List all records of one kind. No ordering contract; callers that
    /// need an ordered feed go through the merged snapshot instead.
    pub async fn list_records(&self, kind: RecordKind) -> Result<Vec<Record>> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, sequence, title, amount_cents, category, description, date, recorded_at
            FROM records
            WHERE kind = ?
            ORDER BY sequence
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list records")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Read every record of both kinds in a single statement, so the
    /// result is one consistent snapshot of the store: a concurrent
    /// create/delete is either fully visible or not visible at all.
    pub async fn snapshot(&self) -> Result<Vec<Record>> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, sequence, title, amount_cents, category, description, date, recorded_at
            FROM records
            ORDER BY sequence
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to read record snapshot")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<Record> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");
        let date_str: String = row.get("date");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Record {
            id: Uuid::parse_str(&id_str).context("Invalid record ID")?,
            kind: RecordKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid record kind: {}", kind_str))?,
            sequence: row.get("sequence"),
            title: row.get("title"),
            amount_cents: row.get("amount_cents"),
            category: row.get("category"),
            description: row.get("description"),
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .context("Invalid record date")?,
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
