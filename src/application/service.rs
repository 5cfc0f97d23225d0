use chrono::NaiveDate;

use crate::domain::{
    recent_transactions, summarize, Cents, LedgerSummary, Record, RecordId, RecordKind,
    TransactionView,
};
use crate::storage::Repository;

use super::{AppError, MAX_DESCRIPTION_LEN};

/// Number of entries in the dashboard's merged transaction feed.
pub const DEFAULT_FEED_LIMIT: usize = 10;

/// Fields supplied by the caller when creating a record.
/// Identity and creation order are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub title: String,
    pub amount_cents: Cents,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// One coherent dashboard read: totals plus the merged feed, both
/// computed from a single snapshot of the store.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: LedgerSummary,
    pub recent_transactions: Vec<TransactionView>,
}

/// Application service providing high-level ledger operations.
/// This is the primary interface for any client (CLI, API, tests).
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Mutations
    // ========================

    /// Record a new income entry.
    pub async fn add_income(&self, fields: NewRecord) -> Result<Record, AppError> {
        self.create(RecordKind::Income, fields).await
    }

    /// Record a new expense entry.
    pub async fn add_expense(&self, fields: NewRecord) -> Result<Record, AppError> {
        self.create(RecordKind::Expense, fields).await
    }

    async fn create(&self, kind: RecordKind, fields: NewRecord) -> Result<Record, AppError> {
        let title = fields.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::MissingField("title"));
        }

        if fields.amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        if !kind.is_known_category(&fields.category) {
            return Err(AppError::UnknownCategory {
                kind,
                category: fields.category,
            });
        }

        if let Some(description) = &fields.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(AppError::DescriptionTooLong);
            }
        }

        let mut record = Record::new(kind, title, fields.amount_cents, fields.category, fields.date);
        if let Some(description) = fields.description {
            record = record.with_description(description);
        }

        self.repo.save_record(&mut record).await?;
        Ok(record)
    }

    /// Delete an income record by id.
    pub async fn remove_income(&self, id: RecordId) -> Result<(), AppError> {
        self.remove(RecordKind::Income, id).await
    }

    /// Delete an expense record by id.
    pub async fn remove_expense(&self, id: RecordId) -> Result<(), AppError> {
        self.remove(RecordKind::Expense, id).await
    }

    async fn remove(&self, kind: RecordKind, id: RecordId) -> Result<(), AppError> {
        if self.repo.delete_record(kind, id).await? {
            Ok(())
        } else {
            Err(AppError::RecordNotFound { kind, id })
        }
    }

    // ========================
    // Reads
    // ========================

    /// List all income records.
    pub async fn list_income(&self) -> Result<Vec<Record>, AppError> {
        Ok(self.repo.list_records(RecordKind::Income).await?)
    }

    /// List all expense records.
    pub async fn list_expense(&self) -> Result<Vec<Record>, AppError> {
        Ok(self.repo.list_records(RecordKind::Expense).await?)
    }

    /// Compute the dashboard: totals over the full record set plus the
    /// recency-windowed merged feed. Both derive from the same snapshot,
    /// so the balance always matches the listed state of the store.
    pub async fn dashboard(&self, limit: usize) -> Result<Dashboard, AppError> {
        let records = self.repo.snapshot().await?;

        Ok(Dashboard {
            summary: summarize(&records),
            recent_transactions: recent_transactions(&records, limit),
        })
    }
}
