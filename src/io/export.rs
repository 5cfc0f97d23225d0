use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::{LedgerService, DEFAULT_FEED_LIMIT};
use crate::domain::{format_cents, LedgerSummary, Record, TransactionView};

/// Full ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub income: Vec<Record>,
    pub expense: Vec<Record>,
}

/// Dashboard snapshot for JSON export
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub summary: LedgerSummary,
    pub recent_transactions: Vec<TransactionView>,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export all records (both kinds) to CSV format
    pub async fn export_records_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let income = self.service.list_income().await?;
        let expense = self.service.list_expense().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["kind", "id", "title", "amount", "category", "description", "date"])?;

        let mut count = 0;
        for record in income.iter().chain(expense.iter()) {
            csv_writer.write_record([
                record.kind.as_str().to_string(),
                record.id.to_string(),
                record.title.clone(),
                format_cents(record.amount_cents),
                record.category.clone(),
                record.description.clone().unwrap_or_default(),
                record.date.format("%Y-%m-%d").to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export all records as a JSON snapshot
    pub async fn export_records_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            income: self.service.list_income().await?,
            expense: self.service.list_expense().await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }

    /// Export the dashboard (totals plus merged feed) as JSON
    pub async fn export_dashboard_json<W: Write>(&self, mut writer: W) -> Result<DashboardSnapshot> {
        let dashboard = self.service.dashboard(DEFAULT_FEED_LIMIT).await?;

        let snapshot = DashboardSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            summary: dashboard.summary,
            recent_transactions: dashboard.recent_transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
