// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use moneta::application::{LedgerService, NewRecord};
use moneta::domain::Cents;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Build creation fields with no description
pub fn fields(title: &str, amount_cents: Cents, category: &str, date: &str) -> NewRecord {
    NewRecord {
        title: title.to_string(),
        amount_cents,
        category: category.to_string(),
        description: None,
        date: parse_date(date),
    }
}
