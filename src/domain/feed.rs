use chrono::NaiveDate;
use serde::Serialize;

use super::{Cents, Record, RecordKind};

/// Derived totals over the current record set.
/// Always recomputed from live records, never cached incrementally,
/// so the summary can never drift from the stored set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub total_income_cents: Cents,
    pub total_expense_cents: Cents,
    pub balance_cents: Cents,
}

impl LedgerSummary {
    pub fn is_empty(&self) -> bool {
        self.total_income_cents == 0 && self.total_expense_cents == 0
    }
}

/// Compute total income, total expense and balance from a record set.
/// An empty set yields an all-zero summary. Balance may be negative.
pub fn summarize(records: &[Record]) -> LedgerSummary {
    let (total_income_cents, total_expense_cents) =
        records
            .iter()
            .fold((0, 0), |(income, expense), record| match record.kind {
                RecordKind::Income => (income + record.amount_cents, expense),
                RecordKind::Expense => (income, expense + record.amount_cents),
            });

    LedgerSummary {
        total_income_cents,
        total_expense_cents,
        balance_cents: total_income_cents - total_expense_cents,
    }
}

/// Read-only projection of a record for the merged transaction feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub title: String,
    pub category: String,
    pub date: NaiveDate,
    pub amount_cents: Cents,
    pub icon: &'static str,
}

impl From<&Record> for TransactionView {
    fn from(record: &Record) -> Self {
        Self {
            kind: record.kind,
            title: record.title.clone(),
            category: record.category.clone(),
            date: record.date,
            amount_cents: record.amount_cents,
            icon: record.icon(),
        }
    }
}

/// Merge both record kinds into a single feed: date descending, same-day
/// entries ordered most-recently-created first, truncated to `limit`.
/// The ordering is fully determined by (date, sequence), so repeated calls
/// over the same snapshot always return the same sequence of views.
pub fn recent_transactions(records: &[Record], limit: usize) -> Vec<TransactionView> {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.sequence.cmp(&a.sequence)));

    sorted
        .into_iter()
        .take(limit)
        .map(TransactionView::from)
        .collect()
}
