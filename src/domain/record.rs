use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type RecordId = Uuid;

/// Glyph shown next to income entries in the merged transaction feed.
/// Expense entries carry a per-category icon instead.
pub const INCOME_GLYPH: &str = "\u{1F4B5}";

/// The two record kinds tracked by the ledger. They are structurally
/// identical but keep separate identifier spaces and category sets,
/// and are only ever merged in the read-side feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(RecordKind::Income),
            "expense" => Some(RecordKind::Expense),
            _ => None,
        }
    }

    /// Check a category label against this kind's fixed set.
    pub fn is_known_category(&self, category: &str) -> bool {
        match self {
            RecordKind::Income => IncomeCategory::from_str(category).is_some(),
            RecordKind::Expense => ExpenseCategory::from_str(category).is_some(),
        }
    }

    /// All valid category labels for this kind, in display order.
    pub fn category_labels(&self) -> &'static [&'static str] {
        match self {
            RecordKind::Income => IncomeCategory::ALL_LABELS,
            RecordKind::Expense => ExpenseCategory::ALL_LABELS,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Business,
    Investments,
    Gift,
    Other,
}

impl IncomeCategory {
    pub const ALL_LABELS: &'static [&'static str] = &[
        "Salary",
        "Freelance",
        "Business",
        "Investments",
        "Gift",
        "Other",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::Salary => "Salary",
            IncomeCategory::Freelance => "Freelance",
            IncomeCategory::Business => "Business",
            IncomeCategory::Investments => "Investments",
            IncomeCategory::Gift => "Gift",
            IncomeCategory::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Salary" => Some(IncomeCategory::Salary),
            "Freelance" => Some(IncomeCategory::Freelance),
            "Business" => Some(IncomeCategory::Business),
            "Investments" => Some(IncomeCategory::Investments),
            "Gift" => Some(IncomeCategory::Gift),
            "Other" => Some(IncomeCategory::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Bills,
    Health,
    Education,
    Other,
}

impl ExpenseCategory {
    pub const ALL_LABELS: &'static [&'static str] = &[
        "Food",
        "Transport",
        "Entertainment",
        "Shopping",
        "Bills",
        "Health",
        "Education",
        "Other",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Bills => "Bills",
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Food" => Some(ExpenseCategory::Food),
            "Transport" => Some(ExpenseCategory::Transport),
            "Entertainment" => Some(ExpenseCategory::Entertainment),
            "Shopping" => Some(ExpenseCategory::Shopping),
            "Bills" => Some(ExpenseCategory::Bills),
            "Health" => Some(ExpenseCategory::Health),
            "Education" => Some(ExpenseCategory::Education),
            "Other" => Some(ExpenseCategory::Other),
            _ => None,
        }
    }

    /// Display icon for this category.
    pub fn icon(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "\u{1F354}",
            ExpenseCategory::Transport => "\u{1F697}",
            ExpenseCategory::Entertainment => "\u{1F3AC}",
            ExpenseCategory::Shopping => "\u{1F6CD}\u{FE0F}",
            ExpenseCategory::Bills => "\u{1F4F1}",
            ExpenseCategory::Health => "\u{1F48A}",
            ExpenseCategory::Education => "\u{1F4DA}",
            ExpenseCategory::Other => "\u{1F4B0}",
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the display icon for an expense category label.
/// Labels missing from the icon table fall back to the Other icon.
pub fn expense_icon(category: &str) -> &'static str {
    ExpenseCategory::from_str(category)
        .unwrap_or(ExpenseCategory::Other)
        .icon()
}

/// A single monetary event. Records are immutable once created;
/// the only lifecycle transition is deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    /// Monotonically increasing creation counter for ordering
    pub sequence: i64,
    /// Short label, never empty
    pub title: String,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    /// Category label, validated against the kind's fixed set at creation
    pub category: String,
    /// Optional free text
    pub description: Option<String>,
    /// Calendar date the event occurred on, supplied by the caller
    pub date: NaiveDate,
    /// When we recorded this entry in the system
    pub recorded_at: DateTime<Utc>,
}

impl Record {
    /// Create a new record. Sequence number must be assigned by the repository.
    pub fn new(
        kind: RecordKind,
        title: String,
        amount_cents: Cents,
        category: String,
        date: NaiveDate,
    ) -> Self {
        assert!(amount_cents > 0, "Record amount must be positive");
        Self {
            id: Uuid::new_v4(),
            kind,
            sequence: 0, // Will be set by repository
            title,
            amount_cents,
            category,
            description: None,
            date,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// Feed icon for this record: the fixed income glyph, or the
    /// category-derived expense icon.
    pub fn icon(&self) -> &'static str {
        match self.kind {
            RecordKind::Income => INCOME_GLYPH,
            RecordKind::Expense => expense_icon(&self.category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    #[test]
    fn test_record_kind_roundtrip() {
        for kind in [RecordKind::Income, RecordKind::Expense] {
            let s = kind.as_str();
            let parsed = RecordKind::from_str(s).unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_income_category_roundtrip() {
        for label in IncomeCategory::ALL_LABELS {
            let parsed = IncomeCategory::from_str(label).unwrap();
            assert_eq!(parsed.as_str(), *label);
        }
    }

    #[test]
    fn test_expense_category_roundtrip() {
        for label in ExpenseCategory::ALL_LABELS {
            let parsed = ExpenseCategory::from_str(label).unwrap();
            assert_eq!(parsed.as_str(), *label);
        }
    }

    #[test]
    fn test_category_membership_per_kind() {
        assert!(RecordKind::Income.is_known_category("Salary"));
        assert!(!RecordKind::Income.is_known_category("Food"));
        assert!(RecordKind::Expense.is_known_category("Food"));
        assert!(!RecordKind::Expense.is_known_category("Salary"));
        assert!(!RecordKind::Income.is_known_category("Bogus"));
        // Membership is case-sensitive, matching the fixed labels
        assert!(!RecordKind::Expense.is_known_category("food"));
        // "Other" exists in both sets
        assert!(RecordKind::Income.is_known_category("Other"));
        assert!(RecordKind::Expense.is_known_category("Other"));
    }

    #[test]
    fn test_expense_icon_table() {
        assert_eq!(expense_icon("Food"), "\u{1F354}");
        assert_eq!(expense_icon("Transport"), "\u{1F697}");
        assert_eq!(expense_icon("Education"), "\u{1F4DA}");
        assert_eq!(expense_icon("Other"), "\u{1F4B0}");
    }

    #[test]
    fn test_expense_icon_falls_back_to_other() {
        assert_eq!(expense_icon("Unknown"), ExpenseCategory::Other.icon());
        assert_eq!(expense_icon(""), ExpenseCategory::Other.icon());
    }

    #[test]
    fn test_record_icon_by_kind() {
        let income = Record::new(
            RecordKind::Income,
            "Salary".into(),
            200000,
            "Salary".into(),
            sample_date(),
        );
        assert_eq!(income.icon(), INCOME_GLYPH);

        let expense = Record::new(
            RecordKind::Expense,
            "Lunch".into(),
            1500,
            "Food".into(),
            sample_date(),
        );
        assert_eq!(expense.icon(), "\u{1F354}");
    }

    #[test]
    fn test_empty_description_normalized_to_none() {
        let record = Record::new(
            RecordKind::Income,
            "Salary".into(),
            200000,
            "Salary".into(),
            sample_date(),
        )
        .with_description("");
        assert_eq!(record.description, None);
    }

    #[test]
    #[should_panic(expected = "Record amount must be positive")]
    fn test_record_requires_positive_amount() {
        Record::new(
            RecordKind::Income,
            "Salary".into(),
            0,
            "Salary".into(),
            sample_date(),
        );
    }
}
