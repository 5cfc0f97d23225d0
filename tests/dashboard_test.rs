mod common;

use anyhow::Result;
use common::{fields, parse_date, test_service};
use moneta::domain::{RecordKind, INCOME_GLYPH};

#[tokio::test]
async fn test_empty_store_yields_all_zero_dashboard() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let dashboard = service.dashboard(10).await?;
    assert_eq!(dashboard.summary.total_income_cents, 0);
    assert_eq!(dashboard.summary.total_expense_cents, 0);
    assert_eq!(dashboard.summary.balance_cents, 0);
    assert!(dashboard.recent_transactions.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_salary_and_rent_scenario() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_income(fields("Salary", 200000, "Salary", "2024-02-01"))
        .await?;
    service
        .add_expense(fields("Rent", 80000, "Bills", "2024-02-02"))
        .await?;

    let dashboard = service.dashboard(10).await?;
    assert_eq!(dashboard.summary.total_income_cents, 200000);
    assert_eq!(dashboard.summary.total_expense_cents, 80000);
    assert_eq!(dashboard.summary.balance_cents, 120000);

    let feed = &dashboard.recent_transactions;
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].title, "Rent");
    assert_eq!(feed[0].kind, RecordKind::Expense);
    assert_eq!(feed[0].amount_cents, 80000);
    assert_eq!(feed[1].title, "Salary");
    assert_eq!(feed[1].kind, RecordKind::Income);
    assert_eq!(feed[1].amount_cents, 200000);

    Ok(())
}

#[tokio::test]
async fn test_feed_orders_by_date_then_creation() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // A is oldest by date; B and C share a date, C created after B
    service
        .add_income(fields("A", 10000, "Salary", "2024-01-05"))
        .await?;
    service
        .add_expense(fields("B", 4000, "Food", "2024-01-10"))
        .await?;
    service
        .add_expense(fields("C", 1500, "Food", "2024-01-10"))
        .await?;

    let dashboard = service.dashboard(10).await?;
    let titles: Vec<&str> = dashboard
        .recent_transactions
        .iter()
        .map(|v| v.title.as_str())
        .collect();

    assert_eq!(titles, ["C", "B", "A"]);

    Ok(())
}

#[tokio::test]
async fn test_feed_is_stable_across_reads() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_expense(fields("B", 4000, "Food", "2024-01-10"))
        .await?;
    service
        .add_income(fields("A", 10000, "Salary", "2024-01-05"))
        .await?;
    service
        .add_expense(fields("C", 1500, "Food", "2024-01-10"))
        .await?;

    let first = service.dashboard(10).await?.recent_transactions;
    for _ in 0..5 {
        let again = service.dashboard(10).await?.recent_transactions;
        assert_eq!(again, first);
    }

    Ok(())
}

#[tokio::test]
async fn test_balance_may_go_negative() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_income(fields("Gig", 5000, "Freelance", "2024-01-01"))
        .await?;
    service
        .add_expense(fields("Laptop", 120000, "Shopping", "2024-01-02"))
        .await?;

    let dashboard = service.dashboard(10).await?;
    assert_eq!(dashboard.summary.balance_cents, -115000);

    Ok(())
}

#[tokio::test]
async fn test_totals_track_creates_and_deletes() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_income(fields("Salary", 200000, "Salary", "2024-02-01"))
        .await?;
    let bonus = service
        .add_income(fields("Bonus", 50000, "Gift", "2024-02-05"))
        .await?;
    service
        .add_expense(fields("Rent", 80000, "Bills", "2024-02-02"))
        .await?;

    let before = service.dashboard(10).await?;
    assert_eq!(before.summary.total_income_cents, 250000);
    assert_eq!(before.summary.balance_cents, 170000);

    // Totals are recomputed from live state after a delete
    service.remove_income(bonus.id).await?;

    let after = service.dashboard(10).await?;
    assert_eq!(after.summary.total_income_cents, 200000);
    assert_eq!(after.summary.balance_cents, 120000);
    assert!(after
        .recent_transactions
        .iter()
        .all(|view| view.title != "Bonus"));

    Ok(())
}

#[tokio::test]
async fn test_feed_limit_windows_feed_but_not_totals() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for i in 1..=15 {
        service
            .add_expense(fields(&format!("Entry {i}"), 1000, "Food", "2024-01-01"))
            .await?;
    }

    let dashboard = service.dashboard(10).await?;
    assert_eq!(dashboard.recent_transactions.len(), 10);
    // The aggregator always sees the unbounded set
    assert_eq!(dashboard.summary.total_expense_cents, 15000);

    // The most recently created same-day entries come first
    assert_eq!(dashboard.recent_transactions[0].title, "Entry 15");
    assert_eq!(dashboard.recent_transactions[9].title, "Entry 6");

    Ok(())
}

#[tokio::test]
async fn test_feed_carries_icons() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_income(fields("Salary", 200000, "Salary", "2024-02-01"))
        .await?;
    service
        .add_expense(fields("Lunch", 1500, "Food", "2024-02-02"))
        .await?;
    service
        .add_expense(fields("Rent", 80000, "Bills", "2024-02-03"))
        .await?;

    let feed = service.dashboard(10).await?.recent_transactions;
    assert_eq!(feed[0].icon, "\u{1F4F1}"); // Bills
    assert_eq!(feed[1].icon, "\u{1F354}"); // Food
    assert_eq!(feed[2].icon, INCOME_GLYPH);

    Ok(())
}

#[tokio::test]
async fn test_feed_dates_match_supplied_dates() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // The feed orders by the caller-supplied calendar date, not by
    // when the record was created
    service
        .add_expense(fields("Backdated", 1000, "Food", "2023-12-31"))
        .await?;
    service
        .add_expense(fields("Current", 1000, "Food", "2024-01-15"))
        .await?;

    let feed = service.dashboard(10).await?.recent_transactions;
    assert_eq!(feed[0].title, "Current");
    assert_eq!(feed[0].date, parse_date("2024-01-15"));
    assert_eq!(feed[1].title, "Backdated");
    assert_eq!(feed[1].date, parse_date("2023-12-31"));

    Ok(())
}
