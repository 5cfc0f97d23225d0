use std::net::SocketAddr;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::api;
use crate::application::{LedgerService, NewRecord, DEFAULT_FEED_LIMIT};
use crate::domain::{format_cents, parse_cents, Record, RecordKind};

/// Moneta - Personal Income & Expense Ledger
#[derive(Parser)]
#[command(name = "moneta")]
#[command(about = "A personal income and expense ledger with a dashboard API")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "moneta.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Income record commands
    #[command(subcommand)]
    Income(RecordCommands),

    /// Expense record commands
    #[command(subcommand)]
    Expense(RecordCommands),

    /// Show totals and the merged recent-transaction feed
    Dashboard {
        /// Maximum number of feed entries to show
        #[arg(short, long, default_value_t = DEFAULT_FEED_LIMIT)]
        limit: usize,
    },

    /// Run the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        addr: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: records, dashboard
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv for records, json for dashboard)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RecordCommands {
    /// Add a new record
    Add {
        /// Short label for the record
        title: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Category label (e.g., "Salary" for income, "Food" for expense)
        #[arg(short, long)]
        category: String,

        /// Optional free-text description
        #[arg(short, long)]
        description: Option<String>,

        /// Date of the event (ISO 8601 format: YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List all records of this kind
    List,

    /// Remove a record by id
    Remove {
        /// Record ID
        id: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Income(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_record_command(&service, RecordKind::Income, cmd).await?;
            }

            Commands::Expense(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_record_command(&service, RecordKind::Expense, cmd).await?;
            }

            Commands::Dashboard { limit } => {
                let service = LedgerService::connect(&self.database).await?;
                run_dashboard_command(&service, limit).await?;
            }

            Commands::Serve { addr, port } => {
                let service = LedgerService::connect(&self.database).await?;
                let addr: SocketAddr = format!("{}:{}", addr, port)
                    .parse()
                    .context("Invalid listen address")?;
                api::serve(service, addr).await?;
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref(), format.as_deref())
                    .await?;
            }
        }

        Ok(())
    }
}

async fn run_record_command(
    service: &LedgerService,
    kind: RecordKind,
    cmd: RecordCommands,
) -> Result<()> {
    match cmd {
        RecordCommands::Add {
            title,
            amount,
            category,
            description,
            date,
        } => {
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

            let date = match date {
                Some(date_str) => parse_date(&date_str)
                    .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))?,
                None => Utc::now().date_naive(),
            };

            let fields = NewRecord {
                title,
                amount_cents,
                category,
                description,
                date,
            };

            let record = match kind {
                RecordKind::Income => service.add_income(fields).await?,
                RecordKind::Expense => service.add_expense(fields).await?,
            };

            println!(
                "Recorded {}: {} {} [{}] ({})",
                kind,
                record.title,
                format_cents(record.amount_cents),
                record.category,
                record.id
            );
        }

        RecordCommands::List => {
            let records = match kind {
                RecordKind::Income => service.list_income().await?,
                RecordKind::Expense => service.list_expense().await?,
            };
            print_record_table(&records);
        }

        RecordCommands::Remove { id } => {
            let record_id =
                Uuid::parse_str(&id).context("Invalid record ID format (expected UUID)")?;

            match kind {
                RecordKind::Income => service.remove_income(record_id).await?,
                RecordKind::Expense => service.remove_expense(record_id).await?,
            }

            println!("Removed {} record: {}", kind, record_id);
        }
    }

    Ok(())
}

fn print_record_table(records: &[Record]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }

    println!(
        "{:<12} {:>10} {:<15} {:<20} ID",
        "DATE", "AMOUNT", "CATEGORY", "TITLE"
    );
    println!("{}", "-".repeat(96));

    for record in records {
        println!(
            "{:<12} {:>10} {:<15} {:<20} {}",
            record.date.format("%Y-%m-%d"),
            format_cents(record.amount_cents),
            record.category,
            truncate(&record.title, 20),
            record.id
        );
    }
}

async fn run_dashboard_command(service: &LedgerService, limit: usize) -> Result<()> {
    let dashboard = service.dashboard(limit).await?;

    println!("Total income:  {:>12}", format_cents(dashboard.summary.total_income_cents));
    println!("Total expense: {:>12}", format_cents(dashboard.summary.total_expense_cents));
    println!("Balance:       {:>12}", format_cents(dashboard.summary.balance_cents));

    if dashboard.recent_transactions.is_empty() {
        println!("\nNo transactions yet.");
        return Ok(());
    }

    println!(
        "\n{:<12} {:<8} {:>10} {:<15} TITLE",
        "DATE", "TYPE", "AMOUNT", "CATEGORY"
    );
    println!("{}", "-".repeat(70));

    for view in &dashboard.recent_transactions {
        let signed_amount = match view.kind {
            RecordKind::Income => format!("+{}", format_cents(view.amount_cents)),
            RecordKind::Expense => format!("-{}", format_cents(view.amount_cents)),
        };

        println!(
            "{:<12} {:<8} {:>10} {:<15} {} {}",
            view.date.format("%Y-%m-%d"),
            view.kind.as_str(),
            signed_amount,
            view.category,
            view.icon,
            view.title
        );
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "records" => match format.unwrap_or("csv") {
            "csv" => {
                let count = exporter.export_records_csv(writer).await?;
                if output.is_some() {
                    eprintln!("Exported {} records", count);
                }
            }
            "json" => {
                let snapshot = exporter.export_records_json(writer).await?;
                if output.is_some() {
                    eprintln!(
                        "Exported {} income and {} expense records",
                        snapshot.income.len(),
                        snapshot.expense.len()
                    );
                }
            }
            other => anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", other),
        },
        "dashboard" => {
            let snapshot = exporter.export_dashboard_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported dashboard with {} recent transactions",
                    snapshot.recent_transactions.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: records, dashboard",
                export_type
            );
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").context("Date must be in YYYY-MM-DD format")
}
