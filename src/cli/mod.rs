use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::{LedgerStore, LedgerView, Removal};
use crate::domain::{
    Category, CategoryFilter, DEFAULT_CURRENCY_SYMBOL, Kind, Totals, TransactionFilter, TransactionId,
    TypeFilter, ValidationError, display_category, display_date, format_money, parse_cents,
};
use crate::io::{Exporter, ImportOptions, Importer};

/// Pocketbook - personal income and expense ledger
#[derive(Parser)]
#[command(name = "pocketbook")]
#[command(about = "Record income and expenses, see your balance and filtered history")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "POCKETBOOK_DB", default_value = "pocketbook.db")]
    pub database: String,

    /// Currency symbol used when printing amounts
    #[arg(long, env = "POCKETBOOK_CURRENCY", default_value = DEFAULT_CURRENCY_SYMBOL)]
    pub currency: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new income or expense
    Add {
        /// Amount (e.g., "1200" or "1200.50")
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// What the money was for
        #[arg(short, long)]
        description: String,

        /// Transaction type: income, expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Category: salary, food, shopping, transport, bills, other (or any text)
        #[arg(short, long, default_value = "other")]
        category: String,
    },

    /// Show totals and transactions, newest first
    List {
        /// Filter by type: all, income, expense
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: String,

        /// Filter by category (or "all")
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Output format: table, json, csv
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show total income, expenses and balance
    Totals {
        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: TransactionId,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete all transactions
    Clear {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Export transactions to CSV or JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Filter by type: all, income, expense
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: String,

        /// Filter by category (or "all")
        #[arg(short, long, default_value = "all")]
        category: String,
    },

    /// Import transactions from a JSON array or snapshot
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` applies unless `--verbose` is given.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pocketbook=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut store = LedgerStore::open(&self.database)
            .await
            .with_context(|| format!("Failed to open ledger at {}", self.database))?;
        let currency = self.currency.as_str();

        match self.command {
            Commands::Add {
                amount,
                description,
                kind,
                category,
            } => {
                let amount_cents = parse_cents(&amount)
                    .map_err(|err| ValidationError::InvalidAmount(format!("{err}. Use '1200.00' or '1200'")))?;
                let kind: Kind = kind.parse()?;
                let category = Category::from_input(&category);
                if category.is_custom() {
                    eprintln!(
                        "Note: '{}' is not one of {}; saving it as a custom category.",
                        category,
                        known_categories()
                    );
                }

                let tx = store
                    .add(&description, amount_cents, kind, category)
                    .await?;

                println!(
                    "Transaction added: {} {}{} ({}) [{}]",
                    tx.description(),
                    tx.kind().sign(),
                    format_money(currency, tx.amount()),
                    display_category(tx.category()),
                    tx.id()
                );
                print_totals(&store.view(&TransactionFilter::default()).totals, currency);
            }

            Commands::List {
                kind,
                category,
                format,
            } => {
                let filter = parse_filter(&kind, &category)?;
                let view = store.view(&filter);
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&view)?),
                    "csv" => {
                        Exporter::new(&view).export_csv(io::stdout().lock())?;
                    }
                    "table" => print_view(&view, currency),
                    other => anyhow::bail!("Unknown format '{}'. Use table, json or csv", other),
                }
            }

            Commands::Totals { format } => {
                let totals = store.view(&TransactionFilter::default()).totals;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&totals)?),
                    "table" => print_totals(&totals, currency),
                    other => anyhow::bail!("Unknown format '{}'. Use table or json", other),
                }
            }

            Commands::Delete { id, yes } => {
                let Some(removal) = store.plan_delete(id) else {
                    println!("No transaction with ID {}", id);
                    return Ok(());
                };
                run_removal(&mut store, removal, yes).await?;
            }

            Commands::Clear { yes } => {
                let removal = store.plan_clear();
                if removal.count() == 0 {
                    println!("No transactions to clear.");
                    return Ok(());
                }
                run_removal(&mut store, removal, yes).await?;
            }

            Commands::Export {
                output,
                format,
                kind,
                category,
            } => {
                let filter = parse_filter(&kind, &category)?;
                let view = store.view(&filter);
                run_export_command(&view, output.as_deref(), &format)?;
            }

            Commands::Import { input, dry_run } => {
                run_import_command(&mut store, input.as_deref(), dry_run).await?;
            }
        }

        Ok(())
    }
}

fn parse_filter(kind: &str, category: &str) -> Result<TransactionFilter> {
    let kind: TypeFilter = kind.parse()?;
    let Ok(category) = category.parse::<CategoryFilter>();
    Ok(TransactionFilter::new(kind, category))
}

async fn run_removal(store: &mut LedgerStore, removal: Removal, yes: bool) -> Result<()> {
    if !yes && !confirm(&removal.prompt())? {
        println!("Cancelled.");
        return Ok(());
    }

    let all = removal.target().is_none();
    let removed = store.apply(removal).await?;
    if all {
        println!("All transactions cleared! ({} removed)", removed);
    } else {
        println!("Transaction deleted successfully!");
    }
    Ok(())
}

/// Ask a yes/no question on stderr, reading the answer from stdin.
fn confirm(prompt: &str) -> Result<bool> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{} [y/N] ", prompt)?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_totals(totals: &Totals, currency: &str) {
    println!(
        "Balance:   {} ({})",
        format_money(currency, totals.balance),
        if totals.is_positive() {
            "positive"
        } else {
            "negative"
        }
    );
    println!("Income:    {}", format_money(currency, totals.income));
    println!("Expenses:  {}", format_money(currency, totals.expenses));
}

fn print_view(view: &LedgerView, currency: &str) {
    print_totals(&view.totals, currency);
    println!();

    if view.is_empty() {
        println!("No transactions found");
        if !view.filter.is_all() {
            println!("Try changing your filters or add a new transaction");
        }
        return;
    }

    println!(
        "{:<15} {:<12} {:<16} {:<28} {:>14}",
        "ID", "DATE", "CATEGORY", "DESCRIPTION", "AMOUNT"
    );
    println!("{}", "-".repeat(89));
    for tx in &view.transactions {
        println!(
            "{:<15} {:<12} {:<16} {:<28} {:>14}",
            tx.id(),
            display_date(tx.timestamp()),
            display_category(tx.category()),
            truncate(tx.description(), 28),
            format!("{}{}", tx.kind().sign(), format_money(currency, tx.amount()))
        );
    }
}

/// Built-in category keys, comma separated.
fn known_categories() -> String {
    Category::KNOWN
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

fn run_export_command(view: &LedgerView, output: Option<&str>, format: &str) -> Result<()> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        "csv" => {
            let count = Exporter::new(view).export_csv(writer)?;
            eprintln!("Exported {} transactions", count);
        }
        "json" => {
            let snapshot = Exporter::new(view).export_json(writer)?;
            eprintln!("Exported {} transactions", snapshot.transactions.len());
        }
        other => anyhow::bail!("Unknown export format '{}'. Use csv or json", other),
    }

    Ok(())
}

async fn run_import_command(
    store: &mut LedgerStore,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let reader: Box<dyn io::Read> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let result = Importer::new(store)
        .import_json(reader, ImportOptions { dry_run })
        .await?;

    if dry_run {
        println!("Dry run (nothing saved)");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Skipped:  {}", result.skipped);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for err in result.errors.iter().take(10) {
            println!("  Record {}: {}", err.index, err.error);
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Transaction;

    #[test]
    fn test_add_accepts_negative_amount_argument() {
        let cli = Cli::try_parse_from(["pocketbook", "add", "-5", "-d", "Refund"]).unwrap();

        match cli.command {
            Commands::Add {
                amount,
                description,
                ..
            } => {
                assert_eq!(amount, "-5");
                assert_eq!(description, "Refund");
                let cents = parse_cents(&amount).unwrap();
                let err = Transaction::new(
                    1,
                    &description,
                    cents,
                    Kind::Income,
                    Category::Other,
                    chrono::Utc::now(),
                )
                .unwrap_err();
                assert_eq!(err, ValidationError::NonPositiveAmount(-500));
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_known_categories_listing() {
        assert_eq!(
            known_categories(),
            "salary, food, shopping, transport, bills, other"
        );
    }
}
