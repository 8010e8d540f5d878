mod cli;
mod validate;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::db::Database;
use crate::models::{TransactionType, TransactionUpdate};

#[derive(Parser, Debug)]
#[command(
    name = "fintrack",
    version,
    about = "A CLI for tracking personal finances",
    long_about = "fintrack records income and expense transactions in a local \
                  SQLite database, summarizes them by month and tracks \
                  per-category budgets."
)]
pub(crate) struct Cli {
    /// Database file (default: platform data directory)
    #[arg(long, global = true, env = "FINTRACK_DB", value_name = "PATH")]
    pub(crate) db: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Add a new transaction
    Add {
        /// Amount of the transaction
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        /// Type of transaction
        #[arg(long = "type", value_enum)]
        kind: TransactionType,
        /// Category of the transaction
        #[arg(long)]
        category: String,
        /// Description of the transaction
        #[arg(long)]
        desc: Option<String>,
        /// Date of the transaction (YYYY-MM-DD), defaults to now
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// View the most recent transactions
    ViewRecent {
        /// Number of transactions to show
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Financial summary for a given month
    Summary {
        /// Month to summarize (1-12)
        #[arg(long)]
        month: u32,
        /// Year to summarize
        #[arg(long)]
        year: i32,
    },
    /// Update an existing transaction by its ID
    Update {
        id: i64,
        /// New amount for the transaction
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<Decimal>,
        /// New type of transaction
        #[arg(long = "type", value_enum)]
        kind: Option<TransactionType>,
        /// New category of the transaction
        #[arg(long)]
        category: Option<String>,
        /// New description of the transaction
        #[arg(long)]
        desc: Option<String>,
    },
    /// Delete a transaction by its ID
    Delete { id: i64 },
    /// Set a monthly budget for a category and show its status
    Budget {
        /// Category name for the budget
        #[arg(long)]
        category: String,
        /// The budget limit
        #[arg(long, allow_negative_numbers = true)]
        limit: Decimal,
        /// Month for the budget (1-12), defaults to the current month
        #[arg(long)]
        month: Option<u32>,
        /// Year for the budget, defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// List categories with their transaction counts
    Categories,
}

pub(crate) fn as_cli(command: Command, db: &mut Database) -> Result<()> {
    match command {
        Command::Add {
            amount,
            kind,
            category,
            desc,
            date,
        } => cli::cli_add(db, amount, kind, &category, desc.as_deref(), date),
        Command::ViewRecent { limit } => cli::cli_view_recent(db, limit),
        Command::Summary { month, year } => cli::cli_summary(db, month, year),
        Command::Update {
            id,
            amount,
            kind,
            category,
            desc,
        } => {
            let update = TransactionUpdate {
                amount,
                kind,
                category,
                description: desc,
            };
            cli::cli_update(db, id, update)
        }
        Command::Delete { id } => cli::cli_delete(db, id),
        Command::Budget {
            category,
            limit,
            month,
            year,
        } => cli::cli_budget(db, &category, limit, month, year),
        Command::Categories => cli::cli_categories(db),
    }
}
