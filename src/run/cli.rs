use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use super::validate;
use crate::db::Database;
use crate::models::{BudgetChange, Standing, TransactionType, TransactionUpdate};

pub(super) fn cli_add(
    db: &mut Database,
    amount: Decimal,
    kind: TransactionType,
    category: &str,
    desc: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let amount = validate::amount(amount)?;
    let category = validate::category(category)?;
    let desc = desc.map(str::trim).filter(|d| !d.is_empty());

    let id = match date {
        Some(day) => {
            let at = day.and_time(NaiveTime::MIN);
            db.add_transaction_at(amount, kind, category, desc, at)?
        }
        None => db.add_transaction(amount, kind, category, desc)?,
    };
    let saved = db
        .get_transaction(id)?
        .with_context(|| format!("Transaction {id} missing after insert"))?;

    println!(
        "Transaction added: {} of ${:.2} for '{}'",
        saved.kind.as_str().to_uppercase(),
        saved.amount,
        saved.category
    );
    Ok(())
}

pub(super) fn cli_view_recent(db: &Database, limit: u32) -> Result<()> {
    let transactions = db.get_transactions_as_list(limit)?;
    if transactions.is_empty() {
        println!("No transactions found. Add some with the 'add' command!");
        return Ok(());
    }

    println!("--- Recent Transactions ---");
    for t in &transactions {
        let amount = format!("{:.2}", t.amount);
        let line = format!(
            "[{}] {}: {:<7} ${:>8} ({})",
            t.id,
            t.date_string(),
            t.kind.as_str().to_uppercase(),
            amount,
            t.category
        );
        match t.description.as_deref() {
            Some(desc) => println!("{line} - {desc}"),
            None => println!("{line}"),
        }
    }
    Ok(())
}

pub(super) fn cli_summary(db: &Database, month: u32, year: i32) -> Result<()> {
    let month = validate::month(month)?;
    let summary = db.get_monthly_summary(month, year)?;

    println!("--- Financial Summary for {month}/{year} ---");
    println!("Total Income:   ${:.2}", summary.income);
    println!("Total Expenses: ${:.2}", summary.expenses);
    println!("Net Balance:    ${:.2}", summary.net);
    Ok(())
}

pub(super) fn cli_update(db: &mut Database, id: i64, update: TransactionUpdate) -> Result<()> {
    let update = validate::update(update)?;
    if !db.update_transaction(id, &update)? {
        anyhow::bail!("Transaction with ID {id} not found.");
    }
    println!("Transaction with ID {id} updated successfully.");
    Ok(())
}

pub(super) fn cli_delete(db: &Database, id: i64) -> Result<()> {
    if !db.delete_transaction(id)? {
        anyhow::bail!("Transaction with ID {id} not found.");
    }
    println!("Transaction with ID {id} deleted successfully.");
    Ok(())
}

pub(super) fn cli_budget(
    db: &mut Database,
    category: &str,
    limit: Decimal,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let month = validate::month(month.unwrap_or_else(|| today.month()))?;
    let year = year.unwrap_or_else(|| today.year());
    let category = validate::category(category)?;
    let limit = validate::budget_limit(limit)?;

    let change = db.add_budget(category, limit, month, year)?;
    let stored = db.get_category(category)?;
    let category = stored.as_ref().map_or(category, |c| c.name.as_str());

    match change {
        BudgetChange::Created => {
            println!("Budget of ${limit:.2} set for '{category}' ({month}/{year}).")
        }
        BudgetChange::Updated => {
            println!("Budget for '{category}' ({month}/{year}) updated to ${limit:.2}.")
        }
    }

    let Some(status) = db.get_budget_status(category, month, year)? else {
        return Ok(());
    };
    println!();
    println!("--- Budget Status for {category} ({month}/{year}) ---");
    println!("Budget Limit:   ${:.2}", status.limit);
    println!("Total Spent:    ${:.2}", status.spent);
    println!("Remaining:      ${:.2}", status.remaining);
    match status.standing() {
        Standing::Exceeded(over) => {
            println!("Warning: You have exceeded your budget by ${over:.2}!")
        }
        Standing::Reached => println!("You have reached your budget limit."),
        Standing::Within => println!("You are still within your budget."),
    }
    Ok(())
}

pub(super) fn cli_categories(db: &Database) -> Result<()> {
    let categories = db.get_categories()?;
    if categories.is_empty() {
        println!("No categories yet. They are created when you add a transaction or budget.");
        return Ok(());
    }

    println!("{:<4} {:<24} Transactions", "ID", "Name");
    println!("{}", "─".repeat(42));
    for (cat, count) in &categories {
        println!("{:<4} {:<24} {}", cat.id.unwrap_or(0), cat.name, count);
    }
    Ok(())
}
