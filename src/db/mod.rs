mod schema;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let db = Self { conn };
        db.migrate().context("Database migration failed")?;
        debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            info!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .context("Failed to read schema version")?;

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                info!(from_version, "applying migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    /// Every category with the number of transactions filed under it.
    pub(crate) fn get_categories(&self) -> Result<Vec<(Category, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.name, COUNT(t.id)
             FROM categories c
             LEFT JOIN transactions t ON t.category_id = c.id
             GROUP BY c.id
             ORDER BY c.name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                },
                row.get(2)?,
            ))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The stored category matching `name`, which may differ from it in case.
    pub(crate) fn get_category(&self, name: &str) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM categories WHERE name = ?1",
            params![name],
            |row| {
                Ok(Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn add_transaction(
        &mut self,
        amount: Decimal,
        kind: TransactionType,
        category: &str,
        description: Option<&str>,
    ) -> Result<i64> {
        let now = Local::now().naive_local();
        self.add_transaction_at(amount, kind, category, description, now)
    }

    pub(crate) fn add_transaction_at(
        &mut self,
        amount: Decimal,
        kind: TransactionType,
        category: &str,
        description: Option<&str>,
        date: NaiveDateTime,
    ) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let category_id = category_id(&tx, category)?;
        tx.execute(
            "INSERT INTO transactions (amount, type, date, description, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                amount.to_string(),
                kind.as_str(),
                date.format(DATE_TIME_FORMAT).to_string(),
                description,
                category_id,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        debug!(id, %amount, kind = kind.as_str(), category, "inserted transaction");
        Ok(id)
    }

    /// Most recent transactions first.
    pub(crate) fn get_transactions_as_list(&self, limit: u32) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.amount, t.type, c.name, t.date, t.description
             FROM transactions t
             JOIN categories c ON c.id = t.category_id
             ORDER BY t.date DESC, t.id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            "SELECT t.id, t.amount, t.type, c.name, t.date, t.description
             FROM transactions t
             JOIN categories c ON c.id = t.category_id
             WHERE t.id = ?1",
            params![id],
            transaction_from_row,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies the fields set in `update`. Returns `false` if no transaction has `id`.
    pub(crate) fn update_transaction(
        &mut self,
        id: i64,
        update: &TransactionUpdate,
    ) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM transactions WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        if !exists {
            return Ok(false);
        }

        let mut assignments: Vec<String> = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(amount) = update.amount {
            param_values.push(Box::new(amount.to_string()));
            assignments.push(format!("amount = ?{}", param_values.len()));
        }
        if let Some(kind) = update.kind {
            param_values.push(Box::new(kind.as_str()));
            assignments.push(format!("type = ?{}", param_values.len()));
        }
        if let Some(name) = &update.category {
            param_values.push(Box::new(category_id(&tx, name)?));
            assignments.push(format!("category_id = ?{}", param_values.len()));
        }
        if let Some(description) = &update.description {
            param_values.push(Box::new(description.clone()));
            assignments.push(format!("description = ?{}", param_values.len()));
        }

        if !assignments.is_empty() {
            param_values.push(Box::new(id));
            let sql = format!(
                "UPDATE transactions SET {} WHERE id = ?{}",
                assignments.join(", "),
                param_values.len()
            );
            let params_ref: Vec<&dyn rusqlite::types::ToSql> =
                param_values.iter().map(|p| p.as_ref()).collect();
            tx.execute(&sql, params_ref.as_slice())?;
        }
        tx.commit()?;
        debug!(id, fields = assignments.len(), "updated transaction");
        Ok(true)
    }

    /// Returns `false` if no transaction has `id`.
    pub(crate) fn delete_transaction(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        debug!(id, removed, "deleted transaction");
        Ok(removed > 0)
    }

    // ── Analytics ─────────────────────────────────────────────

    pub(crate) fn get_monthly_summary(&self, month: u32, year: i32) -> Result<MonthlySummary> {
        let mut stmt = self
            .conn
            .prepare("SELECT type, amount FROM transactions WHERE date LIKE ?1")?;
        let rows = stmt.query_map(params![month_pattern(month, year)], |row| {
            Ok((kind_column(row, 0)?, decimal_column(row, 1)?))
        })?;

        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;
        for row in rows {
            let (kind, amount) = row?;
            let total = match kind {
                TransactionType::Income => &mut income,
                TransactionType::Expense => &mut expenses,
            };
            *total = total
                .checked_add(amount)
                .with_context(|| format!("Total {kind} for {month}/{year} is too large"))?;
        }
        Ok(MonthlySummary::new(income, expenses))
    }

    fn get_category_spending(&self, category_id: i64, month: u32, year: i32) -> Result<Decimal> {
        let mut stmt = self.conn.prepare(
            "SELECT amount FROM transactions
             WHERE category_id = ?1 AND type = 'expense' AND date LIKE ?2",
        )?;
        let rows = stmt.query_map(params![category_id, month_pattern(month, year)], |row| {
            decimal_column(row, 0)
        })?;
        let mut spent = Decimal::ZERO;
        for amount in rows {
            spent = spent
                .checked_add(amount?)
                .with_context(|| format!("Spending for {month}/{year} is too large"))?;
        }
        Ok(spent)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Sets the limit for a category's month, replacing any existing one.
    pub(crate) fn add_budget(
        &mut self,
        category: &str,
        limit: Decimal,
        month: u32,
        year: i32,
    ) -> Result<BudgetChange> {
        let tx = self.conn.transaction()?;
        let category_id = category_id(&tx, category)?;
        let change = match budget_for(&tx, category_id, month, year)? {
            Some(existing) => {
                tx.execute(
                    "UPDATE budgets SET limit_amount = ?1 WHERE id = ?2",
                    params![limit.to_string(), existing.id],
                )?;
                BudgetChange::Updated
            }
            None => {
                let budget = Budget::new(category_id, month, year, limit);
                tx.execute(
                    "INSERT INTO budgets (category_id, limit_amount, month, year)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        budget.category_id,
                        budget.limit_amount.to_string(),
                        budget.month,
                        budget.year,
                    ],
                )?;
                BudgetChange::Created
            }
        };
        tx.commit()?;
        info!(category, %limit, month, year, ?change, "saved budget");
        Ok(change)
    }

    pub(crate) fn get_budget(
        &self,
        category: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>> {
        match find_category_id(&self.conn, category)? {
            Some(category_id) => budget_for(&self.conn, category_id, month, year),
            None => Ok(None),
        }
    }

    /// `None` when the category has no budget for that month.
    pub(crate) fn get_budget_status(
        &self,
        category: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<BudgetStatus>> {
        let Some(budget) = self.get_budget(category, month, year)? else {
            return Ok(None);
        };
        let spent = self.get_category_spending(budget.category_id, month, year)?;
        Ok(Some(BudgetStatus::new(budget.limit_amount, spent)))
    }
}

// Helpers taking a bare connection so they also run inside a `rusqlite::Transaction`.

fn find_category_id(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let result = conn.query_row(
        "SELECT id FROM categories WHERE name = ?1",
        params![name],
        |row| row.get(0),
    );
    match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Id of the named category, inserting it on first use.
fn category_id(conn: &Connection, name: &str) -> Result<i64> {
    if let Some(id) = find_category_id(conn, name)? {
        return Ok(id);
    }
    conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();
    info!(category = name, id, "created category");
    Ok(id)
}

fn budget_for(
    conn: &Connection,
    category_id: i64,
    month: u32,
    year: i32,
) -> Result<Option<Budget>> {
    let result = conn.query_row(
        "SELECT id, category_id, month, year, limit_amount FROM budgets
         WHERE category_id = ?1 AND month = ?2 AND year = ?3",
        params![category_id, month, year],
        |row| {
            Ok(Budget {
                id: Some(row.get(0)?),
                category_id: row.get(1)?,
                month: row.get(2)?,
                year: row.get(3)?,
                limit_amount: decimal_column(row, 4)?,
            })
        },
    );
    match result {
        Ok(b) => Ok(Some(b)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// LIKE pattern matching every stored timestamp in the given month.
fn month_pattern(month: u32, year: i32) -> String {
    format!("{year:04}-{month:02}-%")
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: decimal_column(row, 1)?,
        kind: kind_column(row, 2)?,
        category: row.get(3)?,
        date: date_column(row, 4)?,
        description: row.get(5)?,
    })
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| conversion_error(idx, format!("invalid amount '{text}': {e}")))
}

fn kind_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<TransactionType> {
    let text: String = row.get(idx)?;
    TransactionType::parse(&text)
        .ok_or_else(|| conversion_error(idx, format!("unknown transaction type '{text}'")))
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&text, DATE_TIME_FORMAT)
        .map_err(|e| conversion_error(idx, format!("invalid date '{text}': {e}")))
}
