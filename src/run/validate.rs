//! Checks applied to command-line input before anything touches the database.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TransactionUpdate;

#[derive(Error, Debug, PartialEq)]
pub(crate) enum ValidationError {
    #[error("Amount must be a positive number.")]
    NonPositiveAmount,

    #[error("Month must be between 1 and 12.")]
    MonthOutOfRange,

    #[error("Category name must not be empty.")]
    EmptyCategory,

    #[error("Budget limit must not be negative.")]
    NegativeLimit,

    #[error(
        "At least one field (--amount, --type, --category, or --desc) must be provided to update."
    )]
    NothingToUpdate,
}

pub(crate) fn amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount)
}

pub(crate) fn month(month: u32) -> Result<u32, ValidationError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::MonthOutOfRange);
    }
    Ok(month)
}

/// Trims surrounding whitespace; a blank name is rejected.
pub(crate) fn category(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    Ok(name)
}

pub(crate) fn budget_limit(limit: Decimal) -> Result<Decimal, ValidationError> {
    if limit < Decimal::ZERO {
        return Err(ValidationError::NegativeLimit);
    }
    Ok(limit)
}

/// Drops blank text fields, then requires at least one field to remain.
/// A supplied amount must still be positive.
pub(crate) fn update(update: TransactionUpdate) -> Result<TransactionUpdate, ValidationError> {
    let update = TransactionUpdate {
        amount: update.amount.map(amount).transpose()?,
        kind: update.kind,
        category: non_blank(update.category),
        description: non_blank(update.description),
    };
    if update.is_empty() {
        return Err(ValidationError::NothingToUpdate);
    }
    Ok(update)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
