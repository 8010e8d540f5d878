use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Option<i64>,
    pub category_id: i64,
    /// 1-12
    pub month: u32,
    pub year: i32,
    pub limit_amount: Decimal,
}

impl Budget {
    pub fn new(category_id: i64, month: u32, year: i32, limit_amount: Decimal) -> Self {
        Self {
            id: None,
            category_id,
            month,
            year,
            limit_amount,
        }
    }
}

/// Outcome of setting a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetChange {
    Created,
    Updated,
}

/// Spending against a budget for one category and month.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Standing {
    Within,
    Reached,
    Exceeded(Decimal),
}

impl BudgetStatus {
    pub fn new(limit: Decimal, spent: Decimal) -> Self {
        Self {
            limit,
            spent,
            remaining: limit - spent,
        }
    }

    pub fn standing(&self) -> Standing {
        if self.remaining < Decimal::ZERO {
            Standing::Exceeded(self.remaining.abs())
        } else if self.remaining == Decimal::ZERO {
            Standing::Reached
        } else {
            Standing::Within
        }
    }
}
