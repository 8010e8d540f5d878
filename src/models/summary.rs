use rust_decimal::Decimal;

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

impl MonthlySummary {
    pub fn new(income: Decimal, expenses: Decimal) -> Self {
        Self {
            income,
            expenses,
            net: income - expenses,
        }
    }
}
