mod budget;
mod category;
mod summary;
mod transaction;

pub use budget::{Budget, BudgetChange, BudgetStatus, Standing};
pub use category::Category;
pub use summary::MonthlySummary;
pub use transaction::{Transaction, TransactionType, TransactionUpdate, DATE_TIME_FORMAT};
