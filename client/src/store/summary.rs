//! Dashboard totals.

use shared::{Transaction, TransactionType};

/// Credits count as income, debits as expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    pub count: usize,
}

impl TransactionSummary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = Self::default();
        for tx in items {
            match tx.kind {
                TransactionType::Credit => summary.total_income += tx.amount,
                TransactionType::Debit => summary.total_expenses += tx.amount,
            }
            summary.count += 1;
        }
        summary.net_balance = summary.total_income - summary.total_expenses;
        summary
    }
}
