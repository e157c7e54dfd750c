use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::parse_statement_date;
use crate::money::{parse_amount, StatementAmount};

/// `bankName` when no profile signature matched.
pub const UNKNOWN_BANK: &str = "Unknown Bank";

/// Placeholder for a date or card suffix that was not found.
pub const NOT_AVAILABLE: &str = "N/A";

/// Degraded-mode balance used when no balance line matched. This is not an
/// extracted value; check [`ExtractedStatement::is_balance_simulated`].
pub const SIMULATED_BALANCE: &str = "₹ 15,000.00 (Simulated)";

/// One row of the statement's transaction table, kept as the strings that
/// appeared in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    /// Signed amount with currency marker, thousands separators removed.
    pub amount: String,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_statement_date(&self.date)
    }

    pub fn parsed_amount(&self) -> Option<StatementAmount> {
        parse_amount(&self.amount)
    }
}

/// Everything the engine pulled out of one statement.
///
/// Every scalar field always holds either an extracted value or its sentinel
/// ([`UNKNOWN_BANK`], [`NOT_AVAILABLE`], [`SIMULATED_BALANCE`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedStatement {
    pub bank_name: String,
    pub statement_date: String,
    pub payment_due_date: String,
    pub total_new_balance: String,
    pub card_last4_digits: String,
    pub transactions: Vec<Transaction>,
}

impl ExtractedStatement {
    pub fn is_bank_known(&self) -> bool {
        self.bank_name != UNKNOWN_BANK
    }

    pub fn is_balance_simulated(&self) -> bool {
        self.total_new_balance == SIMULATED_BALANCE
    }

    pub fn statement_date(&self) -> Option<NaiveDate> {
        parse_statement_date(&self.statement_date)
    }

    pub fn payment_due_date(&self) -> Option<NaiveDate> {
        parse_statement_date(&self.payment_due_date)
    }

    pub fn card_last4(&self) -> Option<&str> {
        (self.card_last4_digits != NOT_AVAILABLE).then_some(self.card_last4_digits.as_str())
    }

    /// The balance as a number, or `None` when it is the simulated placeholder.
    pub fn balance_amount(&self) -> Option<StatementAmount> {
        if self.is_balance_simulated() {
            return None;
        }
        parse_amount(&self.total_new_balance)
    }

    /// Sum of all transaction amounts. `None` if any row fails to parse or
    /// the sum overflows.
    pub fn transactions_total(&self) -> Option<Decimal> {
        self.transactions
            .iter()
            .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.parsed_amount()?.value))
    }
}
