use std::sync::Arc;

use ledgerlens_core::{ExtractError, ExtractedStatement};

use crate::fields::FieldExtractor;
use crate::identify::identify;
use crate::registry::ProfileRegistry;
use crate::transactions::TransactionParser;

/// Turns statement text into an [`ExtractedStatement`].
///
/// Holds nothing but a shared, read-only registry, so one engine can serve
/// any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct StatementEngine {
    registry: Arc<ProfileRegistry>,
}

impl StatementEngine {
    pub fn new(registry: Arc<ProfileRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// identify → field rules → transaction grammar → record.
    ///
    /// Fails only for empty or whitespace-only text.
    pub fn extract(&self, text: &str) -> Result<ExtractedStatement, ExtractError> {
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyInput);
        }

        let id = identify(&self.registry, text);
        let profile = id.profile;
        let fields = FieldExtractor::extract(text, profile.rules());
        let transactions = TransactionParser::parse(text, profile.transaction_grammar());

        let statement = ExtractedStatement {
            bank_name: id.bank_name().to_string(),
            statement_date: fields.statement_date,
            payment_due_date: fields.payment_due_date,
            total_new_balance: fields.total_new_balance,
            card_last4_digits: fields.card_last4_digits,
            transactions,
        };

        tracing::debug!(
            profile = profile.id(),
            matched = id.matched,
            transactions = statement.transactions.len(),
            balance_simulated = statement.is_balance_simulated(),
            "statement extracted"
        );

        Ok(statement)
    }
}

impl Default for StatementEngine {
    fn default() -> Self {
        Self::new(ProfileRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlens_core::{Transaction, NOT_AVAILABLE, SIMULATED_BALANCE, UNKNOWN_BANK};

    const HDFC_STATEMENT: &str = "\
HDFC Bank Credit Card Statement
Card Number: XXXX-XXXX-XXXX-4321
Statement Date: 05/10/2024
Payment Due Date: 25/10/2024
Total New Balance: ₹ 12,345.67

Date        Description               Amount
01/10/2024  Amazon IN Purchase        ₹849.00
02/10/2024  Monthly Subscription      ₹299.00
05/10/2024  Credit Card Payment       -₹ 5,000.00
Page 1 of 1
";

    #[test]
    fn full_statement() {
        let s = StatementEngine::default().extract(HDFC_STATEMENT).unwrap();
        assert_eq!(s.bank_name, "HDFC Bank");
        assert_eq!(s.statement_date, "05/10/2024");
        assert_eq!(s.payment_due_date, "25/10/2024");
        assert_eq!(s.total_new_balance, "₹ 12,345.67");
        assert_eq!(s.card_last4_digits, "4321");
        assert_eq!(
            s.transactions,
            vec![
                Transaction::new("01/10/2024", "Amazon IN Purchase", "₹849.00"),
                Transaction::new("02/10/2024", "Monthly Subscription", "₹299.00"),
                Transaction::new("05/10/2024", "Credit Card Payment", "-₹ 5000.00"),
            ]
        );
    }

    #[test]
    fn wide_currency_gaps_from_pdf_text() {
        let text = "HDFC Bank\n05/10/2024 Credit Card Payment -₹  5,000.00\nTotal New Balance: ₹  12,345.67";
        let s = StatementEngine::default().extract(text).unwrap();
        assert_eq!(
            s.transactions,
            vec![Transaction::new("05/10/2024", "Credit Card Payment", "-₹  5000.00")]
        );
        assert_eq!(s.total_new_balance, "₹  12,345.67");
        assert!(!s.is_balance_simulated());
    }

    #[test]
    fn empty_and_whitespace_input_is_error() {
        let engine = StatementEngine::default();
        assert_eq!(engine.extract(""), Err(ExtractError::EmptyInput));
        assert_eq!(engine.extract("  \n\t \r\n"), Err(ExtractError::EmptyInput));
    }

    #[test]
    fn partial_extraction_is_still_a_full_record() {
        let s = StatementEngine::default()
            .extract("Closing Balance: ₹ 980.00")
            .unwrap();
        assert_eq!(s.bank_name, UNKNOWN_BANK);
        assert_eq!(s.total_new_balance, "₹ 980.00");
        assert_eq!(s.statement_date, NOT_AVAILABLE);
        assert_eq!(s.payment_due_date, NOT_AVAILABLE);
        assert_eq!(s.card_last4_digits, NOT_AVAILABLE);
        assert!(s.transactions.is_empty());
    }

    #[test]
    fn unknown_bank_uses_generic_rules() {
        let text = "Acme Credit Union\nBill Date 03/09/2024\nTotal Amount Due ₹ 1,500.00\n3-9-24 Fuel ₹1,500.00";
        let s = StatementEngine::default().extract(text).unwrap();
        assert_eq!(s.bank_name, UNKNOWN_BANK);
        assert_eq!(s.statement_date, "03/09/2024");
        assert_eq!(s.total_new_balance, "₹ 1,500.00");
        assert_eq!(s.transactions, vec![Transaction::new("3-9-24", "Fuel", "₹1500.00")]);
    }

    #[test]
    fn no_balance_reports_simulated_value() {
        let s = StatementEngine::default().extract("ICICI Bank\nhello").unwrap();
        assert_eq!(s.bank_name, "ICICI Bank");
        assert_eq!(s.total_new_balance, SIMULATED_BALANCE);
        assert!(s.is_balance_simulated());
    }

    #[test]
    fn extraction_is_idempotent() {
        let engine = StatementEngine::default();
        let a = serde_json::to_string(&engine.extract(HDFC_STATEMENT).unwrap()).unwrap();
        let b = serde_json::to_string(&engine.extract(HDFC_STATEMENT).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn custom_registry_is_used() {
        let reg = ProfileRegistry::from_toml(
            "[[profiles]]\nid = \"axis\"\nlabel = \"Axis Bank\"\nsignature = 'Axis\\s+Bank'",
        )
        .unwrap();
        let engine = StatementEngine::new(Arc::new(reg));
        let s = engine.extract("AXIS BANK\nStatement Date: 01/01/2025").unwrap();
        assert_eq!(s.bank_name, "Axis Bank");
        assert_eq!(s.statement_date, "01/01/2025");
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        let engine = StatementEngine::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || engine.extract(HDFC_STATEMENT).unwrap())
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
