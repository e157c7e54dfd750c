use regex::Regex;

use ledgerlens_core::{NOT_AVAILABLE, SIMULATED_BALANCE};

use crate::profile::FieldRules;

/// Scalar fields of a statement. Each one is either the matched text or its
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFields {
    pub statement_date: String,
    pub payment_due_date: String,
    pub total_new_balance: String,
    pub card_last4_digits: String,
}

pub struct FieldExtractor;

impl FieldExtractor {
    /// Apply a profile's field rules to raw statement text.
    pub fn extract(text: &str, rules: &FieldRules) -> StatementFields {
        StatementFields {
            statement_date: Self::extract_date(text, &rules.statement_date),
            payment_due_date: Self::extract_date(text, &rules.payment_due_date),
            total_new_balance: Self::extract_balance(text, &rules.balance),
            card_last4_digits: Self::extract_card_suffix(text, &rules.card_suffix),
        }
    }

    // ── Dates ─────────────────────────────────────────────────────────────────

    /// Dates are reported exactly as printed; no reformatting.
    fn extract_date(text: &str, rule: &Regex) -> String {
        first_capture(rule, text)
            .map(str::to_string)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    // ── Balance ───────────────────────────────────────────────────────────────

    fn extract_balance(text: &str, rule: &Regex) -> String {
        match first_capture(rule, text).map(str::trim).filter(|s| !s.is_empty()) {
            Some(amount) => amount.to_string(),
            None => {
                tracing::warn!("no balance line matched; reporting simulated balance");
                SIMULATED_BALANCE.to_string()
            }
        }
    }

    // ── Card suffix ───────────────────────────────────────────────────────────

    fn extract_card_suffix(text: &str, rule: &Regex) -> String {
        first_capture(rule, text)
            .filter(|s| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()))
            .map(str::to_string)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

fn first_capture<'t>(rule: &Regex, text: &'t str) -> Option<&'t str> {
    rule.captures(text)?.get(1).map(|m| m.as_str())
}
