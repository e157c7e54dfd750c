use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency markers recognised in statement text, longest first so that
/// `Rs.` wins over `Rs`.
const CURRENCY_MARKERS: &[&str] = &["INR", "Rs.", "Rs", "₹", "$", "€", "£"];

/// A statement amount string broken into its currency marker and signed value.
///
/// The displayed string is never rebuilt from this type; it exists so callers
/// can do arithmetic on values the extractor keeps verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementAmount {
    pub currency: Option<String>,
    pub value: Decimal,
}

impl StatementAmount {
    pub fn is_debit(&self) -> bool {
        self.value.is_sign_negative()
    }
}

impl fmt::Display for StatementAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.currency {
            Some(c) => write!(f, "{c}{:.2}", self.value),
            None => write!(f, "{:.2}", self.value),
        }
    }
}

/// Parse an amount as it appears on a statement: `₹ 12,345.67`, `-₹ 5,000.00`,
/// `₹-849.00`, `Rs. 1,00,000.00`, `(75.25)`.
///
/// The sign may sit before or after the currency marker. Accounting
/// parentheses and a trailing `Cr` mark a negative value.
pub fn parse_amount(s: &str) -> Option<StatementAmount> {
    let mut s = s.trim();
    let mut negative = false;

    if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
        negative = true;
        s = s[1..s.len() - 1].trim();
    }
    if let Some(rest) = strip_suffix_ignore_case(s, "cr") {
        negative = !negative;
        s = rest.trim_end();
    }
    if let Some(rest) = s.strip_prefix('-') {
        negative = !negative;
        s = rest.trim_start();
    }

    let mut currency = None;
    for marker in CURRENCY_MARKERS {
        if let Some(rest) = s.strip_prefix(marker) {
            currency = Some((*marker).to_string());
            s = rest.trim_start();
            break;
        }
    }

    if currency.is_some() {
        if let Some(rest) = s.strip_prefix('-') {
            negative = !negative;
            s = rest.trim_start();
        }
    }

    let digits = s.replace(',', "");
    if digits.is_empty() || !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let mut value = Decimal::from_str(&digits).ok()?;
    if negative {
        value = -value;
    }
    Some(StatementAmount { currency, value })
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = s.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Remove thousands separators from an amount string, keeping every other
/// character (sign, currency marker, inner spacing) in place.
pub fn strip_thousands_separators(s: &str) -> String {
    s.trim().replace(',', "")
}
