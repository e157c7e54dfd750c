use regex::Regex;

use ledgerlens_core::{strip_thousands_separators, Transaction};

pub struct TransactionParser;

impl TransactionParser {
    /// Parse every line of `text` that matches `grammar`, in input order.
    ///
    /// `grammar` captures date, description and amount in groups 1-3. Lines
    /// that do not match (headers, totals, footers) are skipped.
    pub fn parse(text: &str, grammar: &Regex) -> Vec<Transaction> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| Self::parse_line(line, grammar))
            .collect()
    }

    pub fn parse_line(line: &str, grammar: &Regex) -> Option<Transaction> {
        let caps = grammar.captures(line)?;
        let date = caps.get(1)?.as_str();
        let description = caps.get(2)?.as_str().trim();
        let amount = strip_thousands_separators(caps.get(3)?.as_str());
        if description.is_empty() {
            return None;
        }
        Some(Transaction::new(date, description, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Profile, ProfileDef};

    fn grammar() -> Regex {
        Profile::compile(&ProfileDef::new("test", "Test Bank", "Test Bank"))
            .unwrap()
            .transaction_grammar()
            .clone()
    }

    #[test]
    fn parses_single_row() {
        let txns = TransactionParser::parse("01/10/2024 Amazon IN Purchase ₹849.00", &grammar());
        assert_eq!(
            txns,
            vec![Transaction::new("01/10/2024", "Amazon IN Purchase", "₹849.00")]
        );
    }

    #[test]
    fn strips_thousands_separators_but_keeps_sign_and_symbol() {
        let txns =
            TransactionParser::parse("05/10/2024   Credit Card Payment   -₹ 5,000.00", &grammar());
        assert_eq!(txns[0].description, "Credit Card Payment");
        assert_eq!(txns[0].amount, "-₹ 5000.00");
    }

    #[test]
    fn wide_gap_after_currency_keeps_debit_sign() {
        let text = "05/10/2024 Credit Card Payment -₹  5,000.00\n06/10/2024 Refund ₹ \t120.00";
        let txns = TransactionParser::parse(text, &grammar());
        assert_eq!(
            txns,
            vec![
                Transaction::new("05/10/2024", "Credit Card Payment", "-₹  5000.00"),
                Transaction::new("06/10/2024", "Refund", "₹ \t120.00"),
            ]
        );
        assert!(txns[0].parsed_amount().unwrap().is_debit());
    }

    #[test]
    fn indian_digit_grouping() {
        let txns = TransactionParser::parse("12/10/2024 Rent Transfer ₹1,25,000.00", &grammar());
        assert_eq!(txns[0].amount, "₹125000.00");
    }

    #[test]
    fn skips_headers_footers_and_blank_lines() {
        let text = "
            TRANSACTION DETAILS
            Date        Description               Amount

            01/10/2024  Amazon IN Purchase        ₹849.00
            Page 1 of 2
            02/10/2024  Monthly Subscription      ₹299.00
            Total                                 ₹1,148.00
        ";
        let txns = TransactionParser::parse(text, &grammar());
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].description, "Amazon IN Purchase");
        assert_eq!(txns[1].description, "Monthly Subscription");
        assert_eq!(txns[1].amount, "₹299.00");
    }

    #[test]
    fn preserves_input_order_and_duplicates() {
        let text = "03/10/2024 Coffee ₹120.00\n01/10/2024 Coffee ₹120.00\n03/10/2024 Coffee ₹120.00";
        let txns = TransactionParser::parse(text, &grammar());
        let dates: Vec<_> = txns.iter().map(|t| t.date.as_str()).collect();
        assert_eq!(dates, ["03/10/2024", "01/10/2024", "03/10/2024"]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let text = "01/10/2024 Fuel Surcharge $12.00\r\n02/10/2024 Cashback -$3.00\r\n";
        let txns = TransactionParser::parse(text, &grammar());
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].amount, "-$3.00");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let text = "1/10/2024 Short date ₹10.00\n01/10/2024 No decimals ₹10\n01/10/2024 ₹10.00";
        assert!(TransactionParser::parse(text, &grammar()).is_empty());
    }

    #[test]
    fn no_matching_lines_is_empty_not_error() {
        assert!(TransactionParser::parse("", &grammar()).is_empty());
        assert!(TransactionParser::parse("Nothing to see here\n", &grammar()).is_empty());
    }

    #[test]
    fn generic_grammar_accepts_dash_dates() {
        let g = Profile::generic().unwrap().transaction_grammar().clone();
        let txns = TransactionParser::parse("1-10-24 Grocery Store Rs. 450.00", &g);
        assert_eq!(txns, vec![Transaction::new("1-10-24", "Grocery Store", "Rs. 450.00")]);
    }
}
