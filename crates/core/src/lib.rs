pub mod date;
pub mod error;
pub mod money;
pub mod statement;

pub use date::parse_statement_date;
pub use error::ExtractError;
pub use money::{parse_amount, strip_thousands_separators, StatementAmount};
pub use statement::{
    ExtractedStatement, Transaction, NOT_AVAILABLE, SIMULATED_BALANCE, UNKNOWN_BANK,
};
