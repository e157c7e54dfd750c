use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use ledgerlens_core::UNKNOWN_BANK;

use crate::registry::RegistryError;

/// Reserved id of the fallback profile.
pub const GENERIC_PROFILE_ID: &str = "generic";

// ── Standard rule sources ────────────────────────────────────────────────────
//
// Every rule yields its value in capture group 1. The transaction grammar
// yields date, description and amount in groups 1-3.

const DATE: &str = r"(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})";
// Blanks between sign, marker and digits stay on the same line.
const AMOUNT: &str = r"(-?[ \t]*(?:[₹$€£]|Rs\.?|INR)?[ \t]*-?[ \t]*(?:\d{1,3}(?:,\d{2,3})+|\d+)\.\d{2})";

fn standard_statement_date() -> String {
    format!(r"Statement\s+Date\s*:\s*{DATE}")
}

fn standard_payment_due_date() -> String {
    format!(r"Payment\s+Due\s+Date\s*:\s*{DATE}")
}

fn standard_balance() -> String {
    format!(r"(?:Total\s+New\s+Balance|Closing\s+Balance)\s*:\s*{AMOUNT}(?:\D|$)")
}

fn standard_card_suffix() -> String {
    // Space-separated mask groups are skipped so the suffix is the last group.
    r"Card\s+Number\s*:\s*(?:[X*\d-]+[ \t]+)*[X*\d-]*(\d{4})\b".to_string()
}

fn standard_transaction_grammar() -> String {
    format!(r"^(\d{{2}}/\d{{2}}/\d{{4}})\s+(.+?)\s+{AMOUNT}$")
}

// The fallback profile knows nothing about the layout, so its labels are
// looser: optional colon, more label spellings, spaced card masks.

fn generic_statement_date() -> String {
    format!(r"(?:Statement\s+(?:Generation\s+)?Date|Bill\s+Date)\s*:?\s*{DATE}")
}

fn generic_payment_due_date() -> String {
    format!(r"(?:Payment\s+)?Due\s+Date\s*:?\s*{DATE}")
}

fn generic_balance() -> String {
    format!(r"(?:Total\s+New\s+Balance|Closing\s+Balance|Total\s+Amount\s+Due)\s*:?\s*{AMOUNT}(?:\D|$)")
}

fn generic_card_suffix() -> String {
    r"Card\s+(?:Number|No\.?)\s*:?\s*[X*\d\- ]*(\d{4})\b".to_string()
}

fn generic_transaction_grammar() -> String {
    format!(r"^(\d{{1,2}}[/-]\d{{1,2}}[/-]\d{{2,4}})\s+(.+?)\s+{AMOUNT}$")
}

// ── Definitions ──────────────────────────────────────────────────────────────

/// Uncompiled profile as written in the built-in table or a TOML file.
///
/// Omitted rules use the standard label-anchored patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDef {
    pub id: String,
    pub label: String,
    pub signature: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub statement_date: Option<String>,
    #[serde(default)]
    pub payment_due_date: Option<String>,
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default)]
    pub card_suffix: Option<String>,
    #[serde(default)]
    pub transaction_grammar: Option<String>,
}

impl ProfileDef {
    pub fn new(id: &str, label: &str, signature: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            signature: signature.to_string(),
            priority: 0,
            statement_date: None,
            payment_due_date: None,
            balance: None,
            card_suffix: None,
            transaction_grammar: None,
        }
    }
}

/// Statements the service knows out of the box.
pub fn builtin_defs() -> Vec<ProfileDef> {
    vec![
        ProfileDef::new("icici", "ICICI Bank", r"\bICICI\s+Bank\b"),
        ProfileDef::new("hdfc", "HDFC Bank", r"\bHDFC\s+Bank\b"),
        ProfileDef::new(
            "jk",
            "J&K Bank",
            r"\bJ\s*&\s*K\s+Bank\b|\bJammu\s+(?:&|and)\s+Kashmir\s+Bank\b",
        ),
        ProfileDef::new(
            "sbi",
            "State Bank of India",
            r"\bState\s+Bank\s+of\s+India\b|\bSBI\s+Card\b",
        ),
        ProfileDef::new(
            "pnb",
            "Punjab National Bank",
            r"\bPunjab\s+National\s+Bank\b|\bPNB\b",
        ),
        ProfileDef::new("boi", "Bank of India", r"\bBank\s+of\s+India\b"),
    ]
}

// ── Compiled profiles ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FieldRules {
    pub statement_date: Regex,
    pub payment_due_date: Regex,
    pub balance: Regex,
    pub card_suffix: Regex,
}

#[derive(Debug, Clone)]
pub enum ProfileKind {
    /// A bank layout recognised by its signature.
    Bank { signature: Regex },
    /// Catch-all used when no signature matched. Always last.
    Generic,
}

#[derive(Debug, Clone)]
pub struct Profile {
    id: String,
    label: String,
    priority: i32,
    kind: ProfileKind,
    rules: FieldRules,
    transaction_grammar: Regex,
}

impl Profile {
    pub fn compile(def: &ProfileDef) -> Result<Self, RegistryError> {
        if def.id == GENERIC_PROFILE_ID {
            return Err(RegistryError::ReservedId(def.id.clone()));
        }
        let rule = |field: &'static str, custom: &Option<String>, standard: fn() -> String| {
            let source = custom.clone().unwrap_or_else(standard);
            compile_rule(&def.id, field, &source)
        };

        Ok(Self {
            id: def.id.clone(),
            label: def.label.clone(),
            priority: def.priority,
            kind: ProfileKind::Bank {
                signature: compile_rule(&def.id, "signature", &def.signature)?,
            },
            rules: FieldRules {
                statement_date: rule("statement_date", &def.statement_date, standard_statement_date)?,
                payment_due_date: rule(
                    "payment_due_date",
                    &def.payment_due_date,
                    standard_payment_due_date,
                )?,
                balance: rule("balance", &def.balance, standard_balance)?,
                card_suffix: rule("card_suffix", &def.card_suffix, standard_card_suffix)?,
            },
            transaction_grammar: rule(
                "transaction_grammar",
                &def.transaction_grammar,
                standard_transaction_grammar,
            )?,
        })
    }

    /// The fallback profile: no signature, permissive rules.
    pub fn generic() -> Result<Self, RegistryError> {
        let id = GENERIC_PROFILE_ID;
        Ok(Self {
            id: id.to_string(),
            label: UNKNOWN_BANK.to_string(),
            priority: i32::MIN,
            kind: ProfileKind::Generic,
            rules: FieldRules {
                statement_date: compile_rule(id, "statement_date", &generic_statement_date())?,
                payment_due_date: compile_rule(id, "payment_due_date", &generic_payment_due_date())?,
                balance: compile_rule(id, "balance", &generic_balance())?,
                card_suffix: compile_rule(id, "card_suffix", &generic_card_suffix())?,
            },
            transaction_grammar: compile_rule(
                id,
                "transaction_grammar",
                &generic_transaction_grammar(),
            )?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Canonical bank name reported as `bankName`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn kind(&self) -> &ProfileKind {
        &self.kind
    }

    pub fn is_generic(&self) -> bool {
        matches!(self.kind, ProfileKind::Generic)
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    pub fn transaction_grammar(&self) -> &Regex {
        &self.transaction_grammar
    }

    /// Whether this profile's signature occurs in `text`. The generic profile
    /// never claims text on its own.
    pub fn matches(&self, text: &str) -> bool {
        match &self.kind {
            ProfileKind::Bank { signature } => signature.is_match(text),
            ProfileKind::Generic => false,
        }
    }
}

/// Capture groups a rule must define: the value in group 1, or date,
/// description and amount in groups 1-3 for the transaction grammar.
fn groups_required(field: &str) -> usize {
    match field {
        "transaction_grammar" => 3,
        "signature" => 0,
        _ => 1,
    }
}

/// All rules are case-insensitive no matter how the source was written.
fn compile_rule(profile: &str, field: &'static str, source: &str) -> Result<Regex, RegistryError> {
    let regex = RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| RegistryError::InvalidPattern {
            profile: profile.to_string(),
            field,
            source: e,
        })?;
    // `captures_len` counts the implicit whole-match group.
    let groups = groups_required(field);
    let found = regex.captures_len() - 1;
    if found < groups {
        return Err(RegistryError::MissingCaptureGroup {
            profile: profile.to_string(),
            field,
            expected: groups,
            found,
        });
    }
    Ok(regex)
}
