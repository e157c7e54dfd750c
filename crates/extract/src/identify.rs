use crate::profile::Profile;
use crate::registry::ProfileRegistry;

/// Which profile claimed a statement.
#[derive(Debug, Clone, Copy)]
pub struct Identification<'r> {
    pub profile: &'r Profile,
    /// `false` when no signature matched and the fallback was chosen.
    pub matched: bool,
}

impl<'r> Identification<'r> {
    /// The `bankName` to report: the profile label, or "Unknown Bank" for the
    /// fallback.
    pub fn bank_name(&self) -> &'r str {
        self.profile.label()
    }
}

/// Try each bank profile in registry order; the first signature found in
/// `text` wins. Falls back to the generic profile.
pub fn identify<'r>(registry: &'r ProfileRegistry, text: &str) -> Identification<'r> {
    registry
        .all()
        .find(|(_, profile)| profile.matches(text))
        .map(|(_, profile)| Identification { profile, matched: true })
        .unwrap_or_else(|| Identification {
            profile: registry.fallback(),
            matched: false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileDef;
    use ledgerlens_core::UNKNOWN_BANK;

    fn bank_for(text: &str) -> String {
        let reg = ProfileRegistry::builtin();
        identify(&reg, text).bank_name().to_string()
    }

    #[test]
    fn identifies_each_builtin_bank() {
        let cases = [
            ("ICICI Bank Credit Card Statement", "ICICI Bank"),
            ("HDFC Bank Ltd. Statement of Account", "HDFC Bank"),
            ("J&K Bank Credit Card", "J&K Bank"),
            ("The Jammu and Kashmir Bank Ltd", "J&K Bank"),
            ("State Bank of India - SBI Card", "State Bank of India"),
            ("Punjab National Bank e-Statement", "Punjab National Bank"),
            ("Bank of India Star Card", "Bank of India"),
        ];
        for (text, expected) in cases {
            assert_eq!(bank_for(text), expected, "text: {text}");
        }
    }

    #[test]
    fn longer_institution_name_wins_over_substring() {
        // "Bank of India" occurs inside "State Bank of India".
        assert_eq!(bank_for("Issued by State Bank of India"), "State Bank of India");
    }

    #[test]
    fn match_is_case_insensitive() {
        assert_eq!(bank_for("welcome to icici bank"), "ICICI Bank");
        assert_eq!(bank_for("J & K BANK"), "J&K Bank");
    }

    #[test]
    fn unknown_text_uses_fallback() {
        let reg = ProfileRegistry::builtin();
        let id = identify(&reg, "Some Credit Union\nStatement Date: 01/10/2024");
        assert!(!id.matched);
        assert!(id.profile.is_generic());
        assert_eq!(id.bank_name(), UNKNOWN_BANK);
    }

    #[test]
    fn identification_is_deterministic() {
        let text = "HDFC Bank statement, payments via ICICI Bank netbanking";
        let first = bank_for(text);
        for _ in 0..10 {
            assert_eq!(bank_for(text), first);
        }
    }

    #[test]
    fn custom_registry_profile_is_found() {
        let reg = ProfileRegistry::new(vec![ProfileDef::new("axis", "Axis Bank", r"\bAxis\s+Bank\b")])
            .unwrap();
        let id = identify(&reg, "AXIS BANK credit card");
        assert!(id.matched);
        assert_eq!(id.bank_name(), "Axis Bank");
        // Built-ins are not part of a registry built from explicit defs.
        assert_eq!(identify(&reg, "HDFC Bank").bank_name(), UNKNOWN_BANK);
    }
}
