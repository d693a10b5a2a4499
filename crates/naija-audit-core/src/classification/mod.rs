//! Account classifier: trial-balance lines to a canonical chart of accounts.
//!
//! Names are normalized and run through an ordered rule list; the first
//! matching rule wins. Lines no rule recognises land in the `other` section
//! and are listed for review instead of failing the request.

pub mod rules;
pub mod statement;
pub mod taxonomy;
pub mod trial_balance;

use tracing::debug;

pub use rules::{default_rules, normalize_account_name, ClassificationRule, Matcher};
pub use statement::{ClassifiedLine, ClassifiedStatement, LeadScheduleRow, SectionTotals};
pub use taxonomy::{AccountCategory, Section};
pub use trial_balance::{RawEntry, RawTrialBalance, TrialBalance, TrialBalanceEntry};

use crate::AuditResult;

#[derive(Debug, Clone)]
pub struct AccountClassifier {
    rules: Vec<ClassificationRule>,
}

impl Default for AccountClassifier {
    fn default() -> Self {
        Self::with_rules(default_rules())
    }
}

impl AccountClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier over a caller-supplied rule list, evaluated in order.
    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn classify(&self, trial_balance: &TrialBalance) -> ClassifiedStatement {
        let lines = trial_balance
            .entries()
            .iter()
            .map(|entry| self.classify_entry(entry))
            .collect();
        ClassifiedStatement::from_lines(lines)
    }

    fn classify_entry(&self, entry: &TrialBalanceEntry) -> ClassifiedLine {
        let normalized_name = normalize_account_name(&entry.account_name);
        let words: Vec<&str> = normalized_name.split(' ').filter(|w| !w.is_empty()).collect();

        let matched = self.rules.iter().find(|rule| rule.matcher.matches(&words));
        let (category, rule_id) = match matched {
            Some(rule) => (rule.category, Some(rule.id.to_string())),
            None => {
                debug!(account = %entry.account_name, "no classification rule matched");
                (AccountCategory::Unclassified, None)
            }
        };

        ClassifiedLine {
            account_name: entry.account_name.clone(),
            amount: entry.amount,
            category,
            section: category.section(),
            rule_id,
            normalized_name,
        }
    }
}

/// Classify a validated trial balance with the default Nigerian rules.
pub fn classify(trial_balance: &TrialBalance) -> ClassifiedStatement {
    AccountClassifier::default().classify(trial_balance)
}

/// Validate a raw submission and classify it.
pub fn classify_raw(raw: &RawTrialBalance) -> AuditResult<ClassifiedStatement> {
    let trial_balance = raw.parse()?;
    Ok(classify(&trial_balance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_classify_scenario_balances() {
        let tb = TrialBalance::from_entries([
            ("Cash", dec!(5_000_000)),
            ("Accounts Receivable", dec!(12_000_000)),
            ("Accounts Payable", dec!(4_500_000)),
        ])
        .unwrap();
        let stmt = classify(&tb);
        assert_eq!(stmt.total(Section::CurrentAssets), dec!(17_000_000));
        assert_eq!(stmt.total(Section::CurrentLiabilities), dec!(4_500_000));
        assert!(stmt.unclassified().is_empty());
        assert_eq!(stmt.lines()[0].rule_id.as_deref(), Some("ca.cash"));
    }

    #[test]
    fn test_unclassified_goes_to_other_and_is_flagged() {
        let tb = TrialBalance::from_entries([("Suspense Account", dec!(-42.50))]).unwrap();
        let stmt = classify(&tb);
        assert_eq!(stmt.total(Section::Other), dec!(-42.50));
        assert_eq!(stmt.unclassified(), &["Suspense Account".to_string()]);
        assert_eq!(stmt.lines()[0].category, AccountCategory::Unclassified);
        assert_eq!(stmt.lines()[0].rule_id, None);
    }

    #[test]
    fn test_empty_trial_balance_gives_empty_statement() {
        let stmt = classify(&TrialBalance::new());
        assert!(stmt.is_empty());
        assert_eq!(stmt.totals().sum_all(), Decimal::ZERO);
    }

    #[test]
    fn test_custom_rule_list_is_respected() {
        let classifier = AccountClassifier::with_rules(vec![ClassificationRule {
            id: "custom.suspense",
            category: AccountCategory::OtherCurrentAssets,
            matcher: Matcher::Phrases(&["suspense"]),
        }]);
        let tb = TrialBalance::from_entries([("Suspense", dec!(1)), ("Cash", dec!(2))]).unwrap();
        let stmt = classifier.classify(&tb);
        assert_eq!(stmt.lines()[0].category, AccountCategory::OtherCurrentAssets);
        assert_eq!(stmt.lines()[1].category, AccountCategory::Unclassified);
    }

    #[test]
    fn test_classify_raw_rejects_non_numeric() {
        let raw: RawTrialBalance = serde_json::from_str(r#"{"Cash": "abc"}"#).unwrap();
        assert!(classify_raw(&raw).is_err());
    }
}
