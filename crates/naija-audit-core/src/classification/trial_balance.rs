//! Trial-balance ingestion.
//!
//! `RawTrialBalance` is what arrives over the wire: account names paired
//! with whatever JSON the client put in the amount slot, in submission
//! order. `TrialBalance` is the validated form the classifier consumes.

use rust_decimal::Decimal;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::currency::{has_kobo_precision, parse_naira, KOBO_DP};
use crate::error::AuditError;
use crate::types::Money;
use crate::AuditResult;

// ---------------------------------------------------------------------------
// Validated form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceEntry {
    pub account_name: String,
    pub amount: Money,
}

/// Ordered trial balance with case-insensitively unique account names.
///
/// The sum of absolute amounts always fits in a `Decimal`, so every section
/// total and any signed combination of them can be formed without overflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrialBalance {
    entries: Vec<TrialBalanceEntry>,
    #[serde(skip)]
    gross: Money,
}

impl TrialBalance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, amount)` pairs, rejecting blank or repeated names.
    pub fn from_entries<I, S>(entries: I) -> AuditResult<Self>
    where
        I: IntoIterator<Item = (S, Money)>,
        S: Into<String>,
    {
        let mut tb = Self::new();
        let mut seen = HashSet::new();
        for (account_name, amount) in entries {
            tb.push(&mut seen, account_name.into(), amount)?;
        }
        Ok(tb)
    }

    fn push(
        &mut self,
        seen: &mut HashSet<String>,
        account_name: String,
        amount: Money,
    ) -> AuditResult<()> {
        let index = self.entries.len();
        let trimmed = account_name.trim();
        if trimmed.is_empty() {
            return Err(AuditError::validation(
                format!("trial_balance[{index}].account_name"),
                "Account name cannot be blank.",
            ));
        }
        if !seen.insert(trimmed.to_lowercase()) {
            return Err(AuditError::validation(
                format!("trial_balance['{trimmed}']"),
                "Account appears more than once (names are compared case-insensitively).",
            ));
        }
        self.gross = self.gross.checked_add(amount.abs()).ok_or_else(|| {
            AuditError::validation(
                format!("trial_balance['{trimmed}'].amount"),
                "Amounts in this trial balance exceed the supported decimal range.",
            )
        })?;
        self.entries.push(TrialBalanceEntry {
            account_name: trimmed.to_string(),
            amount,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[TrialBalanceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every amount as submitted.
    pub fn total(&self) -> Money {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Sum of absolute amounts.
    pub fn gross(&self) -> Money {
        self.gross
    }
}

// ---------------------------------------------------------------------------
// Wire form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub account_name: String,
    pub amount: Value,
}

/// Unvalidated trial balance. Deserializes from either a JSON object
/// (`{"Cash": 5000000, ...}`, document order preserved) or a list of
/// `{"account_name": ..., "amount": ...}` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawTrialBalance {
    pub entries: Vec<RawEntry>,
}

impl RawTrialBalance {
    /// Validate amounts and names into a `TrialBalance`.
    pub fn parse(&self) -> AuditResult<TrialBalance> {
        let mut tb = TrialBalance::new();
        let mut seen = HashSet::new();
        for entry in &self.entries {
            let amount = parse_amount(&entry.account_name, &entry.amount)?;
            tb.push(&mut seen, entry.account_name.clone(), amount)?;
        }
        Ok(tb)
    }
}

fn parse_amount(account_name: &str, raw: &Value) -> AuditResult<Money> {
    let field = || format!("trial_balance['{}'].amount", account_name.trim());

    let amount = match raw {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| {
                    AuditError::validation(field(), format!("{text} is not representable as a decimal."))
                })?
        }
        Value::String(s) => parse_naira(s).ok_or_else(|| {
            AuditError::validation(field(), format!("'{s}' is not a numeric amount."))
        })?,
        other => {
            return Err(AuditError::validation(
                field(),
                format!("Expected a number or numeric string, got {}.", json_kind(other)),
            ))
        }
    };

    if !has_kobo_precision(amount) {
        return Err(AuditError::validation(
            field(),
            format!("{amount} has more than {KOBO_DP} decimal places (kobo precision)."),
        ));
    }
    Ok(amount.normalize())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<'de> Deserialize<'de> for RawTrialBalance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawTrialBalanceVisitor;

        impl<'de> Visitor<'de> for RawTrialBalanceVisitor {
            type Value = RawTrialBalance;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of account name to amount, or a list of {account_name, amount} entries")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((account_name, amount)) = map.next_entry::<String, Value>()? {
                    entries.push(RawEntry {
                        account_name,
                        amount,
                    });
                }
                Ok(RawTrialBalance { entries })
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(entry) = seq.next_element::<RawEntry>()? {
                    entries.push(entry);
                }
                Ok(RawTrialBalance { entries })
            }
        }

        deserializer.deserialize_any(RawTrialBalanceVisitor)
    }
}

impl From<&TrialBalance> for RawTrialBalance {
    fn from(tb: &TrialBalance) -> Self {
        let entries = tb
            .entries()
            .iter()
            .map(|e| RawEntry {
                account_name: e.account_name.clone(),
                amount: Value::String(e.amount.to_string()),
            })
            .collect();
        RawTrialBalance { entries }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
