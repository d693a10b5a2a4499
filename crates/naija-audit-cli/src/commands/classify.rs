use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;

use naija_audit_core::classification::{self, RawTrialBalance};
use naija_audit_core::ratios::compute_ratios;
use naija_audit_core::with_metadata;

use crate::input;

/// Arguments for trial-balance classification
#[derive(Args)]
pub struct ClassifyArgs {
    /// Path to JSON input file: a trial balance, or a request holding one
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for ratio computation
#[derive(Args)]
pub struct RatiosArgs {
    /// Path to JSON input file: a trial balance, or a request holding one
    #[arg(long)]
    pub input: Option<String>,
}

/// Either a request holding a `trial_balance` key or a bare trial balance.
#[derive(Deserialize)]
#[serde(untagged)]
enum TrialBalanceInput {
    Request { trial_balance: RawTrialBalance },
    Bare(RawTrialBalance),
}

impl TrialBalanceInput {
    fn into_raw(self) -> RawTrialBalance {
        match self {
            Self::Request { trial_balance } => trial_balance,
            Self::Bare(raw) => raw,
        }
    }
}

fn read_trial_balance(
    path: Option<&str>,
    what: &str,
) -> Result<RawTrialBalance, Box<dyn std::error::Error>> {
    let payload: TrialBalanceInput = input::read_payload(path, what)?;
    Ok(payload.into_raw())
}

pub fn run_classify(args: ClassifyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let raw = read_trial_balance(args.input.as_deref(), "classification")?;
    let statement = classification::classify_raw(&raw)?;

    let mut warnings = Vec::new();
    if !statement.unclassified().is_empty() {
        warnings.push(format!(
            "Unclassified accounts placed in 'other': {}",
            statement.unclassified().join(", ")
        ));
    }
    if !statement.imbalance().is_zero() {
        warnings.push(format!(
            "Debit-side sections exceed credit-side sections by {}",
            statement.imbalance()
        ));
    }

    let lead_schedule = statement.lead_schedule();
    let output = with_metadata(
        "Keyword and account-code classification to IFRS statement captions",
        &json!({ "entries": raw.entries.len(), "sign_convention": "as submitted" }),
        warnings,
        start.elapsed().as_micros() as u64,
        json!({
            "totals": statement.totals(),
            "imbalance": statement.imbalance(),
            "unclassified": statement.unclassified(),
            "lines": statement.lines(),
            "lead_schedule": lead_schedule,
        }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_ratios(args: RatiosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let raw = read_trial_balance(args.input.as_deref(), "ratio analysis")?;
    let statement = classification::classify_raw(&raw)?;
    let ratios = compute_ratios(&statement);

    let warnings: Vec<String> = ratios
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| format!("{name} is undefined: zero denominator"))
        .collect();

    let output = with_metadata(
        "Section-total ratios, rounded to four places after division",
        &json!({ "capital_adequacy_denominator": "total_assets" }),
        warnings,
        start.elapsed().as_micros() as u64,
        ratios,
    );
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> RawTrialBalance {
        serde_json::from_str::<TrialBalanceInput>(text).unwrap().into_raw()
    }

    #[test]
    fn test_bare_trial_balance_keeps_order_and_repeats() {
        let raw = decode(r#"{"Zenith Bank": 1, "Cash": 2, "Cash": 3}"#);
        let names: Vec<&str> = raw.entries.iter().map(|e| e.account_name.as_str()).collect();
        assert_eq!(names, vec!["Zenith Bank", "Cash", "Cash"]);
        assert!(raw.parse().is_err());
    }

    #[test]
    fn test_request_wrapper_unwrapped() {
        let raw = decode(
            r#"{"profile": {"industry": "Retail"},
                "trial_balance": {"Sales": 10, "Bank": 4, "Inventory": 6}}"#,
        );
        let names: Vec<&str> = raw.entries.iter().map(|e| e.account_name.as_str()).collect();
        assert_eq!(names, vec!["Sales", "Bank", "Inventory"]);
        assert_eq!(raw.parse().unwrap().len(), 3);
    }

    #[test]
    fn test_list_form_accepted() {
        let raw = decode(r#"[{"account_name": "Cash", "amount": "₦1,000"}]"#);
        assert_eq!(raw.entries.len(), 1);
    }
}
