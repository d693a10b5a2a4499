use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use super::identifiers::{is_valid_cac_number, is_valid_tin};
use super::{Regulation, Severity};
use crate::classification::{ClassifiedStatement, Section};
use crate::config::EngineConfig;
use crate::currency::format_naira;
use crate::profile::CompanyProfile;
use crate::ratios::RatioSet;
use crate::types::Rate;

use super::checker::cit_rate_for_revenue;

// ---------------------------------------------------------------------------
// Rule types
// ---------------------------------------------------------------------------

/// Everything a rule predicate may look at. Built once per evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub profile: &'a CompanyProfile,
    pub statement: &'a ClassifiedStatement,
    pub ratios: &'a RatioSet,
    pub config: &'a EngineConfig,
}

impl RuleContext<'_> {
    /// Public companies and large private ones file with the FRC.
    pub fn files_with_frc(&self) -> bool {
        self.profile.is_public || self.profile.annual_revenue > self.config.frc.filing_revenue_threshold
    }

    pub fn frc_filing_deadline(&self) -> Option<NaiveDate> {
        self.profile
            .financial_year_end
            .and_then(|fye| fye.checked_add_signed(Duration::days(self.config.frc.filing_deadline_days)))
    }

    pub fn firs_returns_deadline(&self) -> Option<NaiveDate> {
        self.profile
            .financial_year_end
            .and_then(|fye| fye.checked_add_months(Months::new(self.config.tax.returns_deadline_months)))
    }

    pub fn expected_cit_rate(&self) -> Rate {
        cit_rate_for_revenue(self.profile.annual_revenue, self.config).1
    }
}

/// What a fired rule reports beyond its static description.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub detail: String,
    pub deadline: Option<NaiveDate>,
}

impl Finding {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            deadline: None,
        }
    }

    fn due(mut self, deadline: Option<NaiveDate>) -> Self {
        self.deadline = deadline;
        self
    }
}

/// A registry entry. `check` returns `Some` when the rule fires.
#[derive(Clone, Copy, Serialize)]
pub struct Rule {
    pub id: &'static str,
    pub regulation: Regulation,
    pub severity: Severity,
    pub description: &'static str,
    pub recommendation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_range: Option<&'static str>,
    #[serde(skip)]
    check: fn(&RuleContext<'_>) -> Option<Finding>,
}

impl Rule {
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        (self.check)(ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("regulation", &self.regulation)
            .field("severity", &self.severity)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub struct RuleRegistry;

impl RuleRegistry {
    /// Every rule, grouped by regulation in registry order.
    pub fn rules() -> &'static [Rule] {
        &RULES
    }

    pub fn for_regulation(regulation: Regulation) -> impl Iterator<Item = &'static Rule> {
        RULES.iter().filter(move |r| r.regulation == regulation)
    }

    pub fn get(id: &str) -> Option<&'static Rule> {
        RULES.iter().find(|r| r.id == id)
    }
}

static RULES: [Rule; 15] = [
    // -- FRC ----------------------------------------------------------------
    Rule {
        id: "FRC-001",
        regulation: Regulation::Frc,
        severity: Severity::High,
        description: "Annual financial statements not filed with the FRC",
        recommendation: "File audited financial statements within 90 days of year-end",
        penalty_range: Some("₦500,000 - ₦2,000,000"),
        check: frc_statements_not_filed,
    },
    Rule {
        id: "FRC-002",
        regulation: Regulation::Frc,
        severity: Severity::Critical,
        description: "Financial statements not prepared in accordance with IFRS",
        recommendation: "Ensure financial statements comply with IFRS as adopted in Nigeria",
        penalty_range: Some("₦1,000,000 - ₦5,000,000"),
        check: frc_not_ifrs,
    },
    Rule {
        id: "FRC-003",
        regulation: Regulation::Frc,
        severity: Severity::Low,
        description: "Leverage above the enhanced-disclosure threshold",
        recommendation: "Include going-concern and debt maturity disclosures in the notes",
        penalty_range: None,
        check: frc_leverage_disclosure,
    },
    Rule {
        id: "FRC-004",
        regulation: Regulation::Frc,
        severity: Severity::Low,
        description: "Trial balance contains accounts that could not be mapped to IFRS captions",
        recommendation: "Map every account to a financial statement caption before filing",
        penalty_range: None,
        check: frc_unclassified_accounts,
    },
    Rule {
        id: "FRC-005",
        regulation: Regulation::Frc,
        severity: Severity::Medium,
        description: "Trial balance does not balance",
        recommendation: "Investigate and clear the difference between debits and credits",
        penalty_range: None,
        check: frc_trial_balance_out_of_balance,
    },
    // -- FIRS ---------------------------------------------------------------
    Rule {
        id: "FIRS-001",
        regulation: Regulation::Firs,
        severity: Severity::Critical,
        description: "Tax Identification Number not provided",
        recommendation: "Register for a TIN with FIRS immediately",
        penalty_range: None,
        check: firs_tin_missing,
    },
    Rule {
        id: "FIRS-002",
        regulation: Regulation::Firs,
        severity: Severity::High,
        description: "Invalid Tax Identification Number format",
        recommendation: "Obtain a valid 12-digit TIN from FIRS",
        penalty_range: Some("₦50,000 - ₦200,000"),
        check: firs_tin_invalid,
    },
    Rule {
        id: "FIRS-003",
        regulation: Regulation::Firs,
        severity: Severity::High,
        description: "Turnover at or above the VAT threshold without VAT registration",
        recommendation: "Register for VAT with FIRS within 30 days",
        penalty_range: Some("₦100,000 - ₦500,000"),
        check: firs_vat_unregistered,
    },
    Rule {
        id: "FIRS-004",
        regulation: Regulation::Firs,
        severity: Severity::Medium,
        description: "Declared CIT rate does not match the rate for the company's size",
        recommendation: "Recompute Companies Income Tax at the statutory rate for the size band",
        penalty_range: None,
        check: firs_cit_rate_mismatch,
    },
    Rule {
        id: "FIRS-005",
        regulation: Regulation::Firs,
        severity: Severity::Critical,
        description: "Annual tax returns not filed",
        recommendation: "File annual tax returns before the due date",
        penalty_range: Some("₦25,000 + 10% of tax due"),
        check: firs_returns_not_filed,
    },
    // -- CAMA ---------------------------------------------------------------
    Rule {
        id: "CAMA-001",
        regulation: Regulation::Cama,
        severity: Severity::Critical,
        description: "CAC registration number missing or malformed",
        recommendation: "Ensure the company is properly registered with the Corporate Affairs Commission",
        penalty_range: None,
        check: cama_registration_invalid,
    },
    Rule {
        id: "CAMA-002",
        regulation: Regulation::Cama,
        severity: Severity::Medium,
        description: "Annual returns not filed with the CAC",
        recommendation: "File annual returns with the CAC within 42 days of the AGM",
        penalty_range: Some("₦50,000 - ₦200,000"),
        check: cama_annual_returns_not_filed,
    },
    Rule {
        id: "CAMA-003",
        regulation: Regulation::Cama,
        severity: Severity::High,
        description: "Net liabilities: total equity is negative",
        recommendation: "Convene a general meeting on the capital position and assess going concern",
        penalty_range: None,
        check: cama_negative_equity,
    },
    // -- CBN ----------------------------------------------------------------
    Rule {
        id: "CBN-001",
        regulation: Regulation::Cbn,
        severity: Severity::Critical,
        description: "Capital adequacy ratio below the CBN minimum",
        recommendation: "Increase capital to meet CBN requirements",
        penalty_range: None,
        check: cbn_capital_adequacy,
    },
    Rule {
        id: "CBN-002",
        regulation: Regulation::Cbn,
        severity: Severity::High,
        description: "Liquidity ratio below the CBN minimum",
        recommendation: "Improve the liquidity position with cash and near-cash assets",
        penalty_range: None,
        check: cbn_liquidity,
    },
];

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn frc_statements_not_filed(ctx: &RuleContext<'_>) -> Option<Finding> {
    if !ctx.files_with_frc() || ctx.profile.evidence.financial_statements_filed {
        return None;
    }
    Some(
        Finding::new(format!(
            "Company is an FRC filer (public: {}, turnover {}) with no filed statements on record",
            ctx.profile.is_public,
            format_naira(ctx.profile.annual_revenue)
        ))
        .due(ctx.frc_filing_deadline()),
    )
}

fn frc_not_ifrs(ctx: &RuleContext<'_>) -> Option<Finding> {
    if !ctx.files_with_frc() || ctx.profile.evidence.ifrs_compliant {
        return None;
    }
    Some(
        Finding::new("Statements filed with the FRC must be prepared under IFRS")
            .due(ctx.frc_filing_deadline()),
    )
}

fn frc_leverage_disclosure(ctx: &RuleContext<'_>) -> Option<Finding> {
    let threshold = ctx.config.frc.leverage_disclosure_threshold;
    let de = ctx.ratios.debt_to_equity?;
    (de > threshold).then(|| {
        Finding::new(format!("Debt-to-equity of {de} exceeds {threshold}"))
    })
}

fn frc_unclassified_accounts(ctx: &RuleContext<'_>) -> Option<Finding> {
    let unclassified = ctx.statement.unclassified();
    if unclassified.is_empty() {
        return None;
    }
    Some(Finding::new(format!(
        "{} account(s) unmapped: {}",
        unclassified.len(),
        unclassified.join(", ")
    )))
}

fn frc_trial_balance_out_of_balance(ctx: &RuleContext<'_>) -> Option<Finding> {
    if ctx.statement.is_empty() {
        return None;
    }
    let difference = ctx.statement.imbalance();
    if difference.abs() <= ctx.config.balance_tolerance {
        return None;
    }
    let totals = ctx.statement.totals();
    Some(Finding::new(format!(
        "Debit-side sections total {} against credit-side {} (difference {})",
        format_naira(totals.debit_side()),
        format_naira(totals.credit_side()),
        format_naira(difference)
    )))
}

fn firs_tin_missing(ctx: &RuleContext<'_>) -> Option<Finding> {
    match ctx.profile.tin_number() {
        Some(_) => None,
        None => Some(Finding::new("No TIN supplied in the company profile")),
    }
}

fn firs_tin_invalid(ctx: &RuleContext<'_>) -> Option<Finding> {
    let tin = ctx.profile.tin_number()?;
    (!is_valid_tin(tin)).then(|| {
        Finding::new(format!("TIN '{tin}' is not 12 digits once hyphens and spaces are removed"))
    })
}

fn firs_vat_unregistered(ctx: &RuleContext<'_>) -> Option<Finding> {
    let threshold = ctx.config.tax.vat_registration_threshold;
    if ctx.profile.annual_revenue < threshold || ctx.profile.evidence.vat_registered {
        return None;
    }
    Some(Finding::new(format!(
        "Turnover {} meets the VAT threshold of {}",
        format_naira(ctx.profile.annual_revenue),
        format_naira(threshold)
    )))
}

fn firs_cit_rate_mismatch(ctx: &RuleContext<'_>) -> Option<Finding> {
    let declared = ctx.profile.evidence.declared_cit_rate?;
    let (size, expected) = cit_rate_for_revenue(ctx.profile.annual_revenue, ctx.config);
    (declared != expected).then(|| {
        Finding::new(format!(
            "Declared rate {} but a {size} company pays {}",
            percent(declared),
            percent(expected)
        ))
        .due(ctx.firs_returns_deadline())
    })
}

fn firs_returns_not_filed(ctx: &RuleContext<'_>) -> Option<Finding> {
    if ctx.profile.evidence.tax_returns_filed {
        return None;
    }
    Some(Finding::new("No annual tax return on record").due(ctx.firs_returns_deadline()))
}

fn cama_registration_invalid(ctx: &RuleContext<'_>) -> Option<Finding> {
    match ctx.profile.cac_number() {
        None => Some(Finding::new("CAC registration number not provided")),
        Some(cac) if !is_valid_cac_number(cac) => Some(Finding::new(format!(
            "'{cac}' does not match RC<digits> or BN<digits>"
        ))),
        Some(_) => None,
    }
}

fn cama_annual_returns_not_filed(ctx: &RuleContext<'_>) -> Option<Finding> {
    if ctx.profile.evidence.annual_returns_filed {
        return None;
    }
    Some(Finding::new("No annual return on record with the CAC"))
}

fn cama_negative_equity(ctx: &RuleContext<'_>) -> Option<Finding> {
    let equity = ctx.statement.total(Section::Equity);
    (equity < Decimal::ZERO)
        .then(|| Finding::new(format!("Total equity is {}", format_naira(equity))))
}

fn cbn_capital_adequacy(ctx: &RuleContext<'_>) -> Option<Finding> {
    if !ctx.profile.is_bank() {
        return None;
    }
    let minimum = ctx.config.cbn.min_capital_adequacy;
    match ctx.ratios.capital_adequacy_ratio {
        Some(car) if car >= minimum => None,
        Some(car) => Some(Finding::new(format!(
            "Capital adequacy {} is below the minimum of {}",
            percent(car),
            percent(minimum)
        ))),
        None => Some(Finding::new(
            "Capital adequacy cannot be determined from the trial balance",
        )),
    }
}

fn cbn_liquidity(ctx: &RuleContext<'_>) -> Option<Finding> {
    if !ctx.profile.is_bank() {
        return None;
    }
    let minimum = ctx.config.cbn.min_liquidity_ratio;
    match ctx.ratios.cash_ratio {
        Some(ratio) if ratio >= minimum => None,
        Some(ratio) => Some(Finding::new(format!(
            "Liquidity ratio {} is below the minimum of {}",
            percent(ratio),
            percent(minimum)
        ))),
        None => Some(Finding::new(
            "Liquidity ratio cannot be determined: no current liabilities",
        )),
    }
}

fn percent(rate: Rate) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).round_dp(2).normalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_ids_unique_and_prefixed() {
        let mut seen = HashSet::new();
        for rule in RuleRegistry::rules() {
            assert!(seen.insert(rule.id), "duplicate id {}", rule.id);
            assert!(rule.id.starts_with(rule.regulation.as_str()));
        }
        assert_eq!(seen.len(), 15);
    }

    #[test]
    fn test_every_regulation_has_rules() {
        for reg in Regulation::ALL {
            assert!(RuleRegistry::for_regulation(reg).count() >= 2);
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let rule = RuleRegistry::get("CAMA-001").unwrap();
        assert_eq!(rule.severity, Severity::Critical);
        assert!(RuleRegistry::get("SEC-001").is_none());
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(Decimal::new(20, 2)), "20%");
        assert_eq!(percent(Decimal::new(75, 3)), "7.5%");
    }

    #[test]
    fn test_rule_serializes_without_predicate() {
        let json = serde_json::to_value(RuleRegistry::get("FRC-001").unwrap()).unwrap();
        assert_eq!(json["id"], "FRC-001");
        assert_eq!(json["regulation"], "FRC");
        assert_eq!(json["severity"], "high");
        assert!(json.get("check").is_none());
    }
}
