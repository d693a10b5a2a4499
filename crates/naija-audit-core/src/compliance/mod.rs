//! Nigerian regulatory compliance: FRC, FIRS, CAMA and CBN rule registries.
//!
//! Each regulation owns a static list of rules. A rule is a pure predicate
//! over a fixed context (profile, classified statement, ratios, config);
//! only the regulations a caller asks for are evaluated.

pub mod checker;
pub mod identifiers;
pub mod registry;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::AuditError;
use crate::profile::CompanySize;
use crate::types::{Money, Rate};
use crate::AuditResult;

pub use checker::{check_compliance, cit_rate_for_revenue, ComplianceChecker};
pub use registry::{Finding, Rule, RuleContext, RuleRegistry};

// ---------------------------------------------------------------------------
// Regulation and severity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Regulation {
    /// Financial Reporting Council of Nigeria.
    Frc,
    /// Federal Inland Revenue Service.
    Firs,
    /// Companies and Allied Matters Act, administered by the CAC.
    Cama,
    /// Central Bank of Nigeria.
    Cbn,
}

impl Regulation {
    pub const ALL: [Regulation; 4] = [
        Regulation::Frc,
        Regulation::Firs,
        Regulation::Cama,
        Regulation::Cbn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Regulation::Frc => "FRC",
            Regulation::Firs => "FIRS",
            Regulation::Cama => "CAMA",
            Regulation::Cbn => "CBN",
        }
    }
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regulation {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FRC" => Ok(Regulation::Frc),
            "FIRS" => Ok(Regulation::Firs),
            "CAMA" | "CAC" => Ok(Regulation::Cama),
            "CBN" => Ok(Regulation::Cbn),
            _ => Err(AuditError::configuration(
                "regulations",
                format!("unknown regulation '{}'; expected one of FRC, FIRS, CAMA, CBN", s.trim()),
            )),
        }
    }
}

/// Parse regulation names case-insensitively. Fails on the first unknown name.
pub fn parse_regulations<I, S>(names: I) -> AuditResult<BTreeSet<Regulation>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|n| n.as_ref().parse()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    PartiallyCompliant,
    NonCompliant,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::PartiallyCompliant => "partially_compliant",
            ComplianceStatus::NonCompliant => "non_compliant",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A rule that fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    pub regulation: Regulation,
    pub severity: Severity,
    pub description: String,
    pub detail: String,
    pub recommendation: String,
    /// Points deducted from the aggregate score.
    pub penalty: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationOutcome {
    pub status: ComplianceStatus,
    pub rules_evaluated: usize,
    pub violations: Vec<Violation>,
}

/// Recomputed tax standing, reported whenever FIRS is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxPosition {
    pub size: CompanySize,
    pub expected_cit_rate: Rate,
    /// Revenue less cost of sales and operating expenses, before taxation.
    pub pre_tax_profit: Money,
    pub estimated_cit: Money,
    pub vat_rate: Rate,
    pub vat_registration_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub regulations: BTreeMap<Regulation, RegulationOutcome>,
    pub aggregate_score: Decimal,
    pub tier: ComplianceStatus,
    pub total_violations: usize,
    pub critical_violations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_position: Option<TaxPosition>,
    pub recommendations: Vec<String>,
    pub action_items: Vec<String>,
}

impl ComplianceResult {
    /// Every violation across regulations, in regulation then registry order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.regulations.values().flat_map(|o| o.violations.iter())
    }

    pub fn fired_rule_ids(&self) -> Vec<&str> {
        self.violations().map(|v| v.rule_id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regulations_case_insensitive() {
        let regs = parse_regulations(["frc", " Firs ", "CAMA"]).unwrap();
        assert_eq!(
            regs.into_iter().collect::<Vec<_>>(),
            vec![Regulation::Frc, Regulation::Firs, Regulation::Cama]
        );
    }

    #[test]
    fn test_unknown_regulation_is_configuration_error() {
        let err = parse_regulations(["FRC", "SEC", "NOPE"]).unwrap_err();
        match err {
            AuditError::Configuration { context, reason } => {
                assert_eq!(context, "regulations");
                assert!(reason.contains("'SEC'"));
            }
            other => panic!("Expected Configuration, got {other:?}"),
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_regulation_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Regulation::Cama).unwrap(), "\"CAMA\"");
    }
}
