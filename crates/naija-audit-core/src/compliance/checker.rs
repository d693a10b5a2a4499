use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

use super::registry::{RuleContext, RuleRegistry};
use super::{
    ComplianceResult, ComplianceStatus, Regulation, RegulationOutcome, Severity, TaxPosition,
    Violation,
};
use crate::classification::{AccountCategory, ClassifiedStatement};
use crate::config::EngineConfig;
use crate::profile::{CompanyProfile, CompanySize};
use crate::ratios::RatioSet;
use crate::types::{Money, Rate};
use crate::AuditResult;

const MAX_ACTION_ITEMS: usize = 10;

/// Size band and statutory CIT rate for a turnover. Size is always
/// recomputed from revenue; a client-declared size plays no part.
pub fn cit_rate_for_revenue(annual_revenue: Money, config: &EngineConfig) -> (CompanySize, Rate) {
    let size = CompanySize::from_revenue(annual_revenue, &config.size);
    let rates = &config.tax.cit_rates;
    let rate = match size {
        CompanySize::Small => rates.small,
        CompanySize::Medium => rates.medium,
        CompanySize::Large => rates.large,
    };
    (size, rate)
}

// ---------------------------------------------------------------------------
// Checker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct ComplianceChecker<'a> {
    config: &'a EngineConfig,
}

impl<'a> ComplianceChecker<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Evaluate every rule of each requested regulation. Rules of other
    /// regulations are never run.
    pub fn check(
        &self,
        profile: &CompanyProfile,
        statement: &ClassifiedStatement,
        ratios: &RatioSet,
        regulations: &BTreeSet<Regulation>,
    ) -> AuditResult<ComplianceResult> {
        profile.validate()?;

        let ctx = RuleContext {
            profile,
            statement,
            ratios,
            config: self.config,
        };

        let mut outcomes = BTreeMap::new();
        for &regulation in regulations {
            outcomes.insert(regulation, self.evaluate_regulation(&ctx, regulation));
        }

        let all: Vec<&Violation> = outcomes.values().flat_map(|o| o.violations.iter()).collect();
        let total_penalty: Decimal = all.iter().map(|v| v.penalty).sum();
        let aggregate_score = (Decimal::ONE_HUNDRED - total_penalty).max(Decimal::ZERO);
        let tier = self.tier(aggregate_score);
        let total_violations = all.len();
        let critical_violations = all.iter().filter(|v| v.severity == Severity::Critical).count();

        let tax_position = regulations
            .contains(&Regulation::Firs)
            .then(|| self.tax_position(profile, statement));

        let recommendations = recommendations(&all);
        let action_items = all
            .iter()
            .filter(|v| v.severity >= Severity::High)
            .take(MAX_ACTION_ITEMS)
            .map(|v| format!("{}: {}", v.regulation, v.recommendation))
            .collect();

        debug!(
            score = %aggregate_score,
            tier = %tier,
            violations = total_violations,
            "compliance checked"
        );

        Ok(ComplianceResult {
            total_violations,
            critical_violations,
            regulations: outcomes,
            aggregate_score,
            tier,
            tax_position,
            recommendations,
            action_items,
        })
    }

    fn evaluate_regulation(&self, ctx: &RuleContext<'_>, regulation: Regulation) -> RegulationOutcome {
        let mut violations = Vec::new();
        let mut rules_evaluated = 0;

        for rule in RuleRegistry::for_regulation(regulation) {
            rules_evaluated += 1;
            let finding = rule.evaluate(ctx);
            trace!(rule = rule.id, fired = finding.is_some(), "rule evaluated");
            if let Some(finding) = finding {
                debug!(rule = rule.id, severity = %rule.severity, "rule fired");
                violations.push(Violation {
                    rule_id: rule.id.to_string(),
                    regulation,
                    severity: rule.severity,
                    description: rule.description.to_string(),
                    detail: finding.detail,
                    recommendation: rule.recommendation.to_string(),
                    penalty: self.penalty(rule.severity),
                    penalty_range: rule.penalty_range.map(str::to_string),
                    deadline: finding.deadline,
                });
            }
        }

        let status = if violations.iter().any(|v| v.severity == Severity::Critical) {
            ComplianceStatus::NonCompliant
        } else if violations.is_empty() {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::PartiallyCompliant
        };

        RegulationOutcome {
            status,
            rules_evaluated,
            violations,
        }
    }

    fn penalty(&self, severity: Severity) -> Decimal {
        let p = &self.config.compliance.penalties;
        match severity {
            Severity::Low => p.low,
            Severity::Medium => p.medium,
            Severity::High => p.high,
            Severity::Critical => p.critical,
        }
    }

    fn tier(&self, score: Decimal) -> ComplianceStatus {
        let scoring = &self.config.compliance;
        if score >= scoring.compliant_min {
            ComplianceStatus::Compliant
        } else if score >= scoring.partially_compliant_min {
            ComplianceStatus::PartiallyCompliant
        } else {
            ComplianceStatus::NonCompliant
        }
    }

    fn tax_position(&self, profile: &CompanyProfile, statement: &ClassifiedStatement) -> TaxPosition {
        let (size, expected_cit_rate) = cit_rate_for_revenue(profile.annual_revenue, self.config);
        // Taxation sits inside operating expenses; add it back for the CIT base.
        let pre_tax_profit = statement.totals().net_income()
            + statement.category_total(AccountCategory::Taxation);
        let estimated_cit = (pre_tax_profit.max(Decimal::ZERO) * expected_cit_rate).round_dp(2);

        TaxPosition {
            size,
            expected_cit_rate,
            pre_tax_profit,
            estimated_cit,
            vat_rate: self.config.tax.vat_rate,
            vat_registration_required: profile.annual_revenue
                >= self.config.tax.vat_registration_threshold,
        }
    }
}

fn recommendations(violations: &[&Violation]) -> Vec<String> {
    let mut recs = Vec::new();
    if violations.iter().any(|v| v.severity == Severity::Critical) {
        recs.push("Address critical compliance violations immediately to avoid penalties".to_string());
    }
    if violations.iter().any(|v| v.severity == Severity::High) {
        recs.push("Develop a compliance action plan for high-priority violations".to_string());
    }
    if !violations.is_empty() {
        recs.push("Implement regular compliance monitoring and review processes".to_string());
    } else {
        recs.push("Maintain current compliance levels and monitor for regulatory changes".to_string());
    }
    recs
}

/// Check compliance for the requested regulations under `config`.
pub fn check_compliance(
    profile: &CompanyProfile,
    statement: &ClassifiedStatement,
    ratios: &RatioSet,
    regulations: &BTreeSet<Regulation>,
    config: &EngineConfig,
) -> AuditResult<ComplianceResult> {
    ComplianceChecker::new(config).check(profile, statement, ratios, regulations)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
