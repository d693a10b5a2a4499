use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::debug;

use super::{
    ComponentScores, CriticalRisk, Exposure, RiskAssessment, RiskComponent, RiskFactor, RiskLevel,
    RiskMatrixEntry,
};
use crate::config::{EngineConfig, GENERAL_INDUSTRY};
use crate::currency::format_naira;
use crate::error::AuditError;
use crate::profile::CompanyProfile;
use crate::ratios::{RatioName, RatioSet};
use crate::types::Money;
use crate::AuditResult;

/// Key risks listed per critical component.
const KEY_RISKS: usize = 3;

/// A weakness and the ratio it was raised against, if any.
type Weakness = (Option<RatioName>, String);

// ---------------------------------------------------------------------------
// Assessor
// ---------------------------------------------------------------------------

/// Scores ratios against industry benchmark bands. Borrows the engine
/// configuration for its lifetime and holds no other state.
#[derive(Debug, Clone, Copy)]
pub struct RiskAssessor<'a> {
    config: &'a EngineConfig,
}

impl<'a> RiskAssessor<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Assess, failing when no sub-score can be determined.
    pub fn assess(&self, ratios: &RatioSet, profile: &CompanyProfile) -> AuditResult<RiskAssessment> {
        self.try_assess(ratios, profile)?.ok_or_else(|| {
            AuditError::validation(
                "ratios",
                "No liquidity, leverage or profitability ratio could be computed; \
                 the trial balance lacks the balances needed for a risk score.",
            )
        })
    }

    /// Assess, returning `None` when no sub-score can be determined.
    pub fn try_assess(
        &self,
        ratios: &RatioSet,
        profile: &CompanyProfile,
    ) -> AuditResult<Option<RiskAssessment>> {
        let industry = self.benchmark_industry(profile);
        let risk = &self.config.risk;

        let mut groups = Vec::with_capacity(RiskComponent::ALL.len());
        for component in RiskComponent::ALL {
            groups.push((component, self.factors(&industry, ratios, component.ratios())?));
        }
        let score_of = |component: RiskComponent| {
            groups
                .iter()
                .find(|(c, _)| *c == component)
                .and_then(|(_, factors)| mean_score(factors))
        };
        let components = ComponentScores {
            liquidity: score_of(RiskComponent::Liquidity),
            leverage: score_of(RiskComponent::Leverage),
            profitability: score_of(RiskComponent::Profitability),
        };

        let weighted = [
            (components.liquidity, risk.weights.liquidity),
            (components.leverage, risk.weights.leverage),
            (components.profitability, risk.weights.profitability),
        ];
        let (mut sum, mut weight_total) = (Decimal::ZERO, Decimal::ZERO);
        for (score, weight) in weighted {
            if let Some(score) = score {
                sum += score * weight;
                weight_total += weight;
            }
        }
        if weight_total.is_zero() {
            return Ok(None);
        }

        let overall = (sum / weight_total)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .max(Decimal::ZERO)
            .min(Decimal::ONE_HUNDRED);
        let overall_score = overall.to_u8().unwrap_or(0);
        let risk_level = RiskLevel::from_score(overall, risk);

        let revenue_per_employee = revenue_per_employee(profile);
        let (strengths, weaknesses) =
            self.strengths_and_weaknesses(&industry, ratios, profile, revenue_per_employee)?;

        let in_component = |component: RiskComponent| {
            let members = component.ratios();
            weaknesses
                .iter()
                .filter(move |(name, _)| name.map(|n| members.contains(&n)).unwrap_or(false))
                .map(|(_, message)| message)
        };

        let mut risk_matrix: Vec<RiskMatrixEntry> = groups
            .into_iter()
            .filter_map(|(component, factors)| {
                let score = mean_score(&factors)?;
                Some(RiskMatrixEntry {
                    component,
                    score,
                    risk_level: RiskLevel::from_score(score, risk),
                    impact: Exposure::impact(score),
                    probability: Exposure::probability(in_component(component).count()),
                    factors,
                })
            })
            .collect();
        risk_matrix.sort_by(|a, b| a.score.cmp(&b.score));

        let critical_risks: Vec<CriticalRisk> = risk_matrix
            .iter()
            .filter(|entry| entry.risk_level >= RiskLevel::High)
            .map(|entry| CriticalRisk {
                component: entry.component,
                risk_level: entry.risk_level,
                score: entry.score,
                key_risks: in_component(entry.component).take(KEY_RISKS).cloned().collect(),
            })
            .collect();

        let recommendations = self.recommendations(risk_level, &components);

        debug!(
            score = overall_score,
            level = %risk_level,
            industry = %industry,
            critical = critical_risks.len(),
            "risk assessed"
        );

        Ok(Some(RiskAssessment {
            overall_score,
            risk_level,
            benchmark_industry: industry,
            component_scores: components,
            risk_matrix,
            critical_risks,
            revenue_per_employee,
            strengths,
            weaknesses: weaknesses.into_iter().map(|(_, message)| message).collect(),
            recommendations,
        }))
    }

    /// Industry key with a benchmark set: the stated industry, then the
    /// company type's default, then `general`.
    fn benchmark_industry(&self, profile: &CompanyProfile) -> String {
        let benchmarks = &self.config.benchmarks;
        let stated = profile.industry_key();
        if benchmarks.has_industry(&stated) {
            return stated;
        }
        let by_type = profile.company_type.benchmark_key();
        if benchmarks.has_industry(by_type) {
            return by_type.to_string();
        }
        GENERAL_INDUSTRY.to_string()
    }

    /// Band scores of the group's defined ratios.
    fn factors(
        &self,
        industry: &str,
        ratios: &RatioSet,
        group: &[RatioName],
    ) -> AuditResult<Vec<RiskFactor>> {
        let mut factors = Vec::with_capacity(group.len());
        for name in group {
            if let Some(value) = ratios.get(*name) {
                factors.push(RiskFactor {
                    ratio: *name,
                    value,
                    score: self.ratio_score(industry, *name, value)?,
                });
            }
        }
        Ok(factors)
    }

    fn strengths_and_weaknesses(
        &self,
        industry: &str,
        ratios: &RatioSet,
        profile: &CompanyProfile,
        revenue_per_employee: Option<Money>,
    ) -> AuditResult<(Vec<String>, Vec<Weakness>)> {
        let risk = &self.config.risk;
        let mut strengths = Vec::new();
        let mut weaknesses: Vec<Weakness> = Vec::new();

        // Absolute thresholds, independent of industry.
        if let Some(cr) = ratios.current_ratio {
            if cr < Decimal::ONE {
                weaknesses.push((
                    Some(RatioName::CurrentRatio),
                    format!("weak short-term liquidity (current ratio {cr} below 1.0)"),
                ));
            }
        }
        if let Some(qr) = ratios.quick_ratio {
            if qr < dec!(0.8) {
                weaknesses.push((
                    Some(RatioName::QuickRatio),
                    format!("quick ratio {qr} suggests difficulty meeting short-term obligations"),
                ));
            }
        }
        if let Some(cash) = ratios.cash_ratio {
            if cash < dec!(0.1) {
                weaknesses.push((
                    Some(RatioName::CashRatio),
                    format!("low cash ratio {cash} indicates poor cash management"),
                ));
            }
        }
        if let Some(de) = ratios.debt_to_equity {
            if de < Decimal::ZERO {
                weaknesses.push((
                    Some(RatioName::DebtToEquity),
                    "negative equity: liabilities exceed the equity base".to_string(),
                ));
            } else if de > Decimal::ONE {
                weaknesses.push((
                    Some(RatioName::DebtToEquity),
                    format!("high leverage (debt-to-equity {de}) increases financial risk"),
                ));
            }
        }
        if let Some(da) = ratios.debt_to_assets {
            if da > dec!(0.6) {
                weaknesses.push((
                    Some(RatioName::DebtToAssets),
                    format!("debt-to-assets of {da} indicates over-leveraging"),
                ));
            }
        }
        if let Some(npm) = ratios.net_profit_margin {
            if npm < Decimal::ZERO {
                weaknesses.push((
                    Some(RatioName::NetProfitMargin),
                    format!("loss-making: net profit margin {npm} is negative"),
                ));
            }
        }
        if let Some(at) = ratios.asset_turnover {
            if at < dec!(0.5) {
                weaknesses.push((
                    Some(RatioName::AssetTurnover),
                    format!("asset turnover {at} suggests poor asset utilisation"),
                ));
            }
        }
        if profile.is_bank() {
            let minimum = self.config.cbn.min_capital_adequacy;
            if let Some(car) = ratios.capital_adequacy_ratio.filter(|car| *car < minimum) {
                weaknesses.push((
                    Some(RatioName::CapitalAdequacyRatio),
                    format!("capital adequacy {car} below the CBN minimum of {minimum}"),
                ));
            }
        }

        // Relative to the industry band.
        for (name, value) in ratios.iter() {
            let Some(value) = value else { continue };
            if name == RatioName::CapitalAdequacyRatio && !profile.is_bank() {
                continue;
            }
            let score = self.ratio_score(industry, name, value)?;
            if score >= risk.strength_score {
                strengths.push(format!("{name} of {value} is strong against the {industry} benchmark"));
            } else if score <= risk.weakness_score && !weaknesses.iter().any(|(n, _)| *n == Some(name)) {
                weaknesses.push((
                    Some(name),
                    format!("{name} of {value} is weak against the {industry} benchmark"),
                ));
            }
        }

        if let Some(per_head) = revenue_per_employee {
            if per_head < risk.productivity_floor {
                weaknesses.push((
                    None,
                    format!(
                        "revenue per employee of {} is below {}",
                        format_naira(per_head),
                        format_naira(risk.productivity_floor)
                    ),
                ));
            } else if per_head >= risk.productivity_target {
                strengths.push(format!(
                    "revenue per employee of {} meets the {} productivity target",
                    format_naira(per_head),
                    format_naira(risk.productivity_target)
                ));
            }
        }

        Ok((strengths, weaknesses))
    }

    /// Band score for one ratio. On a lower-is-better band a negative value
    /// means a negative denominator (equity or assets), which scores zero.
    fn ratio_score(&self, industry: &str, name: RatioName, value: Decimal) -> AuditResult<Decimal> {
        let band = self.config.benchmarks.band(industry, name)?;
        if !band.higher_is_better() && value < Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok(band.score(value))
    }

    fn recommendations(&self, level: RiskLevel, components: &ComponentScores) -> Vec<String> {
        let mut recs: Vec<String> = match level {
            RiskLevel::Critical => vec![
                "Immediate risk mitigation actions required".into(),
                "Consider engaging crisis management consultants".into(),
            ],
            RiskLevel::High => vec![
                "Develop a comprehensive risk management plan".into(),
                "Implement regular risk monitoring procedures".into(),
            ],
            RiskLevel::Medium => vec![
                "Maintain current risk controls and monitoring".into(),
                "Prepare contingency plans for identified risks".into(),
            ],
            RiskLevel::Low => vec![
                "Continue current risk management practices".into(),
                "Monitor for emerging risks".into(),
            ],
        };

        let critical_below = self.config.risk.high_risk_min;
        let is_critical = |s: Option<Decimal>| s.map(|v| v < critical_below).unwrap_or(false);

        if is_critical(components.liquidity) {
            recs.extend([
                "Improve cash flow management and forecasting".to_string(),
                "Establish credit facilities for working capital".to_string(),
                "Optimise accounts receivable collection".to_string(),
            ]);
        }
        if is_critical(components.leverage) {
            recs.extend([
                "Reduce debt levels through equity financing".to_string(),
                "Negotiate better debt terms with lenders".to_string(),
            ]);
        }
        if is_critical(components.profitability) {
            recs.extend([
                "Implement cost reduction initiatives".to_string(),
                "Diversify revenue streams".to_string(),
            ]);
        }

        recs.push("Regular risk assessment updates recommended".into());
        recs
    }
}

/// Mean band score of a group, to two places; `None` for an empty group.
fn mean_score(factors: &[RiskFactor]) -> Option<Decimal> {
    if factors.is_empty() {
        return None;
    }
    let total: Decimal = factors.iter().map(|f| f.score).sum();
    Some((total / Decimal::from(factors.len())).round_dp(2))
}

fn revenue_per_employee(profile: &CompanyProfile) -> Option<Money> {
    if profile.employee_count == 0 {
        return None;
    }
    profile
        .annual_revenue
        .checked_div(Decimal::from(profile.employee_count))
        .map(|v| v.round_dp(2))
}

/// Assess with an already-validated configuration.
pub fn assess(
    ratios: &RatioSet,
    profile: &CompanyProfile,
    config: &EngineConfig,
) -> AuditResult<RiskAssessment> {
    RiskAssessor::new(config).assess(ratios, profile)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
