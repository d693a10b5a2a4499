//! Substantive-testing sample suggestions.
//!
//! Every line at or above materiality is tested in full. The remaining sample
//! is drawn from revenue, receivables and inventory first (largest balances
//! first), then systematically across the rest of the population so the same
//! trial balance always yields the same plan.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classification::{AccountCategory, ClassifiedLine, ClassifiedStatement};
use crate::error::AuditError;
use crate::risk::RiskLevel;
use crate::types::Money;
use crate::AuditResult;

/// Categories sampled ahead of the rest of the population.
pub const HIGH_RISK_CATEGORIES: [AccountCategory; 3] = [
    AccountCategory::Revenue,
    AccountCategory::TradeReceivables,
    AccountCategory::Inventories,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledItem {
    pub account_name: String,
    pub amount: Money,
    pub category: AccountCategory,
}

impl From<&ClassifiedLine> for SampledItem {
    fn from(line: &ClassifiedLine) -> Self {
        Self {
            account_name: line.account_name.clone(),
            amount: line.amount,
            category: line.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingPlan {
    pub materiality: Money,
    pub risk_level: RiskLevel,
    /// Number of trial-balance lines.
    pub population: usize,
    pub sample_size: usize,
    /// Lines at or above materiality, in submission order.
    pub material_items: Vec<SampledItem>,
    pub high_risk_samples: Vec<SampledItem>,
    pub systematic_samples: Vec<SampledItem>,
}

/// Share of the population to sample at each risk level.
pub fn sample_fraction(level: RiskLevel) -> Decimal {
    match level {
        RiskLevel::Low => dec!(0.1),
        RiskLevel::Medium => dec!(0.2),
        RiskLevel::High | RiskLevel::Critical => dec!(0.4),
    }
}

/// Sample size for a population: the fraction of it, rounded down.
pub fn sample_size(population: usize, level: RiskLevel) -> usize {
    let n = Decimal::from(population) * sample_fraction(level);
    n.floor().to_usize().unwrap_or(population)
}

pub fn suggest_sampling(
    statement: &ClassifiedStatement,
    materiality: Money,
    risk_level: RiskLevel,
) -> AuditResult<SamplingPlan> {
    if materiality <= Decimal::ZERO {
        return Err(AuditError::validation(
            "materiality",
            "Materiality must be a positive amount.",
        ));
    }

    let lines = statement.lines();
    let population = lines.len();
    let size = sample_size(population, risk_level);

    let (material, rest): (Vec<&ClassifiedLine>, Vec<&ClassifiedLine>) =
        lines.iter().partition(|l| l.amount.abs() >= materiality);

    let mut high_risk: Vec<&ClassifiedLine> = lines
        .iter()
        .filter(|l| HIGH_RISK_CATEGORIES.contains(&l.category))
        .collect();
    high_risk.sort_by(|a, b| b.amount.abs().cmp(&a.amount.abs()));
    high_risk.truncate(size);

    let pool: Vec<&ClassifiedLine> = rest
        .into_iter()
        .filter(|l| !high_risk.iter().any(|h| std::ptr::eq(*h, *l)))
        .collect();
    let systematic: Vec<SampledItem> = if size == 0 || pool.is_empty() {
        Vec::new()
    } else {
        let interval = (pool.len() / size).max(1);
        pool.iter()
            .step_by(interval)
            .take(size)
            .map(|l| SampledItem::from(*l))
            .collect()
    };

    debug!(
        population,
        sample_size = size,
        material = material.len(),
        level = %risk_level,
        "sampling plan built"
    );

    Ok(SamplingPlan {
        materiality,
        risk_level,
        population,
        sample_size: size,
        material_items: material.into_iter().map(SampledItem::from).collect(),
        high_risk_samples: high_risk.into_iter().map(SampledItem::from).collect(),
        systematic_samples: systematic,
    })
}
