//! Blending an external statistical classifier into a rule-based assessment.
//!
//! The assessor never calls a model. A caller that has a label from one
//! runs `merge_signal` as a separate step and keeps both results.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{RiskAssessment, RiskLevel};
use crate::config::RiskConfig;
use crate::error::AuditError;
use crate::AuditResult;

/// Label and confidence from an external classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSignal {
    pub label: RiskLevel,
    /// 0 to 1.
    pub confidence: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    /// Signals below this confidence are ignored entirely.
    pub min_confidence: Decimal,
    /// Weight given to a signal of confidence 1.
    pub max_weight: Decimal,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            min_confidence: dec!(0.6),
            max_weight: dec!(0.3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedAssessment {
    pub rule_score: u8,
    pub rule_level: RiskLevel,
    pub signal: ClassifierSignal,
    /// Weight the signal actually received; zero when it was ignored.
    pub signal_weight: Decimal,
    pub blended_score: u8,
    pub risk_level: RiskLevel,
    /// Whether the signal's label matched the rule-based tier.
    pub agreed: bool,
}

pub fn merge_signal(
    assessment: &RiskAssessment,
    signal: &ClassifierSignal,
    policy: &MergePolicy,
    config: &RiskConfig,
) -> AuditResult<MergedAssessment> {
    if signal.confidence < Decimal::ZERO || signal.confidence > Decimal::ONE {
        return Err(AuditError::validation(
            "signal.confidence",
            format!("Confidence {} must lie between 0 and 1.", signal.confidence),
        ));
    }
    if policy.max_weight < Decimal::ZERO || policy.max_weight > Decimal::ONE {
        return Err(AuditError::configuration(
            "merge_policy.max_weight",
            "max_weight must lie between 0 and 1",
        ));
    }

    let weight = if signal.confidence >= policy.min_confidence {
        signal.confidence * policy.max_weight
    } else {
        Decimal::ZERO
    };

    let rule = Decimal::from(assessment.overall_score);
    let blended = (rule * (Decimal::ONE - weight) + signal.label.midpoint(config) * weight)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    Ok(MergedAssessment {
        rule_score: assessment.overall_score,
        rule_level: assessment.risk_level,
        signal: signal.clone(),
        signal_weight: weight,
        blended_score: blended.to_u8().unwrap_or(assessment.overall_score),
        risk_level: RiskLevel::from_score(blended, config),
        agreed: signal.label == assessment.risk_level,
    })
}
