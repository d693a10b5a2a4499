//! Risk assessment: ratios plus company attributes to a bounded score and tier.

pub mod assessor;
pub mod signal;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::RiskConfig;
use crate::error::AuditError;
use crate::ratios::RatioName;
use crate::types::Money;

pub use assessor::{assess, RiskAssessor};
pub use signal::{merge_signal, ClassifierSignal, MergePolicy, MergedAssessment};

/// Risk tier, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "critical", alias = "CRITICAL")]
    Critical,
}

impl RiskLevel {
    /// Tier for a 0-100 score under the configured cut-offs.
    pub fn from_score(score: Decimal, config: &RiskConfig) -> Self {
        if score >= config.low_risk_min {
            RiskLevel::Low
        } else if score >= config.medium_risk_min {
            RiskLevel::Medium
        } else if score >= config.high_risk_min {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    /// Representative score for the tier, used when blending external labels.
    pub fn midpoint(&self, config: &RiskConfig) -> Decimal {
        let two = Decimal::TWO;
        match self {
            RiskLevel::Low => (config.low_risk_min + Decimal::ONE_HUNDRED) / two,
            RiskLevel::Medium => (config.medium_risk_min + config.low_risk_min) / two,
            RiskLevel::High => (config.high_risk_min + config.medium_risk_min) / two,
            RiskLevel::Critical => config.high_risk_min / two,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RiskLevel {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            other => Err(AuditError::validation(
                "risk_level",
                format!("'{other}' is not one of low, medium, high, critical."),
            )),
        }
    }
}

/// Sub-scores on a 0-100 scale; `None` when none of the group's ratios
/// could be computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub liquidity: Option<Decimal>,
    pub leverage: Option<Decimal>,
    pub profitability: Option<Decimal>,
}

/// Scored ratio groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskComponent {
    Liquidity,
    Leverage,
    Profitability,
}

impl RiskComponent {
    pub const ALL: [RiskComponent; 3] = [
        RiskComponent::Liquidity,
        RiskComponent::Leverage,
        RiskComponent::Profitability,
    ];

    pub fn ratios(&self) -> &'static [RatioName] {
        match self {
            Self::Liquidity => &[
                RatioName::CurrentRatio,
                RatioName::QuickRatio,
                RatioName::CashRatio,
            ],
            Self::Leverage => &[RatioName::DebtToEquity, RatioName::DebtToAssets],
            Self::Profitability => &[
                RatioName::NetProfitMargin,
                RatioName::ReturnOnAssets,
                RatioName::ReturnOnEquity,
            ],
        }
    }
}

impl fmt::Display for RiskComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Liquidity => "liquidity",
            Self::Leverage => "leverage",
            Self::Profitability => "profitability",
        };
        f.write_str(s)
    }
}

/// Impact or probability grade in the risk matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Exposure {
    Low,
    Medium,
    High,
}

impl Exposure {
    /// Impact of a component score: high below 50, medium below 70.
    pub fn impact(score: Decimal) -> Self {
        if score < Decimal::from(50) {
            Exposure::High
        } else if score < Decimal::from(70) {
            Exposure::Medium
        } else {
            Exposure::Low
        }
    }

    /// Probability from the number of weaknesses found in the component.
    pub fn probability(weaknesses: usize) -> Self {
        match weaknesses {
            0 => Exposure::Low,
            1 => Exposure::Medium,
            _ => Exposure::High,
        }
    }
}

/// One ratio's contribution to a component score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub ratio: RatioName,
    pub value: Decimal,
    pub score: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMatrixEntry {
    pub component: RiskComponent,
    pub score: Decimal,
    pub risk_level: RiskLevel,
    pub impact: Exposure,
    pub probability: Exposure,
    pub factors: Vec<RiskFactor>,
}

/// A component at high or critical risk, with up to three of its weaknesses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalRisk {
    pub component: RiskComponent,
    pub risk_level: RiskLevel,
    pub score: Decimal,
    pub key_risks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_score: u8,
    pub risk_level: RiskLevel,
    /// Benchmark set the ratios were scored against.
    pub benchmark_industry: String,
    pub component_scores: ComponentScores,
    /// Determinable components, weakest first.
    pub risk_matrix: Vec<RiskMatrixEntry>,
    pub critical_risks: Vec<CriticalRisk>,
    /// Annual revenue over headcount; `None` without an employee count.
    pub revenue_per_employee: Option<Money>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}
