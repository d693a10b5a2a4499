//! Immutable engine configuration.
//!
//! Every tax rate, statutory threshold, scoring weight and industry benchmark
//! the engine uses lives here. A config is built once (defaults, or decoded
//! from a deployment file), validated, and then only ever borrowed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AuditError;
use crate::ratios::RatioName;
use crate::types::{Money, Rate};
use crate::AuditResult;

/// Benchmark set used when an industry has no entry of its own.
pub const GENERAL_INDUSTRY: &str = "general";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tax: TaxConfig,
    pub size: SizeThresholds,
    pub frc: FrcConfig,
    pub cbn: CbnConfig,
    pub compliance: ComplianceScoring,
    pub risk: RiskConfig,
    pub benchmarks: BenchmarkTable,
    /// Largest debit/credit difference still treated as a balanced trial balance.
    pub balance_tolerance: Money,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tax: TaxConfig::default(),
            size: SizeThresholds::default(),
            frc: FrcConfig::default(),
            cbn: CbnConfig::default(),
            compliance: ComplianceScoring::default(),
            risk: RiskConfig::default(),
            benchmarks: BenchmarkTable::default(),
            balance_tolerance: dec!(1),
        }
    }
}

impl EngineConfig {
    /// Decode a config from JSON. Missing sections take their defaults.
    pub fn from_json(json: &str) -> AuditResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency. Any failure is a deployment defect.
    pub fn validate(&self) -> AuditResult<()> {
        if self.size.small_max_revenue >= self.size.medium_max_revenue {
            return Err(AuditError::configuration(
                "size",
                "small_max_revenue must be below medium_max_revenue",
            ));
        }
        for (name, rate) in [
            ("tax.vat_rate", self.tax.vat_rate),
            ("tax.cit_rates.small", self.tax.cit_rates.small),
            ("tax.cit_rates.medium", self.tax.cit_rates.medium),
            ("tax.cit_rates.large", self.tax.cit_rates.large),
            ("cbn.min_capital_adequacy", self.cbn.min_capital_adequacy),
            ("cbn.min_liquidity_ratio", self.cbn.min_liquidity_ratio),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(AuditError::configuration(
                    name,
                    format!("rate {rate} must lie between 0 and 1"),
                ));
            }
        }
        if self.balance_tolerance < Decimal::ZERO {
            return Err(AuditError::configuration(
                "balance_tolerance",
                "tolerance cannot be negative",
            ));
        }

        let scoring = &self.compliance;
        if scoring.partially_compliant_min > scoring.compliant_min
            || scoring.compliant_min > dec!(100)
        {
            return Err(AuditError::configuration(
                "compliance",
                "tier cut-offs must satisfy partially_compliant_min <= compliant_min <= 100",
            ));
        }
        let p = &scoring.penalties;
        if p.low < Decimal::ZERO || !(p.low <= p.medium && p.medium <= p.high && p.high <= p.critical)
        {
            return Err(AuditError::configuration(
                "compliance.penalties",
                "penalties must be non-negative and non-decreasing with severity",
            ));
        }

        self.risk.validate()?;
        self.benchmarks.validate()
    }
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    pub vat_rate: Rate,
    /// Annual turnover at or above which VAT registration is mandatory.
    pub vat_registration_threshold: Money,
    pub cit_rates: CitRates,
    /// Months after financial year-end by which CIT returns are due.
    pub returns_deadline_months: u32,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            vat_rate: dec!(0.075),
            vat_registration_threshold: dec!(25_000_000),
            cit_rates: CitRates::default(),
            returns_deadline_months: 6,
        }
    }
}

/// Companies Income Tax rate per company size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitRates {
    pub small: Rate,
    pub medium: Rate,
    pub large: Rate,
}

impl Default for CitRates {
    fn default() -> Self {
        Self {
            small: Decimal::ZERO,
            medium: dec!(0.20),
            large: dec!(0.30),
        }
    }
}

/// Revenue ceilings for the size classes used by tax tiering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeThresholds {
    pub small_max_revenue: Money,
    pub medium_max_revenue: Money,
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            small_max_revenue: dec!(25_000_000),
            medium_max_revenue: dec!(100_000_000),
        }
    }
}

// ---------------------------------------------------------------------------
// Regulators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrcConfig {
    /// Private companies above this turnover file with the FRC like public ones.
    pub filing_revenue_threshold: Money,
    /// Debt/equity above which enhanced leverage disclosure is expected.
    pub leverage_disclosure_threshold: Decimal,
    pub filing_deadline_days: i64,
}

impl Default for FrcConfig {
    fn default() -> Self {
        Self {
            filing_revenue_threshold: dec!(500_000_000),
            leverage_disclosure_threshold: dec!(2.0),
            filing_deadline_days: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CbnConfig {
    pub min_capital_adequacy: Rate,
    pub min_liquidity_ratio: Rate,
}

impl Default for CbnConfig {
    fn default() -> Self {
        Self {
            min_capital_adequacy: dec!(0.15),
            min_liquidity_ratio: dec!(0.30),
        }
    }
}

// ---------------------------------------------------------------------------
// Compliance scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceScoring {
    pub penalties: SeverityPenalties,
    pub compliant_min: Decimal,
    pub partially_compliant_min: Decimal,
}

impl Default for ComplianceScoring {
    fn default() -> Self {
        Self {
            penalties: SeverityPenalties::default(),
            compliant_min: dec!(80),
            partially_compliant_min: dec!(60),
        }
    }
}

/// Points deducted from the 100-point compliance baseline per fired rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityPenalties {
    pub low: Decimal,
    pub medium: Decimal,
    pub high: Decimal,
    pub critical: Decimal,
}

impl Default for SeverityPenalties {
    fn default() -> Self {
        Self {
            low: dec!(3),
            medium: dec!(8),
            high: dec!(15),
            critical: dec!(25),
        }
    }
}

// ---------------------------------------------------------------------------
// Risk scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub weights: SubScoreWeights,
    pub low_risk_min: Decimal,
    pub medium_risk_min: Decimal,
    pub high_risk_min: Decimal,
    /// Per-ratio score at or above which the ratio is reported as a strength.
    pub strength_score: Decimal,
    /// Per-ratio score at or below which the ratio is reported as a weakness.
    pub weakness_score: Decimal,
    /// Revenue per employee below which staff productivity is a weakness.
    pub productivity_floor: Money,
    /// Revenue per employee at or above which staff productivity is a strength.
    pub productivity_target: Money,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            weights: SubScoreWeights::default(),
            low_risk_min: dec!(80),
            medium_risk_min: dec!(60),
            high_risk_min: dec!(40),
            strength_score: dec!(80),
            weakness_score: dec!(40),
            productivity_floor: dec!(1_000_000),
            productivity_target: dec!(5_000_000),
        }
    }
}

impl RiskConfig {
    fn validate(&self) -> AuditResult<()> {
        let w = &self.weights;
        if w.liquidity <= Decimal::ZERO || w.leverage <= Decimal::ZERO || w.profitability <= Decimal::ZERO
        {
            return Err(AuditError::configuration(
                "risk.weights",
                "every sub-score weight must be positive",
            ));
        }
        if !(self.high_risk_min <= self.medium_risk_min && self.medium_risk_min <= self.low_risk_min) {
            return Err(AuditError::configuration(
                "risk",
                "tier cut-offs must satisfy high_risk_min <= medium_risk_min <= low_risk_min",
            ));
        }
        if self.weakness_score >= self.strength_score {
            return Err(AuditError::configuration(
                "risk",
                "weakness_score must be below strength_score",
            ));
        }
        if self.productivity_floor < Decimal::ZERO
            || self.productivity_floor >= self.productivity_target
        {
            return Err(AuditError::configuration(
                "risk",
                "productivity_floor must be non-negative and below productivity_target",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubScoreWeights {
    pub liquidity: Decimal,
    pub leverage: Decimal,
    pub profitability: Decimal,
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self {
            liquidity: dec!(0.35),
            leverage: dec!(0.30),
            profitability: dec!(0.35),
        }
    }
}

// ---------------------------------------------------------------------------
// Industry benchmarks
// ---------------------------------------------------------------------------

/// Scoring band for one ratio: 0 points at `weak`, 100 points at `strong`,
/// linear in between and clamped outside. When `strong < weak` lower values
/// are better (leverage ratios).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkBand {
    pub weak: Decimal,
    pub strong: Decimal,
}

impl BenchmarkBand {
    pub const fn new(weak: Decimal, strong: Decimal) -> Self {
        Self { weak, strong }
    }

    pub fn higher_is_better(&self) -> bool {
        self.strong > self.weak
    }

    /// Score a value against the band on a 0-100 scale.
    pub fn score(&self, value: Decimal) -> Decimal {
        let span = self.strong - self.weak;
        if span.is_zero() {
            return Decimal::ZERO;
        }
        let position = match value.checked_sub(self.weak).and_then(|d| d.checked_div(span)) {
            Some(position) => position,
            // Out of range only far outside the band.
            None if (value > self.weak) == (span > Decimal::ZERO) => Decimal::ONE,
            None => Decimal::ZERO,
        };
        let clamped = position.max(Decimal::ZERO).min(Decimal::ONE);
        clamped * dec!(100)
    }
}

pub type IndustryBenchmarks = BTreeMap<RatioName, BenchmarkBand>;

/// Benchmark bands keyed by industry (`general`, `banking`, `oil_gas`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkTable(pub BTreeMap<String, IndustryBenchmarks>);

impl BenchmarkTable {
    /// Band for `ratio` under `industry`, falling back to the general set.
    pub fn band(&self, industry: &str, ratio: RatioName) -> AuditResult<BenchmarkBand> {
        if let Some(band) = self.0.get(industry).and_then(|set| set.get(&ratio)) {
            return Ok(*band);
        }
        self.0
            .get(GENERAL_INDUSTRY)
            .and_then(|set| set.get(&ratio))
            .copied()
            .ok_or_else(|| {
                AuditError::configuration(
                    "benchmarks",
                    format!("no benchmark for {ratio} under '{industry}' or '{GENERAL_INDUSTRY}'"),
                )
            })
    }

    pub fn has_industry(&self, industry: &str) -> bool {
        self.0.contains_key(industry)
    }

    fn validate(&self) -> AuditResult<()> {
        if !self.0.contains_key(GENERAL_INDUSTRY) {
            return Err(AuditError::configuration(
                "benchmarks",
                format!("the '{GENERAL_INDUSTRY}' benchmark set is required"),
            ));
        }
        for (industry, set) in &self.0 {
            for (ratio, band) in set {
                if band.weak == band.strong {
                    return Err(AuditError::configuration(
                        format!("benchmarks.{industry}.{ratio}"),
                        "weak and strong bounds must differ",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        use RatioName::*;

        let band = BenchmarkBand::new;
        let mut table = BTreeMap::new();

        table.insert(
            GENERAL_INDUSTRY.to_string(),
            BTreeMap::from([
                (CurrentRatio, band(dec!(1.0), dec!(2.0))),
                (QuickRatio, band(dec!(0.5), dec!(1.2))),
                (CashRatio, band(dec!(0.1), dec!(0.5))),
                (DebtToEquity, band(dec!(2.0), dec!(0.4))),
                (DebtToAssets, band(dec!(0.7), dec!(0.3))),
                (GrossProfitMargin, band(dec!(0.10), dec!(0.40))),
                (NetProfitMargin, band(dec!(0.0), dec!(0.15))),
                (ReturnOnAssets, band(dec!(0.0), dec!(0.10))),
                (ReturnOnEquity, band(dec!(0.0), dec!(0.18))),
                (AssetTurnover, band(dec!(0.3), dec!(1.2))),
                (CapitalAdequacyRatio, band(dec!(0.10), dec!(0.40))),
            ]),
        );
        table.insert(
            "banking".to_string(),
            BTreeMap::from([
                (CurrentRatio, band(dec!(1.0), dec!(1.5))),
                (CashRatio, band(dec!(0.2), dec!(0.4))),
                (DebtToEquity, band(dec!(14.0), dec!(6.0))),
                (DebtToAssets, band(dec!(0.95), dec!(0.85))),
                (ReturnOnAssets, band(dec!(0.0), dec!(0.02))),
                (ReturnOnEquity, band(dec!(0.0), dec!(0.20))),
                (CapitalAdequacyRatio, band(dec!(0.10), dec!(0.20))),
            ]),
        );
        table.insert(
            "manufacturing".to_string(),
            BTreeMap::from([
                (CurrentRatio, band(dec!(1.2), dec!(2.0))),
                (DebtToEquity, band(dec!(1.5), dec!(0.6))),
                (GrossProfitMargin, band(dec!(0.15), dec!(0.35))),
                (AssetTurnover, band(dec!(0.5), dec!(1.2))),
            ]),
        );
        table.insert(
            "oil_gas".to_string(),
            BTreeMap::from([
                (CurrentRatio, band(dec!(0.9), dec!(1.5))),
                (CashRatio, band(dec!(0.15), dec!(0.4))),
                (DebtToEquity, band(dec!(1.5), dec!(0.5))),
                (ReturnOnAssets, band(dec!(0.0), dec!(0.12))),
            ]),
        );
        table.insert(
            "telecom".to_string(),
            BTreeMap::from([
                (CurrentRatio, band(dec!(0.8), dec!(1.5))),
                (DebtToEquity, band(dec!(2.5), dec!(1.0))),
                (NetProfitMargin, band(dec!(0.0), dec!(0.20))),
            ]),
        );

        BenchmarkTable(table)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
