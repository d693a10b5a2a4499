//! Data-integrity checks on a classified statement.
//!
//! Anomalies are balances that cannot be right as submitted (negative cash,
//! revenue or assets; an accounting equation that does not close). Warnings
//! are figures that are possible but unusual enough to query with the client.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::classification::{AccountCategory, ClassifiedStatement};
use crate::currency::format_naira;
use crate::ratios::RatioSet;

/// Share of total assets the accounting equation may be off by.
pub const EQUATION_TOLERANCE: Decimal = dec!(0.01);
/// Asset turnover above this is implausible for a going concern.
pub const MAX_PLAUSIBLE_TURNOVER: Decimal = dec!(10);
/// Asset turnover below this suggests idle or misclassified assets.
pub const MIN_PLAUSIBLE_TURNOVER: Decimal = dec!(0.01);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityCheck {
    AccountingEquation,
    NegativeCash,
    NegativeRevenue,
    NegativeAssets,
    AssetTurnover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityFinding {
    pub check: IntegrityCheck,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub anomalies: Vec<IntegrityFinding>,
    pub warnings: Vec<IntegrityFinding>,
}

impl IntegrityReport {
    /// True when nothing was flagged as an anomaly.
    pub fn is_valid(&self) -> bool {
        self.anomalies.is_empty()
    }

    fn anomaly(&mut self, check: IntegrityCheck, message: String) {
        self.anomalies.push(IntegrityFinding { check, message });
    }

    fn warning(&mut self, check: IntegrityCheck, message: String) {
        self.warnings.push(IntegrityFinding { check, message });
    }
}

pub fn check_integrity(statement: &ClassifiedStatement, ratios: &RatioSet) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    if statement.is_empty() {
        return report;
    }

    let totals = statement.totals();
    let total_assets = totals.total_assets();

    // Debits less credits is assets less (liabilities + equity + current-year
    // result), so the imbalance is the accounting-equation difference.
    let difference = statement.imbalance().abs();
    let tolerance = (total_assets.abs() * EQUATION_TOLERANCE).round_dp(2);
    if difference > tolerance {
        report.anomaly(
            IntegrityCheck::AccountingEquation,
            format!(
                "Accounting equation imbalance of {} exceeds the 1% tolerance of {}",
                format_naira(difference),
                format_naira(tolerance)
            ),
        );
    }

    let cash = statement.category_total(AccountCategory::CashAndEquivalents);
    if cash < Decimal::ZERO {
        report.anomaly(
            IntegrityCheck::NegativeCash,
            format!("Negative cash and cash equivalents: {}", format_naira(cash)),
        );
    }
    if totals.revenue < Decimal::ZERO {
        report.anomaly(
            IntegrityCheck::NegativeRevenue,
            format!("Negative revenue: {}", format_naira(totals.revenue)),
        );
    }
    if total_assets < Decimal::ZERO {
        report.anomaly(
            IntegrityCheck::NegativeAssets,
            format!("Negative total assets: {}", format_naira(total_assets)),
        );
    }

    if total_assets > Decimal::ZERO {
        if let Some(turnover) = ratios.asset_turnover {
            if turnover > MAX_PLAUSIBLE_TURNOVER {
                report.warning(
                    IntegrityCheck::AssetTurnover,
                    format!("Unusually high asset turnover: {}", turnover.round_dp(2)),
                );
            } else if turnover < MIN_PLAUSIBLE_TURNOVER {
                report.warning(
                    IntegrityCheck::AssetTurnover,
                    format!("Unusually low asset turnover: {}", turnover.round_dp(2)),
                );
            }
        }
    }

    report
}
