//! Financial ratios derived from a classified statement.

pub mod engine;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Multiple;

pub use engine::{compute_ratios, RatioEngine};

/// Every ratio the engine derives, addressable by name for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioName {
    CurrentRatio,
    QuickRatio,
    CashRatio,
    DebtToEquity,
    DebtToAssets,
    GrossProfitMargin,
    NetProfitMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    AssetTurnover,
    CapitalAdequacyRatio,
}

impl RatioName {
    pub const ALL: [RatioName; 11] = [
        RatioName::CurrentRatio,
        RatioName::QuickRatio,
        RatioName::CashRatio,
        RatioName::DebtToEquity,
        RatioName::DebtToAssets,
        RatioName::GrossProfitMargin,
        RatioName::NetProfitMargin,
        RatioName::ReturnOnAssets,
        RatioName::ReturnOnEquity,
        RatioName::AssetTurnover,
        RatioName::CapitalAdequacyRatio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentRatio => "current_ratio",
            Self::QuickRatio => "quick_ratio",
            Self::CashRatio => "cash_ratio",
            Self::DebtToEquity => "debt_to_equity",
            Self::DebtToAssets => "debt_to_assets",
            Self::GrossProfitMargin => "gross_profit_margin",
            Self::NetProfitMargin => "net_profit_margin",
            Self::ReturnOnAssets => "return_on_assets",
            Self::ReturnOnEquity => "return_on_equity",
            Self::AssetTurnover => "asset_turnover",
            Self::CapitalAdequacyRatio => "capital_adequacy_ratio",
        }
    }
}

impl fmt::Display for RatioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed ratios. `None` (serialized as `null`) means the ratio is
/// undefined: its denominator was zero, or an operand or the quotient fell
/// outside the decimal range (only reachable with amounts near
/// `Decimal::MAX`, such as a near-limit revenue over a fractional asset
/// base).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    pub current_ratio: Option<Multiple>,
    pub quick_ratio: Option<Multiple>,
    pub cash_ratio: Option<Multiple>,
    pub debt_to_equity: Option<Multiple>,
    pub debt_to_assets: Option<Multiple>,
    pub gross_profit_margin: Option<Multiple>,
    pub net_profit_margin: Option<Multiple>,
    pub return_on_assets: Option<Multiple>,
    pub return_on_equity: Option<Multiple>,
    pub asset_turnover: Option<Multiple>,
    pub capital_adequacy_ratio: Option<Multiple>,
}

impl RatioSet {
    pub fn get(&self, name: RatioName) -> Option<Multiple> {
        match name {
            RatioName::CurrentRatio => self.current_ratio,
            RatioName::QuickRatio => self.quick_ratio,
            RatioName::CashRatio => self.cash_ratio,
            RatioName::DebtToEquity => self.debt_to_equity,
            RatioName::DebtToAssets => self.debt_to_assets,
            RatioName::GrossProfitMargin => self.gross_profit_margin,
            RatioName::NetProfitMargin => self.net_profit_margin,
            RatioName::ReturnOnAssets => self.return_on_assets,
            RatioName::ReturnOnEquity => self.return_on_equity,
            RatioName::AssetTurnover => self.asset_turnover,
            RatioName::CapitalAdequacyRatio => self.capital_adequacy_ratio,
        }
    }

    /// All ratios in declaration order, defined or not.
    pub fn iter(&self) -> impl Iterator<Item = (RatioName, Option<Multiple>)> + '_ {
        RatioName::ALL.iter().map(move |name| (*name, self.get(*name)))
    }

    pub fn determinable_count(&self) -> usize {
        self.iter().filter(|(_, value)| value.is_some()).count()
    }
}
