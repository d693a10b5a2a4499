use rust_decimal::Decimal;
use tracing::trace;

use super::RatioSet;
use crate::classification::{AccountCategory, ClassifiedStatement};
use crate::types::{round_ratio, Money, Multiple};

/// Derives the ratio set from section totals.
///
/// Pure arithmetic: a zero denominator yields `None`, negative inputs flow
/// through unclamped, and rounding to four places happens once per ratio
/// after the division. Operands and quotients are formed with checked
/// arithmetic; one that leaves the decimal range also yields `None`.
#[derive(Debug, Clone, Default)]
pub struct RatioEngine {
    risk_weighted_assets: Option<Money>,
}

impl RatioEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use supplied risk-weighted assets as the capital adequacy denominator
    /// instead of total assets.
    pub fn with_risk_weighted_assets(risk_weighted_assets: Option<Money>) -> Self {
        Self {
            risk_weighted_assets,
        }
    }

    pub fn compute(&self, statement: &ClassifiedStatement) -> RatioSet {
        let t = statement.totals();

        let current_assets = Some(t.current_assets);
        let current_liabilities = Some(t.current_liabilities);
        let inventories = statement.category_total(AccountCategory::Inventories);
        let cash = Some(statement.category_total(AccountCategory::CashAndEquivalents));
        let total_assets = t.current_assets.checked_add(t.non_current_assets);
        let total_liabilities = t
            .current_liabilities
            .checked_add(t.non_current_liabilities);
        let equity = Some(t.equity);
        let revenue = Some(t.revenue);
        let gross_profit = t.revenue.checked_sub(t.cost_of_sales);
        let net_income = gross_profit.and_then(|g| g.checked_sub(t.operating_expenses));
        let quick_assets = t.current_assets.checked_sub(inventories);

        let capital_base = self.risk_weighted_assets.or(total_assets);

        let ratios = RatioSet {
            current_ratio: ratio(current_assets, current_liabilities),
            quick_ratio: ratio(quick_assets, current_liabilities),
            cash_ratio: ratio(cash, current_liabilities),
            debt_to_equity: ratio(total_liabilities, equity),
            debt_to_assets: ratio(total_liabilities, total_assets),
            gross_profit_margin: ratio(gross_profit, revenue),
            net_profit_margin: ratio(net_income, revenue),
            return_on_assets: ratio(net_income, total_assets),
            return_on_equity: ratio(net_income, equity),
            asset_turnover: ratio(revenue, total_assets),
            capital_adequacy_ratio: ratio(equity, capital_base),
        };
        trace!(determinable = ratios.determinable_count(), "ratios computed");
        ratios
    }
}

fn ratio(numerator: Option<Decimal>, denominator: Option<Decimal>) -> Option<Multiple> {
    let (numerator, denominator) = (numerator?, denominator?);
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator).map(round_ratio)
    }
}

/// Ratios for a statement, with capital adequacy measured against total assets.
pub fn compute_ratios(statement: &ClassifiedStatement) -> RatioSet {
    RatioEngine::default().compute(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{classify, TrialBalance};
    use rust_decimal_macros::dec;

    fn statement(entries: &[(&str, Decimal)]) -> ClassifiedStatement {
        classify(&TrialBalance::from_entries(entries.iter().map(|(n, a)| (*n, *a))).unwrap())
    }

    #[test]
    fn test_current_ratio_scenario() {
        let stmt = statement(&[
            ("Cash", dec!(5_000_000)),
            ("Accounts Receivable", dec!(12_000_000)),
            ("Accounts Payable", dec!(4_500_000)),
        ]);
        let r = compute_ratios(&stmt);
        assert_eq!(r.current_ratio, Some(dec!(3.7778)));
        assert_eq!(r.quick_ratio, Some(dec!(3.7778)));
        assert_eq!(r.cash_ratio, Some(dec!(1.1111)));
        // No equity or revenue: undefined, not zero.
        assert_eq!(r.debt_to_equity, None);
        assert_eq!(r.net_profit_margin, None);
    }

    #[test]
    fn test_zero_current_liabilities_gives_null() {
        let stmt = statement(&[("Cash", dec!(100)), ("Share Capital", dec!(100))]);
        let r = compute_ratios(&stmt);
        assert_eq!(r.current_ratio, None);
        assert_eq!(r.quick_ratio, None);
        assert_eq!(r.cash_ratio, None);
        assert_eq!(r.debt_to_equity, Some(dec!(0)));
    }

    #[test]
    fn test_full_statement() {
        let stmt = statement(&[
            ("Cash", dec!(200)),
            ("Inventory", dec!(300)),
            ("Plant and Machinery", dec!(500)),
            ("Trade Payables", dec!(250)),
            ("Long Term Loan", dec!(250)),
            ("Share Capital", dec!(400)),
            ("Retained Earnings", dec!(100)),
            ("Revenue", dec!(1000)),
            ("Cost of Sales", dec!(600)),
            ("Salaries", dec!(200)),
        ]);
        let r = compute_ratios(&stmt);
        assert_eq!(r.current_ratio, Some(dec!(2)));
        assert_eq!(r.quick_ratio, Some(dec!(0.8)));
        assert_eq!(r.cash_ratio, Some(dec!(0.8)));
        assert_eq!(r.debt_to_equity, Some(dec!(1)));
        assert_eq!(r.debt_to_assets, Some(dec!(0.5)));
        assert_eq!(r.gross_profit_margin, Some(dec!(0.4)));
        assert_eq!(r.net_profit_margin, Some(dec!(0.2)));
        assert_eq!(r.return_on_assets, Some(dec!(0.2)));
        assert_eq!(r.return_on_equity, Some(dec!(0.4)));
        assert_eq!(r.asset_turnover, Some(dec!(1)));
        assert_eq!(r.capital_adequacy_ratio, Some(dec!(0.5)));
    }

    #[test]
    fn test_negative_equity_propagates() {
        let stmt = statement(&[
            ("Cash", dec!(100)),
            ("Trade Payables", dec!(300)),
            ("Accumulated Losses", dec!(-200)),
        ]);
        let r = compute_ratios(&stmt);
        assert_eq!(r.debt_to_equity, Some(dec!(-1.5)));
    }

    #[test]
    fn test_risk_weighted_assets_override() {
        let stmt = statement(&[("Cash", dec!(1000)), ("Share Capital", dec!(150))]);
        let r = RatioEngine::with_risk_weighted_assets(Some(dec!(600))).compute(&stmt);
        assert_eq!(r.capital_adequacy_ratio, Some(dec!(0.25)));
        let r = RatioEngine::with_risk_weighted_assets(Some(Decimal::ZERO)).compute(&stmt);
        assert_eq!(r.capital_adequacy_ratio, None);
    }

    #[test]
    fn test_near_limit_amounts_do_not_panic() {
        let stmt = statement(&[
            ("Revenue", dec!(40_000_000_000_000_000_000_000_000_000)),
            ("Cost of Sales", dec!(-39_000_000_000_000_000_000_000_000_000)),
        ]);
        let r = compute_ratios(&stmt);
        assert_eq!(r.gross_profit_margin, Some(dec!(1.975)));
        assert_eq!(r.net_profit_margin, Some(dec!(1.975)));
        assert_eq!(r.asset_turnover, None);
    }

    #[test]
    fn test_quotient_beyond_range_is_undefined() {
        assert_eq!(ratio(Some(Decimal::MAX), Some(dec!(0.5))), None);
        assert_eq!(ratio(None, Some(dec!(2))), None);
        assert_eq!(ratio(Some(dec!(3)), None), None);
        assert_eq!(ratio(Some(dec!(3)), Some(dec!(2))), Some(dec!(1.5)));
    }
}
