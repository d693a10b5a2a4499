use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::taxonomy::{AccountCategory, Section};
use crate::types::Money;

/// One trial-balance line after classification. The amount keeps the sign
/// it was submitted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub account_name: String,
    pub normalized_name: String,
    pub amount: Money,
    pub category: AccountCategory,
    pub section: Section,
    /// Id of the rule that matched; `None` for unclassified lines.
    pub rule_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionTotals {
    pub current_assets: Money,
    pub non_current_assets: Money,
    pub current_liabilities: Money,
    pub non_current_liabilities: Money,
    pub equity: Money,
    pub revenue: Money,
    pub cost_of_sales: Money,
    pub operating_expenses: Money,
    pub other: Money,
}

impl SectionTotals {
    fn slot(&mut self, section: Section) -> &mut Money {
        match section {
            Section::CurrentAssets => &mut self.current_assets,
            Section::NonCurrentAssets => &mut self.non_current_assets,
            Section::CurrentLiabilities => &mut self.current_liabilities,
            Section::NonCurrentLiabilities => &mut self.non_current_liabilities,
            Section::Equity => &mut self.equity,
            Section::Revenue => &mut self.revenue,
            Section::CostOfSales => &mut self.cost_of_sales,
            Section::OperatingExpenses => &mut self.operating_expenses,
            Section::Other => &mut self.other,
        }
    }

    pub fn get(&self, section: Section) -> Money {
        match section {
            Section::CurrentAssets => self.current_assets,
            Section::NonCurrentAssets => self.non_current_assets,
            Section::CurrentLiabilities => self.current_liabilities,
            Section::NonCurrentLiabilities => self.non_current_liabilities,
            Section::Equity => self.equity,
            Section::Revenue => self.revenue,
            Section::CostOfSales => self.cost_of_sales,
            Section::OperatingExpenses => self.operating_expenses,
            Section::Other => self.other,
        }
    }

    pub fn total_assets(&self) -> Money {
        self.current_assets.saturating_add(self.non_current_assets)
    }

    pub fn total_liabilities(&self) -> Money {
        self.current_liabilities
            .saturating_add(self.non_current_liabilities)
    }

    /// Revenue less cost of sales less operating expenses (tax included).
    pub fn net_income(&self) -> Money {
        self.revenue
            .saturating_sub(self.cost_of_sales)
            .saturating_sub(self.operating_expenses)
    }

    pub fn sum_all(&self) -> Money {
        sum(Section::ALL.iter().map(|s| self.get(*s)))
    }

    /// Debit-normal sections (assets and expenses).
    pub fn debit_side(&self) -> Money {
        sum(Section::ALL
            .iter()
            .filter(|s| s.is_debit_normal())
            .map(|s| self.get(*s)))
    }

    /// Credit-normal sections (liabilities, equity, income). `other` is on
    /// neither side.
    pub fn credit_side(&self) -> Money {
        sum(Section::ALL
            .iter()
            .filter(|s| !s.is_debit_normal() && **s != Section::Other)
            .map(|s| self.get(*s)))
    }
}

/// Totals built from a `TrialBalance` never reach the decimal bounds; totals
/// assembled by hand saturate there instead of panicking.
fn sum(amounts: impl Iterator<Item = Money>) -> Money {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Per-category subtotal with its governing standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScheduleRow {
    pub category: AccountCategory,
    pub ifrs_reference: String,
    pub section: Section,
    pub balance: Money,
    pub accounts: Vec<String>,
}

/// Immutable result of classifying a trial balance. Every input line appears
/// exactly once, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedStatement {
    lines: Vec<ClassifiedLine>,
    totals: SectionTotals,
    unclassified: Vec<String>,
}

impl ClassifiedStatement {
    pub(crate) fn from_lines(lines: Vec<ClassifiedLine>) -> Self {
        let mut totals = SectionTotals::default();
        let mut unclassified = Vec::new();
        for line in &lines {
            let slot = totals.slot(line.section);
            *slot = slot.saturating_add(line.amount);
            if line.category == AccountCategory::Unclassified {
                unclassified.push(line.account_name.clone());
            }
        }
        Self {
            lines,
            totals,
            unclassified,
        }
    }

    pub fn lines(&self) -> &[ClassifiedLine] {
        &self.lines
    }

    pub fn totals(&self) -> &SectionTotals {
        &self.totals
    }

    /// Account names that matched no rule and need review.
    pub fn unclassified(&self) -> &[String] {
        &self.unclassified
    }

    pub fn section_lines(&self, section: Section) -> impl Iterator<Item = &ClassifiedLine> {
        self.lines.iter().filter(move |l| l.section == section)
    }

    pub fn total(&self, section: Section) -> Money {
        self.totals.get(section)
    }

    pub fn category_total(&self, category: AccountCategory) -> Money {
        sum(self
            .lines
            .iter()
            .filter(|l| l.category == category)
            .map(|l| l.amount))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Difference between the debit and credit sides of the statement.
    pub fn imbalance(&self) -> Money {
        self.totals.debit_side().saturating_sub(self.totals.credit_side())
    }

    pub fn lead_schedule(&self) -> Vec<LeadScheduleRow> {
        let mut grouped: BTreeMap<AccountCategory, (Decimal, Vec<String>)> = BTreeMap::new();
        for line in &self.lines {
            let entry = grouped
                .entry(line.category)
                .or_insert_with(|| (Decimal::ZERO, Vec::new()));
            entry.0 += line.amount;
            entry.1.push(line.account_name.clone());
        }
        grouped
            .into_iter()
            .map(|(category, (balance, accounts))| LeadScheduleRow {
                category,
                ifrs_reference: category.ifrs_reference().to_string(),
                section: category.section(),
                balance,
                accounts,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(name: &str, amount: Decimal, category: AccountCategory) -> ClassifiedLine {
        ClassifiedLine {
            account_name: name.into(),
            normalized_name: name.to_lowercase(),
            amount,
            category,
            section: category.section(),
            rule_id: None,
        }
    }

    #[test]
    fn test_totals_and_helpers() {
        let stmt = ClassifiedStatement::from_lines(vec![
            line("Cash", dec!(100), AccountCategory::CashAndEquivalents),
            line("Plant", dec!(400), AccountCategory::PropertyPlantEquipment),
            line("Payables", dec!(50), AccountCategory::TradePayables),
            line("Loan", dec!(150), AccountCategory::LongTermBorrowings),
            line("Sales", dec!(1000), AccountCategory::Revenue),
            line("COGS", dec!(600), AccountCategory::CostOfSales),
            line("Rent", dec!(100), AccountCategory::OtherOperatingExpenses),
            line("Suspense", dec!(7), AccountCategory::Unclassified),
        ]);
        let t = stmt.totals();
        assert_eq!(t.total_assets(), dec!(500));
        assert_eq!(t.total_liabilities(), dec!(200));
        assert_eq!(t.net_income(), dec!(300));
        assert_eq!(t.other, dec!(7));
        assert_eq!(t.sum_all(), dec!(2407));
        assert_eq!(stmt.unclassified(), &["Suspense".to_string()]);
        assert_eq!(stmt.section_lines(Section::CurrentAssets).count(), 1);
    }

    #[test]
    fn test_hand_built_totals_saturate() {
        let t = SectionTotals {
            current_assets: Decimal::MAX,
            non_current_assets: Decimal::MAX,
            revenue: Decimal::MIN,
            cost_of_sales: Decimal::MAX,
            ..SectionTotals::default()
        };
        assert_eq!(t.total_assets(), Decimal::MAX);
        assert_eq!(t.net_income(), Decimal::MIN);
        assert_eq!(t.debit_side(), Decimal::MAX);
    }

    #[test]
    fn test_imbalance_ignores_other() {
        let stmt = ClassifiedStatement::from_lines(vec![
            line("Cash", dec!(300), AccountCategory::CashAndEquivalents),
            line("Share Capital", dec!(300), AccountCategory::ShareCapital),
            line("Suspense", dec!(55), AccountCategory::Unclassified),
        ]);
        assert_eq!(stmt.imbalance(), Decimal::ZERO);
    }

    #[test]
    fn test_lead_schedule_groups_by_category() {
        let stmt = ClassifiedStatement::from_lines(vec![
            line("GTBank", dec!(10), AccountCategory::CashAndEquivalents),
            line("Sales", dec!(90), AccountCategory::Revenue),
            line("Petty Cash", dec!(5), AccountCategory::CashAndEquivalents),
        ]);
        let schedule = stmt.lead_schedule();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].category, AccountCategory::CashAndEquivalents);
        assert_eq!(schedule[0].balance, dec!(15));
        assert_eq!(schedule[0].ifrs_reference, "IAS 7");
        assert_eq!(schedule[0].accounts, vec!["GTBank", "Petty Cash"]);
    }
}
