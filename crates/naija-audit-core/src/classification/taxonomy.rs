use serde::{Deserialize, Serialize};

/// Statement section every classified line lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    CurrentAssets,
    NonCurrentAssets,
    CurrentLiabilities,
    NonCurrentLiabilities,
    Equity,
    Revenue,
    CostOfSales,
    OperatingExpenses,
    Other,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::CurrentAssets,
        Section::NonCurrentAssets,
        Section::CurrentLiabilities,
        Section::NonCurrentLiabilities,
        Section::Equity,
        Section::Revenue,
        Section::CostOfSales,
        Section::OperatingExpenses,
        Section::Other,
    ];

    /// Sections carrying a debit balance in a trial balance.
    pub fn is_debit_normal(&self) -> bool {
        matches!(
            self,
            Self::CurrentAssets | Self::NonCurrentAssets | Self::CostOfSales | Self::OperatingExpenses
        )
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CurrentAssets => "current_assets",
            Self::NonCurrentAssets => "non_current_assets",
            Self::CurrentLiabilities => "current_liabilities",
            Self::NonCurrentLiabilities => "non_current_liabilities",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::CostOfSales => "cost_of_sales",
            Self::OperatingExpenses => "operating_expenses",
            Self::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// Canonical chart-of-accounts category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCategory {
    // Current assets
    CashAndEquivalents,
    TradeReceivables,
    Inventories,
    Prepayments,
    OtherCurrentAssets,
    // Non-current assets
    PropertyPlantEquipment,
    IntangibleAssets,
    Investments,
    // Current liabilities
    TradePayables,
    AccruedLiabilities,
    ShortTermBorrowings,
    TaxLiabilities,
    // Non-current liabilities
    LongTermBorrowings,
    DeferredTax,
    Provisions,
    // Equity
    ShareCapital,
    RetainedEarnings,
    Reserves,
    // Income statement
    Revenue,
    OtherIncome,
    CostOfSales,
    EmployeeCosts,
    DepreciationAmortisation,
    FinanceCosts,
    Taxation,
    OtherOperatingExpenses,
    Unclassified,
}

impl AccountCategory {
    pub fn section(&self) -> Section {
        use AccountCategory::*;
        match self {
            CashAndEquivalents | TradeReceivables | Inventories | Prepayments
            | OtherCurrentAssets => Section::CurrentAssets,
            PropertyPlantEquipment | IntangibleAssets | Investments => Section::NonCurrentAssets,
            TradePayables | AccruedLiabilities | ShortTermBorrowings | TaxLiabilities => {
                Section::CurrentLiabilities
            }
            LongTermBorrowings | DeferredTax | Provisions => Section::NonCurrentLiabilities,
            ShareCapital | RetainedEarnings | Reserves => Section::Equity,
            Revenue | OtherIncome => Section::Revenue,
            CostOfSales => Section::CostOfSales,
            EmployeeCosts | DepreciationAmortisation | FinanceCosts | Taxation
            | OtherOperatingExpenses => Section::OperatingExpenses,
            Unclassified => Section::Other,
        }
    }

    /// Governing IFRS / IAS standard for the caption.
    pub fn ifrs_reference(&self) -> &'static str {
        use AccountCategory::*;
        match self {
            CashAndEquivalents => "IAS 7",
            TradeReceivables | Investments | TradePayables | ShortTermBorrowings
            | LongTermBorrowings => "IFRS 9",
            Inventories | CostOfSales => "IAS 2",
            Prepayments | OtherCurrentAssets | ShareCapital | RetainedEarnings | Reserves
            | OtherOperatingExpenses => "IAS 1",
            PropertyPlantEquipment => "IAS 16",
            IntangibleAssets => "IAS 38",
            AccruedLiabilities | Provisions => "IAS 37",
            TaxLiabilities | DeferredTax | Taxation => "IAS 12",
            Revenue | OtherIncome => "IFRS 15",
            EmployeeCosts => "IAS 19",
            DepreciationAmortisation => "IAS 16 / IAS 38",
            FinanceCosts => "IAS 23",
            Unclassified => "N/A",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_normal_sections() {
        assert!(Section::CurrentAssets.is_debit_normal());
        assert!(Section::OperatingExpenses.is_debit_normal());
        assert!(!Section::Equity.is_debit_normal());
        assert!(!Section::Revenue.is_debit_normal());
        assert!(!Section::Other.is_debit_normal());
    }

    #[test]
    fn test_category_sections() {
        assert_eq!(AccountCategory::Inventories.section(), Section::CurrentAssets);
        assert_eq!(AccountCategory::OtherIncome.section(), Section::Revenue);
        assert_eq!(AccountCategory::Taxation.section(), Section::OperatingExpenses);
        assert_eq!(AccountCategory::Unclassified.section(), Section::Other);
    }

    #[test]
    fn test_ifrs_references() {
        assert_eq!(AccountCategory::CashAndEquivalents.ifrs_reference(), "IAS 7");
        assert_eq!(AccountCategory::Revenue.ifrs_reference(), "IFRS 15");
        assert_eq!(AccountCategory::Unclassified.ifrs_reference(), "N/A");
    }
}
