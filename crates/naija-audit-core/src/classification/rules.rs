use super::taxonomy::AccountCategory;

/// Lowercase, spell out `&`, drop punctuation and collapse whitespace.
///
/// `"Trade Debtors & Prepayments (Lagos)"` becomes
/// `"trade debtors and prepayments lagos"`.
pub fn normalize_account_name(raw: &str) -> String {
    raw.to_lowercase()
        .replace('&', " and ")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// How a rule recognises an account.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Any of the phrases appears as a contiguous run of words, each phrase
    /// word being a prefix of the name word it lines up with.
    Phrases(&'static [&'static str]),
    /// The name starts with a numeric account code inside the inclusive range.
    CodeRange { low: u32, high: u32 },
}

impl Matcher {
    pub fn matches(&self, words: &[&str]) -> bool {
        match self {
            Matcher::Phrases(phrases) => phrases.iter().any(|p| phrase_matches(p, words)),
            Matcher::CodeRange { low, high } => leading_code(words)
                .map(|code| (*low..=*high).contains(&code))
                .unwrap_or(false),
        }
    }
}

fn phrase_matches(phrase: &str, words: &[&str]) -> bool {
    let needle: Vec<&str> = phrase.split(' ').collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words
        .windows(needle.len())
        .any(|window| window.iter().zip(&needle).all(|(w, n)| w.starts_with(n)))
}

/// Leading all-digit token of a normalized name, e.g. `4000` in "4000 misc".
fn leading_code(words: &[&str]) -> Option<u32> {
    let first = words.first()?;
    if first.chars().all(|c| c.is_ascii_digit()) {
        first.parse().ok()
    } else {
        None
    }
}

/// One entry in the ordered classification rule list.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub id: &'static str,
    pub category: AccountCategory,
    pub matcher: Matcher,
}

impl ClassificationRule {
    const fn phrases(
        id: &'static str,
        category: AccountCategory,
        phrases: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            category,
            matcher: Matcher::Phrases(phrases),
        }
    }

    const fn codes(id: &'static str, category: AccountCategory, low: u32, high: u32) -> Self {
        Self {
            id,
            category,
            matcher: Matcher::CodeRange { low, high },
        }
    }
}

/// Nigerian chart-of-accounts rules, most specific first. The first rule
/// that matches decides the category.
pub fn default_rules() -> Vec<ClassificationRule> {
    use AccountCategory::*;
    type R = ClassificationRule;

    vec![
        // Specific phrases that would otherwise be caught by broad words below.
        R::phrases(
            "cos.direct",
            CostOfSales,
            &[
                "cost of sales",
                "cost of goods",
                "cost of revenue",
                "cost of services",
                "cogs",
                "purchases",
                "direct material",
                "direct labour",
                "direct labor",
                "carriage inwards",
            ],
        ),
        R::phrases(
            "opex.bank_charges",
            OtherOperatingExpenses,
            &["bank charge", "bank fee", "bank commission"],
        ),
        R::phrases(
            "rev.other_income",
            OtherIncome,
            &[
                "interest income",
                "dividend income",
                "rental income",
                "rent income",
                "investment income",
                "other income",
                "commission income",
                "fee income",
                "gain on",
                "exchange gain",
                "sundry income",
                "miscellaneous income",
            ],
        ),
        R::phrases(
            "cl.short_term_borrowings",
            ShortTermBorrowings,
            &[
                "overdraft",
                "current portion",
                "short term loan",
                "short term borrowing",
                "commercial paper",
            ],
        ),
        R::phrases(
            "ncl.borrowings",
            LongTermBorrowings,
            &[
                "long term loan",
                "long term borrowing",
                "term loan",
                "bond",
                "debenture",
                "mortgage",
                "lease liabilit",
                "finance lease",
            ],
        ),
        R::phrases("ncl.deferred_tax", DeferredTax, &["deferred tax"]),
        R::phrases(
            "ncl.provisions",
            Provisions,
            &[
                "pension obligation",
                "gratuity provision",
                "gratuity liabilit",
                "long term provision",
                "decommissioning",
                "employee benefit obligation",
            ],
        ),
        R::phrases(
            "cl.tax",
            TaxLiabilities,
            &[
                "vat payable",
                "output vat",
                "vat output",
                "paye",
                "withholding tax payable",
                "tax payable",
                "income tax payable",
            ],
        ),
        R::phrases(
            "cl.accrued",
            AccruedLiabilities,
            &[
                "accrued expense",
                "accrued liabilit",
                "accrual",
                "unearned",
                "deferred revenue",
                "deferred income",
                "customer deposit",
                "advance from customer",
            ],
        ),
        R::phrases("cl.payables", TradePayables, &["payable", "creditor", "supplier"]),
        // Balance-sheet assets.
        R::phrases(
            "ca.cash",
            CashAndEquivalents,
            &[
                "cash",
                "bank",
                "petty cash",
                "call deposit",
                "fixed deposit",
                "treasury bill",
                "short term deposit",
                "current account",
                "domiciliary account",
                "gtbank",
                "gtb",
                "uba",
                "fcmb",
                "zenith",
                "stanbic",
                "ecobank",
                "access bank",
                "first bank",
            ],
        ),
        R::phrases(
            "ca.receivables",
            TradeReceivables,
            &["receivable", "debtor", "doubtful debt"],
        ),
        R::phrases(
            "ca.short_term_investments",
            OtherCurrentAssets,
            &["short term investment", "marketable securit"],
        ),
        R::phrases(
            "ca.prepayments",
            Prepayments,
            &[
                "prepaid",
                "prepayment",
                "advance",
                "input vat",
                "deposit paid",
                "security deposit",
                "withholding tax credit",
                "withholding tax receivable",
            ],
        ),
        R::phrases(
            "nca.ppe",
            PropertyPlantEquipment,
            &[
                "property",
                "plant",
                "equipment",
                "ppe",
                "building",
                "land",
                "motor vehicle",
                "vehicle",
                "furniture",
                "fixture",
                "computer",
                "machinery",
                "capital work in progress",
                "accumulated depreciation",
                "leasehold",
                "right of use",
            ],
        ),
        R::phrases(
            "nca.intangibles",
            IntangibleAssets,
            &[
                "intangible",
                "goodwill",
                "patent",
                "trademark",
                "software",
                "licence",
                "license",
                "accumulated amortisation",
                "accumulated amortization",
                "development cost",
            ],
        ),
        R::phrases(
            "nca.investments",
            Investments,
            &["investment", "associate", "joint venture"],
        ),
        // Equity.
        R::phrases(
            "eq.share_capital",
            ShareCapital,
            &[
                "share capital",
                "common stock",
                "preferred stock",
                "ordinary share",
                "preference share",
                "share premium",
                "stockholder",
            ],
        ),
        R::phrases(
            "eq.retained",
            RetainedEarnings,
            &[
                "retained earning",
                "retained profit",
                "accumulated profit",
                "accumulated loss",
                "revenue reserve",
            ],
        ),
        R::phrases(
            "ca.inventories",
            Inventories,
            &[
                "inventor",
                "stock",
                "raw material",
                "work in progress",
                "finished good",
                "goods in transit",
                "spare part",
            ],
        ),
        R::phrases(
            "eq.reserves",
            Reserves,
            &[
                "reserve",
                "equity",
                "capital",
                "drawing",
                "shareholder",
                "owner",
                "dividend",
            ],
        ),
        // Income statement.
        R::phrases(
            "rev.revenue",
            Revenue,
            &[
                "revenue",
                "sales",
                "turnover",
                "service income",
                "contract income",
                "fees earned",
            ],
        ),
        R::phrases(
            "opex.employee",
            EmployeeCosts,
            &[
                "salar",
                "wage",
                "staff",
                "payroll",
                "pension contribution",
                "employee benefit",
                "remuneration",
            ],
        ),
        R::phrases(
            "opex.depreciation",
            DepreciationAmortisation,
            &["depreciation", "amortisation", "amortization", "impairment"],
        ),
        R::phrases(
            "opex.finance",
            FinanceCosts,
            &[
                "interest expense",
                "interest paid",
                "finance cost",
                "finance charge",
                "loan interest",
                "interest on",
            ],
        ),
        R::phrases(
            "opex.tax",
            Taxation,
            &[
                "income tax expense",
                "tax expense",
                "taxation",
                "education tax",
                "company income tax",
                "cit expense",
            ],
        ),
        R::phrases(
            "opex.other",
            OtherOperatingExpenses,
            &[
                "expense",
                "rent",
                "utilit",
                "electricity",
                "diesel",
                "fuel",
                "generator",
                "insurance",
                "repair",
                "maintenance",
                "professional fee",
                "audit fee",
                "legal",
                "consultan",
                "advertis",
                "marketing",
                "travel",
                "transport",
                "telephone",
                "internet",
                "communication",
                "printing",
                "stationery",
                "postage",
                "security",
                "training",
                "donation",
                "subscription",
                "bad debt",
                "entertainment",
                "cleaning",
                "office",
                "administrative",
                "distribution",
                "selling",
                "overhead",
                "sundry",
                "miscellaneous",
                "levy",
                "penalt",
            ],
        ),
        // Numeric chart-of-accounts codes, only reached when no word matched.
        R::codes("code.current_assets", OtherCurrentAssets, 1000, 1499),
        R::codes("code.non_current_assets", PropertyPlantEquipment, 1500, 1999),
        R::codes("code.current_liabilities", TradePayables, 2000, 2499),
        R::codes("code.non_current_liabilities", LongTermBorrowings, 2500, 2999),
        R::codes("code.equity", Reserves, 3000, 3999),
        R::codes("code.revenue", Revenue, 4000, 4999),
        R::codes("code.cost_of_sales", CostOfSales, 5000, 5499),
        R::codes("code.operating_expenses", OtherOperatingExpenses, 5500, 6999),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(name: &str) -> Vec<String> {
        normalize_account_name(name)
            .split(' ')
            .map(str::to_string)
            .collect()
    }

    fn first_match(name: &str) -> Option<&'static str> {
        let owned = words(name);
        let w: Vec<&str> = owned.iter().map(String::as_str).collect();
        default_rules()
            .into_iter()
            .find(|r| r.matcher.matches(&w))
            .map(|r| r.id)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize_account_name("  Trade Debtors & Prepayments (Lagos) "),
            "trade debtors and prepayments lagos"
        );
        assert_eq!(normalize_account_name("A/R -- Zenith"), "a r zenith");
        assert_eq!(normalize_account_name("!!!"), "");
    }

    #[test]
    fn test_prefix_matching_is_word_anchored() {
        let w = ["accounts", "receivables"];
        assert!(phrase_matches("receivable", &w));
        // "rent" must not hit the middle of "current".
        assert!(!phrase_matches("rent", &["current", "account"]));
        assert!(phrase_matches("cost of sales", &["cost", "of", "sales", "local"]));
        assert!(!phrase_matches("cost of sales", &["cost", "sales"]));
    }

    #[test]
    fn test_rule_precedence() {
        assert_eq!(first_match("Cost of Sales"), Some("cos.direct"));
        assert_eq!(first_match("Sales"), Some("rev.revenue"));
        assert_eq!(first_match("Bank Charges"), Some("opex.bank_charges"));
        assert_eq!(first_match("Zenith Bank"), Some("ca.cash"));
        assert_eq!(first_match("Bank Overdraft"), Some("cl.short_term_borrowings"));
        assert_eq!(first_match("VAT Payable"), Some("cl.tax"));
        assert_eq!(first_match("Accounts Payable"), Some("cl.payables"));
        assert_eq!(first_match("Interest Income"), Some("rev.other_income"));
        assert_eq!(first_match("Share Capital"), Some("eq.share_capital"));
        assert_eq!(first_match("Stock"), Some("ca.inventories"));
        assert_eq!(first_match("Office Rent"), Some("opex.other"));
    }

    #[test]
    fn test_code_fallback_only_after_keywords() {
        assert_eq!(first_match("1010"), Some("code.current_assets"));
        assert_eq!(first_match("4000 - Misc"), Some("code.revenue"));
        assert_eq!(first_match("2100 Trade Creditors"), Some("cl.payables"));
        assert_eq!(first_match("9000"), None);
        assert_eq!(first_match("Suspense"), None);
    }
}
