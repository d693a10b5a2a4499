use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SizeThresholds;
use crate::error::AuditError;
use crate::types::{Money, Rate};
use crate::AuditResult;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyType {
    Manufacturing,
    Banking,
    OilGas,
    #[serde(alias = "telecommunications")]
    Telecom,
    Services,
    Agriculture,
    Retail,
    Construction,
    #[serde(other)]
    Other,
}

impl CompanyType {
    /// Key of the benchmark set this company type defaults to.
    pub fn benchmark_key(&self) -> &'static str {
        match self {
            Self::Manufacturing => "manufacturing",
            Self::Banking => "banking",
            Self::OilGas => "oil_gas",
            Self::Telecom => "telecom",
            Self::Services => "services",
            Self::Agriculture => "agriculture",
            Self::Retail => "retail",
            Self::Construction => "construction",
            Self::Other => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanySize {
    Small,
    Medium,
    Large,
}

impl CompanySize {
    /// Revenue-based size class used for tax tiering.
    pub fn from_revenue(annual_revenue: Money, thresholds: &SizeThresholds) -> Self {
        if annual_revenue <= thresholds.small_max_revenue {
            Self::Small
        } else if annual_revenue <= thresholds.medium_max_revenue {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

impl std::fmt::Display for CompanySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Filing and registration evidence supplied with the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceEvidence {
    pub vat_registered: bool,
    pub tax_returns_filed: bool,
    pub annual_returns_filed: bool,
    pub financial_statements_filed: bool,
    pub ifrs_compliant: bool,
    /// CIT rate the company filed at, as a decimal (0.20 = 20%).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_cit_rate: Option<Rate>,
}

impl Default for ComplianceEvidence {
    fn default() -> Self {
        Self {
            vat_registered: false,
            tax_returns_filed: false,
            annual_returns_filed: false,
            financial_statements_filed: false,
            ifrs_compliant: true,
            declared_cit_rate: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(rename = "type", alias = "company_type")]
    pub company_type: CompanyType,
    pub industry: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cac_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tin_number: Option<String>,
    pub annual_revenue: Money,
    pub total_assets: Money,
    #[serde(default)]
    pub employee_count: u32,
    /// Size the client claims. Reported against, never used for tax lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_size: Option<CompanySize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_year_end: Option<NaiveDate>,
    /// Risk-weighted assets for banks; improves the capital adequacy ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_weighted_assets: Option<Money>,
    #[serde(default)]
    pub evidence: ComplianceEvidence,
}

impl CompanyProfile {
    pub fn validate(&self) -> AuditResult<()> {
        if self.industry.trim().is_empty() {
            return Err(AuditError::validation(
                "profile.industry",
                "Industry is required.",
            ));
        }
        if let Some(rate) = self.evidence.declared_cit_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(AuditError::validation(
                    "profile.evidence.declared_cit_rate",
                    format!("Declared CIT rate {rate} must be a decimal between 0 and 1."),
                ));
            }
        }
        Ok(())
    }

    /// Size recomputed from revenue. Any `declared_size` is ignored here.
    pub fn size(&self, thresholds: &SizeThresholds) -> CompanySize {
        CompanySize::from_revenue(self.annual_revenue, thresholds)
    }

    /// Industry normalised to a benchmark key: "Oil & Gas" -> "oil_gas".
    pub fn industry_key(&self) -> String {
        industry_key(&self.industry)
    }

    pub fn cac_number(&self) -> Option<&str> {
        self.cac_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn tin_number(&self) -> Option<&str> {
        self.tin_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_bank(&self) -> bool {
        self.company_type == CompanyType::Banking
    }
}

fn industry_key(raw: &str) -> String {
    raw.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty() && *part != "and")
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_profile() -> CompanyProfile {
        CompanyProfile {
            company_name: Some("Adebayo Foods Ltd".into()),
            company_type: CompanyType::Manufacturing,
            industry: "Manufacturing".into(),
            is_public: false,
            cac_number: Some("RC123456".into()),
            tin_number: Some("12345678-0001".into()),
            annual_revenue: dec!(50_000_000),
            total_assets: dec!(80_000_000),
            employee_count: 40,
            declared_size: None,
            financial_year_end: None,
            risk_weighted_assets: None,
            evidence: ComplianceEvidence::default(),
        }
    }

    #[test]
    fn test_size_is_revenue_based() {
        let t = SizeThresholds::default();
        assert_eq!(CompanySize::from_revenue(dec!(25_000_000), &t), CompanySize::Small);
        assert_eq!(CompanySize::from_revenue(dec!(25_000_001), &t), CompanySize::Medium);
        assert_eq!(CompanySize::from_revenue(dec!(100_000_000), &t), CompanySize::Medium);
        assert_eq!(CompanySize::from_revenue(dec!(100_000_001), &t), CompanySize::Large);
        assert_eq!(CompanySize::from_revenue(dec!(-5), &t), CompanySize::Small);
    }

    #[test]
    fn test_declared_size_does_not_override() {
        let mut p = sample_profile();
        p.declared_size = Some(CompanySize::Small);
        assert_eq!(p.size(&SizeThresholds::default()), CompanySize::Medium);
    }

    #[test]
    fn test_industry_key_normalisation() {
        let mut p = sample_profile();
        p.industry = "Oil & Gas".into();
        assert_eq!(p.industry_key(), "oil_gas");
        p.industry = "  Telecom ".into();
        assert_eq!(p.industry_key(), "telecom");
    }

    #[test]
    fn test_blank_industry_rejected() {
        let mut p = sample_profile();
        p.industry = "   ".into();
        match p.validate().unwrap_err() {
            AuditError::Validation { field, .. } => assert_eq!(field, "profile.industry"),
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_declared_rate_rejected() {
        let mut p = sample_profile();
        p.evidence.declared_cit_rate = Some(dec!(20));
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_type_key_and_defaults() {
        let p: CompanyProfile = serde_json::from_str(
            r#"{
                "type": "oil_gas",
                "industry": "Oil and Gas",
                "annual_revenue": 120000000,
                "total_assets": "300000000"
            }"#,
        )
        .unwrap();
        assert_eq!(p.company_type, CompanyType::OilGas);
        assert_eq!(p.cac_number(), None);
        assert!(p.evidence.ifrs_compliant);
        assert!(!p.evidence.vat_registered);
        assert_eq!(p.industry_key(), "oil_gas");
    }

    #[test]
    fn test_unknown_company_type_maps_to_other() {
        let p: CompanyProfile = serde_json::from_str(
            r#"{"type": "fintech", "industry": "x", "annual_revenue": 1, "total_assets": 1}"#,
        )
        .unwrap();
        assert_eq!(p.company_type, CompanyType::Other);
    }

    #[test]
    fn test_blank_identifiers_read_as_absent() {
        let mut p = sample_profile();
        p.cac_number = Some("   ".into());
        assert_eq!(p.cac_number(), None);
        assert_eq!(p.tin_number(), Some("12345678-0001"));
    }
}
