use chrono::NaiveDate;
use naija_audit_core::classification::{classify, ClassifiedStatement, TrialBalance};
use naija_audit_core::compliance::{
    check_compliance, cit_rate_for_revenue, parse_regulations, ComplianceResult,
    ComplianceStatus, Regulation, RuleRegistry, Severity,
};
use naija_audit_core::profile::{CompanyProfile, CompanySize};
use naija_audit_core::ratios::compute_ratios;
use naija_audit_core::{AuditError, EngineConfig};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn profile(overrides: serde_json::Value) -> CompanyProfile {
    let mut base = serde_json::json!({
        "company_name": "Ikeja Foods Ltd",
        "type": "manufacturing",
        "industry": "Food Processing",
        "cac_number": "RC1234567",
        "tin_number": "12345678-0001",
        "annual_revenue": "50000000",
        "total_assets": "30000000",
        "financial_year_end": "2024-12-31",
        "evidence": {
            "vat_registered": true,
            "tax_returns_filed": true,
            "annual_returns_filed": true,
            "financial_statements_filed": true
        }
    });
    if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(base).unwrap()
}

fn statement(entries: &[(&str, Decimal)]) -> ClassifiedStatement {
    classify(&TrialBalance::from_entries(entries.iter().map(|(n, a)| (*n, *a))).unwrap())
}

fn balanced() -> ClassifiedStatement {
    statement(&[
        ("Cash at Bank", dec!(6_000_000)),
        ("Trade Receivables", dec!(4_000_000)),
        ("Trade Payables", dec!(3_000_000)),
        ("Share Capital", dec!(5_000_000)),
        ("Sales", dec!(50_000_000)),
        ("Cost of Sales", dec!(35_000_000)),
        ("Salaries", dec!(13_000_000)),
    ])
}

fn check(p: &CompanyProfile, stmt: &ClassifiedStatement, regs: &[&str]) -> ComplianceResult {
    let regs = parse_regulations(regs).unwrap();
    check_compliance(p, stmt, &compute_ratios(stmt), &regs, &EngineConfig::default()).unwrap()
}

// ===========================================================================
// Tax tiers
// ===========================================================================

#[test]
fn test_medium_company_pays_twenty_percent() {
    let config = EngineConfig::default();
    assert_eq!(
        cit_rate_for_revenue(dec!(50_000_000), &config),
        (CompanySize::Medium, dec!(0.20))
    );
    assert_eq!(
        cit_rate_for_revenue(dec!(25_000_001), &config),
        (CompanySize::Medium, dec!(0.20))
    );
    assert_eq!(
        cit_rate_for_revenue(dec!(100_000_000), &config),
        (CompanySize::Medium, dec!(0.20))
    );
    assert_eq!(
        cit_rate_for_revenue(dec!(1_000), &config),
        (CompanySize::Small, Decimal::ZERO)
    );
}

#[test]
fn test_declared_size_never_changes_tax_rate() {
    let p = profile(serde_json::json!({ "declared_size": "small" }));
    let r = check(&p, &balanced(), &["FIRS"]);
    let tax = r.tax_position.unwrap();
    assert_eq!(tax.size, CompanySize::Medium);
    assert_eq!(tax.expected_cit_rate, dec!(0.20));
    // 50M - 35M - 13M
    assert_eq!(tax.pre_tax_profit, dec!(2_000_000));
    assert_eq!(tax.estimated_cit, dec!(400_000));
}

// ===========================================================================
// Rule outcomes
// ===========================================================================

#[test]
fn test_clean_company_is_fully_compliant() {
    let r = check(&profile(serde_json::json!({})), &balanced(), &["frc", "firs", "cama"]);
    assert!(r.fired_rule_ids().is_empty());
    assert_eq!(r.aggregate_score, dec!(100));
    assert_eq!(r.tier, ComplianceStatus::Compliant);
    assert_eq!(
        r.recommendations,
        vec!["Maintain current compliance levels and monitor for regulatory changes"]
    );
}

#[test]
fn test_empty_cac_number_fires_critical_registration_rule() {
    let p = profile(serde_json::json!({ "cac_number": "" }));
    let r = check(&p, &balanced(), &["CAMA"]);
    assert_eq!(r.fired_rule_ids(), vec!["CAMA-001"]);
    assert_eq!(r.aggregate_score, dec!(75));
    assert_eq!(r.critical_violations, 1);
    assert_eq!(
        r.regulations[&Regulation::Cama].status,
        ComplianceStatus::NonCompliant
    );
}

#[test]
fn test_malformed_identifiers() {
    let p = profile(serde_json::json!({ "cac_number": "LAG-99", "tin_number": "12345" }));
    let r = check(&p, &balanced(), &["FIRS", "CAMA"]);
    assert_eq!(r.fired_rule_ids(), vec!["FIRS-002", "CAMA-001"]);
    // 100 - 15 - 25
    assert_eq!(r.aggregate_score, dec!(60));
    assert_eq!(r.tier, ComplianceStatus::PartiallyCompliant);
}

#[test]
fn test_rules_of_unrequested_regulations_never_fire() {
    let p = profile(serde_json::json!({ "tin_number": null, "cac_number": null }));
    let r = check(&p, &balanced(), &["FRC"]);
    assert!(r.fired_rule_ids().is_empty());
    assert_eq!(r.regulations.keys().copied().collect::<Vec<_>>(), vec![Regulation::Frc]);
    assert_eq!(r.regulations[&Regulation::Frc].rules_evaluated, 5);
}

#[test]
fn test_same_input_same_result() {
    let p = profile(serde_json::json!({ "tin_number": "bad", "is_public": true }));
    let stmt = balanced();
    let first = check(&p, &stmt, &["FRC", "FIRS", "CAMA", "CBN"]);
    let second = check(&p, &stmt, &["CBN", "CAMA", "FIRS", "FRC"]);
    assert_eq!(first, second);
}

#[test]
fn test_frc_filer_deadline_from_year_end() {
    let p = profile(serde_json::json!({
        "annual_revenue": "600000000",
        "evidence": {
            "vat_registered": true,
            "tax_returns_filed": true,
            "annual_returns_filed": true,
            "financial_statements_filed": false
        }
    }));
    let r = check(&p, &balanced(), &["FRC"]);
    let v = r.violations().next().unwrap();
    assert_eq!(v.rule_id, "FRC-001");
    assert_eq!(v.severity, Severity::High);
    assert_eq!(v.deadline, NaiveDate::from_ymd_opt(2025, 3, 31));
    assert_eq!(v.penalty_range.as_deref(), Some("₦500,000 - ₦2,000,000"));

    // Below the turnover threshold a private company is not an FRC filer.
    let small = profile(serde_json::json!({
        "evidence": { "financial_statements_filed": false, "tax_returns_filed": true }
    }));
    assert!(check(&small, &balanced(), &["FRC"]).fired_rule_ids().is_empty());
}

#[test]
fn test_negative_equity_under_cama() {
    let stmt = statement(&[
        ("Cash", dec!(1_000_000)),
        ("Trade Payables", dec!(5_000_000)),
        ("Share Capital", dec!(1_000_000)),
        ("Accumulated Losses", dec!(-5_000_000)),
    ]);
    let r = check(&profile(serde_json::json!({})), &stmt, &["CAMA"]);
    assert_eq!(r.fired_rule_ids(), vec!["CAMA-003"]);
    assert_eq!(r.aggregate_score, dec!(85));
    assert_eq!(
        r.regulations[&Regulation::Cama].status,
        ComplianceStatus::PartiallyCompliant
    );
}

#[test]
fn test_unbalanced_and_unmapped_trial_balance() {
    let stmt = statement(&[
        ("Cash", dec!(100_000)),
        ("Trade Payables", dec!(50_000)),
        ("7777", dec!(10)),
    ]);
    let r = check(&profile(serde_json::json!({})), &stmt, &["FRC"]);
    assert_eq!(r.fired_rule_ids(), vec!["FRC-004", "FRC-005"]);
    // 100 - 3 - 8
    assert_eq!(r.aggregate_score, dec!(89));
}

// ===========================================================================
// Banks
// ===========================================================================

fn bank_statement() -> ClassifiedStatement {
    statement(&[
        ("Cash and Balances with CBN", dec!(200_000_000)),
        ("Loans and Advances to Customers", dec!(800_000_000)),
        ("Customer Deposits", dec!(880_000_000)),
        ("Share Capital", dec!(120_000_000)),
    ])
}

#[test]
fn test_undercapitalised_bank_fails_cbn() {
    let p = profile(serde_json::json!({ "type": "banking", "industry": "Banking" }));
    let r = check(&p, &bank_statement(), &["CBN"]);
    assert_eq!(r.fired_rule_ids(), vec!["CBN-001", "CBN-002"]);
    // 100 - 25 - 15
    assert_eq!(r.aggregate_score, dec!(60));
    assert_eq!(
        r.regulations[&Regulation::Cbn].status,
        ComplianceStatus::NonCompliant
    );
    assert_eq!(
        r.action_items,
        vec![
            "CBN: Increase capital to meet CBN requirements",
            "CBN: Improve the liquidity position with cash and near-cash assets",
        ]
    );
}

#[test]
fn test_risk_weighted_assets_lift_capital_adequacy() {
    let p = profile(serde_json::json!({ "type": "banking", "industry": "Banking" }));
    let stmt = bank_statement();
    let ratios = naija_audit_core::ratios::RatioEngine::with_risk_weighted_assets(Some(dec!(
        600_000_000
    )))
    .compute(&stmt);
    let regs = parse_regulations(["CBN"]).unwrap();
    let r = check_compliance(&p, &stmt, &ratios, &regs, &EngineConfig::default()).unwrap();
    // 120M / 600M = 0.2 clears the 15% floor; liquidity still fails.
    assert_eq!(r.fired_rule_ids(), vec!["CBN-002"]);
}

#[test]
fn test_cbn_rules_silent_for_non_banks() {
    let r = check(&profile(serde_json::json!({})), &bank_statement(), &["CBN"]);
    assert!(r.fired_rule_ids().is_empty());
    assert_eq!(r.regulations[&Regulation::Cbn].rules_evaluated, 2);
}

// ===========================================================================
// Registry and names
// ===========================================================================

#[test]
fn test_registry_covers_every_regulation() {
    for reg in Regulation::ALL {
        let ids: Vec<&str> = RuleRegistry::for_regulation(reg).map(|r| r.id).collect();
        assert!(ids.len() >= 2, "{reg} has {} rules", ids.len());
        assert!(ids.iter().all(|id| id.starts_with(reg.as_str())));
    }
}

#[test]
fn test_unknown_regulation_is_configuration_error() {
    match parse_regulations(["FIRS", "NDIC"]).unwrap_err() {
        AuditError::Configuration { context, reason } => {
            assert_eq!(context, "regulations");
            assert!(reason.contains("'NDIC'"));
        }
        other => panic!("Expected Configuration, got {other:?}"),
    }
    let regs = parse_regulations(["cac", " Firs "]).unwrap();
    assert!(regs.contains(&Regulation::Cama));
    assert!(regs.contains(&Regulation::Firs));
}
