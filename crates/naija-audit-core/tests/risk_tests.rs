use naija_audit_core::profile::CompanyProfile;
use naija_audit_core::ratios::RatioSet;
use naija_audit_core::risk::{
    assess, merge_signal, ClassifierSignal, MergePolicy, RiskAssessment, RiskLevel,
};
use naija_audit_core::{AuditError, EngineConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn profile(company_type: &str, industry: &str) -> CompanyProfile {
    serde_json::from_value(serde_json::json!({
        "type": company_type,
        "industry": industry,
        "cac_number": "RC100200",
        "tin_number": "123456789012",
        "annual_revenue": "60000000",
        "total_assets": "40000000"
    }))
    .unwrap()
}

fn distressed() -> RatioSet {
    RatioSet {
        current_ratio: Some(dec!(0.5)),
        quick_ratio: Some(dec!(0.3)),
        cash_ratio: Some(dec!(0.02)),
        debt_to_equity: Some(dec!(3)),
        debt_to_assets: Some(dec!(0.9)),
        gross_profit_margin: Some(dec!(0.05)),
        net_profit_margin: Some(dec!(-0.1)),
        return_on_assets: Some(dec!(-0.05)),
        return_on_equity: Some(dec!(-0.2)),
        asset_turnover: Some(dec!(0.4)),
        capital_adequacy_ratio: Some(dec!(0.12)),
    }
}

// ===========================================================================
// Scoring
// ===========================================================================

#[test]
fn test_undeterminable_group_is_excluded_not_zeroed() {
    let ratios = RatioSet {
        debt_to_equity: Some(dec!(0.4)),
        debt_to_assets: Some(dec!(0.3)),
        net_profit_margin: Some(dec!(0.075)),
        return_on_assets: Some(dec!(0.05)),
        return_on_equity: Some(dec!(0.09)),
        ..RatioSet::default()
    };
    let config = EngineConfig::default();
    let a = assess(&ratios, &profile("services", "Services"), &config).unwrap();

    assert_eq!(a.component_scores.liquidity, None);
    assert_eq!(a.component_scores.leverage, Some(dec!(100)));
    assert_eq!(a.component_scores.profitability, Some(dec!(50)));
    // (100 * 0.30 + 50 * 0.35) / 0.65 = 73.08; scoring liquidity as zero
    // would have given 47.5.
    assert_eq!(a.overall_score, 73);
    assert_eq!(a.risk_level, RiskLevel::Medium);
}

#[test]
fn test_tier_cut_offs_are_inclusive_lower_bounds() {
    let config = EngineConfig::default().risk;
    assert_eq!(RiskLevel::from_score(dec!(100), &config), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(dec!(80), &config), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(dec!(79), &config), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(dec!(60), &config), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(dec!(40), &config), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(dec!(39), &config), RiskLevel::Critical);
    assert_eq!(RiskLevel::from_score(Decimal::ZERO, &config), RiskLevel::Critical);
}

#[test]
fn test_distressed_company_is_critical_with_mitigations() {
    let config = EngineConfig::default();
    let a = assess(&distressed(), &profile("retail", "Retail"), &config).unwrap();

    assert_eq!(a.overall_score, 0);
    assert_eq!(a.risk_level, RiskLevel::Critical);
    assert!(a.strengths.is_empty());
    assert!(a
        .weaknesses
        .contains(&"weak short-term liquidity (current ratio 0.5 below 1.0)".to_string()));
    assert!(a.weaknesses.iter().any(|w| w.starts_with("loss-making")));
    assert!(a
        .recommendations
        .contains(&"Immediate risk mitigation actions required".to_string()));
    assert!(a
        .recommendations
        .contains(&"Improve cash flow management and forecasting".to_string()));
    assert_eq!(
        a.recommendations.last().map(String::as_str),
        Some("Regular risk assessment updates recommended")
    );
}

#[test]
fn test_each_weak_ratio_reported_once() {
    let config = EngineConfig::default();
    let a = assess(&distressed(), &profile("retail", "Retail"), &config).unwrap();
    let mentions = a
        .weaknesses
        .iter()
        .filter(|w| w.contains("current ratio") || w.contains("current_ratio"))
        .count();
    assert_eq!(mentions, 1);
}

#[test]
fn test_capital_adequacy_only_judged_for_banks() {
    let config = EngineConfig::default();
    let bank = assess(&distressed(), &profile("banking", "Banking"), &config).unwrap();
    assert!(bank
        .weaknesses
        .contains(&"capital adequacy 0.12 below the CBN minimum of 0.15".to_string()));

    let retailer = assess(&distressed(), &profile("retail", "Retail"), &config).unwrap();
    assert!(!retailer.weaknesses.iter().any(|w| w.contains("capital")));
}

#[test]
fn test_no_ratios_is_a_validation_error() {
    let config = EngineConfig::default();
    let ratios = RatioSet {
        gross_profit_margin: Some(dec!(0.3)),
        ..RatioSet::default()
    };
    match assess(&ratios, &profile("retail", "Retail"), &config).unwrap_err() {
        AuditError::Validation { field, .. } => assert_eq!(field, "ratios"),
        other => panic!("Expected Validation, got {other:?}"),
    }
}

// ===========================================================================
// Benchmark resolution
// ===========================================================================

#[test]
fn test_benchmark_industry_resolution() {
    let config = EngineConfig::default();
    let ratios = distressed();
    let industry = |t: &str, i: &str| {
        assess(&ratios, &profile(t, i), &config)
            .unwrap()
            .benchmark_industry
    };

    assert_eq!(industry("other", "Oil & Gas"), "oil_gas");
    assert_eq!(industry("banking", "Financial Services"), "banking");
    assert_eq!(industry("other", "Fishing"), "general");
}

// ===========================================================================
// Classifier signal
// ===========================================================================

fn rule_assessment(score: u8, level: RiskLevel) -> RiskAssessment {
    RiskAssessment {
        overall_score: score,
        risk_level: level,
        benchmark_industry: "general".into(),
        component_scores: Default::default(),
        risk_matrix: vec![],
        critical_risks: vec![],
        revenue_per_employee: None,
        strengths: vec![],
        weaknesses: vec![],
        recommendations: vec![],
    }
}

#[test]
fn test_signal_blends_towards_label_midpoint() {
    let config = EngineConfig::default().risk;
    let signal = ClassifierSignal {
        label: RiskLevel::Low,
        confidence: dec!(0.8),
    };
    let merged = merge_signal(
        &rule_assessment(50, RiskLevel::High),
        &signal,
        &MergePolicy::default(),
        &config,
    )
    .unwrap();

    // weight 0.8 * 0.3 = 0.24; 50 * 0.76 + 90 * 0.24 = 59.6
    assert_eq!(merged.signal_weight, dec!(0.24));
    assert_eq!(merged.blended_score, 60);
    assert_eq!(merged.risk_level, RiskLevel::Medium);
    assert_eq!(merged.rule_level, RiskLevel::High);
    assert!(!merged.agreed);
}

#[test]
fn test_signal_confidence_out_of_range_rejected() {
    let config = EngineConfig::default().risk;
    let signal = ClassifierSignal {
        label: RiskLevel::Low,
        confidence: dec!(1.5),
    };
    let err = merge_signal(
        &rule_assessment(50, RiskLevel::High),
        &signal,
        &MergePolicy::default(),
        &config,
    )
    .unwrap_err();
    match err {
        AuditError::Validation { field, .. } => assert_eq!(field, "signal.confidence"),
        other => panic!("Expected Validation, got {other:?}"),
    }
}
