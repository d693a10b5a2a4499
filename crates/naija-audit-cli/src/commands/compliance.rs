use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;

use naija_audit_core::classification::classify;
use naija_audit_core::compliance::{
    check_compliance, cit_rate_for_revenue, parse_regulations, Regulation, RuleRegistry,
};
use naija_audit_core::pipeline::EvaluationRequest;
use naija_audit_core::ratios::RatioEngine;
use naija_audit_core::{with_metadata, EngineConfig};

use crate::input;

/// Arguments for a compliance check
#[derive(Args)]
pub struct ComplyArgs {
    /// Path to JSON request file (profile + trial_balance)
    #[arg(long)]
    pub input: Option<String>,

    /// Regulations to check, e.g. FRC,FIRS,CAMA,CBN (overrides the request)
    #[arg(long, value_delimiter = ',')]
    pub regulations: Vec<String>,
}

/// Arguments for a CIT rate lookup
#[derive(Args)]
pub struct CitArgs {
    /// Annual turnover in Naira
    #[arg(long, allow_hyphen_values = true)]
    pub revenue: Decimal,

    /// CIT rate the company filed at, as a decimal (0.20 = 20%)
    #[arg(long)]
    pub declared_rate: Option<Decimal>,
}

/// Arguments for listing the rule registry
#[derive(Args)]
pub struct RulesArgs {
    /// Only rules of this regulation
    #[arg(long)]
    pub regulation: Option<String>,
}

pub fn run_comply(args: ComplyArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let request: EvaluationRequest = input::read_payload(args.input.as_deref(), "compliance checks")?;

    let names = if args.regulations.is_empty() {
        &request.regulations
    } else {
        &args.regulations
    };
    let regulations = parse_regulations(names)?;
    if regulations.is_empty() {
        return Err("--regulations is required (or set \"regulations\" in the request)".into());
    }

    let trial_balance = request.trial_balance.parse()?;
    let statement = classify(&trial_balance);
    let ratios = RatioEngine::with_risk_weighted_assets(request.profile.risk_weighted_assets)
        .compute(&statement);
    let result = check_compliance(&request.profile, &statement, &ratios, &regulations, config)?;

    let output = with_metadata(
        "Per-regulation rule evaluation with severity-weighted deductions from 100",
        &json!({
            "regulations": regulations,
            "penalties": &config.compliance.penalties,
            "size_basis": "annual_revenue",
        }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_cit(args: CitArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    if args.revenue < Decimal::ZERO {
        return Err("--revenue must not be negative".into());
    }
    let (size, rate) = cit_rate_for_revenue(args.revenue, config);

    let mut warnings = Vec::new();
    if let Some(declared) = args.declared_rate {
        if declared != rate {
            warnings.push(format!(
                "Declared rate {declared} differs from the {size} company rate {rate}"
            ));
        }
    }

    let output = with_metadata(
        "Revenue-based size band and statutory Companies Income Tax rate",
        &config.size,
        warnings,
        0,
        json!({
            "annual_revenue": args.revenue,
            "company_size": size,
            "expected_cit_rate": rate,
            "declared_rate": args.declared_rate,
            "rate_matches": args.declared_rate.map(|d| d == rate),
        }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_rules(args: RulesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rules: Vec<Value> = match args.regulation {
        Some(name) => {
            let regulation: Regulation = name.parse()?;
            RuleRegistry::for_regulation(regulation)
                .map(serde_json::to_value)
                .collect::<Result<_, _>>()?
        }
        None => RuleRegistry::rules()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?,
    };
    Ok(Value::Array(rules))
}
