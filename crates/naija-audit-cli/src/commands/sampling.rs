use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;

use naija_audit_core::classification::classify;
use naija_audit_core::pipeline::EvaluationRequest;
use naija_audit_core::ratios::RatioEngine;
use naija_audit_core::risk::{RiskAssessor, RiskLevel};
use naija_audit_core::sampling::{sample_fraction, suggest_sampling};
use naija_audit_core::{with_metadata, EngineConfig};

use crate::input;

/// Arguments for a substantive-testing sample plan
#[derive(Args)]
pub struct SampleArgs {
    /// Path to JSON request file (profile + trial_balance)
    #[arg(long)]
    pub input: Option<String>,

    /// Materiality in naira; lines at or above it are tested in full
    #[arg(long)]
    pub materiality: Option<Decimal>,

    /// Risk level to size the sample for (default: assessed from the ratios)
    #[arg(long)]
    pub risk_level: Option<RiskLevel>,
}

pub fn run_sample(args: SampleArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let request: EvaluationRequest = input::read_payload(args.input.as_deref(), "sampling")?;
    let materiality = args
        .materiality
        .or(request.materiality)
        .ok_or("--materiality is required when the request carries none")?;

    let trial_balance = request.trial_balance.parse()?;
    let statement = classify(&trial_balance);

    let mut warnings = Vec::new();
    let risk_level = match args.risk_level {
        Some(level) => level,
        None => {
            request.profile.validate()?;
            let ratios = RatioEngine::with_risk_weighted_assets(request.profile.risk_weighted_assets)
                .compute(&statement);
            match RiskAssessor::new(config).try_assess(&ratios, &request.profile)? {
                Some(assessment) => assessment.risk_level,
                None => {
                    warnings.push("Risk not assessed; sample sized at medium risk".to_string());
                    RiskLevel::Medium
                }
            }
        }
    };

    let plan = suggest_sampling(&statement, materiality, risk_level)?;
    let output = with_metadata(
        "Full testing above materiality, high-risk accounts by size, systematic selection of the rest",
        &json!({
            "materiality": materiality,
            "risk_level": risk_level,
            "sample_fraction": sample_fraction(risk_level),
            "risk_level_source": if args.risk_level.is_some() { "argument" } else { "assessment" },
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        plan,
    );
    Ok(serde_json::to_value(output)?)
}
