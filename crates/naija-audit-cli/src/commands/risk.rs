use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;

use naija_audit_core::pipeline::EvaluationRequest;
use naija_audit_core::ratios::RatioEngine;
use naija_audit_core::risk::{merge_signal, ClassifierSignal, MergePolicy, RiskAssessor, RiskLevel};
use naija_audit_core::{with_metadata, EngineConfig};

use crate::input;

/// Arguments for risk assessment
#[derive(Args)]
pub struct AssessArgs {
    /// Path to JSON request file (profile + trial_balance)
    #[arg(long)]
    pub input: Option<String>,

    /// Risk label from an external classifier (low, medium, high, critical)
    #[arg(long)]
    pub signal_label: Option<RiskLevel>,

    /// Classifier confidence between 0 and 1
    #[arg(long)]
    pub signal_confidence: Option<Decimal>,

    /// Confidence below which the signal is ignored
    #[arg(long)]
    pub min_confidence: Option<Decimal>,

    /// Weight given to a fully confident signal
    #[arg(long)]
    pub max_weight: Option<Decimal>,
}

pub fn run_assess(args: AssessArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let request: EvaluationRequest = input::read_payload(args.input.as_deref(), "risk assessment")?;
    request.profile.validate()?;

    let trial_balance = request.trial_balance.parse()?;
    let statement = naija_audit_core::classification::classify(&trial_balance);
    let ratios = RatioEngine::with_risk_weighted_assets(request.profile.risk_weighted_assets)
        .compute(&statement);
    let assessment = RiskAssessor::new(config).assess(&ratios, &request.profile)?;

    let mut warnings = Vec::new();
    if assessment.component_scores.liquidity.is_none() {
        warnings.push("Liquidity sub-score undetermined and excluded from the weighting".to_string());
    }
    if assessment.component_scores.leverage.is_none() {
        warnings.push("Leverage sub-score undetermined and excluded from the weighting".to_string());
    }
    if assessment.component_scores.profitability.is_none() {
        warnings.push("Profitability sub-score undetermined and excluded from the weighting".to_string());
    }

    let merged = match (args.signal_label, args.signal_confidence) {
        (Some(label), Some(confidence)) => {
            let mut policy = MergePolicy::default();
            if let Some(min) = args.min_confidence {
                policy.min_confidence = min;
            }
            if let Some(max) = args.max_weight {
                policy.max_weight = max;
            }
            let signal = ClassifierSignal { label, confidence };
            Some(merge_signal(&assessment, &signal, &policy, &config.risk)?)
        }
        (Some(_), None) => {
            return Err("--signal-confidence is required with --signal-label".into());
        }
        (None, Some(_)) => {
            return Err("--signal-label is required with --signal-confidence".into());
        }
        (None, None) => None,
    };

    let output = with_metadata(
        "Weighted liquidity, leverage and profitability sub-scores against industry benchmark bands",
        &json!({
            "weights": &config.risk.weights,
            "benchmark_industry": &assessment.benchmark_industry,
            "signal_merged": merged.is_some(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        json!({
            "assessment": assessment,
            "ratios": ratios,
            "merged": merged,
        }),
    );
    Ok(serde_json::to_value(output)?)
}
