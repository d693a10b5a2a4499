use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use naija_audit_core::pipeline::{Engine, EvaluationRequest};
use naija_audit_core::EngineConfig;

use crate::input;

/// Arguments for a full evaluation
#[derive(Args)]
pub struct EvaluateArgs {
    /// Path to JSON request file (profile + trial_balance + regulations)
    #[arg(long)]
    pub input: Option<String>,

    /// Regulations to check (overrides the request; omit to skip compliance)
    #[arg(long, value_delimiter = ',')]
    pub regulations: Vec<String>,

    /// Materiality for a sampling plan (overrides the request)
    #[arg(long)]
    pub materiality: Option<Decimal>,
}

pub fn run_evaluate(args: EvaluateArgs, config: EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: EvaluationRequest = input::read_payload(args.input.as_deref(), "evaluation")?;
    if !args.regulations.is_empty() {
        request.regulations = args.regulations;
    }
    if args.materiality.is_some() {
        request.materiality = args.materiality;
    }
    let engine = Engine::new(config)?;
    let result = engine.evaluate(&request)?;
    Ok(serde_json::to_value(result)?)
}
