//! End-to-end evaluation: classify, compute ratios, check data integrity,
//! assess risk and check compliance in one call.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::classification::{AccountClassifier, ClassifiedStatement, LeadScheduleRow, RawTrialBalance};
use crate::compliance::{parse_regulations, ComplianceChecker, ComplianceResult};
use crate::config::EngineConfig;
use crate::integrity::{check_integrity, IntegrityReport};
use crate::profile::{CompanyProfile, CompanySize};
use crate::ratios::{RatioEngine, RatioSet};
use crate::risk::{RiskAssessment, RiskAssessor, RiskLevel};
use crate::sampling::{suggest_sampling, SamplingPlan};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::AuditResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub profile: CompanyProfile,
    pub trial_balance: RawTrialBalance,
    /// Regulation names to check; empty skips compliance.
    #[serde(default)]
    pub regulations: Vec<String>,
    /// Materiality for a sampling plan; omitted skips sampling.
    #[serde(default)]
    pub materiality: Option<Money>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub company_size: CompanySize,
    pub statement: ClassifiedStatement,
    pub lead_schedule: Vec<LeadScheduleRow>,
    pub ratios: RatioSet,
    pub integrity: IntegrityReport,
    /// `None` when the trial balance supports no liquidity, leverage or
    /// profitability ratio.
    pub risk: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingPlan>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns a validated configuration and runs evaluations against it. Holds no
/// per-request state, so one engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    classifier: AccountClassifier,
}

impl Engine {
    pub fn new(config: EngineConfig) -> AuditResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            classifier: AccountClassifier::default(),
        })
    }

    pub fn with_classifier(mut self, classifier: AccountClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &AccountClassifier {
        &self.classifier
    }

    pub fn evaluate(&self, request: &EvaluationRequest) -> AuditResult<ComputationOutput<Evaluation>> {
        let start = Instant::now();
        let profile = &request.profile;
        profile.validate()?;
        // Resolve regulations before any work so a bad name fails fast.
        let regulations = parse_regulations(&request.regulations)?;

        let mut warnings: Vec<String> = Vec::new();

        let trial_balance = request.trial_balance.parse()?;
        let statement = self.classifier.classify(&trial_balance);
        if !statement.unclassified().is_empty() {
            warnings.push(format!(
                "{} account(s) could not be classified and were placed in 'other': {}",
                statement.unclassified().len(),
                statement.unclassified().join(", ")
            ));
        }

        let company_size = profile.size(&self.config.size);
        if let Some(declared) = profile.declared_size {
            if declared != company_size {
                warn!(%declared, recomputed = %company_size, "declared size disagrees with revenue");
                warnings.push(format!(
                    "Declared size '{declared}' differs from revenue-based size '{company_size}'; \
                     the recomputed size is used for tax tiers."
                ));
            }
        }

        let ratios =
            RatioEngine::with_risk_weighted_assets(profile.risk_weighted_assets).compute(&statement);

        let integrity = check_integrity(&statement, &ratios);
        for finding in &integrity.anomalies {
            warn!(check = ?finding.check, "data integrity anomaly");
            warnings.push(format!("Data integrity: {}", finding.message));
        }
        warnings.extend(integrity.warnings.iter().map(|f| format!("Data integrity: {}", f.message)));

        let risk = RiskAssessor::new(&self.config).try_assess(&ratios, profile)?;
        if risk.is_none() {
            warn!("no scored ratio could be computed; risk not assessed");
            warnings.push(
                "Risk not assessed: no liquidity, leverage or profitability ratio could be \
                 computed from this trial balance."
                    .to_string(),
            );
        }

        let compliance = if regulations.is_empty() {
            None
        } else {
            Some(ComplianceChecker::new(&self.config).check(profile, &statement, &ratios, &regulations)?)
        };

        let sampling = match request.materiality {
            Some(materiality) => {
                let level = risk.as_ref().map_or(RiskLevel::Medium, |r| r.risk_level);
                Some(suggest_sampling(&statement, materiality, level)?)
            }
            None => None,
        };

        let lead_schedule = statement.lead_schedule();
        let elapsed = start.elapsed().as_micros() as u64;
        info!(
            entries = trial_balance.len(),
            risk = ?risk.as_ref().map(|r| r.risk_level),
            elapsed_us = elapsed,
            "evaluation complete"
        );

        let assumptions = serde_json::json!({
            "company_size_basis": "annual_revenue",
            "size_thresholds": &self.config.size,
            "risk_weights": &self.config.risk.weights,
            "ratio_rounding_dp": crate::types::RATIO_DP,
            "regulations": regulations,
        });

        Ok(with_metadata(
            "Rule-based account classification, ratio analysis, benchmark risk scoring and Nigerian regulatory rules",
            &assumptions,
            warnings,
            elapsed,
            Evaluation {
                company_size,
                statement,
                lead_schedule,
                ratios,
                integrity,
                risk,
                compliance,
                sampling,
            },
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
