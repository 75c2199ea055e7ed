//! Contract Analysis — raw contract text in, structured `AnalysisResult` out.
//!
//! Flow: truncate → build prompt → completion call (with timeout) →
//!       strip code fence → decode JSON → score risks.
//!
//! Every failure along the way resolves to the fixed fallback analysis.
//! `analyze` hides the failure; `analyze_detailed` reports it as `Degraded`.

pub mod fallback;
pub mod parser;
pub mod prompts;
pub mod scoring;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::fallback::fallback_analysis;
use crate::analysis::parser::parse_analysis;
use crate::analysis::prompts::{build_analysis_prompt, MAX_CONTRACT_CHARS};
use crate::analysis::scoring::Risk;
use crate::llm_client::Completer;

/// Structured extraction for one contract. Built once per upload, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub parties: String,
    /// Free text; currency is not normalized.
    pub contract_value: String,
    /// Expected `YYYY-MM-DD`, not validated.
    pub start_date: String,
    pub end_date: String,
    pub key_terms: Vec<String>,
    pub risks: Vec<Risk>,
    /// 0.0 – 10.0
    pub risk_score: f64,
}

/// Why an analysis fell back to the placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradedReason {
    Timeout,
    ServiceUnavailable(String),
    MalformedResponse(String),
}

impl std::fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradedReason::Timeout => write!(f, "completion service timed out"),
            DegradedReason::ServiceUnavailable(msg) => {
                write!(f, "completion service unavailable: {msg}")
            }
            DegradedReason::MalformedResponse(msg) => write!(f, "malformed model response: {msg}"),
        }
    }
}

/// Result of an analysis that distinguishes a genuine answer from the fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Ok(AnalysisResult),
    Degraded(AnalysisResult, DegradedReason),
}

impl AnalysisOutcome {
    #[allow(dead_code)]
    pub fn result(&self) -> &AnalysisResult {
        match self {
            AnalysisOutcome::Ok(result) | AnalysisOutcome::Degraded(result, _) => result,
        }
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            AnalysisOutcome::Ok(result) | AnalysisOutcome::Degraded(result, _) => result,
        }
    }

    pub fn degraded_reason(&self) -> Option<&DegradedReason> {
        match self {
            AnalysisOutcome::Ok(_) => None,
            AnalysisOutcome::Degraded(_, reason) => Some(reason),
        }
    }

    #[allow(dead_code)]
    pub fn is_degraded(&self) -> bool {
        self.degraded_reason().is_some()
    }
}

/// Runs contract text through the completion service. Holds no mutable state.
#[derive(Clone)]
pub struct ContractAnalyzer {
    completer: Arc<dyn Completer>,
    timeout: Duration,
}

impl ContractAnalyzer {
    pub fn new(completer: Arc<dyn Completer>, timeout: Duration) -> Self {
        Self { completer, timeout }
    }

    /// Never fails: on any error the fallback analysis is returned as if it were genuine.
    #[allow(dead_code)]
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        self.analyze_detailed(text).await.into_result()
    }

    /// Same as `analyze`, but tags fallback results with the reason they were produced.
    pub async fn analyze_detailed(&self, text: &str) -> AnalysisOutcome {
        let char_count = text.chars().count();
        if char_count > MAX_CONTRACT_CHARS {
            info!(
                "Contract text has {char_count} characters; only the first {MAX_CONTRACT_CHARS} are analyzed"
            );
        }

        let prompt = build_analysis_prompt(text);

        let reply = match tokio::time::timeout(self.timeout, self.completer.complete(&prompt)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return degraded(DegradedReason::ServiceUnavailable(e.to_string())),
            Err(_) => return degraded(DegradedReason::Timeout),
        };

        match parse_analysis(&reply) {
            Ok(result) => {
                info!(
                    "Contract analyzed: {} risks, risk_score={}",
                    result.risks.len(),
                    result.risk_score
                );
                AnalysisOutcome::Ok(result)
            }
            Err(e) => degraded(DegradedReason::MalformedResponse(e.to_string())),
        }
    }
}

fn degraded(reason: DegradedReason) -> AnalysisOutcome {
    warn!("Contract analysis degraded to fallback: {reason}");
    AnalysisOutcome::Degraded(fallback_analysis(), reason)
}
