use serde::{Deserialize, Serialize};

/// Upper bound on a contract's risk score. Sums above it are clamped, not scaled.
pub const MAX_RISK_SCORE: u32 = 10;

/// Severity the model attaches to a risk.
///
/// Anything other than the exact literals `low`, `medium`, `high` is kept as
/// `Unrecognized` and weighs the same as `low`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Unrecognized(String),
}

impl Severity {
    pub fn weight(&self) -> u32 {
        match self {
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low | Severity::Unrecognized(_) => 1,
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            _ => Severity::Unrecognized(raw),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => "low".to_string(),
            Severity::Medium => "medium".to_string(),
            Severity::High => "high".to_string(),
            Severity::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(default)]
    pub description: String,
    /// Missing severities are tolerated and weigh 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Risk {
    pub fn new(description: &str, severity: Severity) -> Self {
        Self {
            description: description.to_string(),
            severity: Some(severity),
        }
    }

    pub fn weight(&self) -> u32 {
        self.severity.as_ref().map(Severity::weight).unwrap_or(1)
    }
}

/// risk_score = min(10, Σ weight(severity)); 0.0 for no risks.
pub fn compute_risk_score(risks: &[Risk]) -> f64 {
    let total: u32 = risks.iter().map(Risk::weight).sum();
    f64::from(total.min(MAX_RISK_SCORE))
}

/// Dashboard band for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// high above 7, medium above 4, low otherwise.
    pub fn from_score(score: f64) -> Self {
        if score > 7.0 {
            RiskLevel::High
        } else if score > 4.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}
