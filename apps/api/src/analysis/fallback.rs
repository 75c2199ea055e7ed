use crate::analysis::scoring::{Risk, Severity};
use crate::analysis::AnalysisResult;

/// Score reported for the placeholder analysis. Fixed, not derived from its risks.
pub const FALLBACK_RISK_SCORE: f64 = 5.0;

/// Placeholder returned whenever the model cannot produce a usable analysis.
pub fn fallback_analysis() -> AnalysisResult {
    AnalysisResult {
        parties: "Client: [Not clearly specified], Contractor: [Not clearly specified]"
            .to_string(),
        contract_value: "Not specified".to_string(),
        start_date: "Not specified".to_string(),
        end_date: "Not specified".to_string(),
        key_terms: vec![
            "Payment terms mentioned".to_string(),
            "Project scope defined".to_string(),
            "Timeline specified".to_string(),
        ],
        risks: vec![Risk::new(
            "Contract details need manual review",
            Severity::Medium,
        )],
        risk_score: FALLBACK_RISK_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let fallback = fallback_analysis();
        assert_eq!(fallback.contract_value, "Not specified");
        assert_eq!(fallback.start_date, "Not specified");
        assert_eq!(fallback.end_date, "Not specified");
        assert_eq!(fallback.key_terms.len(), 3);
        assert_eq!(fallback.risks.len(), 1);
        assert_eq!(fallback.risks[0].severity, Some(Severity::Medium));
        assert_eq!(fallback.risk_score, 5.0);
    }

    #[test]
    fn test_fallback_is_stable() {
        assert_eq!(fallback_analysis(), fallback_analysis());
    }
}
