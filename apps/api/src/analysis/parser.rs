//! Response parser — turns the model's raw reply into an `AnalysisResult`.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::analysis::scoring::{compute_risk_score, Risk};
use crate::analysis::AnalysisResult;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reply is empty")]
    Empty,

    #[error("reply is not the expected JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shape the model is asked to produce. Every key is required; extra keys are ignored.
#[derive(Debug, Deserialize)]
struct ModelReply {
    #[serde(deserialize_with = "text_field")]
    parties: String,
    #[serde(deserialize_with = "text_field")]
    contract_value: String,
    #[serde(deserialize_with = "text_field")]
    start_date: String,
    #[serde(deserialize_with = "text_field")]
    end_date: String,
    key_terms: Vec<String>,
    risks: Vec<Risk>,
}

/// Accepts a JSON string or number. Models sometimes emit the contract value as a bare number.
fn text_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Str(s) => s,
        Text::Num(n) => n.to_string(),
    })
}

/// Recovers bare JSON from a reply that may be wrapped in a fenced code block.
///
/// Only a reply that *starts* with a fence is unwrapped: the content between the
/// first fence and the next one (or the end, if unclosed) is kept, minus a
/// language tag directly after the opening fence.
pub fn strip_code_fence(reply: &str) -> &str {
    let reply = reply.trim();
    let Some(after_open) = reply.strip_prefix(FENCE) else {
        return reply;
    };
    let body = match after_open.find(FENCE) {
        Some(end) => &after_open[..end],
        None => after_open,
    };
    strip_language_tag(body).trim()
}

fn strip_language_tag(body: &str) -> &str {
    // `json` is stripped even when the object follows it with no separator.
    if let Some(rest) = body
        .get(..JSON_TAG.len())
        .filter(|tag| tag.eq_ignore_ascii_case(JSON_TAG))
        .map(|_| &body[JSON_TAG.len()..])
    {
        if !rest.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return rest;
        }
    }

    let tag_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+'))
        .unwrap_or(body.len());
    if tag_len == 0 {
        return body;
    }
    let rest = &body[tag_len..];
    // Any other tag only counts when the JSON starts after it on a fresh token.
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        rest
    } else {
        body
    }
}

/// Parses a raw model reply and scores its risks.
pub fn parse_analysis(reply: &str) -> Result<AnalysisResult, ParseError> {
    let json = strip_code_fence(reply);
    if json.is_empty() {
        return Err(ParseError::Empty);
    }

    let parsed: ModelReply = serde_json::from_str(json)?;
    let risk_score = compute_risk_score(&parsed.risks);

    Ok(AnalysisResult {
        parties: parsed.parties,
        contract_value: parsed.contract_value,
        start_date: parsed.start_date,
        end_date: parsed.end_date,
        key_terms: parsed.key_terms,
        risks: parsed.risks,
        risk_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scoring::Severity;

    const REPLY: &str = r#"{
        "parties": "Client: Pune Municipal Corporation, Contractor: Shree Ganesh Infra Pvt Ltd",
        "contract_value": "₹4,50,00,000",
        "start_date": "2024-04-01",
        "end_date": "2025-09-30",
        "key_terms": ["Monthly running bills", "5% retention money", "Defect liability of 12 months"],
        "risks": [
            {"description": "Liquidated damages uncapped", "severity": "high"},
            {"description": "Price escalation excluded", "severity": "medium"}
        ]
    }"#;

    #[test]
    fn test_plain_json_parses_with_score() {
        let result = parse_analysis(REPLY).unwrap();
        assert_eq!(
            result.parties,
            "Client: Pune Municipal Corporation, Contractor: Shree Ganesh Infra Pvt Ltd"
        );
        assert_eq!(result.contract_value, "₹4,50,00,000");
        assert_eq!(result.start_date, "2024-04-01");
        assert_eq!(result.end_date, "2025-09-30");
        assert_eq!(result.key_terms.len(), 3);
        assert_eq!(result.risks.len(), 2);
        assert_eq!(result.risks[0].severity, Some(Severity::High));
        assert_eq!(result.risk_score, 5.0);
    }

    #[test]
    fn test_fenced_with_tag_matches_plain() {
        let fenced = format!("```json\n{REPLY}\n```");
        assert_eq!(parse_analysis(&fenced).unwrap(), parse_analysis(REPLY).unwrap());
    }

    #[test]
    fn test_fenced_without_tag_matches_plain() {
        let fenced = format!("```\n{REPLY}\n```");
        assert_eq!(parse_analysis(&fenced).unwrap(), parse_analysis(REPLY).unwrap());
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```JSON {\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_json_tag_glued_to_object_is_stripped() {
        assert_eq!(strip_code_fence("```json{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```JSON[1, 2]```"), "[1, 2]");

        let glued = format!("```json{}```", REPLY.trim());
        assert_eq!(parse_analysis(&glued).unwrap(), parse_analysis(REPLY).unwrap());

        let compact = r#"```json{"parties":"A","contract_value":"$5","start_date":"2024-01-01","end_date":"2024-06-30","key_terms":["Lump sum"],"risks":[{"severity":"high"}]}```"#;
        assert_eq!(parse_analysis(compact).unwrap().risk_score, 3.0);
    }

    #[test]
    fn test_other_tag_needs_separator() {
        assert_eq!(strip_code_fence("```js\n[1]```"), "[1]");
        assert_eq!(strip_code_fence("```abc[1]```"), "abc[1]");
        assert_eq!(strip_code_fence("```jsonc\n{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_unclosed_fence_keeps_remainder() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_trailing_chatter_after_fence_is_dropped() {
        let reply = "```json\n{\"a\": 1}\n```\nLet me know if you need more detail.";
        assert_eq!(strip_code_fence(reply), "{\"a\": 1}");
    }

    #[test]
    fn test_leading_prose_is_not_unwrapped() {
        let reply = format!("Here is the analysis:\n```json\n{REPLY}\n```");
        assert!(parse_analysis(&reply).is_err());
    }

    #[test]
    fn test_non_json_is_error() {
        assert!(matches!(
            parse_analysis("I could not read this contract."),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_truncated_json_is_error() {
        let truncated = &REPLY[..REPLY.find("\"risks\"").unwrap()];
        assert!(parse_analysis(truncated).is_err());
    }

    #[test]
    fn test_empty_reply_is_error() {
        assert!(matches!(parse_analysis("   "), Err(ParseError::Empty)));
        assert!(matches!(parse_analysis("```json\n```"), Err(ParseError::Empty)));
    }

    #[test]
    fn test_missing_required_key_is_error() {
        let reply = r#"{
            "parties": "Client: A, Contractor: B",
            "contract_value": "$1,000,000",
            "start_date": "2024-01-01",
            "end_date": "2024-12-31",
            "key_terms": ["Fixed price"]
        }"#;
        assert!(parse_analysis(reply).is_err());
    }

    #[test]
    fn test_numeric_contract_value_becomes_text() {
        let reply = r#"{
            "parties": "Client: A, Contractor: B",
            "contract_value": 2500000,
            "start_date": "2024-01-01",
            "end_date": "2024-12-31",
            "key_terms": [],
            "risks": []
        }"#;
        let result = parse_analysis(reply).unwrap();
        assert_eq!(result.contract_value, "2500000");
        assert_eq!(result.risk_score, 0.0);
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let reply = r#"{
            "parties": "Client: A, Contractor: B",
            "contract_value": "$10",
            "start_date": "2024-01-01",
            "end_date": "2024-02-01",
            "key_terms": ["Scope"],
            "risks": [{"description": "Vague scope"}],
            "confidence": 0.4
        }"#;
        let result = parse_analysis(reply).unwrap();
        assert_eq!(result.risk_score, 1.0);
    }

    #[test]
    fn test_non_object_risk_is_error() {
        let reply = r#"{
            "parties": "Client: A, Contractor: B",
            "contract_value": "$10",
            "start_date": "2024-01-01",
            "end_date": "2024-02-01",
            "key_terms": [],
            "risks": ["delays"]
        }"#;
        assert!(parse_analysis(reply).is_err());
    }
}
