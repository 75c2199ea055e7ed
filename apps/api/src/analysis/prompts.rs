// Contract analysis prompt template.
// The model sees at most `MAX_CONTRACT_CHARS` characters of the contract.

/// Hard cap on the contract text embedded in the prompt. Not configurable: it
/// tracks the model's context budget, and anything past it is dropped silently.
pub const MAX_CONTRACT_CHARS: usize = 4000;

pub const CONTRACT_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this construction contract and extract the following information:

1. Parties involved (Client and Contractor names)
2. Contract value (total amount)
3. Start date and End date
4. Key terms (3-5 important clauses)
5. Potential risks (identify 2-3 risks with severity: low/medium/high)

Contract text:
{contract_text}

You must return ONLY valid JSON in this exact format (no markdown, no extra text):
{
    "parties": "Client: [name], Contractor: [name]",
    "contract_value": "₹X,XX,XX,XXX or $X,XXX,XXX",
    "start_date": "YYYY-MM-DD",
    "end_date": "YYYY-MM-DD",
    "key_terms": ["term1", "term2", "term3"],
    "risks": [
        {"description": "risk description", "severity": "high"},
        {"description": "risk description", "severity": "medium"}
    ]
}"#;

/// Returns the first `MAX_CONTRACT_CHARS` characters of `text`.
/// Cuts on a character boundary, not a word boundary.
pub fn truncate_contract_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_CONTRACT_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Builds the full analysis prompt for a contract.
pub fn build_analysis_prompt(text: &str) -> String {
    CONTRACT_ANALYSIS_PROMPT_TEMPLATE.replace("{contract_text}", truncate_contract_text(text))
}
