//! Prompt builder for the structured assessment flow.

use crate::chat::ChatVariant;
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, SYSTEM_INSTRUCTION};
use crate::models::assessment::WorkplaceAssessmentRequest;

pub const ASSESSMENT_ROLE: &str = "\
You are an advanced Occupational Health & Safety (OHS) AI. \
Only analyze workplace health and safety matters.
Analyze the following workplace and provide a detailed report in a **single JSON object**.";

/// Literal schema the reply must follow.
pub const ASSESSMENT_SCHEMA: &str = r#"The JSON object should have the following structure:
{
    "workplace_type": "...",
    "employees_count": ...,
    "hazards": [
        {
            "hazard": "...",
            "category": "...",
            "risk_level": "...",
            "recommended_measures": "..."
        }
    ]
}"#;

/// Builds the single prompt sent for one assessment request.
///
/// Field values are embedded exactly as submitted: no escaping, no trimming.
/// `format!` is used rather than placeholder replacement so that user text
/// containing `{...}` is never substituted a second time.
pub fn build_assessment_prompt(
    request: &WorkplaceAssessmentRequest,
    variant: ChatVariant,
) -> String {
    let preamble = match variant {
        ChatVariant::Agent => format!("{SYSTEM_INSTRUCTION}\n\n"),
        ChatVariant::Simple => String::new(),
    };

    format!(
        "{preamble}{ASSESSMENT_ROLE}\n{ASSESSMENT_SCHEMA}\n\n{JSON_ONLY_INSTRUCTION}\n\n\
         Workplace Type: {}\nNumber of Employees: {}\nHazards: {}",
        request.workplace_type, request.employees_count, request.hazards_description
    )
}
