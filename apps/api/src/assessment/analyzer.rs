//! Assessment flow: build prompt → one completion call → interpret.
//!
//! Never touches chat sessions.

use serde::Serialize;
use tracing::{info, warn};

use crate::assessment::interpreter::{interpret_assessment, FormatError};
use crate::assessment::prompts::build_assessment_prompt;
use crate::chat::ChatVariant;
use crate::llm_client::{CompletionClient, LlmError};
use crate::models::assessment::{AssessmentResult, WorkplaceAssessmentRequest};

/// What the presentation layer renders for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssessmentOutcome {
    /// Hazard cards.
    Structured { result: AssessmentResult },
    /// The reply could not be read as the schema; show it verbatim.
    Raw(FormatError),
}

/// Runs one assessment. Only transport/service faults are errors; an
/// unreadable reply is the `Raw` outcome.
pub async fn run_assessment(
    llm: &dyn CompletionClient,
    request: &WorkplaceAssessmentRequest,
    variant: ChatVariant,
) -> Result<AssessmentOutcome, LlmError> {
    let prompt = build_assessment_prompt(request, variant);
    info!(
        "Requesting hazard assessment ({} employees, prompt {} chars)",
        request.employees_count,
        prompt.len()
    );

    let reply = llm.generate(&prompt).await?;

    match interpret_assessment(&reply) {
        Ok(result) => {
            info!("Assessment parsed: {} hazards", result.hazards.len());
            Ok(AssessmentOutcome::Structured { result })
        }
        Err(e) => {
            warn!("Assessment reply was not structured JSON: {}", e.message);
            Ok(AssessmentOutcome::Raw(e))
        }
    }
}
