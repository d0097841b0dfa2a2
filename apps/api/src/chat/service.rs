//! Send-message flow for one chat session.
//!
//! user turn → guardrail → (refusal | completion call) → assistant turn.

use serde::Serialize;
use tracing::{info, warn};

use crate::chat::guardrail::guardrail;
use crate::chat::prompts::{build_chat_prompt, ChatPrompt};
use crate::chat::session::Session;
use crate::errors::AppError;
use crate::llm_client::CompletionClient;
use crate::models::chat::ChatTurn;

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reply", rename_all = "snake_case")]
pub enum ChatOutcome {
    /// The completion service answered.
    Replied(String),
    /// The guardrail refused the message; no call was made.
    Blocked(&'static str),
}

/// Submits one message to a session.
///
/// Blank input is rejected with nothing appended. Otherwise the user turn is
/// appended first and stays even if the completion call then fails; the
/// assistant turn is appended only on success or guardrail refusal.
pub async fn send_message(
    session: &mut Session,
    input: &str,
    llm: &dyn CompletionClient,
) -> Result<ChatOutcome, AppError> {
    if input.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    session.append(ChatTurn::user(input));

    if let Some(refusal) = guardrail(input) {
        info!("Session {}: message blocked by guardrail", session.id);
        session.append(ChatTurn::model(refusal));
        return Ok(ChatOutcome::Blocked(refusal));
    }

    let reply = match build_chat_prompt(session.variant, session.transcript(), input) {
        ChatPrompt::Single(prompt) => llm.generate(prompt).await,
        ChatPrompt::History(turns) => llm.generate_turns(turns).await,
    };

    match reply {
        Ok(text) => {
            info!(
                "Session {}: reply received ({} chars), transcript now {} turns",
                session.id,
                text.len(),
                session.transcript().len() + 1
            );
            session.append(ChatTurn::model(text.clone()));
            Ok(ChatOutcome::Replied(text))
        }
        Err(e) => {
            warn!("Session {}: completion call failed: {e}", session.id);
            Err(AppError::Service(e))
        }
    }
}
