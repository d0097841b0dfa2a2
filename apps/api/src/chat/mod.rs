// Safety chat: keyword guardrail, per-session transcripts, and the
// send-message flow. All completion calls go through llm_client.

pub mod guardrail;
pub mod handlers;
pub mod prompts;
pub mod service;
pub mod session;

/// Which of the two chat behaviours the service runs.
///
/// `Agent` seeds each transcript with the system instruction and sends the
/// whole history on every turn. `Simple` starts empty and sends only the
/// latest message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatVariant {
    #[default]
    Agent,
    Simple,
}
