//! Keyword guardrail gating chat input before it reaches the completion service.
//!
//! Purely syntactic: a message passes when its lower-cased text contains any
//! allow-listed keyword as a substring. No stemming, no negation handling,
//! and keyword stuffing gets through.

pub const ALLOWED_KEYWORDS: [&str; 12] = [
    "safety",
    "hazard",
    "workplace",
    "health",
    "ohs",
    "training",
    "risk",
    "accident",
    "emergency",
    "ppe",
    "regulations",
    "injury",
];

pub const REFUSAL_MESSAGE: &str =
    "⚠️ I can only answer questions related to Occupational Health & Safety.";

/// Returns the refusal when the input is off-topic, `None` when it may pass.
pub fn guardrail(input: &str) -> Option<&'static str> {
    let lowered = input.to_lowercase();
    if ALLOWED_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        None
    } else {
        Some(REFUSAL_MESSAGE)
    }
}
