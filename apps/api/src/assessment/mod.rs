// Structured hazard assessment: prompt building, one completion call, and
// defensive interpretation of the JSON-shaped reply.
// All completion calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod interpreter;
pub mod prompts;
