/// LLM Client: the single point of entry for all completion-service calls.
///
/// No other module talks to the Gemini API directly. Handlers receive a
/// `dyn CompletionClient` so tests can substitute a scripted fake.
///
/// One call per user action: no retries, no client-side timeout beyond the
/// transport default, no caching.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::chat::{ChatRole, ChatTurn};

#[cfg(test)]
pub mod fake;
pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Prompt blocked by the completion service: {reason}")]
    Blocked { reason: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The completion service as seen by the rest of the application.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends a single prompt as one user turn and returns the raw reply text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Sends an ordered, role-tagged history and returns the raw reply text.
    async fn generate_turns(&self, turns: &[ChatTurn]) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize, PartialEq)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize, PartialEq)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client. Cheap to clone; shares one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: String, api_base: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                api_base.trim_end_matches('/'),
                model
            ),
        }
    }

    async fn send(&self, contents: Vec<Content<'_>>) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest { contents };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Completion call succeeded: prompt_tokens={:?}, reply_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        match parsed.text() {
            Some(text) => Ok(text),
            None => {
                debug!(
                    "Reply carried no text (finish_reason={:?})",
                    parsed
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.as_deref())
                );
                match parsed.block_reason() {
                    Some(reason) => Err(LlmError::Blocked {
                        reason: reason.to_string(),
                    }),
                    None => Err(LlmError::EmptyContent),
                }
            }
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!("Sending single prompt ({} chars)", prompt.len());
        self.send(vec![Content {
            role: ChatRole::User.as_str(),
            parts: vec![Part { text: prompt }],
        }])
        .await
    }

    async fn generate_turns(&self, turns: &[ChatTurn]) -> Result<String, LlmError> {
        debug!("Sending conversation of {} turns", turns.len());
        self.send(build_contents(turns)).await
    }
}

/// Groups consecutive same-role turns into one content with several parts.
/// The seed instruction and the first user message both carry the user role,
/// so they travel together as a single user content.
fn build_contents(turns: &[ChatTurn]) -> Vec<Content<'_>> {
    let mut contents: Vec<Content<'_>> = Vec::new();
    for turn in turns {
        let role = turn.role.as_str();
        if let Some(last) = contents.last_mut().filter(|c| c.role == role) {
            last.parts.push(Part { text: &turn.text });
            continue;
        }
        contents.push(Content {
            role,
            parts: vec![Part { text: &turn.text }],
        });
    }
    contents
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
