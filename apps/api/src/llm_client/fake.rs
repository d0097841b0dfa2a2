//! Scripted completion client for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionClient, LlmError};
use crate::models::chat::ChatTurn;

/// Replies are consumed in order; an exhausted script answers `EmptyContent`.
/// Every prompt and history it receives is recorded for assertions.
#[derive(Default)]
pub struct FakeCompletionClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    histories: Mutex<Vec<Vec<ChatTurn>>>,
}

impl FakeCompletionClient {
    pub fn replying(replies: &[&str]) -> Self {
        let client = Self::default();
        for reply in replies {
            client.push_reply(Ok(reply.to_string()));
        }
        client
    }

    pub fn failing(error: LlmError) -> Self {
        let client = Self::default();
        client.push_reply(Err(error));
        client
    }

    pub fn push_reply(&self, reply: Result<String, LlmError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn histories(&self) -> Vec<Vec<ChatTurn>> {
        self.histories.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.next_reply()
    }

    async fn generate_turns(&self, turns: &[ChatTurn]) -> Result<String, LlmError> {
        self.histories.lock().unwrap().push(turns.to_vec());
        self.next_reply()
    }
}
