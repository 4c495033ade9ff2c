//! Mock LLM clients for testing.
//!
//! `MockLlmClient` produces deterministic keywords and answers without a
//! network call, `FailingLlmClient` fails on a chosen call, and
//! `RecordingLlmClient` captures the exact message lists it was sent.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{AskError, Result};
use crate::llm::prompt::{DATA_MESSAGE_PREFIX, EMPTY_RESULT_SIGNAL};
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Mock LLM client with deterministic behavior for both pipeline phases.
///
/// On the keyword-reduction prompt it answers with the last word of the
/// question (so "Как создать блюдо" reduces to "блюдо"). On the answer
/// prompt it echoes whether it saw retrieved rows, the empty-result signal,
/// or a lookup failure.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response), checked first.
    custom_responses: Vec<(String, String)>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the last user message contains `pattern`, the mock returns
    /// `response` regardless of phase.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Extracts the last user message content from a message list.
    fn extract_user_input(messages: &[Message]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }

    /// Finds the assistant message carrying the lookup outcome, if any.
    fn extract_lookup_data(messages: &[Message]) -> Option<String> {
        messages
            .iter()
            .find(|m| m.role == Role::Assistant && m.content.starts_with(DATA_MESSAGE_PREFIX))
            .map(|m| m.content.clone())
    }

    /// Deterministic keyword reduction: the last word of the question line.
    fn mock_keyword(input: &str) -> String {
        let question = input
            .lines()
            .find_map(|line| line.strip_prefix("Question: "))
            .unwrap_or(input);

        question
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .to_string()
    }

    /// Deterministic answer synthesis from the lookup data message.
    fn mock_answer(data: &str) -> String {
        if data.contains(EMPTY_RESULT_SIGNAL) {
            return "I could not find an answer to your question in the knowledge base."
                .to_string();
        }

        if data.contains("lookup failed") {
            return "The knowledge base could not be reached, so I could not find an answer."
                .to_string();
        }

        let first_line = data
            .lines()
            .nth(1)
            .unwrap_or_default();
        format!("Based on the retrieved data: {first_line}")
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let input = Self::extract_user_input(messages);
        let input_lower = input.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if input_lower.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        match Self::extract_lookup_data(messages) {
            Some(data) => Ok(Self::mock_answer(&data)),
            None => Ok(Self::mock_keyword(&input)),
        }
    }
}

/// LLM client that fails on one specific call (1-based) and otherwise
/// delegates to `MockLlmClient`.
///
/// Lets tests fail the keyword call and the answer call independently.
#[derive(Debug, Default)]
pub struct FailingLlmClient {
    fail_on_call: usize,
    calls: AtomicUsize,
    inner: MockLlmClient,
}

impl FailingLlmClient {
    /// Creates a client that fails on the given call number.
    pub fn fail_on_call(n: usize) -> Self {
        Self {
            fail_on_call: n,
            calls: AtomicUsize::new(0),
            inner: MockLlmClient::new(),
        }
    }
}

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on_call {
            return Err(AskError::llm("Rate limited. Please wait and try again."));
        }
        self.inner.complete(messages).await
    }
}

/// LLM client that records every message list it receives.
#[derive(Debug, Default)]
pub struct RecordingLlmClient {
    inner: MockLlmClient,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl RecordingLlmClient {
    /// Creates a new recording client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the message lists from all calls so far, in order.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().expect("recording lock poisoned").clone()
    }
}

#[async_trait]
impl LlmClient for RecordingLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.calls
            .lock()
            .expect("recording lock poisoned")
            .push(messages.to_vec());
        self.inner.complete(messages).await
    }
}
