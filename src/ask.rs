//! Question orchestration: the two-phase NL question pipeline.
//!
//! `AskService` is the single entry point for answering a question. It owns
//! the LLM client and the database client, injected once at startup, and runs
//! the fixed pipeline: keyword reduction, knowledge-base search, answer
//! synthesis. No branching beyond error handling, no state across requests.

use std::sync::Arc;
use std::time::Instant;

use crate::db::DatabaseClient;
use crate::error::Result;
use crate::llm::prompt::{
    build_answer_messages, build_keyword_messages, render_lookup_failure, render_results,
    sanitize_keyword,
};
use crate::llm::{LlmClient, Message};

/// Service orchestrating the question pipeline.
pub struct AskService {
    llm: Arc<dyn LlmClient>,
    db: Arc<dyn DatabaseClient>,
}

impl AskService {
    /// Creates a new service over the given clients.
    pub fn new(llm: Arc<dyn LlmClient>, db: Arc<dyn DatabaseClient>) -> Self {
        Self { llm, db }
    }

    /// Answers a natural-language question from the knowledge base.
    ///
    /// `context` is an optional prior message history, passed through
    /// verbatim into the answer prompt.
    ///
    /// A failed database lookup does not fail the request: the error
    /// description is handed to the model as the lookup outcome so the
    /// caller still gets an answer. LLM failures in either phase propagate.
    pub async fn answer(&self, question: &str, context: Option<&[Message]>) -> Result<String> {
        let start = Instant::now();
        tracing::debug!(question_len = question.len(), "Starting question pipeline");

        // Phase 1: reduce the question to a search keyword.
        let keyword_messages = build_keyword_messages(question);
        let raw_keyword = self.llm.complete(&keyword_messages).await?;

        let keyword = match sanitize_keyword(&raw_keyword) {
            Some(keyword) => keyword,
            None => {
                tracing::warn!("Model returned an unusable keyword, searching the question text");
                question.trim().to_string()
            }
        };
        tracing::debug!(keyword = %keyword, "Reduced question to search keyword");

        // Phase 2: search the knowledge base. Errors become prompt text, not
        // request failures; the answer prompt tells the model what happened.
        let lookup_text = match self.db.search_content(&keyword).await {
            Ok(result) => {
                tracing::debug!(
                    row_count = result.row_count,
                    truncated = result.was_truncated,
                    "Knowledge-base search returned"
                );
                render_results(&result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Knowledge-base search failed, answering without data");
                render_lookup_failure(&e)
            }
        };

        // Phase 3: phrase the outcome as an answer.
        let answer_messages = build_answer_messages(question, context, &lookup_text);
        let answer = self.llm.complete(&answer_messages).await?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            answer_len = answer.len(),
            "Question pipeline complete"
        );

        Ok(answer)
    }
}
