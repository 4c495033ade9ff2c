//! Prompt construction for the two-phase question pipeline.
//!
//! Phase one reduces the question to a search keyword; phase two phrases the
//! retrieved rows as an answer. Both prompts are built here so the
//! orchestrator stays free of string templating.

use crate::db::QueryResult;
use crate::llm::types::Message;

/// Maximum number of rows embedded in the answer prompt.
const MAX_PROMPT_ROWS: usize = 50;

/// Prefix of the assistant message carrying the lookup outcome. The mock
/// client keys off this to tell the two phases apart.
pub const DATA_MESSAGE_PREFIX: &str = "Retrieved knowledge-base data:";

/// Text handed to the model when the search returned nothing.
pub const EMPTY_RESULT_SIGNAL: &str = "The search matched no rows in the knowledge base.";

/// System prompt for the keyword-reduction call.
const KEYWORD_SYSTEM_PROMPT: &str = "You are an assistant that reduces a user's question about \
a restaurant-management application to a single search keyword. The knowledge base is the \
PostgreSQL table public.materials_material, whose content column holds instruction articles \
in HTML. Pick the most salient term from the question when possible. For example, for \
'How to create a dish' you would search for 'dish'.";

/// System prompt for the answer call.
const ANSWER_SYSTEM_PROMPT: &str = "You are a helpdesk assistant for a restaurant-management \
application. Answer the user's question using only the retrieved knowledge-base data provided \
in this conversation. If the data does not let you find, derive, or infer an answer, say \
explicitly that you could not find an answer.";

/// Builds the message list for the keyword-reduction call.
pub fn build_keyword_messages(question: &str) -> Vec<Message> {
    vec![
        Message::system(KEYWORD_SYSTEM_PROMPT),
        Message::user(format!(
            "Question: {question}\n\
             Reply with the search keyword only: no SQL, no code fences, no commentary."
        )),
    ]
}

/// Builds the message list for the answer call.
///
/// Caller-supplied prior context is inserted verbatim, in order, between the
/// system message and the synthesized data/question messages.
pub fn build_answer_messages(
    question: &str,
    context: Option<&[Message]>,
    lookup_text: &str,
) -> Vec<Message> {
    let context_len = context.map_or(0, <[Message]>::len);
    let mut messages = Vec::with_capacity(context_len + 3);

    messages.push(Message::system(ANSWER_SYSTEM_PROMPT));

    if let Some(context) = context {
        messages.extend(context.iter().cloned());
    }

    messages.push(Message::assistant(format!(
        "{DATA_MESSAGE_PREFIX}\n{lookup_text}"
    )));
    messages.push(Message::user(format!(
        "Question: {question}\nPhrase a clear answer for the user."
    )));

    messages
}

/// Renders a search result as text for the answer prompt.
///
/// Empty results become an explicit signal rather than an empty string, and
/// large results are capped with a note telling the model how much it sees.
pub fn render_results(result: &QueryResult) -> String {
    if result.is_empty() {
        return EMPTY_RESULT_SIGNAL.to_string();
    }

    let total = result.total_rows.unwrap_or(result.row_count);
    let shown = result.row_count.min(MAX_PROMPT_ROWS);

    let mut rendered = String::new();
    if shown < total || result.was_truncated {
        rendered.push_str(&format!("Showing {shown} of {total} rows.\n"));
    }

    for row in result.rows.iter().take(MAX_PROMPT_ROWS) {
        let line: Vec<String> = row.iter().map(|v| v.to_display_string()).collect();
        rendered.push_str(&line.join(" | "));
        rendered.push('\n');
    }

    rendered.trim_end().to_string()
}

/// Renders a failed lookup as text for the answer prompt.
///
/// Handing the error description to the model instead of failing the request
/// is an explicit orchestrator decision; see `AskService::answer`.
pub fn render_lookup_failure(error: &crate::error::AskError) -> String {
    format!("The knowledge-base lookup failed: {error}")
}

/// Cleans up the model's keyword reply.
///
/// Strips code fences, surrounding quotes, and trailing punctuation, then
/// trims whitespace. Returns None when nothing usable remains.
pub fn sanitize_keyword(raw: &str) -> Option<String> {
    let without_fences: String = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join(" ");

    let trimmed = without_fences
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '«' | '»'))
        .trim_end_matches(|c: char| matches!(c, ';' | '.' | '!' | '?'))
        .trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnInfo, QueryResult, Value};
    use crate::llm::types::Role;
    use pretty_assertions::assert_eq;

    fn result_with_rows(contents: &[&str]) -> QueryResult {
        QueryResult::with_data(
            vec![ColumnInfo::new("content", "text")],
            contents.iter().map(|c| vec![Value::from(*c)]).collect(),
        )
    }

    #[test]
    fn test_keyword_messages_shape() {
        let messages = build_keyword_messages("Как создать блюдо");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("public.materials_material"));
        assert!(messages[0].content.contains("content"));
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("Как создать блюдо"));
        assert!(messages[1].content.contains("keyword only"));
    }

    #[test]
    fn test_answer_messages_without_context() {
        let messages = build_answer_messages("How to create a dish", None, "row one");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::Assistant);
        assert!(messages[1].content.starts_with(DATA_MESSAGE_PREFIX));
        assert!(messages[1].content.contains("row one"));
        assert_eq!(messages[2].role, Role::User);
        assert!(messages[2].content.contains("How to create a dish"));
    }

    #[test]
    fn test_answer_messages_context_order_preserved() {
        let context = vec![
            Message::user("earlier question"),
            Message::assistant("earlier answer"),
        ];
        let messages = build_answer_messages("follow-up", Some(&context), "data");

        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1], context[0]);
        assert_eq!(messages[2], context[1]);
        assert_eq!(messages[3].role, Role::Assistant);
        assert_eq!(messages[4].role, Role::User);
    }

    #[test]
    fn test_render_empty_result() {
        let result = QueryResult::new();
        assert_eq!(render_results(&result), EMPTY_RESULT_SIGNAL);
    }

    #[test]
    fn test_render_rows() {
        let result = result_with_rows(&["first article", "second article"]);
        let rendered = render_results(&result);

        assert!(rendered.contains("first article"));
        assert!(rendered.contains("second article"));
        assert!(!rendered.contains("Showing"));
    }

    #[test]
    fn test_render_caps_rows_with_note() {
        let contents: Vec<String> = (0..80).map(|i| format!("article {i}")).collect();
        let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
        let result = result_with_rows(&refs);

        let rendered = render_results(&result);

        assert!(rendered.contains("Showing 50 of 80 rows."));
        assert!(rendered.contains("article 49"));
        assert!(!rendered.contains("article 50\n"));
    }

    #[test]
    fn test_render_respects_executor_truncation() {
        let mut result = result_with_rows(&["only row"]);
        result.total_rows = Some(600);
        result.was_truncated = true;

        let rendered = render_results(&result);
        assert!(rendered.contains("Showing 1 of 600 rows."));
    }

    #[test]
    fn test_render_lookup_failure() {
        let err = crate::error::AskError::connection("connection refused");
        let rendered = render_lookup_failure(&err);
        assert!(rendered.contains("lookup failed"));
        assert!(rendered.contains("connection refused"));
    }

    #[test]
    fn test_sanitize_plain_keyword() {
        assert_eq!(sanitize_keyword("блюдо"), Some("блюдо".to_string()));
        assert_eq!(sanitize_keyword("  dish  "), Some("dish".to_string()));
    }

    #[test]
    fn test_sanitize_strips_quotes_and_punctuation() {
        assert_eq!(sanitize_keyword("\"dish\""), Some("dish".to_string()));
        assert_eq!(sanitize_keyword("'dish';"), Some("dish".to_string()));
        assert_eq!(sanitize_keyword("«блюдо»."), Some("блюдо".to_string()));
    }

    #[test]
    fn test_sanitize_strips_code_fences() {
        assert_eq!(
            sanitize_keyword("```\ndish\n```"),
            Some("dish".to_string())
        );
        assert_eq!(
            sanitize_keyword("```sql\ndish\n```"),
            Some("dish".to_string())
        );
    }

    #[test]
    fn test_sanitize_empty_returns_none() {
        assert_eq!(sanitize_keyword(""), None);
        assert_eq!(sanitize_keyword("   "), None);
        assert_eq!(sanitize_keyword("```\n```"), None);
    }
}
