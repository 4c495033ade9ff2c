//! Request handlers for the ask and health endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::AskError;
use crate::http::error::ApiError;
use crate::http::extractors::RestaurantId;
use crate::llm::Message;
use crate::state::AppState;

/// Body of `POST /ask`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's natural-language question.
    pub question: String,
    /// Optional prior conversation, forwarded verbatim to the answer prompt.
    #[serde(default)]
    pub context: Option<Vec<Message>>,
}

/// Body of a successful `POST /ask` response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// POST /ask - Answer a question from the knowledge base.
pub async fn ask(
    State(state): State<AppState>,
    restaurant: RestaurantId,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(restaurant_id = %restaurant.0, "Received question");

    let answer = state
        .ask
        .answer(&request.question, request.context.as_deref())
        .await
        .map_err(|e| to_api_error(e, state.verbose_errors))?;

    Ok(Json(ChatResponse { answer }))
}

/// GET /health - Simple health check endpoint (no auth required).
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Maps a pipeline error to an HTTP error, logging the full text and hiding
/// it from the client unless verbose errors are enabled.
fn to_api_error(error: AskError, verbose_errors: bool) -> ApiError {
    error!(category = error.category(), error = %error, "Question pipeline failed");

    if verbose_errors {
        ApiError::internal(error.to_string())
    } else {
        ApiError::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_request_deserializes_without_context() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"question": "Как создать блюдо"}"#).unwrap();

        assert_eq!(request.question, "Как создать блюдо");
        assert!(request.context.is_none());
    }

    #[test]
    fn test_request_deserializes_with_context() {
        let json = r#"{
            "question": "follow-up",
            "context": [
                {"role": "user", "content": "earlier question"},
                {"role": "assistant", "content": "earlier answer"}
            ]
        }"#;

        let request: ChatRequest = serde_json::from_str(json).unwrap();

        let context = request.context.unwrap();
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].content, "earlier question");
    }

    #[test]
    fn test_response_serializes_answer() {
        let response = ChatResponse {
            answer: "Open the menu editor.".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["answer"], "Open the menu editor.");
    }

    #[test]
    fn test_errors_are_hidden_by_default() {
        let error = to_api_error(AskError::llm("Rate limited"), false);

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.detail, "Internal server error");
    }

    #[test]
    fn test_verbose_errors_expose_detail() {
        let error = to_api_error(AskError::llm("Rate limited"), true);

        assert!(error.detail.contains("Rate limited"));
    }
}
