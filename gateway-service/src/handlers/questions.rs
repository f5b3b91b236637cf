use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use service_core::error::AppError;
use service_core::observability::REQUEST_ID_HEADER;

use crate::models::{QuestionParams, QuestionRequest};
use crate::services::metrics::{record_question, QuestionOutcome};
use crate::startup::AppState;

pub const MISSING_PARAMS_MESSAGE: &str = "store_id and question are required";
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process question";
pub const UNREACHABLE_MESSAGE: &str = "Failed to reach AI service";
pub const CREDENTIALS_FAILED_MESSAGE: &str = "Failed to resolve store credentials";

/// POST /api/v1/questions
///
/// Accepts `store_id` and `question` from the query string, a form body or
/// a JSON body, and relays the AI service's JSON answer unchanged.
#[tracing::instrument(skip_all)]
pub async fn create_question(
    State(state): State<AppState>,
    query: Option<Query<QuestionParams>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let query = query.map(|Query(params)| params).unwrap_or_default();
    let request = match params_from_body(&headers, &body) {
        Ok(from_body) => from_body.or(query).into_request(),
        Err(reason) => {
            tracing::warn!(reason = %reason, "Unreadable question body");
            None
        }
    };

    let Some(QuestionRequest { store_id, question }) = request else {
        record_question(QuestionOutcome::Invalid);
        return Err(AppError::BadRequest(anyhow::anyhow!(MISSING_PARAMS_MESSAGE)));
    };

    tracing::info!(store_id = %store_id, "Processing store question");

    let credential = state.credentials.resolve(&store_id).await.map_err(|e| {
        tracing::error!(store_id = %store_id, error = %e, "Credential lookup failed");
        record_question(QuestionOutcome::CredentialError);
        AppError::upstream_failure(CREDENTIALS_FAILED_MESSAGE, e.to_string())
    })?;

    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok());

    let response = state
        .ai_client
        .process_question(&store_id, &question, &credential, request_id)
        .await
        .map_err(|e| {
            tracing::error!(store_id = %store_id, error = %e, "AI service unreachable");
            record_question(QuestionOutcome::TransportError);
            AppError::bad_gateway(UNREACHABLE_MESSAGE, e.to_string())
        })?;

    if !response.is_success() {
        tracing::warn!(
            store_id = %store_id,
            status = %response.status(),
            "AI service rejected question"
        );
        record_question(QuestionOutcome::DownstreamError);
        return Err(AppError::upstream_failure(
            PROCESSING_FAILED_MESSAGE,
            response.into_body(),
        ));
    }

    response.check_json().map_err(|e| {
        tracing::error!(store_id = %store_id, error = %e, "AI service returned invalid JSON");
        record_question(QuestionOutcome::MalformedResponse);
        AppError::upstream_failure(
            PROCESSING_FAILED_MESSAGE,
            format!("AI service returned invalid JSON: {}", e),
        )
    })?;

    record_question(QuestionOutcome::Answered);
    Ok((
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        response.into_body(),
    )
        .into_response())
}

/// Reads question parameters from a JSON or form-encoded body. Other content
/// types, and empty bodies, contribute nothing.
fn params_from_body(headers: &HeaderMap, body: &[u8]) -> Result<QuestionParams, String> {
    if body.is_empty() {
        return Ok(QuestionParams::default());
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") || content_type.contains("+json") {
        serde_json::from_slice(body).map_err(|e| e.to_string())
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        serde_urlencoded::from_bytes(body).map_err(|e| e.to_string())
    } else {
        Ok(QuestionParams::default())
    }
}
