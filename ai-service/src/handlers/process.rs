use axum::{extract::State, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{Insight, ProcessRequest};
use crate::services::metrics::record_failure;
use crate::startup::AppState;

#[tracing::instrument(skip_all)]
pub async fn process_question(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<Insight>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    match state.agent.process(&request).await {
        Ok(insight) => Ok(Json(insight)),
        Err(e) => {
            tracing::error!(error = %e, "Agent failed to answer question");
            record_failure();
            Err(e.into())
        }
    }
}
