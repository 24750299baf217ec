use crate::api::{ApiResponse, AppError, AppState};
use crate::result::model::{Outcome, Verdict};
use crate::run::model::{Completion, Run};
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::Deserialize;
use std::time::Duration;

pub async fn run_test_case(
    Path(test_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Run>, AppError> {
    let result = app_state.repository.runs().start(&test_id).await;
    ApiResponse::from(result)
}

pub async fn get_test_status(
    Path(test_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Run>, AppError> {
    let result = app_state.repository.runs().latest(&test_id).await;
    ApiResponse::from(result)
}

pub async fn list_runs(
    Path(test_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<Run>>, AppError> {
    let result = app_state.repository.runs().list(&test_id).await;
    ApiResponse::from(result)
}

pub async fn get_run(
    Path((test_id, run_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Run>, AppError> {
    let result = app_state.repository.runs().get(&test_id, &run_id).await;
    ApiResponse::from(result)
}

pub async fn complete_run(
    Path((test_id, run_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<ApiResponse<Completion>, AppError> {
    let payload = parse_payload(&body)?;
    let verdict = resolve_verdict(&app_state, &test_id, payload)?;
    let result = app_state
        .repository
        .runs()
        .complete(&test_id, &run_id, verdict)
        .await;
    ApiResponse::from(result)
}

pub async fn complete_latest_run(
    Path(test_id): Path<String>,
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<ApiResponse<Completion>, AppError> {
    let payload = parse_payload(&body)?;
    app_state.repository.runs().latest_running(&test_id).await?;
    let verdict = resolve_verdict(&app_state, &test_id, payload)?;
    let result = app_state
        .repository
        .runs()
        .complete_latest(&test_id, verdict)
        .await;
    ApiResponse::from(result)
}

// An empty body means "no payload"; anything else must be a valid payload.
fn parse_payload(body: &Bytes) -> Result<CompleteRunPayload, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CompleteRunPayload::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| AppError::Validation(format!("Invalid completion payload: {}", err)))
}

// A caller-supplied outcome wins; otherwise the executor decides.
fn resolve_verdict(
    app_state: &AppState,
    test_id: &str,
    payload: CompleteRunPayload,
) -> Result<Verdict, AppError> {
    let test_case = app_state.repository.test_cases().get(test_id)?;
    Ok(match payload.outcome {
        Some(outcome) => Verdict {
            outcome,
            duration: payload.duration_ms.map(Duration::from_millis),
            error: payload.error,
        },
        None => app_state.executor.execute(&test_case),
    })
}

#[derive(Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct CompleteRunPayload {
    pub outcome: Option<Outcome>,
    pub error: Option<String>,
    pub duration_ms: Option<u64>,
}
