use crate::api::{ApiResponse, AppError, AppState};
use crate::persistence::repo::Repository;
use crate::report::model::Report;
use crate::result::demo::demo_results;
use axum::extract::{Path, State};

pub async fn list_reports(State(repository): State<Repository>) -> ApiResponse<Vec<Report>> {
    ApiResponse(repository.reports().list().await)
}

pub async fn get_report(
    Path(id): Path<String>,
    State(repository): State<Repository>,
) -> Result<ApiResponse<Report>, AppError> {
    let result = repository.reports().get(&id).await;
    ApiResponse::from(result)
}

pub async fn generate_report(State(app_state): State<AppState>) -> ApiResponse<Report> {
    let repository = &app_state.repository;
    if app_state.config.seed_demo_results {
        let seed = demo_results(repository.test_cases());
        repository.results().seed_if_empty(seed).await;
    }
    ApiResponse(repository.reports().generate().await)
}
