use crate::api::{ApiResponse, AppError};
use crate::persistence::repo::Repository;
use crate::result::model::TestResult;
use axum::extract::{Path, State};

pub async fn list_results(State(repository): State<Repository>) -> ApiResponse<Vec<TestResult>> {
    ApiResponse(repository.results().all().await)
}

pub async fn list_test_results(
    Path(test_id): Path<String>,
    State(repository): State<Repository>,
) -> Result<ApiResponse<Vec<TestResult>>, AppError> {
    let test_case = repository.test_cases().get(&test_id)?;
    Ok(ApiResponse(repository.results().by_test(&test_case.id).await))
}
