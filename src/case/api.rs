use crate::api::{ApiResponse, AppError};
use crate::case::model::TestCase;
use crate::persistence::repo::Repository;
use axum::extract::{Path, State};

pub async fn list_test_cases(State(repository): State<Repository>) -> ApiResponse<Vec<TestCase>> {
    ApiResponse(repository.test_cases().list())
}

pub async fn get_test_case(
    Path(id): Path<String>,
    State(repository): State<Repository>,
) -> Result<ApiResponse<TestCase>, AppError> {
    let result = repository.test_cases().get(&id);
    ApiResponse::from(result)
}
