use crate::case::api::{get_test_case, list_test_cases};
use crate::config::Config;
use crate::persistence::repo::Repository;
use crate::report::api::{generate_report, get_report, list_reports};
use crate::result::api::{list_results, list_test_results};
use crate::run::api::{
    complete_latest_run, complete_run, get_run, get_test_status, list_runs, run_test_case,
};
use crate::run::execution::Executor;
use axum::extract::FromRef;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{warn, Level};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
    pub executor: Arc<dyn Executor>,
    pub config: Arc<Config>,
}

impl FromRef<AppState> for Repository {
    fn from_ref(app_state: &AppState) -> Repository {
        app_state.repository.as_ref().clone()
    }
}

pub fn build_api(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(welcome))
        .route("/api/tests", get(list_test_cases))
        .route("/api/tests/:id", get(get_test_case))
        .route("/api/tests/:id/run", post(run_test_case))
        .route("/api/tests/:id/status", get(get_test_status))
        .route("/api/tests/:id/complete", post(complete_latest_run))
        .route("/api/tests/:id/runs", get(list_runs))
        .route("/api/tests/:id/runs/:run_id", get(get_run))
        .route("/api/tests/:id/runs/:run_id/complete", post(complete_run))
        .route("/api/tests/:id/results", get(list_test_results))
        .route("/api/results", get(list_results))
        .route("/api/reports", get(list_reports))
        .route("/api/reports/generate", post(generate_report))
        .route("/api/reports/:id", get(get_report))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                ),
        )
        .with_state(app_state)
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to Test Runner API" }))
}

pub struct ApiResponse<T>(pub T);

impl<T> ApiResponse<T> {
    pub fn from(result: Result<T, AppError>) -> Result<ApiResponse<T>, AppError> {
        result.map(ApiResponse)
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Validation(String),
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!(error = ?self, "request failed");
        // Invalid state maps to 404 like a missing record.
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        };
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::model::TestCase;
    use crate::case::service::Catalog;
    use crate::report::model::Report;
    use crate::result::model::{Outcome, TestResult, Verdict};
    use crate::run::model::{Completion, Run, RunStatus};
    use reqwest::Client;
    use std::net::SocketAddr;

    struct FixedExecutor(Outcome);

    impl Executor for FixedExecutor {
        fn execute(&self, _test_case: &TestCase) -> Verdict {
            match self.0 {
                Outcome::Passed => Verdict::passed(),
                Outcome::Failed => Verdict::failed("executor says no"),
            }
        }
    }

    struct TestApp {
        base: String,
        client: Client,
    }

    impl TestApp {
        async fn spawn(outcome: Outcome, seed_demo_results: bool) -> Self {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr: SocketAddr = listener.local_addr().unwrap();
            let app_state = AppState {
                repository: Arc::new(Repository::new(Catalog::seeded())),
                executor: Arc::new(FixedExecutor(outcome)),
                config: Arc::new(Config {
                    listen: addr,
                    seed_demo_results,
                }),
            };
            let router = build_api(app_state);
            tokio::spawn(async move {
                axum::serve(listener, router).await.unwrap();
            });
            Self {
                base: format!("http://{}", addr),
                client: Client::new(),
            }
        }

        async fn get(&self, path: &str) -> reqwest::Response {
            self.client
                .get(format!("{}{}", self.base, path))
                .send()
                .await
                .unwrap()
        }

        async fn post(&self, path: &str) -> reqwest::Response {
            self.client
                .post(format!("{}{}", self.base, path))
                .send()
                .await
                .unwrap()
        }

        async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
            self.client
                .post(format!("{}{}", self.base, path))
                .json(&body)
                .send()
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn welcome_message() {
        let app = TestApp::spawn(Outcome::Passed, false).await;
        let body: Value = app.get("/").await.json().await.unwrap();
        assert_eq!(body["message"], "Welcome to Test Runner API");
    }

    #[tokio::test]
    async fn lists_and_gets_tests() {
        let app = TestApp::spawn(Outcome::Passed, false).await;
        let tests: Vec<TestCase> = app.get("/api/tests").await.json().await.unwrap();
        assert_eq!(tests.len(), 3);
        assert_eq!(tests[0].id, "test1");

        let response = app.get("/api/tests/test3").await;
        assert_eq!(response.status(), 200);
        let test: TestCase = response.json().await.unwrap();
        assert_eq!(test.url, "https://bing.com");

        let response = app.get("/api/tests/nope").await;
        assert_eq!(response.status(), 404);
        let error: ErrorBody = response.json().await.unwrap();
        assert_eq!(error.message, "Test not found");
    }

    #[tokio::test]
    async fn run_complete_and_report() {
        let app = TestApp::spawn(Outcome::Failed, false).await;

        let response = app.post("/api/tests/test1/run").await;
        assert_eq!(response.status(), 200);
        let run: Run = response.json().await.unwrap();
        assert_eq!(run.status, RunStatus::Running);

        let status: Value = app.get("/api/tests/test1/status").await.json().await.unwrap();
        assert_eq!(status["status"], "running");
        assert!(status.get("completed_at").is_none());

        let response = app
            .post_json(
                &format!("/api/tests/test1/runs/{}/complete", run.id),
                json!({ "outcome": "passed", "duration_ms": 1200 }),
            )
            .await;
        assert_eq!(response.status(), 200);
        let completion: Completion = response.json().await.unwrap();
        assert_eq!(completion.run.status, RunStatus::Completed);
        assert_eq!(completion.result.outcome, Outcome::Passed);
        assert_eq!(completion.result.duration.as_millis(), 1200);

        let status: Run = app.get("/api/tests/test1/status").await.json().await.unwrap();
        assert_eq!(status, completion.run);

        let results: Vec<TestResult> = app.get("/api/tests/test1/results").await.json().await.unwrap();
        assert_eq!(results, vec![completion.result.clone()]);

        let report: Report = app.post("/api/reports/generate").await.json().await.unwrap();
        assert_eq!(report.total_tests, 1);
        assert_eq!(report.passed_tests, 1);
        assert_eq!(report.pass_rate, 100);

        let fetched: Report = app
            .get(&format!("/api/reports/{}", report.id))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(fetched, report);
        let reports: Vec<Report> = app.get("/api/reports").await.json().await.unwrap();
        assert_eq!(reports, vec![report]);
    }

    #[tokio::test]
    async fn completion_without_outcome_asks_executor() {
        let app = TestApp::spawn(Outcome::Failed, false).await;
        let run: Run = app.post("/api/tests/test2/run").await.json().await.unwrap();

        let completion: Completion = app
            .post(&format!("/api/tests/test2/runs/{}/complete", run.id))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(completion.result.outcome, Outcome::Failed);
        assert_eq!(completion.result.error.as_deref(), Some("executor says no"));
        assert_eq!(completion.result.url, "https://google.com");
    }

    #[tokio::test]
    async fn empty_json_body_asks_executor() {
        let app = TestApp::spawn(Outcome::Passed, false).await;
        let run: Run = app.post("/api/tests/test1/run").await.json().await.unwrap();

        let response = app
            .client
            .post(format!("{}/api/tests/test1/runs/{}/complete", app.base, run.id))
            .header("Content-Type", "application/json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let completion: Completion = response.json().await.unwrap();
        assert_eq!(completion.result.outcome, Outcome::Passed);

        let run: Run = app.post("/api/tests/test1/run").await.json().await.unwrap();
        let response = app
            .client
            .post(format!("{}/api/tests/test1/complete", app.base))
            .header("Content-Type", "application/json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let completion: Completion = response.json().await.unwrap();
        assert_eq!(completion.run.id, run.id);
    }

    #[tokio::test]
    async fn malformed_completion_body_is_rejected() {
        let app = TestApp::spawn(Outcome::Passed, false).await;
        let run: Run = app.post("/api/tests/test1/run").await.json().await.unwrap();
        let path = format!("/api/tests/test1/runs/{}/complete", run.id);

        for body in [
            json!({ "outcome": "FAILED" }),
            json!({ "outcome": "failed", "duration_ms": "slow" }),
            json!({ "outcom": "failed" }),
        ] {
            let response = app.post_json(&path, body).await;
            assert_eq!(response.status(), 400);
            let error: ErrorBody = response.json().await.unwrap();
            assert!(error.message.starts_with("Invalid completion payload"));
        }

        let response = app.post_json("/api/tests/test1/complete", json!({ "outcome": 1 })).await;
        assert_eq!(response.status(), 400);

        let results: Vec<TestResult> = app.get("/api/results").await.json().await.unwrap();
        assert!(results.is_empty());
        let status: Run = app.get("/api/tests/test1/status").await.json().await.unwrap();
        assert_eq!(status.status, RunStatus::Running);

        let completion: Completion = app
            .post_json(&path, json!({ "outcome": "failed", "error": "bad banner" }))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(completion.result.outcome, Outcome::Failed);
        assert_eq!(completion.result.error.as_deref(), Some("bad banner"));
    }

    #[tokio::test]
    async fn legacy_complete_for_unknown_test_reports_no_running_test() {
        let app = TestApp::spawn(Outcome::Passed, false).await;
        let response = app.post("/api/tests/nope/complete").await;
        assert_eq!(response.status(), 404);
        let error: ErrorBody = response.json().await.unwrap();
        assert_eq!(error.message, "No running test found");
    }

    #[tokio::test]
    async fn completing_twice_is_rejected() {
        let app = TestApp::spawn(Outcome::Passed, false).await;
        let run: Run = app.post("/api/tests/test1/run").await.json().await.unwrap();
        let path = format!("/api/tests/test1/runs/{}/complete", run.id);

        assert_eq!(app.post(&path).await.status(), 200);
        let response = app.post(&path).await;
        assert_eq!(response.status(), 404);
        let error: ErrorBody = response.json().await.unwrap();
        assert!(error.message.contains("already completed"));

        let results: Vec<TestResult> = app.get("/api/results").await.json().await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn legacy_complete_uses_latest_running_run() {
        let app = TestApp::spawn(Outcome::Passed, false).await;

        let response = app.post("/api/tests/test1/complete").await;
        assert_eq!(response.status(), 404);
        let error: ErrorBody = response.json().await.unwrap();
        assert_eq!(error.message, "No running test found");

        let first: Run = app.post("/api/tests/test1/run").await.json().await.unwrap();
        let second: Run = app.post("/api/tests/test1/run").await.json().await.unwrap();
        let completion: Completion = app
            .post("/api/tests/test1/complete")
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(completion.run.id, second.id);

        let first_now: Run = app
            .get(&format!("/api/tests/test1/runs/{}", first.id))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(first_now.status, RunStatus::Running);
        let runs: Vec<Run> = app.get("/api/tests/test1/runs").await.json().await.unwrap();
        assert_eq!(runs.len(), 2);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let app = TestApp::spawn(Outcome::Passed, false).await;
        assert_eq!(app.post("/api/tests/nope/run").await.status(), 404);
        assert_eq!(app.get("/api/tests/test1/status").await.status(), 404);
        assert_eq!(app.get("/api/tests/test1/runs/nope").await.status(), 404);
        assert_eq!(app.get("/api/tests/nope/runs").await.status(), 404);
        assert_eq!(app.get("/api/tests/nope/results").await.status(), 404);
        assert_eq!(app.get("/api/reports/nope").await.status(), 404);
        assert_eq!(
            app.post("/api/tests/test1/runs/nope/complete").await.status(),
            404
        );
    }

    #[tokio::test]
    async fn empty_report_without_seeding() {
        let app = TestApp::spawn(Outcome::Passed, false).await;
        let report: Report = app.post("/api/reports/generate").await.json().await.unwrap();
        assert_eq!(report.total_tests, 0);
        assert_eq!(report.pass_rate, 0);
        let results: Vec<TestResult> = app.get("/api/results").await.json().await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn demo_seeding_fills_empty_store_once() {
        let app = TestApp::spawn(Outcome::Passed, true).await;
        let report: Report = app.post("/api/reports/generate").await.json().await.unwrap();
        assert_eq!(report.total_tests, 3);
        assert_eq!(report.passed_tests, 2);
        assert_eq!(report.pass_rate, 66);

        let again: Report = app.post("/api/reports/generate").await.json().await.unwrap();
        assert_ne!(again.id, report.id);
        assert_eq!(again.total_tests, 3);
    }
}
