use crate::api::AppError;
use crate::case::model::TestCase;
use crate::case::service::Catalog;
use crate::persistence::table::Table;
use crate::result::model::{Outcome, TestResult, Verdict};
use crate::result::service::ResultOperations;
use crate::run::model::{Completion, Run, RunStatus};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const DEFAULT_FAILURE: &str = "test run failed";

pub struct RunOperations {
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) runs: Arc<Table<Run>>,
    pub(crate) results: ResultOperations,
}

impl RunOperations {
    pub async fn start(&self, test_id: &str) -> Result<Run, AppError> {
        let test_case = self.catalog.get(test_id)?;
        let run = Run {
            id: Uuid::new_v4().to_string(),
            test_id: test_case.id,
            status: RunStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
        };
        info!(test_id = %run.test_id, run_id = %run.id, "run started");
        Ok(self.runs.insert(run).await)
    }

    pub async fn latest(&self, test_id: &str) -> Result<Run, AppError> {
        self.runs
            .find_last(|run| run.test_id == test_id)
            .await
            .ok_or_else(|| AppError::NotFound("Test status not found".to_string()))
    }

    pub async fn latest_running(&self, test_id: &str) -> Result<Run, AppError> {
        self.runs
            .find_last(|run| run.test_id == test_id && run.status == RunStatus::Running)
            .await
            .ok_or_else(|| AppError::InvalidState("No running test found".to_string()))
    }

    pub async fn get(&self, test_id: &str, run_id: &str) -> Result<Run, AppError> {
        self.runs
            .get(run_id)
            .await
            .filter(|run| run.test_id == test_id)
            .ok_or_else(|| AppError::NotFound("Run not found".to_string()))
    }

    pub async fn list(&self, test_id: &str) -> Result<Vec<Run>, AppError> {
        let test_case = self.catalog.get(test_id)?;
        Ok(self.runs.filter(|run| run.test_id == test_case.id).await)
    }

    /// Completes the run identified by `run_id`.
    pub async fn complete(
        &self,
        test_id: &str,
        run_id: &str,
        verdict: Verdict,
    ) -> Result<Completion, AppError> {
        let test_case = self.catalog.get(test_id)?;
        let mut runs = self.runs.lock().await;
        let run = runs
            .iter_mut()
            .find(|run| run.id == run_id && run.test_id == test_id)
            .ok_or_else(|| AppError::NotFound("Run not found".to_string()))?;
        if run.status == RunStatus::Completed {
            return Err(AppError::InvalidState(format!(
                "Run {} is already completed",
                run_id
            )));
        }
        self.finish(&test_case, run, verdict).await
    }

    /// Completes the most recently started run of `test_id` that is still
    /// running. Ambiguous when several runs of the same test are in flight;
    /// prefer [`RunOperations::complete`].
    pub async fn complete_latest(
        &self,
        test_id: &str,
        verdict: Verdict,
    ) -> Result<Completion, AppError> {
        let mut runs = self.runs.lock().await;
        let run = runs
            .iter_mut()
            .rev()
            .find(|run| run.test_id == test_id && run.status == RunStatus::Running)
            .ok_or_else(|| AppError::InvalidState("No running test found".to_string()))?;
        let test_case = self.catalog.get(test_id)?;
        self.finish(&test_case, run, verdict).await
    }

    // Caller holds the runs guard, so the transition and the result append
    // are observed together.
    async fn finish(
        &self,
        test_case: &TestCase,
        run: &mut Run,
        verdict: Verdict,
    ) -> Result<Completion, AppError> {
        let completed_at = Utc::now().max(run.started_at);
        let duration = verdict.duration.unwrap_or_else(|| {
            (completed_at - run.started_at)
                .to_std()
                .unwrap_or_default()
        });
        let error = match verdict.outcome {
            Outcome::Passed => None,
            Outcome::Failed => Some(
                verdict
                    .error
                    .unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
            ),
        };

        run.status = RunStatus::Completed;
        run.completed_at = Some(completed_at);

        let result = self
            .results
            .append(TestResult {
                id: Uuid::new_v4().to_string(),
                test_id: test_case.id.clone(),
                run_id: Some(run.id.clone()),
                outcome: verdict.outcome,
                duration,
                url: test_case.url.clone(),
                error,
                created_at: completed_at,
            })
            .await;
        info!(
            test_id = %run.test_id,
            run_id = %run.id,
            outcome = ?result.outcome,
            "run completed"
        );
        Ok(Completion {
            run: run.clone(),
            result,
        })
    }
}
