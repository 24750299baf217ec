use crate::api::AppError;
use crate::persistence::table::Table;
use crate::report::model::{pass_rate, Report};
use crate::result::model::{Outcome, TestResult};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct ReportOperations {
    pub(crate) results: Arc<Table<TestResult>>,
    pub(crate) reports: Arc<Table<Report>>,
}

impl ReportOperations {
    pub async fn generate(&self) -> Report {
        let results = self.results.list().await;
        let total_tests = results.len();
        let passed_tests = results
            .iter()
            .filter(|result| result.outcome == Outcome::Passed)
            .count();
        let report = Report {
            id: Uuid::new_v4().to_string(),
            total_tests,
            passed_tests,
            pass_rate: pass_rate(passed_tests, total_tests),
            run_date: Utc::now(),
            results,
        };
        info!(
            report_id = %report.id,
            total = report.total_tests,
            passed = report.passed_tests,
            pass_rate = report.pass_rate,
            "report generated"
        );
        self.reports.insert(report).await
    }

    pub async fn get(&self, id: &str) -> Result<Report, AppError> {
        self.reports
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
    }

    pub async fn list(&self) -> Vec<Report> {
        self.reports.list().await
    }
}
