use crate::case::service::Catalog;
use crate::result::model::{Outcome, TestResult};
use chrono::Utc;
use std::time::Duration;
use uuid::Uuid;

pub const DEMO_FAILURE: &str = "Expected element to be visible but it was not found";

/// Demonstration results offered when a report is requested before any run
/// has completed. Entries whose test case is missing from the catalog are
/// skipped.
pub fn demo_results(catalog: &Catalog) -> Vec<TestResult> {
    let now = Utc::now();
    [
        ("test1", Outcome::Passed, 1200, None),
        ("test2", Outcome::Failed, 800, Some(DEMO_FAILURE)),
        ("test3", Outcome::Passed, 2100, None),
    ]
    .into_iter()
    .filter_map(|(test_id, outcome, millis, error)| {
        let test_case = catalog.get(test_id).ok()?;
        Some(TestResult {
            id: Uuid::new_v4().to_string(),
            test_id: test_case.id,
            run_id: None,
            outcome,
            duration: Duration::from_millis(millis),
            url: test_case.url,
            error: error.map(str::to_string),
            created_at: now,
        })
    })
    .collect()
}
