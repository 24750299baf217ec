use crate::persistence::table::Table;
use crate::result::model::TestResult;
use std::sync::Arc;
use tracing::info;

pub struct ResultOperations {
    pub(crate) results: Arc<Table<TestResult>>,
}

impl ResultOperations {
    pub async fn append(&self, result: TestResult) -> TestResult {
        self.results.insert(result).await
    }

    pub async fn all(&self) -> Vec<TestResult> {
        self.results.list().await
    }

    pub async fn by_test(&self, test_id: &str) -> Vec<TestResult> {
        self.results.filter(|result| result.test_id == test_id).await
    }

    /// Appends `seed` only when nothing has been recorded yet. The emptiness
    /// check and the append happen under one guard.
    pub async fn seed_if_empty(&self, seed: Vec<TestResult>) -> bool {
        let mut rows = self.results.lock().await;
        if !rows.is_empty() || seed.is_empty() {
            return false;
        }
        info!(count = seed.len(), "seeding demonstration results");
        rows.extend(seed);
        true
    }
}
