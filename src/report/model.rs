use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::table::Entity;
use crate::result::model::TestResult;

/// Aggregate over a frozen copy of the results that existed when it was
/// generated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Report {
    pub id: String,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub pass_rate: u8,
    pub run_date: DateTime<Utc>,
    pub results: Vec<TestResult>,
}

impl Entity for Report {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Integer percentage, rounded down. Zero when nothing ran.
pub fn pass_rate(passed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (passed.min(total) * 100 / total) as u8
}
