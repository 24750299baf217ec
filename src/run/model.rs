use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::table::Entity;
use crate::result::model::TestResult;

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
pub struct Run {
    pub id: String,
    pub test_id: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Entity for Run {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
}

/// The completed run together with the result recorded for it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Completion {
    pub run: Run,
    pub result: TestResult,
}
