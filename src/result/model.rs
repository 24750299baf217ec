use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::persistence::table::Entity;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TestResult {
    pub id: String,
    pub test_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub run_id: Option<String>,
    #[serde(rename = "status")]
    pub outcome: Outcome,
    #[serde(with = "seconds")]
    pub duration: Duration,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for TestResult {
    fn id(&self) -> &str {
        &self.id
    }
}

/// An already-decided outcome for a run, handed to the ledger on completion.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub duration: Option<Duration>,
    pub error: Option<String>,
}

impl Verdict {
    pub fn passed() -> Self {
        Self {
            outcome: Outcome::Passed,
            duration: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failed,
            duration: None,
            error: Some(error.into()),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Durations travel as seconds with one decimal, e.g. `"1.2s"`. Precision
/// below a tenth of a second is lost on the wire: 1250ms is written as
/// `"1.2s"` or `"1.3s"` and read back as that value.
mod seconds {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.1}s", duration.as_secs_f64()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let secs: f64 = raw
            .trim_end_matches('s')
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid duration: {}", raw)))?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(de::Error::custom(format!("invalid duration: {}", raw)));
        }
        Ok(Duration::from_millis((secs * 1000.0).round() as u64))
    }
}
