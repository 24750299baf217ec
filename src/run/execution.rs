use crate::case::model::TestCase;
use crate::result::demo::DEMO_FAILURE;
use crate::result::model::Verdict;
use std::time::Duration;
use uuid::Uuid;

/// Decides the outcome of a run. The ledger only records verdicts; whoever
/// drives the actual check implements this.
pub trait Executor: Send + Sync {
    fn execute(&self, test_case: &TestCase) -> Verdict;
}

/// Stand-in executor that never touches the target: passes two times out of
/// three and reports a duration between 0.5s and 3.0s.
pub struct SimulatedExecutor;

impl Executor for SimulatedExecutor {
    fn execute(&self, _test_case: &TestCase) -> Verdict {
        let roll = Uuid::new_v4();
        let bytes = roll.as_bytes();
        let millis = 500 + u64::from(u16::from_be_bytes([bytes[1], bytes[2]])) % 2501;
        let verdict = if bytes[0] % 3 == 0 {
            Verdict::failed(DEMO_FAILURE)
        } else {
            Verdict::passed()
        };
        verdict.with_duration(Duration::from_millis(millis))
    }
}
