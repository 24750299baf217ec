use clap::Parser;
use std::net::SocketAddr;

#[derive(Debug, Clone, Parser)]
#[command(name = "test-runner", version, about = "Tracks test runs and aggregates their results into reports")]
pub struct Config {
    /// Address the HTTP API listens on.
    #[arg(long, env = "TEST_RUNNER_LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,

    /// Seed demonstration results when a report is generated before any run completed.
    #[arg(long, env = "TEST_RUNNER_SEED_DEMO_RESULTS", default_value_t = false)]
    pub seed_demo_results: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["test-runner"]).unwrap();
        assert_eq!(config.listen, "0.0.0.0:8000".parse().unwrap());
        assert!(!config.seed_demo_results);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "test-runner",
            "--listen",
            "127.0.0.1:9000",
            "--seed-demo-results",
        ])
        .unwrap();
        assert_eq!(config.listen, "127.0.0.1:9000".parse().unwrap());
        assert!(config.seed_demo_results);
    }

    #[test]
    fn rejects_bad_address() {
        assert!(Config::try_parse_from(["test-runner", "--listen", "nowhere"]).is_err());
    }
}
