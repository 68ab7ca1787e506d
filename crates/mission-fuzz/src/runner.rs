//! Runner configuration shared by the property suites.

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the number of cases per property
pub const CASES_ENV: &str = "MISSION_FUZZ_CASES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzConfig {
    /// Number of test cases to run
    pub cases: u32,
    /// Maximum shrink iterations on failure
    pub max_shrink_iters: u32,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl FuzzConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config, with `cases` taken from `MISSION_FUZZ_CASES` if set.
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(CASES_ENV).ok().and_then(|v| v.parse().ok()) {
            Some(n) => config.cases(n),
            None => config,
        }
    }

    pub fn cases(mut self, n: u32) -> Self {
        self.cases = n;
        self
    }

    pub fn max_shrink_iters(mut self, n: u32) -> Self {
        self.max_shrink_iters = n;
        self
    }

    pub fn to_proptest_config(&self) -> proptest::test_runner::Config {
        proptest::test_runner::Config {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..proptest::test_runner::Config::default()
        }
    }
}
