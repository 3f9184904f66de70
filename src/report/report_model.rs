use serde::{Deserialize, Serialize};

// ============================================================================
// Scenario results and the suite report built from them
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    /// Not run because an earlier scenario of the serial group failed
    Skipped,
}

/// Outcome of one scenario after all of its attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,

    pub status: ScenarioStatus,

    /// Attempts made, including the first (0 when skipped)
    pub attempts: u32,

    pub duration_ms: u128,

    /// Error of the last failed attempt
    pub error: Option<String>,
}

impl ScenarioResult {
    pub fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: ScenarioStatus::Skipped,
            attempts: 0,
            duration_ms: 0,
            error: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

/// Aggregated report for one workflow run.
///
/// Consumed by the console and JUnit reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub suite_name: String,

    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    /// Build a suite report, computing the per-status counts.
    pub fn from_results(suite_name: &str, results: Vec<ScenarioResult>) -> Self {
        let count = |status| results.iter().filter(|r| r.status == status).count();
        let passed = count(ScenarioStatus::Passed);
        let failed = count(ScenarioStatus::Failed);
        let skipped = count(ScenarioStatus::Skipped);
        Self {
            suite_name: suite_name.to_string(),
            total: results.len(),
            passed,
            failed,
            skipped,
            duration_ms: None,
            results,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Skipped scenarios count as failures of the run.
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}
