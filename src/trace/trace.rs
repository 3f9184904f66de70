use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One line of the JSONL run trace: a single scenario attempt.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub scenario: String,
    pub attempt: u32,
    pub passed: bool,
    pub duration_ms: u128,

    pub error: Option<String>,
    pub work_schedule_id: Option<String>,
}

impl TraceEvent {
    pub fn now(scenario: &str, attempt: u32, passed: bool) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            scenario: scenario.to_string(),
            attempt,
            passed,
            duration_ms: 0,
            error: None,
            work_schedule_id: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_work_schedule_id(mut self, id: Option<&str>) -> Self {
        self.work_schedule_id = id.map(str::to_string);
        self
    }
}
