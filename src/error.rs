use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// A wait primitive's deadline elapsed before the condition held
    #[error("Timed out after {timeout_ms}ms waiting for {locator} to be {expected} (last observed: {last_observed})")]
    Timeout {
        locator: String,
        expected: String,
        last_observed: String,
        timeout_ms: u64,
    },

    /// An interaction's post-condition did not hold
    #[error("Verification failed on {locator}: expected {expected}, observed {observed}")]
    Verification {
        locator: String,
        expected: String,
        observed: String,
    },

    /// The target UI does not have the shape the harness relies on
    #[error("Unexpected report structure: {0}")]
    Structural(String),

    /// A workflow-state slot was read before an earlier scenario wrote it
    #[error("Missing workflow state: {0}")]
    MissingState(String),

    /// Driver subprocess failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Browser session I/O: {0}")]
    SessionIO(String),

    /// Driver answered `ok: false` or with an incomplete payload
    #[error("Driver command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Trace file could not be opened or appended to
    #[error("Trace file {path}: {source}")]
    TraceFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl HarnessError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HarnessError::Timeout { .. })
    }

    pub fn is_verification(&self) -> bool {
        matches!(self, HarnessError::Verification { .. })
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, HarnessError::Structural(_))
    }
}
