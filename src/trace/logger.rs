use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;
use crate::trace::trace::TraceEvent;

/// Appends one JSON line per [`TraceEvent`] to a file.
pub struct TraceLogger {
    sink: Option<(PathBuf, File)>,
}

impl TraceLogger {
    /// Open `path` for appending, creating it if needed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| HarnessError::TraceFile {
                path: path.display().to_string(),
                source: e,
            })?;
        Ok(Self {
            sink: Some((path.to_path_buf(), file)),
        })
    }

    /// A logger that drops every event.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Write `event` as a single line. A disabled logger accepts and drops it.
    pub fn log(&self, event: &TraceEvent) -> Result<(), HarnessError> {
        let Some((path, file)) = &self.sink else {
            return Ok(());
        };

        let mut line = serde_json::to_string(event).map_err(|e| HarnessError::JsonSerialize {
            context: "TraceEvent".into(),
            source: e,
        })?;
        line.push('\n');

        // One write per event keeps lines whole in append mode
        let mut out: &File = file;
        out.write_all(line.as_bytes()).map_err(|e| HarnessError::TraceFile {
            path: path.display().to_string(),
            source: e,
        })
    }
}
