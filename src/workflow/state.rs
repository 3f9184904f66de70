use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

pub const DEFAULT_PREFIX: &str = "quicware";

/// Values handed from one scenario to the next.
///
/// Only extracted text and URLs live here, never element references. The
/// runner passes it by `&mut` to one scenario at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub prefix: String,
    pub change_request_name: String,
    pub saved_url: Option<String>,
    pub work_schedule_id: Option<String>,
}

impl WorkflowState {
    pub fn new(prefix: &str) -> Self {
        WorkflowState {
            prefix: prefix.to_string(),
            change_request_name: generate_change_request_name(prefix),
            saved_url: None,
            work_schedule_id: None,
        }
    }

    /// Brief description entered on the change request.
    pub fn brief_description(&self) -> String {
        format!("Example change request-{}", self.prefix)
    }

    pub fn saved_url(&self) -> Result<&str, HarnessError> {
        self.saved_url
            .as_deref()
            .ok_or_else(|| HarnessError::MissingState("saved change request URL".into()))
    }

    pub fn work_schedule_id(&self) -> Result<&str, HarnessError> {
        self.work_schedule_id
            .as_deref()
            .ok_or_else(|| HarnessError::MissingState("work schedule id".into()))
    }
}

/// `{prefix}-NNNN-1` with a zero-padded random number below 10000.
pub fn generate_change_request_name(prefix: &str) -> String {
    let number: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("{}-{:04}-1", prefix, number)
}
