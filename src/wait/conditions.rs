//! Condition waits: block until an element reaches a state, or until a
//! document stops loading.
//!
//! Both primitives only read from the document. A miss is always returned as
//! an error; nothing here retries on the caller's behalf.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::browser::document::{Document, ElementSnapshot};
use crate::error::HarnessError;
use crate::locator::locator_model::{Locator, Scope};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_QUIESCENCE_TIMEOUT_MS: u64 = 30_000;

/// State an element is expected to reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementState {
    Visible,
    Hidden,
    Attached,
    Detached,
    Checked,
    Enabled,
    HasValue(String),
    ContainsText(String),
    Count(usize),
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementState::Visible => write!(f, "visible"),
            ElementState::Hidden => write!(f, "hidden"),
            ElementState::Attached => write!(f, "attached"),
            ElementState::Detached => write!(f, "detached"),
            ElementState::Checked => write!(f, "checked"),
            ElementState::Enabled => write!(f, "enabled"),
            ElementState::HasValue(v) => write!(f, "value \"{}\"", v),
            ElementState::ContainsText(t) => write!(f, "text containing \"{}\"", t),
            ElementState::Count(n) => write!(f, "count {}", n),
        }
    }
}

/// Timeouts shared by every wait in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub quiescence_timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            quiescence_timeout: Duration::from_millis(DEFAULT_QUIESCENCE_TIMEOUT_MS),
        }
    }
}

/// Result of a single observation.
struct Observation {
    satisfied: bool,
    observed: String,
}

fn observe(doc: &mut dyn Document, locator: &Locator, state: &ElementState) -> Result<Observation, HarnessError> {
    if let ElementState::Count(expected) = state {
        let count = doc.count(locator)?;
        return Ok(Observation {
            satisfied: count == *expected,
            observed: format!("count {}", count),
        });
    }

    let snapshot = doc.probe(locator)?;
    let observed = describe_snapshot(snapshot.as_ref(), state);
    let satisfied = match (state, snapshot) {
        (ElementState::Detached, None) => true,
        (ElementState::Hidden, None) => true,
        (_, None) => false,
        (ElementState::Visible, Some(s)) => s.visible,
        (ElementState::Hidden, Some(s)) => !s.visible,
        (ElementState::Attached, Some(_)) => true,
        (ElementState::Detached, Some(_)) => false,
        (ElementState::Checked, Some(s)) => s.checked == Some(true),
        (ElementState::Enabled, Some(s)) => s.enabled,
        (ElementState::HasValue(v), Some(s)) => s.value.as_deref() == Some(v.as_str()),
        (ElementState::ContainsText(t), Some(s)) => s.text.contains(t.as_str()),
        (ElementState::Count(_), Some(_)) => false,
    };
    Ok(Observation { satisfied, observed })
}

fn describe_snapshot(snapshot: Option<&ElementSnapshot>, state: &ElementState) -> String {
    let Some(s) = snapshot else {
        return "detached".to_string();
    };
    match state {
        ElementState::Checked => match s.checked {
            Some(true) => "checked".to_string(),
            Some(false) => "unchecked".to_string(),
            None => "not checkable".to_string(),
        },
        ElementState::Enabled => (if s.enabled { "enabled" } else { "disabled" }).to_string(),
        ElementState::HasValue(_) => match &s.value {
            Some(v) => format!("value \"{}\"", v),
            None => "no value".to_string(),
        },
        ElementState::ContainsText(_) => format!("text \"{}\"", s.text),
        _ => (if s.visible { "visible" } else { "hidden" }).to_string(),
    }
}

/// Block until `locator` reaches `state`.
///
/// Polls every `poll_interval`. Gives up once the wall-clock deadline passed
/// or `ceil(timeout / poll_interval)` pauses were spent, whichever is first,
/// and returns [`HarnessError::Timeout`] with the last observed state.
pub fn wait_for_state(
    doc: &mut dyn Document,
    locator: &Locator,
    state: &ElementState,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), HarnessError> {
    let deadline = Instant::now() + timeout;
    let poll_ms = poll_interval.as_millis().max(1);
    let max_polls = timeout.as_millis().div_ceil(poll_ms) as u64;
    let mut polls: u64 = 0;

    loop {
        let observation = observe(doc, locator, state)?;
        if observation.satisfied {
            debug!(locator = %locator.describe(), %state, polls, "condition met");
            return Ok(());
        }
        if polls >= max_polls || Instant::now() >= deadline {
            return Err(HarnessError::Timeout {
                locator: locator.describe(),
                expected: state.to_string(),
                last_observed: observation.observed,
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        doc.pause(poll_interval)?;
        polls += 1;
    }
}

/// [`wait_for_state`] with the policy's default timeout.
pub fn wait_for(
    doc: &mut dyn Document,
    locator: &Locator,
    state: &ElementState,
    policy: &WaitPolicy,
) -> Result<(), HarnessError> {
    wait_for_state(doc, locator, state, policy.timeout, policy.poll_interval)
}

/// Post-condition check: like [`wait_for`], but a miss means the application
/// did not end up in the intended state, reported as
/// [`HarnessError::Verification`].
pub fn verify_state(
    doc: &mut dyn Document,
    locator: &Locator,
    state: &ElementState,
    policy: &WaitPolicy,
) -> Result<(), HarnessError> {
    match wait_for(doc, locator, state, policy) {
        Err(HarnessError::Timeout {
            locator,
            expected,
            last_observed,
            ..
        }) => Err(HarnessError::Verification {
            locator,
            expected,
            observed: last_observed,
        }),
        other => other,
    }
}

/// Block until `scope` saw no network activity for the driver's debounce
/// window.
///
/// This says nothing about rendering: callers that need a painted element
/// wait for it with [`wait_for_state`] afterwards.
pub fn wait_for_quiescence(doc: &mut dyn Document, scope: &Scope, timeout: Duration) -> Result<(), HarnessError> {
    if doc.wait_for_network_idle(scope, timeout)? {
        debug!(scope = %scope.describe(), "network idle");
        Ok(())
    } else {
        Err(HarnessError::Timeout {
            locator: scope.describe(),
            expected: "network idle".to_string(),
            last_observed: "network active".to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}
