use std::time::Instant;

use tracing::{info, warn};

use crate::browser::document::Document;
use crate::error::HarnessError;
use crate::locator::locator_model::Scope;
use crate::report::report_model::{ScenarioResult, ScenarioStatus};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;
use crate::wait::conditions::wait_for_quiescence;
use crate::workflow::scenarios::{Scenario, ScenarioContext};
use crate::workflow::state::WorkflowState;

/// Runs a serial group of scenarios against one document.
///
/// Before every attempt the document is pointed at the start URL and left to
/// settle; after every attempt cookies are cleared. A failing scenario is
/// retried as a whole up to its retry hint. Once one scenario has failed, the
/// rest of the group is skipped since they depend on its output.
pub struct WorkflowRunner {
    start_url: String,
    context: ScenarioContext,
    tracer: TraceLogger,
}

impl WorkflowRunner {
    pub fn new(start_url: &str, context: ScenarioContext) -> Self {
        WorkflowRunner {
            start_url: start_url.to_string(),
            context,
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    pub fn run(
        &self,
        doc: &mut dyn Document,
        scenarios: &mut [Scenario],
        state: &mut WorkflowState,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        let mut group_failed = false;

        for scenario in scenarios.iter_mut() {
            if group_failed {
                info!(scenario = %scenario.name, "skipped after earlier failure");
                results.push(ScenarioResult::skipped(&scenario.name));
                continue;
            }

            let result = self.run_scenario(doc, scenario, state);
            group_failed = result.status == ScenarioStatus::Failed;
            results.push(result);
        }
        results
    }

    fn run_scenario(&self, doc: &mut dyn Document, scenario: &mut Scenario, state: &mut WorkflowState) -> ScenarioResult {
        let started = Instant::now();
        let max_attempts = scenario.retries.saturating_add(1);
        let mut last_error = None;
        let mut attempts = 0;

        while attempts < max_attempts {
            attempts += 1;
            let attempt_started = Instant::now();
            info!(scenario = %scenario.name, attempt = attempts, "starting scenario");

            let outcome = self.attempt(doc, scenario, state);
            if let Err(e) = doc.clear_cookies() {
                warn!(scenario = %scenario.name, "failed to clear cookies: {}", e);
            }

            let event = TraceEvent::now(&scenario.name, attempts, outcome.is_ok())
                .with_duration(attempt_started.elapsed().as_millis())
                .with_work_schedule_id(state.work_schedule_id.as_deref());

            match outcome {
                Ok(()) => {
                    self.record(&event);
                    last_error = None;
                    break;
                }
                Err(e) => {
                    warn!(scenario = %scenario.name, attempt = attempts, max_attempts, "scenario failed: {}", e);
                    self.record(&event.with_error(&e));
                    last_error = Some(e.to_string());
                }
            }
        }

        let status = if last_error.is_none() {
            ScenarioStatus::Passed
        } else {
            ScenarioStatus::Failed
        };
        info!(scenario = %scenario.name, ?status, attempts, "scenario finished");

        ScenarioResult {
            name: scenario.name.clone(),
            status,
            attempts,
            duration_ms: started.elapsed().as_millis(),
            error: last_error,
        }
    }

    fn attempt(
        &self,
        doc: &mut dyn Document,
        scenario: &mut Scenario,
        state: &mut WorkflowState,
    ) -> Result<(), HarnessError> {
        doc.navigate(&self.start_url)?;
        wait_for_quiescence(doc, &Scope::Host, self.context.policy.quiescence_timeout)?;
        (scenario.run)(doc, &self.context, state)
    }

    /// A trace write that fails is reported but never fails the scenario.
    fn record(&self, event: &TraceEvent) {
        if let Err(e) = self.tracer.log(event) {
            warn!(scenario = %event.scenario, "trace event dropped: {}", e);
        }
    }
}
