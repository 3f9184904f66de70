use tracing::info;

use crate::browser::session::BrowserSession;
use crate::cli::config::{resolve_start_url, AppConfig};
use crate::locator::registry::Locators;
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::SuiteReport;
use crate::scan::report_scan::ReportScanner;
use crate::trace::logger::TraceLogger;
use crate::workflow::runner::WorkflowRunner;
use crate::workflow::scenarios::{change_request_workflow, ScenarioContext};
use crate::workflow::state::WorkflowState;

pub const SUITE_NAME: &str = "Change request workflow";

/// `run` arguments after CLI flags have been layered over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub start_url: String,
    pub driver: String,
    pub prefix: String,
    pub format: String,
    pub output: Option<String>,
    pub trace: Option<String>,
}

impl RunOptions {
    /// CLI > config > defaults. `base_url` already carries the `FULL_URL`
    /// environment fallback from clap, so the environment wins over the file.
    pub fn resolve(
        config: &AppConfig,
        base_url: Option<&str>,
        driver: Option<&str>,
        prefix: Option<&str>,
        format: Option<&str>,
        output: Option<&str>,
        trace: Option<&str>,
    ) -> Result<Self, crate::error::HarnessError> {
        Ok(Self {
            start_url: resolve_start_url(base_url, &config.target)?,
            driver: driver.unwrap_or(config.driver.script.as_str()).to_string(),
            prefix: prefix.unwrap_or(config.target.prefix.as_str()).to_string(),
            format: format.unwrap_or(config.run.format.as_str()).to_string(),
            output: output.map(str::to_string).or_else(|| config.run.output.clone()),
            trace: trace.map(str::to_string).or_else(|| config.trace.path.clone()),
        })
    }
}

// ============================================================================
// run subcommand
// ============================================================================

/// Drive the workflow through a live browser and return whether every
/// scenario passed.
pub fn cmd_run(config: &AppConfig, options: &RunOptions) -> Result<bool, Box<dyn std::error::Error>> {
    let locators = Locators::new();
    let context = ScenarioContext {
        locators,
        policy: config.timeouts.wait_policy(),
        scanner: ReportScanner::new(locators.report_builder(), config.timeouts.scan_settings()),
    };

    let tracer = match options.trace.as_deref() {
        Some(path) => TraceLogger::create(path)?,
        None => TraceLogger::disabled(),
    };

    let runner = WorkflowRunner::new(&options.start_url, context).with_tracer(tracer);
    let mut scenarios = change_request_workflow(&config.retries.hints());
    let mut state = WorkflowState::new(&options.prefix);
    info!(
        start_url = %options.start_url,
        change_request = %state.change_request_name,
        "starting workflow"
    );

    let mut session = BrowserSession::launch(&options.driver)?;
    let start = std::time::Instant::now();
    let results = runner.run(&mut session, &mut scenarios, &mut state);
    let duration = start.elapsed().as_millis();
    session.quit()?;

    let report = SuiteReport::from_results(SUITE_NAME, results).with_duration(duration);
    let all_passed = report.all_passed();

    let output_content = match options.format.as_str() {
        "junit" => generate_junit_xml(&report),
        _ => format_console_report(&report),
    };

    match options.output.as_deref() {
        Some(path) => std::fs::write(path, &output_content)?,
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

// ============================================================================
// locators subcommand
// ============================================================================

pub fn format_locator_catalog(locators: &Locators) -> String {
    let catalog = locators.catalog();
    let width = catalog.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, locator) in &catalog {
        out.push_str(&format!("{:width$}  {}\n", name, locator.describe(), width = width));
    }
    out
}

pub fn cmd_locators() {
    print!("{}", format_locator_catalog(&Locators::new()));
}
