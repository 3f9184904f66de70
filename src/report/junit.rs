use crate::report::report_model::{ScenarioStatus, SuiteReport};

// ============================================================================
// JUnit XML reporter
// ============================================================================

/// Generate a JUnit XML report for CI systems.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="..." tests="3" failures="1" skipped="1" time="1.234">
///   <testcase name="Scenario 1" classname="workflow-probe" />
///   <testcase name="Scenario 2" classname="workflow-probe">
///     <failure message="failed after 4 attempt(s)" type="ScenarioFailure">...</failure>
///   </testcase>
///   <testcase name="Scenario 3" classname="workflow-probe">
///     <skipped />
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &SuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for result in &report.results {
        let name = escape_xml(&result.name);
        match result.status {
            ScenarioStatus::Passed => {
                cases.push_str(&format!(
                    "  <testcase name=\"{}\" classname=\"workflow-probe\" />\n",
                    name
                ));
            }
            ScenarioStatus::Skipped => {
                cases.push_str(&format!(
                    "  <testcase name=\"{}\" classname=\"workflow-probe\">\n    <skipped />\n  </testcase>\n",
                    name
                ));
            }
            ScenarioStatus::Failed => {
                let message = format!("failed after {} attempt(s)", result.attempts);
                let body = result.error.as_deref().unwrap_or("execution error");
                cases.push_str(&format!(
                    "  <testcase name=\"{name}\" classname=\"workflow-probe\">\n    <failure message=\"{message}\" type=\"ScenarioFailure\">{body}</failure>\n  </testcase>\n",
                    name = name,
                    message = escape_xml(&message),
                    body = escape_xml(body),
                ));
            }
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" skipped=\"{skipped}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed,
        skipped = report.skipped,
        time = time_attr,
        cases = cases,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
