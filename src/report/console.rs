use crate::report::report_model::{ScenarioStatus, SuiteReport};

// ============================================================================
// Console reporter
// ============================================================================

/// Format a suite report for terminal output.
///
/// ```text
/// === Workflow: Workflow 1 ===
///
/// ✓ PASS  Navigate to Salesforce and create Change Request (1 attempt)
/// ✗ FAIL  Create and validate the report (4 attempts)
///     [ERROR] Unexpected report structure: ...
///
/// === Results: 2 passed, 1 failed, 0 skipped (3 total) in 84.2s ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Workflow: {} ===\n\n", report.suite_name));

    for result in &report.results {
        let marker = match result.status {
            ScenarioStatus::Passed => "\u{2713} PASS",
            ScenarioStatus::Failed => "\u{2717} FAIL",
            ScenarioStatus::Skipped => "- SKIP",
        };

        if result.status == ScenarioStatus::Skipped {
            out.push_str(&format!("{}  {}\n", marker, result.name));
        } else {
            let plural = if result.attempts == 1 { "" } else { "s" };
            out.push_str(&format!(
                "{}  {} ({} attempt{})\n",
                marker, result.name, result.attempts, plural
            ));
        }

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed, {} skipped ({} total)",
        report.passed, report.failed, report.skipped, report.total
    ));

    if let Some(ms) = report.duration_ms {
        out.push_str(&format!(" in {:.1}s", ms as f64 / 1000.0));
    }

    out.push_str(" ===\n");
    out
}
