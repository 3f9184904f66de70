use std::time::Duration;

use clap::Parser;
use workflow_probe::cli::commands::{format_locator_catalog, RunOptions};
use workflow_probe::cli::config::{
    load_config, resolve_start_url, AppConfig, Cli, Commands, TargetConfig, DEFAULT_DRIVER_SCRIPT,
};
use workflow_probe::locator::registry::Locators;
use workflow_probe::scan::report_scan::ScanSettings;
use workflow_probe::wait::conditions::WaitPolicy;
use workflow_probe::workflow::scenarios::RetryHints;

fn write_temp(name: &str, content: &str) -> String {
    let path = std::env::temp_dir().join(format!("workflow-probe-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_run_all_args() {
    let cli = Cli::parse_from([
        "workflow-probe",
        "-vv",
        "run",
        "--base-url",
        "https://app.test",
        "--driver",
        "driver.js",
        "--prefix",
        "acme",
        "--format",
        "junit",
        "-o",
        "out.xml",
        "--trace",
        "trace.jsonl",
    ]);
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Run {
            base_url,
            driver,
            prefix,
            format,
            output,
            trace,
        } => {
            assert_eq!(base_url.as_deref(), Some("https://app.test"));
            assert_eq!(driver.as_deref(), Some("driver.js"));
            assert_eq!(prefix.as_deref(), Some("acme"));
            assert_eq!(format.as_deref(), Some("junit"));
            assert_eq!(output.as_deref(), Some("out.xml"));
            assert_eq!(trace.as_deref(), Some("trace.jsonl"));
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_locators_with_global_config() {
    let cli = Cli::parse_from(["workflow-probe", "locators", "--config", "custom.yaml"]);
    assert!(matches!(cli.command, Commands::Locators));
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["workflow-probe", "explore"]).is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn default_config_matches_built_in_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.timeouts.wait_policy(), WaitPolicy::default());
    assert_eq!(config.timeouts.scan_settings(), ScanSettings::default());
    assert_eq!(config.retries.hints(), RetryHints::default());
    assert_eq!(config.target.prefix, "quicware");
    assert_eq!(config.driver.script, DEFAULT_DRIVER_SCRIPT);
    assert_eq!(config.run.format, "console");
    assert_eq!(config.trace.path, None);
}

#[test]
fn missing_config_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/workflow-probe.yaml"));
    assert_eq!(config, AppConfig::default());
}

#[test]
fn partial_config_file_keeps_other_defaults() {
    let path = write_temp(
        "partial.yaml",
        "target:\n  base_url: https://cfg.test\n  path: /lightning\ntimeouts:\n  wait_ms: 2000\nretries:\n  report: 5\ntrace:\n  path: run.jsonl\n",
    );
    let config = load_config(Some(&path));

    assert_eq!(config.target.base_url.as_deref(), Some("https://cfg.test"));
    assert_eq!(config.target.prefix, "quicware");
    assert_eq!(config.timeouts.wait_policy().timeout, Duration::from_millis(2_000));
    assert_eq!(config.timeouts.poll_interval_ms, 100);
    assert_eq!(config.retries.hints().report, 5);
    assert_eq!(config.retries.change_request, 0);
    assert_eq!(config.trace.path.as_deref(), Some("run.jsonl"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn malformed_config_file_gives_defaults() {
    let path = write_temp("malformed.yaml", "timeouts: [not, a, map\n");
    assert_eq!(load_config(Some(&path)), AppConfig::default());
    let _ = std::fs::remove_file(&path);
}

// ============================================================================
// Option Resolution Tests
// ============================================================================

#[test]
fn start_url_requires_a_base() {
    let err = resolve_start_url(None, &TargetConfig::default()).unwrap_err();
    assert!(err.to_string().contains("no base URL"));
    assert!(resolve_start_url(Some("  "), &TargetConfig::default()).is_err());
}

#[test]
fn start_url_joins_path() {
    let target = TargetConfig {
        base_url: Some("https://cfg.test/".into()),
        path: Some("/lightning/page/home".into()),
        ..TargetConfig::default()
    };
    assert_eq!(
        resolve_start_url(None, &target).unwrap(),
        "https://cfg.test/lightning/page/home"
    );
    assert_eq!(
        resolve_start_url(Some("https://cli.test"), &target).unwrap(),
        "https://cli.test/lightning/page/home"
    );
}

#[test]
fn cli_flags_override_config() {
    let mut config = AppConfig::default();
    config.target.base_url = Some("https://cfg.test".into());
    config.run.format = "junit".into();
    config.trace.path = Some("cfg.jsonl".into());

    let options = RunOptions::resolve(&config, None, Some("other.js"), None, Some("console"), None, None).unwrap();
    assert_eq!(options.start_url, "https://cfg.test");
    assert_eq!(options.driver, "other.js");
    assert_eq!(options.prefix, "quicware");
    assert_eq!(options.format, "console");
    assert_eq!(options.output, None);
    assert_eq!(options.trace.as_deref(), Some("cfg.jsonl"));
}

// ============================================================================
// locators subcommand
// ============================================================================

#[test]
fn locator_catalog_lists_every_entry() {
    let out = format_locator_catalog(&Locators::new());
    assert_eq!(out.lines().count(), Locators::new().catalog().len());
    assert!(out.lines().any(|l| l.starts_with("toast_message") && l.ends_with(".toastMessage")));
    assert!(out.contains("frame[Report Builder] >> td.data-grid-table-cell"));
}
