use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::HarnessError;
use crate::scan::report_scan::ScanSettings;
use crate::wait::conditions::WaitPolicy;
use crate::workflow::scenarios::RetryHints;
use crate::workflow::state::DEFAULT_PREFIX;

pub const DEFAULT_CONFIG_PATH: &str = "workflow-probe.yaml";
pub const DEFAULT_DRIVER_SCRIPT: &str = "driver/browser_server.js";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "workflow-probe",
    version,
    about = "End-to-end verification of the change request / work schedule / report workflow"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: workflow-probe.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the workflow against a live application
    Run {
        /// Address of the application (falls back to the config file)
        #[arg(long, env = "FULL_URL")]
        base_url: Option<String>,

        /// Node.js Playwright driver script
        #[arg(long)]
        driver: Option<String>,

        /// Prefix of the generated change request name
        #[arg(long)]
        prefix: Option<String>,

        /// Output format: console, junit
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Append one JSON line per scenario attempt to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Print every named locator the workflow depends on
    Locators,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `workflow-probe.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub retries: RetryConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub base_url: Option<String>,

    /// Appended to `base_url` to form the start URL
    pub path: Option<String>,

    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            path: None,
            prefix: default_prefix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,
    #[serde(default = "default_poll_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_quiescence_ms")]
    pub quiescence_ms: u64,
    #[serde(default = "default_wait_ms")]
    pub header_ms: u64,
    #[serde(default = "default_wait_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_wait_ms")]
    pub first_cell_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_wait_ms(),
            poll_interval_ms: default_poll_ms(),
            quiescence_ms: default_quiescence_ms(),
            header_ms: default_wait_ms(),
            settle_delay_ms: default_wait_ms(),
            first_cell_ms: default_wait_ms(),
        }
    }
}

impl TimeoutConfig {
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            timeout: Duration::from_millis(self.wait_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            quiescence_timeout: Duration::from_millis(self.quiescence_ms),
        }
    }

    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            quiescence_timeout: Duration::from_millis(self.quiescence_ms),
            header_timeout: Duration::from_millis(self.header_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            first_cell_timeout: Duration::from_millis(self.first_cell_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default)]
    pub change_request: u32,
    #[serde(default)]
    pub work_schedule: u32,
    #[serde(default = "default_report_retries")]
    pub report: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let hints = RetryHints::default();
        Self {
            change_request: hints.change_request,
            work_schedule: hints.work_schedule,
            report: hints.report,
        }
    }
}

impl RetryConfig {
    pub fn hints(&self) -> RetryHints {
        RetryHints {
            change_request: self.change_request,
            work_schedule: self.work_schedule,
            report: self.report,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default = "default_driver_script")]
    pub script: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            script: default_driver_script(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            format: default_console(),
            output: None,
        }
    }
}

/// JSONL run trace; disabled when no path is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_prefix() -> String { DEFAULT_PREFIX.to_string() }
fn default_wait_ms() -> u64 { 10_000 }
fn default_poll_ms() -> u64 { 100 }
fn default_quiescence_ms() -> u64 { 30_000 }
fn default_report_retries() -> u32 { RetryHints::default().report }
fn default_driver_script() -> String { DEFAULT_DRIVER_SCRIPT.to_string() }
fn default_console() -> String { "console".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing;
/// a malformed file is reported and also yields defaults.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Start URL from the base address (CLI/env first, then config) and the
/// configured path.
pub fn resolve_start_url(base_url: Option<&str>, target: &TargetConfig) -> Result<String, HarnessError> {
    let base = base_url
        .or(target.base_url.as_deref())
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| HarnessError::Config("no base URL: pass --base-url, set FULL_URL, or set target.base_url".into()))?;

    Ok(match target.path.as_deref() {
        Some(path) if !path.is_empty() => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
        _ => base.to_string(),
    })
}
