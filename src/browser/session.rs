use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::browser::document::{Document, ElementSnapshot};
use crate::error::HarnessError;
use crate::locator::locator_model::{Locator, Scope};

/// Request sent to the driver over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    CurrentUrl {
        cmd: &'static str,
    },
    WaitForLoadState {
        cmd: &'static str,
        state: &'static str,
        scope: Scope,
        timeout_ms: u64,
    },
    ClearCookies {
        cmd: &'static str,
    },
    Wait {
        cmd: &'static str,
        duration_ms: u64,
    },
    Query {
        cmd: &'static str,
        locator: Locator,
    },
    Action {
        cmd: &'static str,
        action: &'static str,
        locator: Locator,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn current_url() -> Self {
        BrowserRequest::CurrentUrl { cmd: "current_url" }
    }

    pub fn network_idle(scope: &Scope, timeout: Duration) -> Self {
        BrowserRequest::WaitForLoadState {
            cmd: "wait_for_load_state",
            state: "networkidle",
            scope: scope.clone(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn clear_cookies() -> Self {
        BrowserRequest::ClearCookies { cmd: "clear_cookies" }
    }

    pub fn wait(duration: Duration) -> Self {
        BrowserRequest::Wait {
            cmd: "wait",
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn count(locator: &Locator) -> Self {
        Self::query("count", locator)
    }

    pub fn probe(locator: &Locator) -> Self {
        Self::query("probe", locator)
    }

    pub fn inner_text(locator: &Locator) -> Self {
        Self::query("inner_text", locator)
    }

    fn query(cmd: &'static str, locator: &Locator) -> Self {
        BrowserRequest::Query {
            cmd,
            locator: locator.clone(),
        }
    }

    pub fn click(locator: &Locator) -> Self {
        Self::action("click", locator, None)
    }

    pub fn fill(locator: &Locator, value: &str) -> Self {
        Self::action("fill", locator, Some(value.to_string()))
    }

    pub fn press(locator: &Locator, key: &str) -> Self {
        Self::action("press", locator, Some(key.to_string()))
    }

    pub fn check(locator: &Locator) -> Self {
        Self::action("check", locator, None)
    }

    fn action(action: &'static str, locator: &Locator, value: Option<String>) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action,
            locator: locator.clone(),
            value,
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from the driver over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub element: Option<ElementSnapshot>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub idle: Option<bool>,
}

/// A persistent Playwright session backed by a Node.js driver script.
///
/// The driver keeps one Chromium page open and answers NDJSON requests on
/// stdin with NDJSON responses on stdout. Locators travel as JSON and are
/// resolved by the driver on every request.
#[derive(Debug)]
pub struct BrowserSession {
    script: String,
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    closed: bool,
}

impl BrowserSession {
    /// Launch the driver under Node.js and wait for its ready signal.
    pub fn launch(script: &str) -> Result<Self, HarnessError> {
        Self::launch_with("node", script)
    }

    /// Launch `script` under `program` and wait for its ready signal.
    ///
    /// A driver that never becomes ready is killed and reaped before the
    /// error is returned.
    pub fn launch_with(program: &str, script: &str) -> Result<Self, HarnessError> {
        let mut child = Command::new(program)
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| HarnessError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let (stdin, reader) = match Self::handshake(&mut child, script) {
            Ok(pipes) => pipes,
            Err(e) => {
                if let Err(kill_err) = child.kill() {
                    debug!(script, error = %kill_err, "driver already exited");
                }
                let _ = child.wait();
                return Err(e);
            }
        };

        debug!(script, "browser driver ready");

        Ok(BrowserSession {
            script: script.to_string(),
            child,
            stdin,
            reader,
            closed: false,
        })
    }

    fn handshake(child: &mut Child, script: &str) -> Result<(ChildStdin, BufReader<ChildStdout>), HarnessError> {
        let stdin = child.stdin.take().ok_or_else(|| {
            HarnessError::SessionIO(format!("Failed to capture stdin of {}", script))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            HarnessError::SessionIO(format!("Failed to capture stdout of {}", script))
        })?;

        let mut reader = BufReader::new(stdout);

        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| HarnessError::SessionIO(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| HarnessError::JsonParse {
                context: "driver ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(HarnessError::SessionProtocol {
                command: "launch".into(),
                error: format!("Did not receive ready signal from {}", script),
            });
        }

        Ok((stdin, reader))
    }

    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, HarnessError> {
        let json = serde_json::to_string(request).map_err(|e| HarnessError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            HarnessError::SessionIO(format!("Failed to write to {} stdin: {}", self.script, e))
        })?;

        self.stdin.flush().map_err(|e| {
            HarnessError::SessionIO(format!("Failed to flush {} stdin: {}", self.script, e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            HarnessError::SessionIO(format!("Failed to read from {} stdout: {}", self.script, e))
        })?;

        if line.trim().is_empty() {
            return Err(HarnessError::SessionIO(format!(
                "Empty response from {} (process may have died)",
                self.script
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| HarnessError::JsonParse {
            context: "driver response".into(),
            source: e,
        })
    }

    fn send_ok(&mut self, request: &BrowserRequest, command: &str) -> Result<BrowserResponse, HarnessError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(HarnessError::SessionProtocol {
                command: command.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), HarnessError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Best-effort: the process may already be gone
        let _ = self.send(&BrowserRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl Document for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), HarnessError> {
        self.send_ok(&BrowserRequest::navigate(url), "navigate")?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, HarnessError> {
        let response = self.send_ok(&BrowserRequest::current_url(), "current_url")?;
        response.url.ok_or_else(|| HarnessError::SessionProtocol {
            command: "current_url".into(),
            error: "No URL in current_url response".into(),
        })
    }

    fn wait_for_network_idle(&mut self, scope: &Scope, timeout: Duration) -> Result<bool, HarnessError> {
        let response = self.send_ok(&BrowserRequest::network_idle(scope, timeout), "wait_for_load_state")?;
        Ok(response.idle.unwrap_or(false))
    }

    fn clear_cookies(&mut self) -> Result<(), HarnessError> {
        self.send_ok(&BrowserRequest::clear_cookies(), "clear_cookies")?;
        Ok(())
    }

    fn pause(&mut self, duration: Duration) -> Result<(), HarnessError> {
        self.send_ok(&BrowserRequest::wait(duration), "wait")?;
        Ok(())
    }

    fn count(&mut self, locator: &Locator) -> Result<usize, HarnessError> {
        let response = self.send_ok(&BrowserRequest::count(locator), "count")?;
        Ok(response.count.unwrap_or(0))
    }

    fn probe(&mut self, locator: &Locator) -> Result<Option<ElementSnapshot>, HarnessError> {
        let response = self.send_ok(&BrowserRequest::probe(locator), "probe")?;
        Ok(response.element)
    }

    fn inner_text(&mut self, locator: &Locator) -> Result<Option<String>, HarnessError> {
        let response = self.send_ok(&BrowserRequest::inner_text(locator), "inner_text")?;
        Ok(response.text)
    }

    fn click(&mut self, locator: &Locator) -> Result<(), HarnessError> {
        self.send_ok(&BrowserRequest::click(locator), "click")?;
        Ok(())
    }

    fn fill(&mut self, locator: &Locator, value: &str) -> Result<(), HarnessError> {
        self.send_ok(&BrowserRequest::fill(locator, value), "fill")?;
        Ok(())
    }

    fn press(&mut self, locator: &Locator, key: &str) -> Result<(), HarnessError> {
        self.send_ok(&BrowserRequest::press(locator, key), "press")?;
        Ok(())
    }

    fn check(&mut self, locator: &Locator) -> Result<(), HarnessError> {
        self.send_ok(&BrowserRequest::check(locator), "check")?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.quit() {
            warn!("failed to quit browser session: {}", e);
        }
    }
}
