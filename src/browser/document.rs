use std::time::Duration;

use serde::Deserialize;

use crate::error::HarnessError;
use crate::locator::locator_model::{Locator, Scope};

/// State of the first element a locator matched, read in a single round trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ElementSnapshot {
    pub visible: bool,
    #[serde(default)]
    pub enabled: bool,
    /// `None` for elements that cannot be checked
    #[serde(default)]
    pub checked: Option<bool>,
    /// `None` for elements without an input value
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub text: String,
}

/// The browser document the harness drives.
///
/// Every method is a blocking round trip that resolves the given locator
/// afresh; implementations never hand out element references that outlive
/// the call. The `&mut self` receiver keeps one operation in flight at a time.
pub trait Document {
    fn navigate(&mut self, url: &str) -> Result<(), HarnessError>;

    fn current_url(&mut self) -> Result<String, HarnessError>;

    /// Block until `scope` saw no network activity for the driver's debounce
    /// window. Returns `false` when `timeout` elapsed first.
    fn wait_for_network_idle(&mut self, scope: &Scope, timeout: Duration) -> Result<bool, HarnessError>;

    fn clear_cookies(&mut self) -> Result<(), HarnessError>;

    /// Fixed delay; also used between polls of the wait primitives.
    fn pause(&mut self, duration: Duration) -> Result<(), HarnessError>;

    /// Number of elements the locator currently matches (zero is not an error).
    fn count(&mut self, locator: &Locator) -> Result<usize, HarnessError>;

    /// Snapshot of the first match, or `None` when nothing matches.
    fn probe(&mut self, locator: &Locator) -> Result<Option<ElementSnapshot>, HarnessError>;

    /// Rendered text of the first match, or `None` when nothing matches.
    fn inner_text(&mut self, locator: &Locator) -> Result<Option<String>, HarnessError>;

    fn click(&mut self, locator: &Locator) -> Result<(), HarnessError>;

    fn fill(&mut self, locator: &Locator, value: &str) -> Result<(), HarnessError>;

    fn press(&mut self, locator: &Locator, key: &str) -> Result<(), HarnessError>;

    fn check(&mut self, locator: &Locator) -> Result<(), HarnessError>;
}
