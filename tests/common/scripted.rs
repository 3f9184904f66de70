#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use workflow_probe::browser::document::{Document, ElementSnapshot};
use workflow_probe::error::HarnessError;
use workflow_probe::locator::locator_model::{Locator, Scope};

/// One element of a [`ScriptedDocument`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedElement {
    pub text: String,
    pub visible: bool,
    pub enabled: bool,
    pub checked: Option<bool>,
    pub value: Option<String>,
    /// Fills and checks are accepted but silently dropped
    pub read_only: bool,
    /// Clicking the element navigates here
    pub href: Option<String>,
    /// Reported as hidden for this many probes before turning visible
    pub hidden_for_probes: u32,
    /// Descendants keyed by [`Locator::selector_text`]
    pub children: HashMap<String, Vec<ScriptedElement>>,
}

impl ScriptedElement {
    pub fn new(text: &str) -> Self {
        ScriptedElement {
            text: text.to_string(),
            visible: true,
            enabled: true,
            ..Default::default()
        }
    }

    pub fn input() -> Self {
        ScriptedElement {
            value: Some(String::new()),
            ..Self::new("")
        }
    }

    pub fn checkbox() -> Self {
        ScriptedElement {
            checked: Some(false),
            ..Self::new("")
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn visible_after(mut self, probes: u32) -> Self {
        self.hidden_for_probes = probes;
        self
    }

    pub fn linking_to(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn with_child(mut self, css: &str, child: ScriptedElement) -> Self {
        self.children.entry(css.to_string()).or_default().push(child);
        self
    }

    /// Shorthand for an `<a>` child that navigates to `href`.
    pub fn with_link(self, text: &str, href: &str) -> Self {
        self.with_child("a", ScriptedElement::new(text).linking_to(href))
    }

    fn snapshot(&self) -> ElementSnapshot {
        ElementSnapshot {
            visible: self.visible && self.hidden_for_probes == 0,
            enabled: self.enabled,
            checked: self.checked,
            value: self.value.clone(),
            text: self.text.clone(),
        }
    }
}

/// Everything the harness did to a [`ScriptedDocument`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    Navigate(String),
    NetworkIdle(Scope),
    ClearCookies,
    Pause(Duration),
    Count(String),
    Probe(String),
    InnerText(String),
    Click(String),
    Fill(String, String),
    Press(String, String),
    Check(String),
}

/// Mutable page content, handed to click reactions.
#[derive(Debug, Default)]
pub struct ScriptedPage {
    pub url: String,
    elements: HashMap<String, Vec<ScriptedElement>>,
}

impl ScriptedPage {
    /// Replace every match of `locator`'s query.
    pub fn set(&mut self, locator: &Locator, elements: Vec<ScriptedElement>) {
        self.elements.insert(locator.key(), elements);
    }

    pub fn push(&mut self, locator: &Locator, element: ScriptedElement) {
        self.elements.entry(locator.key()).or_default().push(element);
    }

    pub fn clear(&mut self, locator: &Locator) {
        self.elements.remove(&locator.key());
    }

    pub fn first_mut(&mut self, locator: &Locator) -> Option<&mut ScriptedElement> {
        pick_mut(&mut self.elements, locator)
    }
}

pub type Reaction = Box<dyn FnMut(&mut ScriptedPage)>;

/// Elements that render on their own after a number of pauses.
struct Deferred {
    locator: Locator,
    elements: Vec<ScriptedElement>,
    pauses_left: u32,
}

/// An in-memory [`Document`] with registered elements and click reactions.
///
/// Elements are registered against a locator's key, so every `nth` of the
/// same query resolves into the same list. Nothing sleeps: pauses are only
/// recorded.
#[derive(Default)]
pub struct ScriptedDocument {
    page: ScriptedPage,
    reactions: HashMap<String, Vec<Reaction>>,
    busy: HashSet<Scope>,
    deferred: Vec<Deferred>,
    events: Vec<DocumentEvent>,
}

impl ScriptedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, locator: &Locator, element: ScriptedElement) -> Self {
        self.page.push(locator, element);
        self
    }

    pub fn with_elements(mut self, locator: &Locator, elements: Vec<ScriptedElement>) -> Self {
        self.page.set(locator, elements);
        self
    }

    pub fn page_mut(&mut self) -> &mut ScriptedPage {
        &mut self.page
    }

    /// Run `reaction` after every click on exactly `locator` (index included).
    pub fn on_click(&mut self, locator: &Locator, reaction: impl FnMut(&mut ScriptedPage) + 'static) {
        self.reactions
            .entry(locator.describe())
            .or_default()
            .push(Box::new(reaction));
    }

    /// Replace the matches of `locator` with `elements` once `pauses` pauses
    /// have passed, as a late paint after the network went idle would.
    pub fn defer(&mut self, locator: &Locator, elements: Vec<ScriptedElement>, pauses: u32) {
        self.deferred.push(Deferred {
            locator: locator.clone(),
            elements,
            pauses_left: pauses,
        });
    }

    /// Make `scope` report network activity forever.
    pub fn set_busy(&mut self, scope: Scope) {
        self.busy.insert(scope);
    }

    pub fn events(&self) -> &[DocumentEvent] {
        &self.events
    }

    pub fn navigations(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DocumentEvent::Navigate(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clicks(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DocumentEvent::Click(desc) => Some(desc.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Value of the first element the locator matches, as currently stored.
    pub fn element(&self, locator: &Locator) -> Option<&ScriptedElement> {
        pick(&self.page.elements, locator)
    }

    fn target_mut(&mut self, locator: &Locator, command: &str) -> Result<&mut ScriptedElement, HarnessError> {
        pick_mut(&mut self.page.elements, locator).ok_or_else(|| HarnessError::SessionProtocol {
            command: command.into(),
            error: format!("no element matches {}", locator.describe()),
        })
    }
}

fn candidates<'a>(elements: &'a HashMap<String, Vec<ScriptedElement>>, locator: &Locator) -> &'a [ScriptedElement] {
    let list = match &locator.parent {
        None => elements.get(&locator.key()),
        Some(parent) => pick(elements, parent).and_then(|p| p.children.get(&locator.selector_text())),
    };
    list.map(|v| v.as_slice()).unwrap_or(&[])
}

fn matched<'a>(elements: &'a HashMap<String, Vec<ScriptedElement>>, locator: &Locator) -> &'a [ScriptedElement] {
    let all = candidates(elements, locator);
    match locator.nth {
        Some(n) => all.get(n..n + 1).unwrap_or(&[]),
        None => all,
    }
}

fn pick<'a>(elements: &'a HashMap<String, Vec<ScriptedElement>>, locator: &Locator) -> Option<&'a ScriptedElement> {
    matched(elements, locator).first()
}

fn pick_mut<'a>(
    elements: &'a mut HashMap<String, Vec<ScriptedElement>>,
    locator: &Locator,
) -> Option<&'a mut ScriptedElement> {
    let index = locator.nth.unwrap_or(0);
    match &locator.parent {
        None => elements.get_mut(&locator.key())?.get_mut(index),
        Some(parent) => pick_mut(elements, parent)?
            .children
            .get_mut(&locator.selector_text())?
            .get_mut(index),
    }
}

impl Document for ScriptedDocument {
    fn navigate(&mut self, url: &str) -> Result<(), HarnessError> {
        self.events.push(DocumentEvent::Navigate(url.to_string()));
        self.page.url = url.to_string();
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, HarnessError> {
        Ok(self.page.url.clone())
    }

    fn wait_for_network_idle(&mut self, scope: &Scope, _timeout: Duration) -> Result<bool, HarnessError> {
        self.events.push(DocumentEvent::NetworkIdle(scope.clone()));
        Ok(!self.busy.contains(scope))
    }

    fn clear_cookies(&mut self) -> Result<(), HarnessError> {
        self.events.push(DocumentEvent::ClearCookies);
        Ok(())
    }

    fn pause(&mut self, duration: Duration) -> Result<(), HarnessError> {
        self.events.push(DocumentEvent::Pause(duration));
        for pending in self.deferred.iter_mut() {
            pending.pauses_left = pending.pauses_left.saturating_sub(1);
        }
        let (due, waiting): (Vec<_>, Vec<_>) = self.deferred.drain(..).partition(|d| d.pauses_left == 0);
        self.deferred = waiting;
        for d in due {
            self.page.set(&d.locator, d.elements);
        }
        Ok(())
    }

    fn count(&mut self, locator: &Locator) -> Result<usize, HarnessError> {
        self.events.push(DocumentEvent::Count(locator.describe()));
        Ok(matched(&self.page.elements, locator).len())
    }

    fn probe(&mut self, locator: &Locator) -> Result<Option<ElementSnapshot>, HarnessError> {
        self.events.push(DocumentEvent::Probe(locator.describe()));
        Ok(pick_mut(&mut self.page.elements, locator).map(|el| {
            let snapshot = el.snapshot();
            el.hidden_for_probes = el.hidden_for_probes.saturating_sub(1);
            snapshot
        }))
    }

    fn inner_text(&mut self, locator: &Locator) -> Result<Option<String>, HarnessError> {
        self.events.push(DocumentEvent::InnerText(locator.describe()));
        Ok(pick(&self.page.elements, locator).map(|el| el.text.clone()))
    }

    fn click(&mut self, locator: &Locator) -> Result<(), HarnessError> {
        let described = locator.describe();
        self.events.push(DocumentEvent::Click(described.clone()));

        let href = self.target_mut(locator, "click")?.href.clone();
        if let Some(href) = href {
            self.navigate(&href)?;
        }

        if let Some(mut reactions) = self.reactions.remove(&described) {
            for reaction in reactions.iter_mut() {
                reaction(&mut self.page);
            }
            self.reactions.insert(described, reactions);
        }
        Ok(())
    }

    fn fill(&mut self, locator: &Locator, value: &str) -> Result<(), HarnessError> {
        self.events
            .push(DocumentEvent::Fill(locator.describe(), value.to_string()));
        let el = self.target_mut(locator, "fill")?;
        if el.enabled && !el.read_only {
            el.value = Some(value.to_string());
        }
        Ok(())
    }

    fn press(&mut self, locator: &Locator, key: &str) -> Result<(), HarnessError> {
        self.events
            .push(DocumentEvent::Press(locator.describe(), key.to_string()));
        self.target_mut(locator, "press")?;
        Ok(())
    }

    fn check(&mut self, locator: &Locator) -> Result<(), HarnessError> {
        self.events.push(DocumentEvent::Check(locator.describe()));
        let el = self.target_mut(locator, "check")?;
        if el.enabled && !el.read_only {
            el.checked = Some(true);
        }
        Ok(())
    }
}
