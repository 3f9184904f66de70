mod common;

use std::time::Duration;

use workflow_probe::error::HarnessError;
use workflow_probe::locator::locator_model::{Locator, Scope};
use workflow_probe::wait::conditions::{
    verify_state, wait_for, wait_for_quiescence, wait_for_state, ElementState, WaitPolicy,
};

use common::scripted::{DocumentEvent, ScriptedDocument, ScriptedElement};

fn fast_policy() -> WaitPolicy {
    WaitPolicy {
        timeout: Duration::from_millis(1_000),
        poll_interval: Duration::from_millis(100),
        quiescence_timeout: Duration::from_millis(1_000),
    }
}

fn pauses(doc: &ScriptedDocument) -> usize {
    doc.events()
        .iter()
        .filter(|e| matches!(e, DocumentEvent::Pause(_)))
        .count()
}

// ============================================================================
// wait_for_state
// ============================================================================

#[test]
fn visible_element_satisfies_immediately() {
    let button = Locator::host("#go");
    let mut doc = ScriptedDocument::new().with_element(&button, ScriptedElement::new("Go"));

    wait_for(&mut doc, &button, &ElementState::Visible, &fast_policy()).unwrap();
    assert_eq!(pauses(&doc), 0);
}

#[test]
fn element_turning_visible_is_polled_for() {
    let button = Locator::host("#go");
    let mut doc = ScriptedDocument::new().with_element(&button, ScriptedElement::new("Go").visible_after(3));

    wait_for(&mut doc, &button, &ElementState::Visible, &fast_policy()).unwrap();
    assert_eq!(pauses(&doc), 3);
}

#[test]
fn missing_element_times_out_with_last_observation() {
    let button = Locator::host("#missing");
    let mut doc = ScriptedDocument::new();

    let err = wait_for(&mut doc, &button, &ElementState::Visible, &fast_policy()).unwrap_err();
    match err {
        HarnessError::Timeout {
            locator,
            expected,
            last_observed,
            timeout_ms,
        } => {
            assert_eq!(locator, "#missing");
            assert_eq!(expected, "visible");
            assert_eq!(last_observed, "detached");
            assert_eq!(timeout_ms, 1_000);
        }
        other => panic!("expected Timeout, got {:?}", other),
    }
    // ceil(1000 / 100) polls, then give up
    assert_eq!(pauses(&doc), 10);
}

#[test]
fn poll_budget_rounds_up() {
    let button = Locator::host("#missing");
    let mut doc = ScriptedDocument::new();

    let result = wait_for_state(
        &mut doc,
        &button,
        &ElementState::Visible,
        Duration::from_millis(250),
        Duration::from_millis(100),
    );
    assert!(result.unwrap_err().is_timeout());
    assert_eq!(pauses(&doc), 3);
}

#[test]
fn hidden_is_satisfied_by_absence() {
    let popup = Locator::host("div.popup");
    let mut doc = ScriptedDocument::new();
    wait_for(&mut doc, &popup, &ElementState::Hidden, &fast_policy()).unwrap();

    let mut doc = ScriptedDocument::new().with_element(&popup, ScriptedElement::new("").hidden());
    wait_for(&mut doc, &popup, &ElementState::Hidden, &fast_policy()).unwrap();
}

#[test]
fn count_state_uses_count_query() {
    let items = Locator::host("li");
    let mut doc = ScriptedDocument::new().with_elements(
        &items,
        vec![ScriptedElement::new("a"), ScriptedElement::new("b")],
    );

    wait_for(&mut doc, &items, &ElementState::Count(2), &fast_policy()).unwrap();
    let err = wait_for(&mut doc, &items, &ElementState::Count(7), &fast_policy()).unwrap_err();
    assert!(err.to_string().contains("last observed: count 2"));
}

#[test]
fn text_and_value_states() {
    let input = Locator::host("input");
    let mut el = ScriptedElement::input();
    el.value = Some("42".into());
    el.text = "Record saved successfully".into();
    let mut doc = ScriptedDocument::new().with_element(&input, el);
    let p = fast_policy();

    wait_for(&mut doc, &input, &ElementState::HasValue("42".into()), &p).unwrap();
    wait_for(&mut doc, &input, &ElementState::ContainsText("saved".into()), &p).unwrap();
    wait_for(&mut doc, &input, &ElementState::Attached, &p).unwrap();
    wait_for(&mut doc, &input, &ElementState::Enabled, &p).unwrap();
    assert!(wait_for(&mut doc, &input, &ElementState::Detached, &p).is_err());
}

// ============================================================================
// verify_state
// ============================================================================

#[test]
fn verify_state_reports_verification() {
    let checkbox = Locator::host("input[type=checkbox]");
    let mut doc = ScriptedDocument::new().with_element(&checkbox, ScriptedElement::checkbox());

    let err = verify_state(&mut doc, &checkbox, &ElementState::Checked, &fast_policy()).unwrap_err();
    match err {
        HarnessError::Verification { expected, observed, .. } => {
            assert_eq!(expected, "checked");
            assert_eq!(observed, "unchecked");
        }
        other => panic!("expected Verification, got {:?}", other),
    }
}

// ============================================================================
// wait_for_quiescence
// ============================================================================

#[test]
fn idle_scope_passes() {
    let mut doc = ScriptedDocument::new();
    wait_for_quiescence(&mut doc, &Scope::Host, Duration::from_secs(30)).unwrap();
    assert_eq!(doc.events(), &[DocumentEvent::NetworkIdle(Scope::Host)]);
}

#[test]
fn busy_scope_times_out() {
    let frame = Scope::frame("Report Builder", "iframe");
    let mut doc = ScriptedDocument::new();
    doc.set_busy(frame.clone());

    // The host stays idle while the frame is busy
    wait_for_quiescence(&mut doc, &Scope::Host, Duration::from_secs(30)).unwrap();

    let err = wait_for_quiescence(&mut doc, &frame, Duration::from_secs(30)).unwrap_err();
    match err {
        HarnessError::Timeout {
            locator,
            expected,
            timeout_ms,
            ..
        } => {
            assert_eq!(locator, "frame \"Report Builder\"");
            assert_eq!(expected, "network idle");
            assert_eq!(timeout_ms, 30_000);
        }
        other => panic!("expected Timeout, got {:?}", other),
    }
}
