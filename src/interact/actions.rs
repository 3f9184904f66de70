//! Interactions that change the page, each followed by its own check.
//!
//! The application may drop or coerce input (read-only fields, disabled
//! radios, comboboxes that ignore a click). Every mutation here reads the
//! result back and fails with [`HarnessError::Verification`] on a mismatch,
//! so a broken step stops the scenario where it happened.

use tracing::{debug, info};

use crate::browser::document::Document;
use crate::error::HarnessError;
use crate::locator::locator_model::Locator;
use crate::locator::registry::Locators;
use crate::wait::conditions::{verify_state, wait_for, ElementState, WaitPolicy};

/// Click `target` once visible, then require `marker` to reach `state`.
pub fn click_and_expect(
    doc: &mut dyn Document,
    target: &Locator,
    marker: &Locator,
    state: &ElementState,
    policy: &WaitPolicy,
) -> Result<(), HarnessError> {
    wait_for(doc, target, &ElementState::Visible, policy)?;
    doc.click(target)?;
    debug!(element = %target.describe(), "clicked");
    verify_state(doc, marker, state, policy)
}

/// Press `key` in `target`, then require `marker` to reach `state`.
pub fn press_and_expect(
    doc: &mut dyn Document,
    target: &Locator,
    key: &str,
    marker: &Locator,
    state: &ElementState,
    policy: &WaitPolicy,
) -> Result<(), HarnessError> {
    wait_for(doc, target, &ElementState::Visible, policy)?;
    doc.press(target, key)?;
    debug!(element = %target.describe(), key, "pressed");
    verify_state(doc, marker, state, policy)
}

/// Fill `target` with `value` and read the value straight back.
pub fn fill_and_verify(
    doc: &mut dyn Document,
    target: &Locator,
    value: &str,
    policy: &WaitPolicy,
) -> Result<(), HarnessError> {
    wait_for(doc, target, &ElementState::Visible, policy)?;
    doc.fill(target, value)?;

    let observed = doc.probe(target)?.and_then(|s| s.value);
    if observed.as_deref() != Some(value) {
        return Err(HarnessError::Verification {
            locator: target.describe(),
            expected: format!("value \"{}\"", value),
            observed: match observed {
                Some(v) => format!("value \"{}\"", v),
                None => "no value".to_string(),
            },
        });
    }
    debug!(element = %target.describe(), value, "filled");
    Ok(())
}

/// Check `target` and confirm it reads back as checked.
pub fn check_and_verify(doc: &mut dyn Document, target: &Locator, policy: &WaitPolicy) -> Result<(), HarnessError> {
    wait_for(doc, target, &ElementState::Visible, policy)?;
    doc.check(target)?;

    let checked = doc.probe(target)?.and_then(|s| s.checked);
    if checked != Some(true) {
        return Err(HarnessError::Verification {
            locator: target.describe(),
            expected: "checked".to_string(),
            observed: match checked {
                Some(false) => "unchecked".to_string(),
                Some(true) => "checked".to_string(),
                None => "not checkable".to_string(),
            },
        });
    }
    debug!(element = %target.describe(), "checked");
    Ok(())
}

/// Select the work-schedule option radio with the given value.
pub fn select_radio(
    doc: &mut dyn Document,
    locators: &Locators,
    value: &str,
    policy: &WaitPolicy,
) -> Result<(), HarnessError> {
    check_and_verify(doc, &locators.work_schedule_option_radio(value), policy)
}

/// Open a combobox, pick `option`, and require the combobox to show
/// `expected_label` afterwards.
pub fn select_option(
    doc: &mut dyn Document,
    dropdown: &Locator,
    option: &Locator,
    expected_label: &str,
    policy: &WaitPolicy,
) -> Result<(), HarnessError> {
    click_and_expect(doc, dropdown, option, &ElementState::Visible, policy)?;
    doc.click(option)?;
    verify_state(
        doc,
        dropdown,
        &ElementState::ContainsText(expected_label.to_string()),
        policy,
    )?;
    info!(dropdown = %dropdown.describe(), expected_label, "option selected");
    Ok(())
}

/// Text of `target` once visible, trimmed. Used to capture identifiers the
/// application generated.
pub fn read_text(doc: &mut dyn Document, target: &Locator, policy: &WaitPolicy) -> Result<String, HarnessError> {
    wait_for(doc, target, &ElementState::Visible, policy)?;
    match doc.inner_text(target)? {
        Some(text) => Ok(text.trim().to_string()),
        None => Err(HarnessError::Verification {
            locator: target.describe(),
            expected: "text".to_string(),
            observed: "detached".to_string(),
        }),
    }
}

pub fn expect_text(
    doc: &mut dyn Document,
    target: &Locator,
    expected: &str,
    policy: &WaitPolicy,
) -> Result<(), HarnessError> {
    verify_state(doc, target, &ElementState::ContainsText(expected.to_string()), policy)
}

pub fn expect_count(
    doc: &mut dyn Document,
    target: &Locator,
    expected: usize,
    policy: &WaitPolicy,
) -> Result<(), HarnessError> {
    verify_state(doc, target, &ElementState::Count(expected), policy)
}
