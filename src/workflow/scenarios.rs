use tracing::info;

use crate::browser::document::Document;
use crate::error::HarnessError;
use crate::interact::actions::{
    check_and_verify, click_and_expect, expect_count, expect_text, fill_and_verify, press_and_expect, read_text,
    select_option, select_radio,
};
use crate::locator::locator_model::Scope;
use crate::locator::report_builder::REPORT_TYPE;
use crate::locator::registry::Locators;
use crate::scan::report_scan::ReportScanner;
use crate::wait::conditions::{verify_state, wait_for, wait_for_quiescence, ElementState, WaitPolicy};
use crate::workflow::state::WorkflowState;

pub const TRAINING_SITE: &str = "Training Site";
pub const RECORD_SAVED: &str = "Record saved successfully";
pub const REPORT_TYPE_CATEGORIES: usize = 7;

/// Everything a scenario needs besides the document and the shared state.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    pub locators: Locators,
    pub policy: WaitPolicy,
    pub scanner: ReportScanner,
}

pub type ScenarioFn =
    Box<dyn FnMut(&mut dyn Document, &ScenarioContext, &mut WorkflowState) -> Result<(), HarnessError>>;

/// A named workflow step with its retry-count hint.
pub struct Scenario {
    pub name: String,
    /// Extra attempts after the first failure
    pub retries: u32,
    pub run: ScenarioFn,
}

impl Scenario {
    pub fn new(
        name: &str,
        retries: u32,
        run: impl FnMut(&mut dyn Document, &ScenarioContext, &mut WorkflowState) -> Result<(), HarnessError> + 'static,
    ) -> Self {
        Scenario {
            name: name.to_string(),
            retries,
            run: Box::new(run),
        }
    }
}

/// Per-scenario retry hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryHints {
    pub change_request: u32,
    pub work_schedule: u32,
    pub report: u32,
}

impl Default for RetryHints {
    fn default() -> Self {
        Self {
            change_request: 0,
            work_schedule: 0,
            report: 3,
        }
    }
}

/// The change request → work schedule → report workflow, in execution order.
pub fn change_request_workflow(retries: &RetryHints) -> Vec<Scenario> {
    vec![
        Scenario::new(
            "Navigate to Salesforce and create Change Request",
            retries.change_request,
            create_change_request,
        ),
        Scenario::new(
            "Create new associated Work Schedule",
            retries.work_schedule,
            create_work_schedule,
        ),
        Scenario::new(
            "Create and validate the report",
            retries.report,
            create_and_validate_report,
        ),
    ]
}

// =========================================================================
// Change request
// =========================================================================

pub fn create_change_request(
    doc: &mut dyn Document,
    ctx: &ScenarioContext,
    state: &mut WorkflowState,
) -> Result<(), HarnessError> {
    let l = &ctx.locators;
    let p = &ctx.policy;

    click_and_expect(doc, &l.change_requests_tab(), &l.specific_column_sequence(), &ElementState::Count(1), p)?;

    click_and_expect(doc, &l.new_button(), &l.modal_header(), &ElementState::Visible, p)?;
    expect_text(doc, &l.modal_header(), "New Change Request", p)?;

    fill_and_verify(doc, &l.change_request_name_input(), &state.change_request_name, p)?;

    fill_and_verify(doc, &l.search_sites_input(), TRAINING_SITE, p)?;
    press_and_expect(
        doc,
        &l.search_sites_input(),
        "Enter",
        &l.training_site_option(),
        &ElementState::Visible,
        p,
    )?;
    click_and_expect(doc, &l.training_site_option(), &l.training_site_option(), &ElementState::Hidden, p)?;

    fill_and_verify(doc, &l.brief_description_input(), &state.brief_description(), p)?;
    check_and_verify(doc, &l.is_template_checkbox(), p)?;

    select_option(doc, &l.risk_classification_dropdown(), &l.low_risk_option(), "Low Risk", p)?;
    select_option(
        doc,
        &l.potential_impact_dropdown(),
        &l.low_impact_option(),
        "Level I - Low (No Impact is expected)",
        p,
    )?;
    select_option(doc, &l.justification_dropdown(), &l.maintenance_option(), "Maintenance", p)?;

    click_and_expect(doc, &l.save_button(), &l.toast_message(), &ElementState::Visible, p)?;

    let confirmation = format!("{} | TST", state.brief_description());
    let toast = read_text(doc, &l.toast_message(), p)?;
    if !toast.contains(&confirmation) {
        return Err(HarnessError::Verification {
            locator: l.toast_message().describe(),
            expected: format!("text containing \"{}\"", confirmation),
            observed: format!("text \"{}\"", toast),
        });
    }

    expect_text(doc, &l.change_request_title(), &confirmation, p)?;

    let saved_url = doc.current_url()?;
    info!(name = %state.change_request_name, url = %saved_url, "change request saved");
    state.saved_url = Some(saved_url);
    Ok(())
}

// =========================================================================
// Work schedule
// =========================================================================

pub fn create_work_schedule(
    doc: &mut dyn Document,
    ctx: &ScenarioContext,
    state: &mut WorkflowState,
) -> Result<(), HarnessError> {
    let l = &ctx.locators;
    let p = &ctx.policy;

    let saved_url = state.saved_url()?.to_string();
    doc.navigate(&saved_url)?;
    wait_for_quiescence(doc, &Scope::Host, p.quiescence_timeout)?;

    click_and_expect(doc, &l.new_work_schedule_button(), &l.work_schedule_start_date(), &ElementState::Visible, p)?;
    click_and_expect(doc, &l.work_schedule_start_date(), &l.calendar_today_button(), &ElementState::Visible, p)?;
    click_and_expect(doc, &l.calendar_today_button(), &l.calendar_popup(), &ElementState::Hidden, p)?;

    select_radio(doc, l, "1", p)?;
    fill_and_verify(doc, &l.every_years_input(), "1", p)?;
    fill_and_verify(doc, &l.day_input(), "1", p)?;
    fill_and_verify(doc, &l.duration_input(), "1", p)?;
    fill_and_verify(doc, &l.creation_lead_time_input(), "2", p)?;
    fill_and_verify(doc, &l.reminder_lead_time_input(), "2", p)?;

    click_and_expect(doc, &l.work_schedule_save_button(), &l.toast_message(), &ElementState::Visible, p)?;
    let toast = read_text(doc, &l.toast_message(), p)?;
    if !toast.contains(RECORD_SAVED) {
        return Err(HarnessError::Verification {
            locator: l.toast_message().describe(),
            expected: format!("text containing \"{}\"", RECORD_SAVED),
            observed: format!("text \"{}\"", toast),
        });
    }

    verify_work_schedule_columns(doc, l, p)?;

    let id = read_text(doc, &l.work_schedule_name_cell(), p)?;
    info!(work_schedule_id = %id, "work schedule saved");
    state.work_schedule_id = Some(id);
    Ok(())
}

/// The related list shows the Name, Assigned to, Frequency and Summary columns.
pub fn verify_work_schedule_columns(
    doc: &mut dyn Document,
    l: &Locators,
    p: &WaitPolicy,
) -> Result<(), HarnessError> {
    for column in [
        l.work_schedule_name_column(),
        l.work_schedule_assigned_to_column(),
        l.work_schedule_frequency_column(),
        l.work_schedule_summary_column(),
    ] {
        verify_state(doc, &column, &ElementState::Visible, p)?;
    }
    Ok(())
}

// =========================================================================
// Report
// =========================================================================

pub fn create_and_validate_report(
    doc: &mut dyn Document,
    ctx: &ScenarioContext,
    state: &mut WorkflowState,
) -> Result<(), HarnessError> {
    let l = &ctx.locators;
    let p = &ctx.policy;
    let frame = l.report_builder();

    click_and_expect(doc, &l.reports_tab(), &l.new_report_button(), &ElementState::Visible, p)?;

    // The builder opens in its own frame: settle both documents before
    // looking inside it.
    wait_for(doc, &l.new_report_button(), &ElementState::Visible, p)?;
    doc.click(&l.new_report_button())?;
    wait_for_quiescence(doc, &Scope::Host, p.quiescence_timeout)?;
    wait_for_quiescence(doc, frame.scope(), p.quiescence_timeout)?;
    verify_state(doc, &frame.create_report_modal_header(), &ElementState::Visible, p)?;
    expect_text(doc, &frame.create_report_modal_header(), "Create Report", p)?;

    expect_count(doc, &frame.report_type_category_list(), REPORT_TYPE_CATEGORIES, p)?;

    fill_and_verify(doc, &frame.search_report_types(), REPORT_TYPE, p)?;
    press_and_expect(
        doc,
        &frame.search_report_types(),
        "Enter",
        &frame.report_type_row(REPORT_TYPE),
        &ElementState::Visible,
        p,
    )?;
    click_and_expect(doc, &frame.report_type_row(REPORT_TYPE), &frame.start_report_button(), &ElementState::Enabled, p)?;
    click_and_expect(doc, &frame.start_report_button(), &frame.report_type_badge(REPORT_TYPE), &ElementState::Visible, p)?;
    // The builder keeps its Run button on screen; a rendered grid header is
    // the only sign the report ran.
    click_and_expect(
        doc,
        &frame.run_report_button(),
        &frame.work_schedule_column_header().first(),
        &ElementState::Attached,
        p,
    )?;

    let id = state.work_schedule_id()?.to_string();
    let outcome = ctx.scanner.locate(doc, &id)?;
    wait_for_quiescence(doc, &Scope::Host, p.quiescence_timeout)?;

    if !outcome.is_found() {
        return Err(HarnessError::Verification {
            locator: frame.report_table_cells().describe(),
            expected: format!("a cell containing \"{}\"", id),
            observed: format!("{:?}", outcome),
        });
    }

    expect_text(doc, &l.work_schedule_id_header(), &id, p)?;
    info!(work_schedule_id = %id, "report validated");
    Ok(())
}
