use crate::locator::locator_model::Locator;
use crate::locator::report_builder::{ReportBuilderLocators, REPORT_TYPE};

/// Named locators for the host document of the change-request application.
///
/// Accessors are pure: calling one twice yields equal locators and never
/// touches the browser. Elements inside the report builder are reached only
/// through [`Locators::report_builder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Locators;

impl Locators {
    pub fn new() -> Self {
        Locators
    }

    /// Resolver scoped to the embedded report-builder sub-document.
    pub fn report_builder(&self) -> ReportBuilderLocators {
        ReportBuilderLocators::new()
    }

    /// Every named locator with its accessor name, host first, then the
    /// report builder. Parameterized accessors appear with the values the
    /// workflow uses.
    ///
    /// This is the DOM contract the harness depends on.
    pub fn catalog(&self) -> Vec<(&'static str, Locator)> {
        let frame = self.report_builder();
        vec![
            ("change_requests_tab", self.change_requests_tab()),
            ("new_button", self.new_button()),
            ("modal_header", self.modal_header()),
            ("change_request_name_input", self.change_request_name_input()),
            ("search_sites_input", self.search_sites_input()),
            ("change_request_title", self.change_request_title()),
            ("change_requests_table", self.change_requests_table()),
            ("specific_column_sequence", self.specific_column_sequence()),
            ("training_site_option", self.training_site_option()),
            ("brief_description_input", self.brief_description_input()),
            ("is_template_checkbox", self.is_template_checkbox()),
            ("risk_classification_dropdown", self.risk_classification_dropdown()),
            ("low_risk_option", self.low_risk_option()),
            ("potential_impact_dropdown", self.potential_impact_dropdown()),
            ("low_impact_option", self.low_impact_option()),
            ("justification_dropdown", self.justification_dropdown()),
            ("maintenance_option", self.maintenance_option()),
            ("save_button", self.save_button()),
            ("toast_message", self.toast_message()),
            ("new_work_schedule_button", self.new_work_schedule_button()),
            ("work_schedule_start_date", self.work_schedule_start_date()),
            ("calendar_popup", self.calendar_popup()),
            ("calendar_today_button", self.calendar_today_button()),
            ("work_schedule_option_radio", self.work_schedule_option_radio("1")),
            ("every_years_input", self.every_years_input()),
            ("day_input", self.day_input()),
            ("duration_input", self.duration_input()),
            ("creation_lead_time_input", self.creation_lead_time_input()),
            ("reminder_lead_time_input", self.reminder_lead_time_input()),
            ("work_schedule_save_button", self.work_schedule_save_button()),
            ("work_schedule_table", self.work_schedule_table()),
            ("work_schedule_name_column", self.work_schedule_name_column()),
            ("work_schedule_assigned_to_column", self.work_schedule_assigned_to_column()),
            ("work_schedule_frequency_column", self.work_schedule_frequency_column()),
            ("work_schedule_summary_column", self.work_schedule_summary_column()),
            ("work_schedule_name_cell", self.work_schedule_name_cell()),
            ("reports_tab", self.reports_tab()),
            ("new_report_button", self.new_report_button()),
            ("work_schedule_id_header", self.work_schedule_id_header()),
            ("create_report_modal_header", frame.create_report_modal_header()),
            ("report_type_category_list", frame.report_type_category_list()),
            ("report_type_table_header", frame.report_type_table_header()),
            ("search_report_types", frame.search_report_types()),
            ("report_type_row", frame.report_type_row(REPORT_TYPE)),
            ("start_report_button", frame.start_report_button()),
            ("report_type_badge", frame.report_type_badge(REPORT_TYPE)),
            ("run_report_button", frame.run_report_button()),
            ("report_table_cells", frame.report_table_cells()),
            ("work_schedule_column_header", frame.work_schedule_column_header()),
        ]
    }

    // =========================================================================
    // Change request list and form
    // =========================================================================

    pub fn change_requests_tab(&self) -> Locator {
        Locator::host(r#"a[title="Change Requests"]"#)
    }

    pub fn new_button(&self) -> Locator {
        Locator::host(r#"a[role="button"][title="New"]"#)
    }

    pub fn modal_header(&self) -> Locator {
        Locator::host(r#"h2:has-text("New Change Request")"#)
    }

    pub fn change_request_name_input(&self) -> Locator {
        Locator::host(r#"input[name="Name"]"#)
    }

    pub fn search_sites_input(&self) -> Locator {
        Locator::host(r#"input[role="combobox"][placeholder="Search Sites..."]"#)
    }

    pub fn change_request_title(&self) -> Locator {
        Locator::host(r#"slot[name="primaryField"].slds-page-header__title"#)
    }

    pub fn change_requests_table(&self) -> Locator {
        Locator::host(r#"[aria-label="Change Requests"]"#)
    }

    /// Work End, Status and Tracking # headers rendered side by side.
    pub fn specific_column_sequence(&self) -> Locator {
        Locator::host(r#"th[title="Work End"] + th[title="Status"] + th[title="Tracking #"]"#)
    }

    pub fn training_site_option(&self) -> Locator {
        Locator::host(
            r#"lightning-base-combobox-item:has(lightning-base-combobox-formatted-text[title="Training Site"])"#,
        )
    }

    pub fn brief_description_input(&self) -> Locator {
        Locator::host(r#"input[name="CFIM__Brief_Description__c"]"#)
    }

    pub fn is_template_checkbox(&self) -> Locator {
        Locator::host(r#"input[name="CFIM__Is_Template__c"]"#)
    }

    pub fn risk_classification_dropdown(&self) -> Locator {
        Locator::host(r#"button[aria-label="Risk Classification"]"#)
    }

    pub fn potential_impact_dropdown(&self) -> Locator {
        Locator::host(r#"button[aria-label="Potential Impact"]"#)
    }

    pub fn justification_dropdown(&self) -> Locator {
        Locator::host(r#"button[aria-label="Justification"]"#)
    }

    /// Option of whichever combobox is currently open, by its data value.
    pub fn combobox_option(&self, value: &str) -> Locator {
        Locator::host(&format!(
            r#"lightning-base-combobox-item[data-value="{}"]"#,
            value
        ))
    }

    pub fn low_risk_option(&self) -> Locator {
        self.combobox_option("Low Risk")
    }

    pub fn low_impact_option(&self) -> Locator {
        self.combobox_option("Level I - Low (No Impact is expected)")
    }

    pub fn maintenance_option(&self) -> Locator {
        self.combobox_option("Maintenance")
    }

    pub fn save_button(&self) -> Locator {
        Locator::host(r#"button[name="SaveEdit"]"#)
    }

    pub fn toast_message(&self) -> Locator {
        Locator::host(".toastMessage")
    }

    // =========================================================================
    // Work schedule dialog
    // =========================================================================

    pub fn new_work_schedule_button(&self) -> Locator {
        Locator::host(r#"header:has-text("Work Schedule") button:has-text("New")"#)
    }

    pub fn work_schedule_start_date(&self) -> Locator {
        Locator::host(r#"input[name="CFIM__Start_Date__c"]"#)
    }

    pub fn calendar_popup(&self) -> Locator {
        Locator::host("div.slds-datepicker")
    }

    pub fn calendar_today_button(&self) -> Locator {
        self.calendar_popup().child(r#"button:has-text("Today")"#)
    }

    pub fn work_schedule_option_radio(&self, value: &str) -> Locator {
        Locator::host(&format!(
            r#"input[type="radio"][name="_workSchedule.CFIM__Option__c"][value="{}"]"#,
            value
        ))
    }

    /// Only the enabled instance; a disabled twin is rendered for the
    /// unselected schedule option.
    pub fn every_years_input(&self) -> Locator {
        Locator::host(r#"input[name="CFIM__Every_Years__c"]:not([disabled])"#)
    }

    pub fn day_input(&self) -> Locator {
        Locator::host(r#"input[name="CFIM__Day__c"]"#)
    }

    pub fn duration_input(&self) -> Locator {
        Locator::host(r#"input[name="CFIM__Duration__c"]"#)
    }

    pub fn creation_lead_time_input(&self) -> Locator {
        Locator::host(r#"input[name="CFIM__Creation_Lead_Time_in_Days__c"]"#)
    }

    pub fn reminder_lead_time_input(&self) -> Locator {
        Locator::host(r#"input[name="CFIM__Reminder_Lead_Time_in_Days__c"]"#)
    }

    pub fn work_schedule_save_button(&self) -> Locator {
        Locator::host(r#"button[title="Save"]"#)
    }

    // =========================================================================
    // Work schedule related list
    // =========================================================================

    pub fn work_schedule_table(&self) -> Locator {
        Locator::host(r#"table[role="grid"]"#)
    }

    /// Sortable, visible header of the related list for the given column.
    pub fn work_schedule_column(&self, label: &str) -> Locator {
        Locator::host(&format!(
            r#"thead tr th[aria-label="{}"][aria-sort]:visible"#,
            label
        ))
    }

    pub fn work_schedule_name_column(&self) -> Locator {
        self.work_schedule_column("Name")
    }

    pub fn work_schedule_assigned_to_column(&self) -> Locator {
        self.work_schedule_column("Assigned to")
    }

    pub fn work_schedule_frequency_column(&self) -> Locator {
        self.work_schedule_column("Frequency")
    }

    pub fn work_schedule_summary_column(&self) -> Locator {
        self.work_schedule_column("Summary")
    }

    pub fn work_schedule_name_cell(&self) -> Locator {
        Locator::host(r#"th[data-label="Name"][data-col-key-value="Name-text-1"]"#)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub fn reports_tab(&self) -> Locator {
        Locator::host(r#"a[title="Reports"]"#)
    }

    pub fn new_report_button(&self) -> Locator {
        Locator::host(r#"a[title="New Report"]"#)
    }

    /// Identifier shown in the header of the record opened from a report cell.
    pub fn work_schedule_id_header(&self) -> Locator {
        Locator::host(r#"h1 slot[name="primaryField"] lightning-formatted-text"#)
    }
}
