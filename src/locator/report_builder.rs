use crate::locator::locator_model::{Locator, Scope};

pub const REPORT_BUILDER_FRAME: &str = "Report Builder";
pub const REPORT_BUILDER_SELECTOR: &str = r#"iframe[title="Report Builder"]"#;

/// Report type the workflow builds its report from.
pub const REPORT_TYPE: &str = "Work Schedules with Change Request";

/// Locators scoped to the report-builder `<iframe>`.
///
/// The frame loads independently of the host page, so callers wait on
/// [`ReportBuilderLocators::scope`] before querying through this resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBuilderLocators {
    scope: Scope,
}

impl Default for ReportBuilderLocators {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilderLocators {
    pub fn new() -> Self {
        ReportBuilderLocators {
            scope: Scope::frame(REPORT_BUILDER_FRAME, REPORT_BUILDER_SELECTOR),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Any selector inside the frame.
    pub fn locator(&self, css: &str) -> Locator {
        Locator::new(self.scope.clone(), css)
    }

    pub fn create_report_modal_header(&self) -> Locator {
        self.locator("#dialog-heading")
    }

    pub fn report_type_category_list(&self) -> Locator {
        self.locator(r#"ul[role="listbox"] > li.slds-nav-vertical__item"#)
    }

    pub fn report_type_table_header(&self) -> Locator {
        self.locator(r#"tr:has(th:has-text("Report Type Name"))"#)
    }

    pub fn search_report_types(&self) -> Locator {
        self.locator("#modal-search-input")
    }

    /// Row of the report-type picker whose title cell reads `report_type`.
    pub fn report_type_row(&self, report_type: &str) -> Locator {
        self.locator("tr.datarow.reportBuilder")
            .with_descendant(self.locator("p.slds-truncate").with_text(report_type))
    }

    pub fn start_report_button(&self) -> Locator {
        self.locator("#start-report-btn")
    }

    pub fn report_type_badge(&self, report_type: &str) -> Locator {
        self.locator("span.slds-badge.dash-tag").with_text(report_type)
    }

    pub fn run_report_button(&self) -> Locator {
        self.locator("button.slds-button_brand.action-bar-action-runReport")
            .with_text("Run")
    }

    pub fn report_table_cells(&self) -> Locator {
        self.locator("td.data-grid-table-cell")
    }

    /// Schedule number header. The grid renders it twice: once for the
    /// grouping row and once for the sortable column.
    pub fn work_schedule_column_header(&self) -> Locator {
        self.locator(
            r#"div.wave-table-cell-measure-header span[title="Work Schedule: Info : Work Schedule: Schedule #"]"#,
        )
    }
}
