use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::document::Document;
use crate::error::HarnessError;
use crate::locator::locator_model::{Locator, Scope};
use crate::locator::report_builder::ReportBuilderLocators;
use crate::wait::conditions::{wait_for_quiescence, wait_for_state, ElementState};

/// Instances of the sort header the report must render: one for the
/// grouping row, one for the sortable column.
pub const REQUIRED_HEADER_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    pub quiescence_timeout: Duration,
    pub header_timeout: Duration,
    /// Fixed wait after re-sorting; the grid emits no signal when done
    pub settle_delay: Duration,
    pub first_cell_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            quiescence_timeout: Duration::from_secs(30),
            header_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(10),
            first_cell_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// What a scan found. Absence is an ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Found {
        /// Zero-based position in row-major cell order
        cell_index: usize,
        text: String,
        link_activated: bool,
    },
    NotFound {
        cells_scanned: usize,
    },
}

impl ScanOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ScanOutcome::Found { .. })
    }
}

/// Searches the report-builder grid for a token.
#[derive(Debug, Clone)]
pub struct ReportScanner {
    frame: ReportBuilderLocators,
    settings: ScanSettings,
}

impl ReportScanner {
    pub fn new(frame: ReportBuilderLocators, settings: ScanSettings) -> Self {
        ReportScanner { frame, settings }
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Look for `target` in the report grid and follow the link of the first
    /// cell containing it.
    ///
    /// Cells are read in row-major order and the first cell whose text
    /// contains `target` wins. A report rendering fewer than two sort headers
    /// fails with [`HarnessError::Structural`] before any cell is read.
    pub fn locate(&self, doc: &mut dyn Document, target: &str) -> Result<ScanOutcome, HarnessError> {
        self.settle(doc)?;

        // Quiescence says nothing about paint: give the duplicated header
        // time to attach before judging the report's shape.
        let header = self.frame.work_schedule_column_header();
        let sort_header = header.nth(1);
        if let Err(e) = wait_for_state(
            doc,
            &sort_header,
            &ElementState::Attached,
            self.settings.header_timeout,
            self.settings.poll_interval,
        ) {
            if !e.is_timeout() {
                return Err(e);
            }
        }

        let header_count = doc.count(&header)?;
        if header_count < REQUIRED_HEADER_COUNT {
            return Err(HarnessError::Structural(format!(
                "expected at least {} instances of {}, found {}",
                REQUIRED_HEADER_COUNT,
                header.describe(),
                header_count
            )));
        }

        wait_for_state(
            doc,
            &sort_header,
            &ElementState::Visible,
            self.settings.header_timeout,
            self.settings.poll_interval,
        )?;

        self.force_materialization(doc, &sort_header)?;

        doc.pause(self.settings.settle_delay)?;
        self.settle(doc)?;

        let cells = self.frame.report_table_cells();
        let texts = self.collect_cells(doc, &cells)?;
        info!(cells = texts.len(), "report grid collected");

        for (index, text) in texts.iter().enumerate() {
            debug!(cell = index + 1, %text, "report cell");
            if text.contains(target) {
                info!(cell = index + 1, token = target, "target found in report");
                let link_activated = self.activate_link(doc, &cells.nth(index))?;
                return Ok(ScanOutcome::Found {
                    cell_index: index,
                    text: text.clone(),
                    link_activated,
                });
            }
        }

        info!(token = target, cells_scanned = texts.len(), "target not found in report");
        Ok(ScanOutcome::NotFound {
            cells_scanned: texts.len(),
        })
    }

    /// Toggle the sort header twice, waiting for the network after each.
    ///
    /// The grid renders the schedule column lazily per sort state and one
    /// toggle can leave it empty; the second toggle forces every value to
    /// render. This works around a rendering quirk of the report builder and
    /// is kept apart from the scan so it can be dropped on its own.
    pub fn force_materialization(&self, doc: &mut dyn Document, sort_header: &Locator) -> Result<(), HarnessError> {
        for toggle in 1..=2 {
            doc.click(sort_header)?;
            debug!(toggle, header = %sort_header.describe(), "sort toggled");
            wait_for_quiescence(doc, &Scope::Host, self.settings.quiescence_timeout)?;
        }
        Ok(())
    }

    /// Host first, then the report frame: the frame loads on its own
    /// schedule.
    fn settle(&self, doc: &mut dyn Document) -> Result<(), HarnessError> {
        wait_for_quiescence(doc, &Scope::Host, self.settings.quiescence_timeout)?;
        wait_for_quiescence(doc, self.frame.scope(), self.settings.quiescence_timeout)
    }

    /// Text of every data cell, read fresh.
    ///
    /// An empty grid never shows a first cell; that timeout is treated as an
    /// empty result when the grid indeed holds no cells.
    fn collect_cells(&self, doc: &mut dyn Document, cells: &Locator) -> Result<Vec<String>, HarnessError> {
        if let Err(e) = wait_for_state(
            doc,
            &cells.first(),
            &ElementState::Visible,
            self.settings.first_cell_timeout,
            self.settings.poll_interval,
        ) {
            if !e.is_timeout() || doc.count(cells)? > 0 {
                return Err(e);
            }
            warn!(grid = %cells.describe(), "report grid is empty");
            return Ok(Vec::new());
        }

        let total = doc.count(cells)?;
        let mut texts = Vec::with_capacity(total);
        for index in 0..total {
            // A cell detached by a late re-render reads as empty
            let text = doc.inner_text(&cells.nth(index))?.unwrap_or_default();
            texts.push(text);
        }
        Ok(texts)
    }

    fn activate_link(&self, doc: &mut dyn Document, cell: &Locator) -> Result<bool, HarnessError> {
        let link = cell.child("a");
        let visible = doc.probe(&link)?.is_some_and(|s| s.visible);
        if visible {
            doc.click(&link)?;
            info!(link = %link.describe(), "followed link in matching cell");
        } else {
            warn!(cell = %cell.describe(), "no visible link in matching cell");
        }
        Ok(visible)
    }
}
