//! Batch orchestration.
//!
//! For every VIN, in order: validate, open a page, wait for results, run
//! each section routine, record, close. Section failures are logged and
//! leave that section partial. Any other failure ends the batch; the records
//! finished before it are kept.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use thiserror::Error as ThisError;
use tracing::{Instrument, error, info, info_span, warn};

use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::extract;
use crate::page::{ReportPage, SessionLauncher};
use crate::poller::PagePoller;
use crate::record::{ReportBatch, Section, VehicleRecord};
use crate::vin::Vin;

// ============================================================================
// Stage
// ============================================================================

/// Step of a lookup that can end the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Checking the VIN.
    Validate,
    /// Launching the browser and loading the report page.
    Open,
    /// Submitting the VIN and waiting for results.
    Poll,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validate => "validate",
            Self::Open => "open",
            Self::Poll => "poll",
        })
    }
}

// ============================================================================
// BatchFailure / BatchReport
// ============================================================================

/// The error that stopped a batch.
#[derive(Debug, ThisError)]
#[error("VIN {vin} failed at {stage}: {error}")]
pub struct BatchFailure {
    /// Input as given, possibly not a valid VIN.
    pub vin: String,
    /// Step that failed.
    pub stage: Stage,
    /// Underlying error.
    #[source]
    pub error: Error,
}

/// Outcome of [`Reporter::run`].
#[derive(Debug)]
pub struct BatchReport {
    /// Records completed before any failure, in request order.
    pub batch: ReportBatch,
    /// Why the batch stopped early, if it did.
    pub failure: Option<BatchFailure>,
}

impl BatchReport {
    /// Returns `true` if every requested VIN produced a record.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Runs lookups for a list of VINs, one browser session at a time.
pub struct Reporter<L> {
    launcher: L,
    config: ReportConfig,
    poller: PagePoller,
}

impl<L: SessionLauncher> Reporter<L> {
    /// Creates a reporter that opens pages through `launcher`.
    pub fn new(launcher: L, config: ReportConfig) -> Self {
        let poller = PagePoller::from_config(&config);
        Self {
            launcher,
            config,
            poller,
        }
    }

    /// Run configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Looks up every VIN in order and stops at the first failure.
    pub async fn run<S: AsRef<str>>(&self, vins: &[S]) -> BatchReport {
        let mut batch = ReportBatch::new();

        for input in vins {
            let input = input.as_ref();
            let span = info_span!("vin", vin = %input);

            match self.lookup(input).instrument(span).await {
                Ok(record) => batch.push(record),
                Err(failure) => {
                    error!(
                        vin = %failure.vin,
                        stage = %failure.stage,
                        error = %failure.error,
                        completed = batch.len(),
                        "Stopping batch"
                    );
                    return BatchReport {
                        batch,
                        failure: Some(failure),
                    };
                }
            }
        }

        info!(count = batch.len(), "Batch complete");
        BatchReport {
            batch,
            failure: None,
        }
    }

    async fn lookup(&self, input: &str) -> std::result::Result<VehicleRecord, BatchFailure> {
        let fail = |stage, error| BatchFailure {
            vin: input.to_string(),
            stage,
            error,
        };

        let vin = Vin::parse(input).map_err(|e| fail(Stage::Validate, e))?;
        let mut page = self
            .launcher
            .open(&self.config)
            .await
            .map_err(|e| fail(Stage::Open, e))?;

        if let Err(e) = self.poller.run(&mut page, &vin).await {
            close_page(&mut page).await;
            return Err(fail(Stage::Poll, e));
        }

        let record = extract_record(&mut page, vin).await;
        close_page(&mut page).await;
        Ok(record)
    }
}

/// Runs every section routine on a fresh snapshot of `page`.
///
/// A malformed section is skipped. A page that can no longer be read ends
/// extraction; sections read so far are kept.
async fn extract_record<P: ReportPage>(page: &mut P, vin: Vin) -> VehicleRecord {
    let mut record = VehicleRecord::new(vin);

    for section in Section::ALL {
        match extract_section(page, section, &mut record).await {
            Ok(()) => info!(%section, "Section extracted"),
            Err(e) if e.is_extraction_error() => {
                warn!(vin = %record.vin, %section, error = %e, "Section extraction failed");
            }
            Err(e) => {
                error!(
                    vin = %record.vin,
                    %section,
                    error = %e,
                    "Page unreadable, skipping remaining sections"
                );
                break;
            }
        }
    }

    record
}

async fn extract_section<P: ReportPage>(
    page: &mut P,
    section: Section,
    record: &mut VehicleRecord,
) -> Result<()> {
    let source = page.page_source().await?;
    let page_url = match section {
        Section::Images => page.current_url().await?,
        _ => String::new(),
    };
    extract::extract_section(section, &source, &page_url, record)
}

async fn close_page<P: ReportPage>(page: &mut P) {
    if let Err(e) = page.close().await {
        warn!(error = %e, "Failed to close page");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::testing::{HONDA_PAGE, MockLauncher, PageScript, fast_config};

    const HONDA: &str = "1HGCM82633A004352";
    const ACURA: &str = "JH4KA8260MC000000";

    fn honda_page() -> PageScript {
        PageScript::ready("Honda Accord").with_source(HONDA_PAGE)
    }

    fn reporter(scripts: Vec<Option<PageScript>>) -> Reporter<MockLauncher> {
        Reporter::new(MockLauncher::new(scripts), fast_config())
    }

    #[tokio::test]
    async fn test_single_vin_record() {
        let reporter = reporter(vec![Some(honda_page())]);

        let report = reporter.run(&[HONDA]).await;

        assert!(report.is_complete());
        assert_eq!(report.batch.len(), 1);
        let record = &report.batch.records()[0];
        assert_eq!(record.vin.as_str(), HONDA);
        assert_eq!(
            serde_json::to_value(record).expect("serialize"),
            json!({
                "decoded_details": {"Make": "Honda", "Model": "Accord"},
                "additional_info": {},
                "recalls": {},
                "complaints": {},
                "images": {"vehicle_logo": "", "vehicle_images": []}
            })
        );

        let logs = reporter.launcher.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].sources, Section::ALL.len());
        assert_eq!(logs[0].closes, 1);
    }

    #[tokio::test]
    async fn test_bad_recall_row_keeps_first_incident() {
        let source = HONDA_PAGE.replace(
            r#"<div id="recalls"></div>"#,
            r#"<div id="recalls"><table>
                <tbody><tr><td>Component</td><td>AIR BAGS</td></tr></tbody>
                <tbody><tr><td>Component</td><td>FUEL</td><td>extra</td></tr></tbody>
            </table></div>"#,
        );
        let reporter = reporter(vec![Some(
            PageScript::ready("Honda Accord").with_source(&source),
        )]);

        let report = reporter.run(&[HONDA]).await;

        assert!(report.is_complete());
        let record = &report.batch.records()[0];
        assert_eq!(
            record.recalls.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["recalls_1"]
        );
        assert_eq!(record.decoded_details.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_page_keeps_every_section() {
        let reporter = reporter(vec![Some(
            PageScript::ready("Honda Accord").with_source("<html><body></body></html>"),
        )]);

        let report = reporter.run(&[HONDA]).await;

        assert!(report.is_complete());
        let value = serde_json::to_value(&report.batch.records()[0]).expect("serialize");
        assert_eq!(value.as_object().map(|o| o.len()), Some(5));
    }

    #[tokio::test]
    async fn test_unreadable_page_skips_remaining_sections() {
        let reporter = reporter(vec![Some(
            PageScript::ready("Honda Accord").with_unreadable_source(),
        )]);

        let report = reporter.run(&[HONDA]).await;

        assert!(report.is_complete());
        let record = &report.batch.records()[0];
        assert!(record.decoded_details.is_empty());
        assert!(record.images.vehicle_images.is_empty());

        let logs = reporter.launcher.logs();
        assert_eq!(logs[0].sources, 1);
        assert_eq!(logs[0].closes, 1);
    }

    #[tokio::test]
    async fn test_invalid_vin_stops_batch() {
        let reporter = reporter(vec![Some(honda_page()), Some(honda_page())]);

        let report = reporter.run(&[HONDA, "SHORT", ACURA]).await;

        assert_eq!(report.batch.len(), 1);
        let failure = report.failure.expect("batch stopped");
        assert_eq!(failure.vin, "SHORT");
        assert_eq!(failure.stage, Stage::Validate);
        assert!(matches!(failure.error, Error::InvalidVin { length: 5, .. }));
        assert_eq!(reporter.launcher.logs().len(), 1);
    }

    #[tokio::test]
    async fn test_poll_timeout_keeps_earlier_records() {
        let never_ready = PageScript::ready("").with_results([""]);
        let reporter = reporter(vec![Some(honda_page()), Some(never_ready)]);

        let report = reporter.run(&[HONDA, ACURA]).await;

        assert_eq!(report.batch.len(), 1);
        assert_eq!(report.batch.records()[0].vin.as_str(), HONDA);
        let failure = report.failure.expect("batch stopped");
        assert_eq!(failure.stage, Stage::Poll);
        assert!(matches!(failure.error, Error::PageLoadTimeout { retries: 10 }));
        assert_eq!(
            failure.to_string(),
            "VIN JH4KA8260MC000000 failed at poll: \
             Failed to retrieve VIN number information after 10 retries"
        );

        let logs = reporter.launcher.logs();
        assert_eq!(logs[1].closes, 1);
    }

    #[tokio::test]
    async fn test_launch_failure() {
        let reporter = reporter(vec![None]);

        let report = reporter.run(&[HONDA]).await;

        assert!(report.batch.is_empty());
        let failure = report.failure.expect("launch failed");
        assert_eq!(failure.stage, Stage::Open);
        assert!(matches!(failure.error, Error::ProcessLaunchFailed { .. }));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let reporter = reporter(Vec::new());
        let report = reporter.run::<&str>(&[]).await;
        assert!(report.is_complete());
        assert!(report.batch.is_empty());
    }
}
