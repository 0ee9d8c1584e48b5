//! Page-ready poller.
//!
//! The decoder fills its results region asynchronously and gives no signal
//! when it is done, so readiness is polled:
//!
//! ```text
//! Submitting ──ok──▶ Waiting{0} ──text──▶ Done
//!     │                 │  ▲
//!     │            empty│  │sleep, retries+1
//!     │                 ▼  │
//!     └──error──▶ Failed ◀── banner / element missing / retries exhausted
//! ```
//!
//! Entering `Failed` closes the page before the error is returned.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, error, info, warn};

use crate::browser::{By, Key};
use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::extract::{element_text, selector};
use crate::page::ReportPage;
use crate::site;
use crate::vin::Vin;

static ERROR_BANNER: LazyLock<Selector> =
    LazyLock::new(|| selector(site::ERROR_BANNER_SELECTOR));

// ============================================================================
// PollState
// ============================================================================

/// Where a lookup is in the submit and wait cycle.
#[derive(Debug)]
pub enum PollState {
    /// Typing the VIN and submitting the form.
    Submitting,
    /// Waiting for the results region to fill.
    Waiting {
        /// Empty polls so far.
        retries: u32,
    },
    /// Results are on the page.
    Done,
    /// The lookup cannot continue.
    Failed(Error),
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitting => f.write_str("submitting"),
            Self::Waiting { retries } => write!(f, "waiting (retry {retries})"),
            Self::Done => f.write_str("done"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

// ============================================================================
// PagePoller
// ============================================================================

/// Submits a VIN and waits for the decoder's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePoller {
    element_timeout: Duration,
    poll_interval: Duration,
    max_poll_retries: u32,
    submit_delay: Duration,
}

impl PagePoller {
    /// Takes timing from `config`.
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            element_timeout: config.element_timeout,
            poll_interval: config.poll_interval,
            max_poll_retries: config.max_poll_retries,
            submit_delay: config.submit_delay,
        }
    }

    /// Drives `page` from [`PollState::Submitting`] to a terminal state.
    ///
    /// # Errors
    ///
    /// - [`Error::ElementNotFound`] if the VIN input or the results region
    ///   never appears
    /// - [`Error::VehicleNotFound`] if the page says it has no data
    /// - [`Error::PageLoadTimeout`] if the results stay empty through every poll
    ///
    /// The page is closed before any of these is returned.
    pub async fn run<P>(&self, page: &mut P, vin: &Vin) -> Result<()>
    where
        P: ReportPage + ?Sized,
    {
        let mut state = PollState::Submitting;

        loop {
            debug!(%vin, %state, "Poll step");
            state = match state {
                PollState::Submitting => match self.submit(page, vin).await {
                    Ok(()) => PollState::Waiting { retries: 0 },
                    Err(e) => PollState::Failed(e),
                },
                PollState::Waiting { retries } => self.poll(page, vin, retries).await,
                PollState::Done => {
                    info!(%vin, "Found VIN information");
                    return Ok(());
                }
                PollState::Failed(e) => {
                    error!(%vin, error = %e, "Lookup failed");
                    if let Err(close_err) = page.close().await {
                        warn!(%vin, error = %close_err, "Failed to close page");
                    }
                    return Err(e);
                }
            };
        }
    }

    async fn submit<P>(&self, page: &mut P, vin: &Vin) -> Result<()>
    where
        P: ReportPage + ?Sized,
    {
        let input = By::id(site::VIN_INPUT_ID);

        page.type_into(&input, vin.as_str(), self.element_timeout)
            .await?;
        tokio::time::sleep(self.submit_delay).await;

        info!(%vin, "Searching for VIN information");
        page.press_key(&input, Key::Enter, self.element_timeout)
            .await
    }

    async fn poll<P>(&self, page: &mut P, vin: &Vin, retries: u32) -> PollState
    where
        P: ReportPage + ?Sized,
    {
        if retries >= self.max_poll_retries {
            return PollState::Failed(Error::page_load_timeout(retries));
        }

        let results = By::xpath(site::RESULTS_XPATH);
        let text = match page.wait_for_text(&results, self.element_timeout).await {
            Ok(text) => text,
            Err(e) => return PollState::Failed(e),
        };
        if !text.trim().is_empty() {
            return PollState::Done;
        }

        match page.page_source().await {
            Ok(source) => {
                if let Some(banner) = no_information_banner(&source) {
                    warn!(%vin, %banner, "Report page has no information");
                    return PollState::Failed(Error::vehicle_not_found(vin.as_str(), banner));
                }
            }
            Err(e) => return PollState::Failed(e),
        }

        debug!(%vin, retries, "Results still empty");
        tokio::time::sleep(self.poll_interval).await;
        PollState::Waiting {
            retries: retries + 1,
        }
    }
}

/// Text of the error banner when it says the VIN has no data.
#[must_use]
pub fn no_information_banner(source: &str) -> Option<String> {
    let document = Html::parse_document(source);
    document
        .select(&ERROR_BANNER)
        .map(element_text)
        .find(|text| text.to_lowercase().contains(site::NO_INFORMATION_TEXT))
        .map(|text| text.trim().to_string())
}

// ============================================================================
// Tests
// ============================================================================
