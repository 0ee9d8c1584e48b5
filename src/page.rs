//! The seam between lookup logic and the browser.
//!
//! [`PagePoller`](crate::PagePoller) and [`Reporter`](crate::Reporter) talk
//! to a [`ReportPage`] and obtain pages from a [`SessionLauncher`]. The
//! Firefox-backed implementations are [`Session`](crate::Session) and
//! [`Driver`](crate::Driver).

use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{By, Key};
use crate::config::ReportConfig;
use crate::error::Result;

/// One open report page.
#[async_trait]
pub trait ReportPage: Send {
    /// Waits up to `timeout` for `by` and types `text` into it.
    async fn type_into(&mut self, by: &By, text: &str, timeout: Duration) -> Result<()>;

    /// Waits up to `timeout` for `by` and presses `key` on it.
    async fn press_key(&mut self, by: &By, key: Key, timeout: Duration) -> Result<()>;

    /// Waits up to `timeout` for `by` and returns its text.
    async fn wait_for_text(&mut self, by: &By, timeout: Duration) -> Result<String>;

    /// Current serialized DOM.
    async fn page_source(&mut self) -> Result<String>;

    /// URL currently loaded.
    async fn current_url(&mut self) -> Result<String>;

    /// Tears the page down. Calling it again does nothing.
    async fn close(&mut self) -> Result<()>;
}

/// Opens report pages.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    /// Page type handed out by [`SessionLauncher::open`].
    type Page: ReportPage;

    /// Opens a page on `config.report_url`.
    async fn open(&self, config: &ReportConfig) -> Result<Self::Page>;
}
