//! Browser session for one VIN lookup.
//!
//! A [`Session`] is one Firefox window parked on the report page. It is the
//! only owner of the Firefox process: [`Session::close`] is the one place
//! the process is killed.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::browser::{By, Key, Tab, Window};
use crate::config::ReportConfig;
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::page::{ReportPage, SessionLauncher};

// ============================================================================
// Constants
// ============================================================================

/// Upper bound for the best-effort tab close during teardown.
const TAB_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Session
// ============================================================================

/// An open report page backed by Firefox.
#[derive(Debug)]
pub struct Session {
    window: Window,
    tab: Tab,
    closed: bool,
}

impl Session {
    /// Launches Firefox per `config` and navigates to the report page.
    ///
    /// # Errors
    ///
    /// Returns launch errors from [`Driver`], or the navigation error after
    /// the window has been closed.
    pub async fn open(driver: &Driver, config: &ReportConfig) -> Result<Self> {
        let mut builder = driver.window().block_images(config.block_images);
        if config.headless {
            builder = builder.headless();
        }
        if let Some(proxy) = &config.proxy {
            info!(proxy = ?proxy, "Accessing report page through proxy");
            builder = builder.proxy(proxy.clone());
        }

        let window = builder.spawn().await?;
        Self::start(window, &config.report_url).await
    }

    /// Loads `url` in the window's first tab. The window is closed if
    /// navigation fails.
    async fn start(window: Window, url: &str) -> Result<Self> {
        let tab = window.tab();

        info!(%url, "Opening report page");
        if let Err(e) = tab.goto(url).await {
            warn!(%url, error = %e, "Navigation failed");
            window.close().await;
            return Err(e);
        }
        info!(%url, pid = window.pid(), "Report page opened");

        Ok(Self {
            window,
            tab,
            closed: false,
        })
    }

    /// The tab the report page is loaded in.
    #[inline]
    #[must_use]
    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    /// Firefox process id.
    #[inline]
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.window.pid()
    }

    /// Returns `true` once [`Session::close`] has run.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes the tab, then kills Firefox and waits for it to exit.
    ///
    /// Only the first call does anything. A tab that cannot be closed is
    /// logged and does not stop the process teardown.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature leaves room for teardown errors.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            debug!("Session already closed");
            return Ok(());
        }
        self.closed = true;

        info!(pid = self.window.pid(), "Closing the browser");
        match tokio::time::timeout(TAB_CLOSE_TIMEOUT, self.tab.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to close tab"),
            Err(_) => warn!(
                timeout_ms = TAB_CLOSE_TIMEOUT.as_millis() as u64,
                "Tab close timed out"
            ),
        }

        self.window.close().await;
        info!("Browser closed");
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::SessionClosed);
        }
        Ok(())
    }
}

// ============================================================================
// ReportPage
// ============================================================================

#[async_trait]
impl ReportPage for Session {
    async fn type_into(&mut self, by: &By, text: &str, timeout: Duration) -> Result<()> {
        self.ensure_open()?;
        let element = self.tab.wait_for_element_timeout(by, timeout).await?;
        element.type_text(text).await
    }

    async fn press_key(&mut self, by: &By, key: Key, timeout: Duration) -> Result<()> {
        self.ensure_open()?;
        let element = self.tab.wait_for_element_timeout(by, timeout).await?;
        element.press(key).await
    }

    async fn wait_for_text(&mut self, by: &By, timeout: Duration) -> Result<String> {
        self.ensure_open()?;
        let element = self.tab.wait_for_element_timeout(by, timeout).await?;
        element.text().await
    }

    async fn page_source(&mut self) -> Result<String> {
        self.ensure_open()?;
        self.tab.page_source().await
    }

    async fn current_url(&mut self) -> Result<String> {
        self.ensure_open()?;
        self.tab.current_url().await
    }

    async fn close(&mut self) -> Result<()> {
        Session::close(self).await
    }
}

// ============================================================================
// SessionLauncher
// ============================================================================

#[async_trait]
impl SessionLauncher for Driver {
    type Page = Session;

    async fn open(&self, config: &ReportConfig) -> Result<Session> {
        Session::open(self, config).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::site;
    use crate::testing::{FakeExtension, process_exists, sleeper};

    const CLOSE_TAB: &str = "browsingContext.closeTab";
    const NAVIGATE: &str = "browsingContext.navigate";

    #[tokio::test]
    async fn test_close_twice_tears_down_once() {
        let (window, extension) = FakeExtension::window(sleeper(), &[]).await;
        let pid = window.pid().expect("pid");
        let mut session = Session::start(window, site::REPORT_URL)
            .await
            .expect("navigated");

        let source = session.page_source().await.expect("page source");
        assert_eq!(source, "<html><body></body></html>");
        assert!(process_exists(pid));

        session.close().await.expect("close");
        assert!(session.is_closed());
        assert!(!process_exists(pid));
        assert_eq!(extension.count(CLOSE_TAB), 1);

        session.close().await.expect("second close");
        assert_eq!(extension.count(CLOSE_TAB), 1);

        let err = session.page_source().await.expect_err("closed session");
        assert!(matches!(err, Error::SessionClosed));
    }

    #[tokio::test]
    async fn test_tab_close_error_still_kills_firefox() {
        let (window, extension) = FakeExtension::window(sleeper(), &[CLOSE_TAB]).await;
        let pid = window.pid().expect("pid");
        let mut session = Session::start(window, site::REPORT_URL)
            .await
            .expect("navigated");

        session.close().await.expect("close is best effort");

        assert!(session.is_closed());
        assert!(!process_exists(pid));
        assert_eq!(extension.count(CLOSE_TAB), 1);
    }

    #[tokio::test]
    async fn test_unanswered_tab_close_times_out_and_kills_firefox() {
        let (window, extension) = FakeExtension::unanswered(sleeper(), &[CLOSE_TAB]).await;
        let pid = window.pid().expect("pid");
        let mut session = Session::start(window, site::REPORT_URL)
            .await
            .expect("navigated");

        let started = std::time::Instant::now();
        session.close().await.expect("close is best effort");

        assert!(started.elapsed() >= TAB_CLOSE_TIMEOUT);
        assert!(started.elapsed() < TAB_CLOSE_TIMEOUT * 2);
        assert!(session.is_closed());
        assert!(!process_exists(pid));
        assert_eq!(extension.count(CLOSE_TAB), 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_closes_window() {
        let (window, extension) = FakeExtension::window(sleeper(), &[NAVIGATE]).await;
        let pid = window.pid().expect("pid");
        let handle = window.clone();

        let err = Session::start(window, site::REPORT_URL)
            .await
            .expect_err("navigation rejected");

        assert!(matches!(err, Error::Protocol { .. }));
        assert!(handle.is_closed());
        assert!(!process_exists(pid));
        assert_eq!(extension.methods(), vec![NAVIGATE.to_string()]);
    }

    #[test]
    fn test_session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Session>();
    }

    #[test]
    fn test_driver_is_a_launcher() {
        fn assert_launcher<L: SessionLauncher<Page = Session>>() {}
        assert_launcher::<Driver>();
    }
}
