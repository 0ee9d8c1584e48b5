//! Run configuration.
//!
//! [`ReportConfig`] collects everything a lookup run needs besides the
//! browser binary: where the report page lives, how long to wait, how often
//! to poll, and how the browser profile is set up.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use vehicle_history_reports::ReportConfig;
//!
//! let config = ReportConfig::new()
//!     .with_headless(false)
//!     .with_element_timeout(Duration::from_secs(30));
//!
//! assert_eq!(config.max_poll_retries, 10);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::proxy::ProxyConfig;
use crate::site;

// ============================================================================
// Constants
// ============================================================================

/// How long a single element wait may take.
pub const DEFAULT_ELEMENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Pause between two polls of the results region.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polls before giving up on the results region.
pub const DEFAULT_MAX_POLL_RETRIES: u32 = 10;

/// Pause between typing the VIN and pressing Enter.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// ReportConfig
// ============================================================================

/// Settings shared by every session in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Page the VIN is submitted on.
    pub report_url: String,

    /// Upper bound for each element wait.
    pub element_timeout: Duration,

    /// Delay between polls of the results region.
    pub poll_interval: Duration,

    /// Polls before [`crate::Error::PageLoadTimeout`].
    pub max_poll_retries: u32,

    /// Delay between typing the VIN and submitting it.
    pub submit_delay: Duration,

    /// Run Firefox without a visible window.
    pub headless: bool,

    /// Disable image loading in the browser profile.
    pub block_images: bool,

    /// Route browser traffic through this proxy.
    pub proxy: Option<ProxyConfig>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ReportConfig {
    /// Creates a configuration with the site defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            report_url: site::REPORT_URL.to_string(),
            element_timeout: DEFAULT_ELEMENT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_retries: DEFAULT_MAX_POLL_RETRIES,
            submit_delay: DEFAULT_SUBMIT_DELAY,
            headless: true,
            block_images: false,
            proxy: None,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ReportConfig {
    /// Overrides the report page URL.
    #[inline]
    #[must_use]
    pub fn with_report_url(mut self, url: impl Into<String>) -> Self {
        self.report_url = url.into();
        self
    }

    /// Sets the per-wait element timeout.
    #[inline]
    #[must_use]
    pub fn with_element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    /// Sets the delay between polls.
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the poll ceiling.
    #[inline]
    #[must_use]
    pub fn with_max_poll_retries(mut self, retries: u32) -> Self {
        self.max_poll_retries = retries;
        self
    }

    /// Sets the pause before pressing Enter.
    #[inline]
    #[must_use]
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    /// Enables or disables headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Enables or disables image loading.
    #[inline]
    #[must_use]
    pub fn with_block_images(mut self, block: bool) -> Self {
        self.block_images = block;
        self
    }

    /// Sets or clears the proxy.
    #[inline]
    #[must_use]
    pub fn with_proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.proxy = proxy;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.report_url, "https://driving-tests.org/vin-decoder/");
        assert_eq!(config.element_timeout, Duration::from_secs(60));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_poll_retries, 10);
        assert_eq!(config.submit_delay, Duration::from_secs(1));
        assert!(config.headless);
        assert!(!config.block_images);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let config = ReportConfig::new()
            .with_report_url("http://127.0.0.1:8000/")
            .with_poll_interval(Duration::ZERO)
            .with_max_poll_retries(3)
            .with_headless(false)
            .with_block_images(true)
            .with_proxy(Some(ProxyConfig::new("proxy.local", 3128)));

        assert_eq!(config.report_url, "http://127.0.0.1:8000/");
        assert_eq!(config.poll_interval, Duration::ZERO);
        assert_eq!(config.max_poll_retries, 3);
        assert!(!config.headless);
        assert!(config.block_images);
        assert_eq!(config.proxy.map(|p| p.port), Some(3128));
    }
}
