//! Firefox command-line options.
//!
//! # Example
//!
//! ```
//! use vehicle_history_reports::driver::FirefoxOptions;
//!
//! let options = FirefoxOptions::new().with_headless();
//! assert_eq!(options.to_args(), vec!["--headless"]);
//! ```

// ============================================================================
// FirefoxOptions
// ============================================================================

/// Process-level launch flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirefoxOptions {
    /// Run Firefox without a GUI.
    pub headless: bool,
}

impl FirefoxOptions {
    /// Creates options for a visible window.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { headless: false }
    }

    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Converts the options to Firefox arguments.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless".to_string());
        }
        args
    }
}

// ============================================================================
// Tests
// ============================================================================
