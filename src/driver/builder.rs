//! Builder for [`Driver`].
//!
//! ```no_run
//! use vehicle_history_reports::Driver;
//!
//! # fn example() -> vehicle_history_reports::Result<()> {
//! let driver = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .extension("./extension")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use crate::error::{Error, Result};

use super::core::Driver;
use super::profile::ExtensionSource;

// ============================================================================
// DriverBuilder
// ============================================================================

/// Collects the Firefox binary and control extension paths.
#[derive(Debug, Default, Clone)]
pub struct DriverBuilder {
    binary: Option<PathBuf>,
    extension: Option<ExtensionSource>,
}

impl DriverBuilder {
    /// Creates an empty builder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Firefox executable.
    #[inline]
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Sets the control extension. A directory is installed unpacked, a file
    /// is treated as an `.xpi` archive.
    #[inline]
    #[must_use]
    pub fn extension(mut self, path: impl Into<PathBuf>) -> Self {
        self.extension = Some(ExtensionSource::from(path.into()));
        self
    }

    /// Validates both paths and creates the driver.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if binary or extension is not set
    /// - [`Error::FirefoxNotFound`] if the binary does not exist
    /// - [`Error::Config`] if the extension does not exist
    pub fn build(self) -> Result<Driver> {
        let binary = self.validate_binary()?;
        let extension = self.validate_extension()?;

        Ok(Driver::new(binary, extension))
    }

    fn validate_binary(&self) -> Result<PathBuf> {
        let binary = self.binary.clone().ok_or_else(|| {
            Error::config("Firefox binary path is required (--firefox or FIREFOX_BINARY)")
        })?;

        if !binary.exists() {
            return Err(Error::firefox_not_found(binary));
        }

        Ok(binary)
    }

    fn validate_extension(&self) -> Result<ExtensionSource> {
        let extension = self.extension.clone().ok_or_else(|| {
            Error::config("Control extension is required (--extension or VIN_SCRAPER_EXTENSION)")
        })?;

        if !extension.path().exists() {
            return Err(Error::config(format!(
                "Extension not found at: {}",
                extension.path().display()
            )));
        }

        Ok(extension)
    }
}

// ============================================================================
// Tests
// ============================================================================
