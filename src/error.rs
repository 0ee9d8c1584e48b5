//! Error types for vehicle history lookups.
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`].
//!
//! # Error Categories
//!
//! | Category | Variants | Handled at |
//! |----------|----------|------------|
//! | Input | [`Error::InvalidVin`] | per VIN |
//! | Readiness | [`Error::ElementNotFound`], [`Error::PageLoadTimeout`], [`Error::VehicleNotFound`] | per VIN, session closed |
//! | Extraction | [`Error::Extraction`] | per section, never aborts the VIN |
//! | Setup | [`Error::Config`], [`Error::Profile`], [`Error::FirefoxNotFound`], [`Error::ProcessLaunchFailed`] | per VIN |
//! | Control channel | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`], [`Error::Protocol`], [`Error::RequestTimeout`], [`Error::SessionClosed`] | per VIN |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] | caller |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::RequestId;
use crate::record::Section;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Input Errors
    // ========================================================================
    /// VIN does not have exactly 17 characters.
    #[error("Invalid VIN {vin:?}: expected 17 characters, got {length}")]
    InvalidVin {
        /// The rejected input.
        vin: String,
        /// Its length in characters.
        length: usize,
    },

    // ========================================================================
    // Readiness Errors
    // ========================================================================
    /// A required element never appeared within the wait timeout.
    #[error("Element not found: {selector} (waited {timeout_ms}ms)")]
    ElementNotFound {
        /// Locator that was waited on.
        selector: String,
        /// Milliseconds waited.
        timeout_ms: u64,
    },

    /// The results region stayed empty through every poll.
    #[error("Failed to retrieve VIN number information after {retries} retries")]
    PageLoadTimeout {
        /// Number of polls attempted.
        retries: u32,
    },

    /// The report page showed its "no information" banner.
    #[error("No vehicle information for {vin}: {message}")]
    VehicleNotFound {
        /// VIN that was looked up.
        vin: String,
        /// Banner text shown by the page.
        message: String,
    },

    // ========================================================================
    // Extraction Errors
    // ========================================================================
    /// A record section could not be parsed from the page.
    #[error("Failed to extract {section}: {message}")]
    Extraction {
        /// Section being extracted.
        section: Section,
        /// What went wrong.
        message: String,
    },

    // ========================================================================
    // Setup Errors
    // ========================================================================
    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Firefox profile creation or setup failed.
    #[error("Profile error: {message}")]
    Profile {
        /// Description of the profile error.
        message: String,
    },

    /// Firefox binary not found at path.
    #[error("Firefox not found at: {path}")]
    FirefoxNotFound {
        /// Path where Firefox was expected.
        path: PathBuf,
    },

    /// Failed to launch the Firefox process.
    #[error("Failed to launch Firefox: {message}")]
    ProcessLaunchFailed {
        /// Description of the launch failure.
        message: String,
    },

    // ========================================================================
    // Control Channel Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The extension did not connect within the timeout.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Protocol violation or error response from the extension.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// A command got no response in time.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The browser session was already closed.
    #[error("Session closed")]
    SessionClosed,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid VIN error.
    #[inline]
    pub fn invalid_vin(vin: impl Into<String>) -> Self {
        let vin = vin.into();
        let length = vin.chars().count();
        Self::InvalidVin { vin, length }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(selector: impl Into<String>, timeout_ms: u64) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
            timeout_ms,
        }
    }

    /// Creates a page load timeout error.
    #[inline]
    pub fn page_load_timeout(retries: u32) -> Self {
        Self::PageLoadTimeout { retries }
    }

    /// Creates a vehicle not found error.
    #[inline]
    pub fn vehicle_not_found(vin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::VehicleNotFound {
            vin: vin.into(),
            message: message.into(),
        }
    }

    /// Creates an extraction error for a section.
    #[inline]
    pub fn extraction(section: Section, message: impl Into<String>) -> Self {
        Self::Extraction {
            section,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a profile error.
    #[inline]
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile {
            message: message.into(),
        }
    }

    /// Creates a Firefox not found error.
    #[inline]
    pub fn firefox_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FirefoxNotFound { path: path.into() }
    }

    /// Creates a process launch failed error.
    #[inline]
    pub fn process_launch_failed(err: IoError) -> Self {
        Self::ProcessLaunchFailed {
            message: err.to_string(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error belongs to a single record section.
    #[inline]
    #[must_use]
    pub fn is_extraction_error(&self) -> bool {
        matches!(self, Self::Extraction { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
