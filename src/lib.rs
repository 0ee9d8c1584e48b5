//! Vehicle history lookup by VIN.
//!
//! Each VIN is submitted to a public VIN decoder page in a Firefox window
//! driven through a WebExtension. Once the results region renders, the page
//! is parsed into a [`VehicleRecord`] with five sections: decoded details,
//! additional info, recalls, complaints and image links.
//!
//! # Architecture
//!
//! - **Browser control**: Firefox loads a control extension that connects
//!   back to a loopback WebSocket server and runs `module.methodName`
//!   commands ([`browser`], [`driver`], [`protocol`], [`transport`]).
//! - **Lookup pipeline**: [`vin`] validation, a [`session`] per VIN, the
//!   [`poller`] waiting for results, [`extract`] parsing the rendered page,
//!   and [`report`] sequencing all of it over a batch.
//!
//! # Quick Start
//!
//! ```no_run
//! use vehicle_history_reports::{Driver, ReportConfig, Reporter, output};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let driver = Driver::builder()
//!         .binary("/usr/bin/firefox")
//!         .extension("./extension")
//!         .build()?;
//!
//!     let reporter = Reporter::new(driver, ReportConfig::new());
//!     let report = reporter.run(&["1HGCM82633A004352"]).await;
//!
//!     println!("{}", output::batch_to_json(&report.batch)?);
//!     if let Some(failure) = report.failure {
//!         eprintln!("{failure}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`vin`] | VIN validation |
//! | [`session`] | Browser session for one lookup |
//! | [`poller`] | Submission and results polling |
//! | [`extract`] | Section parsers over page HTML |
//! | [`report`] | Batch orchestration |
//! | [`record`] | Record and batch model |
//! | [`output`] | JSON rendering |
//! | [`logging`] | Log level and subscriber |
//! | [`browser`] | [`Window`], [`Tab`], [`Element`] |
//! | [`driver`] | Firefox launcher and profile |

// ============================================================================
// Modules
// ============================================================================

/// Browser entities: Window, Tab, Element.
pub mod browser;

/// Run configuration.
pub mod config;

/// Firefox launcher and profile setup.
///
/// Use [`Driver::builder()`] to create a configured driver instance.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Section parsers over report page HTML.
pub mod extract;

/// Type-safe identifiers for browser entities.
pub mod identifiers;

/// Log level and subscriber construction.
pub mod logging;

/// JSON rendering of records and batches.
pub mod output;

/// Page operations the lookup pipeline depends on.
pub mod page;

/// VIN submission and results polling.
pub mod poller;

/// WebSocket protocol message types.
///
/// Internal module defining command/response/event structures.
pub mod protocol;

/// Proxy settings.
pub mod proxy;

/// Vehicle record model.
pub mod record;

/// Batch orchestration.
pub mod report;

/// Browser session for one lookup.
pub mod session;

/// Report page markup constants.
pub mod site;

/// WebSocket transport layer.
///
/// Internal module handling the loopback server and connection.
pub mod transport;

/// VIN validation.
pub mod vin;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{By, Element, Key, Tab, Window, WindowBuilder};

// Driver types
pub use driver::{Driver, DriverBuilder, ExtensionSource, FirefoxOptions, Profile};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ElementId, FrameId, RequestId, SessionId, TabId};

// Lookup pipeline
pub use config::ReportConfig;
pub use page::{ReportPage, SessionLauncher};
pub use poller::{PagePoller, PollState};
pub use proxy::ProxyConfig;
pub use record::{FieldMap, ImageLinks, IncidentMap, ReportBatch, Section, VehicleRecord};
pub use report::{BatchFailure, BatchReport, Reporter, Stage};
pub use session::Session;
pub use vin::Vin;
