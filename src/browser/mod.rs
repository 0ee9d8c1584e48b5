//! Browser entities.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Window`] | Firefox process, profile and control connection |
//! | [`Tab`] | A tab and frame context commands are sent to |
//! | [`Element`] | Handle to a DOM element held by the extension |
//! | [`By`] | Element locator |
//! | [`Key`] | Control key for `input.typeKey` |
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use vehicle_history_reports::{By, Driver, Result};
//!
//! # async fn example() -> Result<()> {
//! let driver = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .extension("./extension")
//!     .build()?;
//!
//! let window = driver.window().headless().spawn().await?;
//! let tab = window.tab();
//!
//! tab.goto("https://driving-tests.org/vin-decoder/").await?;
//! let input = tab
//!     .wait_for_element_timeout(&By::id("vin_input"), Duration::from_secs(60))
//!     .await?;
//! input.type_text("1HGCM82633A004352").await?;
//! window.close().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// DOM element interaction.
pub mod element;

/// Control keys.
pub mod keyboard;

/// Element locators.
pub mod selector;

/// Tab-level commands.
pub mod tab;

/// Firefox window lifecycle.
pub mod window;

// ============================================================================
// Re-exports
// ============================================================================

pub use element::Element;
pub use keyboard::Key;
pub use selector::By;
pub use tab::Tab;
pub use window::{Window, WindowBuilder};
