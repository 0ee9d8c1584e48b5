//! Firefox launch.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Driver`] | Spawns windows from a validated binary and extension |
//! | [`DriverBuilder`] | Collects and validates the paths |
//! | [`FirefoxOptions`] | Process flags |
//! | [`Profile`] | Temporary profile with prefs and extension |
//! | [`ExtensionSource`] | Unpacked directory or packed `.xpi` |

// ============================================================================
// Submodules
// ============================================================================

/// Startup page template.
pub mod assets;

/// Driver builder.
pub mod builder;

/// Driver and window spawning.
pub mod core;

/// Firefox process flags.
pub mod options;

/// Temporary profiles.
pub mod profile;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::DriverBuilder;
pub use core::Driver;
pub use options::FirefoxOptions;
pub use profile::{ExtensionSource, Profile};
