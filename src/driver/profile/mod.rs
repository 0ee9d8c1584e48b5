//! Throwaway Firefox profile for one session.
//!
//! Each session gets a fresh temporary directory holding the control
//! extension and a `user.js`. The directory is removed when the
//! [`Profile`] is dropped.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{Error, Result};

pub mod extensions;
pub mod preferences;

pub use extensions::ExtensionSource;
pub use preferences::{FirefoxPreference, PreferenceValue};

// ============================================================================
// Constants
// ============================================================================

const USER_JS_HEADER: &str = "// Generated for a vehicle report session\n\n";

/// `permissions.default.image` value that denies every image load.
const BLOCK_ALL_IMAGES: i32 = 2;

// ============================================================================
// Profile
// ============================================================================

/// A temporary profile directory.
pub struct Profile {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl Profile {
    /// Creates an empty profile under the system temp directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the directory cannot be created.
    pub fn new_temp() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("vin-report-")
            .map_err(|e| Error::profile(format!("Failed to create temp profile: {e}")))?;
        let path = temp_dir.path().to_path_buf();

        debug!(path = %path.display(), "Created temporary profile");

        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    /// Profile directory.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ============================================================================
// Profile - Preferences
// ============================================================================

impl Profile {
    /// Writes `user.js`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the file cannot be written.
    pub fn write_prefs(&self, prefs: &[FirefoxPreference]) -> Result<()> {
        let file_path = self.path.join("user.js");

        let mut content = String::from(USER_JS_HEADER);
        for pref in prefs {
            content.push_str(&pref.to_user_pref_line());
            content.push('\n');
        }

        fs::write(&file_path, content).map_err(|e| {
            Error::profile(format!("Failed to write {}: {e}", file_path.display()))
        })?;

        debug!(pref_count = prefs.len(), "Wrote user.js");
        Ok(())
    }

    /// Preferences every session starts with.
    ///
    /// They let the unsigned control extension load, skip first-run UI and
    /// keep background traffic off the wire.
    #[must_use]
    pub fn default_prefs() -> Vec<FirefoxPreference> {
        use FirefoxPreference as Pref;
        use PreferenceValue as Val;

        vec![
            // Control extension
            Pref::new("xpinstall.signatures.required", Val::Bool(false))
                .with_comment("Load the unsigned control extension"),
            Pref::new("extensions.autoDisableScopes", Val::Int(0)),
            Pref::new(
                "security.data_uri.block_toplevel_data_uri_navigations",
                Val::Bool(false),
            )
            .with_comment("The init page is a data: URI"),
            // Startup
            Pref::new("browser.startup.page", Val::Int(0)),
            Pref::new("browser.shell.checkDefaultBrowser", Val::Bool(false)),
            Pref::new(
                "browser.startup.homepage_override.mstone",
                Val::String("ignore".into()),
            ),
            Pref::new("startup.homepage_welcome_url", Val::String(String::new())),
            Pref::new("browser.sessionstore.resume_from_crash", Val::Bool(false)),
            Pref::new("toolkit.startup.max_resumed_crashes", Val::Int(-1)),
            Pref::new("browser.warnOnQuit", Val::Bool(false)),
            Pref::new("browser.tabs.warnOnClose", Val::Bool(false)),
            Pref::new("browser.aboutConfig.showWarning", Val::Bool(false)),
            Pref::new("browser.uitour.enabled", Val::Bool(false)),
            // Telemetry and updates
            Pref::new("toolkit.telemetry.enabled", Val::Bool(false)),
            Pref::new("toolkit.telemetry.unified", Val::Bool(false)),
            Pref::new("toolkit.telemetry.server", Val::String(String::new())),
            Pref::new(
                "datareporting.policy.dataSubmissionEnabled",
                Val::Bool(false),
            ),
            Pref::new("datareporting.healthreport.uploadEnabled", Val::Bool(false)),
            Pref::new("app.update.service.enabled", Val::Bool(false)),
            Pref::new("extensions.update.enabled", Val::Bool(false)),
            Pref::new("app.normandy.enabled", Val::Bool(false)),
            // Background connections
            Pref::new("network.captive-portal-service.enabled", Val::Bool(false)),
            Pref::new("network.connectivity-service.enabled", Val::Bool(false)),
            Pref::new("network.prefetch-next", Val::Bool(false)),
            Pref::new("network.http.speculative-parallel-limit", Val::Int(0)),
            Pref::new("browser.safebrowsing.malware.enabled", Val::Bool(false)),
            Pref::new("browser.safebrowsing.phishing.enabled", Val::Bool(false)),
        ]
    }

    /// Preference that stops Firefox from loading images.
    #[must_use]
    pub fn block_images_pref() -> FirefoxPreference {
        FirefoxPreference::new(
            "permissions.default.image",
            PreferenceValue::Int(BLOCK_ALL_IMAGES),
        )
        .with_comment("Do not load images")
    }
}

// ============================================================================
// Profile - Extensions
// ============================================================================

impl Profile {
    /// Installs the control extension into `extensions/<gecko id>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] for a bad archive or manifest and
    /// [`Error::Io`] for copy failures.
    pub fn install_extension(&self, source: &ExtensionSource) -> Result<()> {
        debug!(
            path = %source.path().display(),
            packed = source.is_packed(),
            "Installing extension"
        );

        match source {
            ExtensionSource::Unpacked(path) => self.install_unpacked(path),
            ExtensionSource::Packed(path) => self.install_packed(path),
        }
    }

    fn install_unpacked(&self, src: &Path) -> Result<()> {
        let extension_id = read_manifest_id(src)?;
        let dest = self.path.join("extensions").join(&extension_id);

        copy_dir_recursive(src, &dest)?;

        debug!(%extension_id, "Installed extension");
        Ok(())
    }

    fn install_packed(&self, src: &Path) -> Result<()> {
        let file = fs::File::open(src)?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| Error::profile(format!("Invalid extension archive: {e}")))?;

        let extracted = TempDir::new()?;
        archive
            .extract(extracted.path())
            .map_err(|e| Error::profile(format!("Failed to extract extension: {e}")))?;

        self.install_unpacked(extracted.path())
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

/// Reads the gecko id from `manifest.json`.
fn read_manifest_id(dir: &Path) -> Result<String> {
    let manifest_path = dir.join("manifest.json");
    let content = fs::read_to_string(&manifest_path).map_err(|e| {
        Error::profile(format!(
            "Extension manifest not found at {}: {e}",
            manifest_path.display()
        ))
    })?;

    let json: Value = serde_json::from_str(&content)
        .map_err(|e| Error::profile(format!("Invalid manifest.json: {e}")))?;

    ["/browser_specific_settings/gecko/id", "/applications/gecko/id"]
        .iter()
        .find_map(|pointer| json.pointer(pointer).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| Error::profile("Extension manifest missing 'gecko.id' field"))
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dst_path = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &dst_path)?;
        } else {
            fs::copy(entry.path(), &dst_path)?;
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
