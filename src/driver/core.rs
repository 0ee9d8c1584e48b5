//! Firefox launcher.
//!
//! A [`Driver`] holds the validated binary and extension paths and spawns
//! one [`Window`] per call. Each window gets its own temporary profile and
//! its own loopback control server.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::browser::{Window, WindowBuilder};
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::proxy::ProxyConfig;
use crate::transport::PendingServer;

use super::assets;
use super::builder::DriverBuilder;
use super::options::FirefoxOptions;
use super::profile::{ExtensionSource, Profile};

// ============================================================================
// Driver
// ============================================================================

pub(crate) struct DriverInner {
    binary: PathBuf,
    extension: ExtensionSource,
}

/// Launches Firefox windows with the control extension installed.
#[derive(Clone)]
pub struct Driver {
    pub(crate) inner: Arc<DriverInner>,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("binary", &self.inner.binary)
            .field("extension", &self.inner.extension)
            .finish()
    }
}

impl Driver {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    /// Starts describing a new window.
    #[inline]
    #[must_use]
    pub fn window(&self) -> WindowBuilder<'_> {
        WindowBuilder::new(self)
    }

    pub(crate) fn new(binary: PathBuf, extension: ExtensionSource) -> Self {
        Self {
            inner: Arc::new(DriverInner { binary, extension }),
        }
    }

    /// Launches Firefox and waits for the extension to report READY.
    ///
    /// # Errors
    ///
    /// - [`Error::Profile`] if the profile cannot be prepared
    /// - [`Error::ProcessLaunchFailed`] if Firefox does not start
    /// - [`Error::ConnectionTimeout`] if the extension never connects
    /// - control-channel errors from applying proxy credentials
    pub(crate) async fn spawn_window(
        &self,
        options: &FirefoxOptions,
        proxy: Option<&ProxyConfig>,
        block_images: bool,
    ) -> Result<Window> {
        let profile = self.prepare_profile(proxy, block_images)?;

        let server = PendingServer::bind_loopback().await?;
        let session_id = SessionId::next();
        let ws_url = server.ws_url();
        let data_uri = assets::build_init_data_uri(&ws_url, &session_id);
        debug!(%session_id, url = %ws_url, "Control server listening");

        let child = self.spawn_firefox_process(&profile, options, &data_uri)?;
        let pid = child.id();
        info!(pid, %session_id, headless = options.headless, "Firefox process spawned");

        let mut child = child;
        let (connection, ready) = match server.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(pid, %session_id, error = %e, "Extension never connected");
                if let Err(kill_err) = child.kill().await {
                    debug!(pid, error = %kill_err, "Failed to kill Firefox");
                }
                return Err(e);
            }
        };

        let window = Window::new(connection, child, profile, session_id, ready.tab_id);

        if ready.session_id != session_id.as_u32() {
            window.close().await;
            return Err(Error::protocol(format!(
                "READY for session {} on connection of session {session_id}",
                ready.session_id
            )));
        }
        debug!(%session_id, tab_id = %ready.tab_id, "Extension ready");

        if let Some(proxy) = proxy.filter(|p| p.credentials().is_some())
            && let Err(e) = window.set_proxy(proxy).await
        {
            warn!(%session_id, error = %e, "Could not apply proxy credentials");
            window.close().await;
            return Err(e);
        }

        Ok(window)
    }

    fn prepare_profile(&self, proxy: Option<&ProxyConfig>, block_images: bool) -> Result<Profile> {
        let profile = Profile::new_temp()?;
        profile.install_extension(&self.inner.extension)?;

        let mut prefs = Profile::default_prefs();
        if let Some(proxy) = proxy {
            prefs.extend(proxy.preferences());
        }
        if block_images {
            prefs.push(Profile::block_images_pref());
        }
        profile.write_prefs(&prefs)?;

        debug!(
            path = %profile.path().display(),
            pref_count = prefs.len(),
            proxied = proxy.is_some(),
            block_images,
            "Profile prepared"
        );
        Ok(profile)
    }

    fn spawn_firefox_process(
        &self,
        profile: &Profile,
        options: &FirefoxOptions,
        data_uri: &str,
    ) -> Result<Child> {
        let mut cmd = Command::new(&self.inner.binary);

        cmd.arg("--profile")
            .arg(profile.path())
            .arg("--no-remote")
            .arg("--new-instance")
            .args(options.to_args())
            .arg(data_uri)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        cmd.spawn().map_err(Error::process_launch_failed)
    }
}

// ============================================================================
// Tests
// ============================================================================
