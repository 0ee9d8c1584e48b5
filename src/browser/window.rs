//! One Firefox process and its control connection.
//!
//! A [`Window`] owns the child process, the temporary profile and the
//! WebSocket connection to the extension. [`Window::close`] tears all three
//! down; dropping the last handle still sends the kill signal.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::process::Child;
use tracing::{debug, info, warn};

use crate::driver::{Driver, FirefoxOptions, Profile};
use crate::error::Result;
use crate::identifiers::{FrameId, SessionId, TabId};
use crate::protocol::{Command, ProxyCommand, Request, Response};
use crate::proxy::ProxyConfig;
use crate::transport::Connection;

use super::Tab;

// ============================================================================
// ProcessGuard
// ============================================================================

/// Owns the Firefox child. The child is taken out before any await so the
/// lock is never held across a suspension point.
struct ProcessGuard {
    child: Mutex<Option<Child>>,
    pid: Option<u32>,
}

impl ProcessGuard {
    fn new(child: Child) -> Self {
        let pid = child.id();
        Self {
            child: Mutex::new(Some(child)),
            pid,
        }
    }

    /// Kills the child and reaps it. A process that already exited is fine.
    async fn kill(&self) {
        let Some(mut child) = self.child.lock().take() else {
            return;
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(pid = self.pid, %status, "Firefox already exited");
                return;
            }
            Ok(None) => {}
            Err(e) => debug!(pid = self.pid, error = %e, "Could not poll Firefox status"),
        }

        if let Err(e) = child.kill().await {
            warn!(pid = self.pid, error = %e, "Failed to kill Firefox");
            return;
        }
        info!(pid = self.pid, "Firefox terminated");
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.get_mut().take()
            && let Err(e) = child.start_kill()
        {
            debug!(pid = self.pid, error = %e, "Kill on drop failed");
        }
    }
}

// ============================================================================
// Window
// ============================================================================

pub(crate) struct WindowInner {
    session_id: SessionId,
    initial_tab_id: TabId,
    connection: Connection,
    process: ProcessGuard,
    closed: AtomicBool,
    _profile: Profile,
}

/// Handle to a running Firefox instance. Cheap to clone.
#[derive(Clone)]
pub struct Window {
    pub(crate) inner: Arc<WindowInner>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("session_id", &self.inner.session_id)
            .field("pid", &self.inner.process.pid)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Window {
    pub(crate) fn new(
        connection: Connection,
        process: Child,
        profile: Profile,
        session_id: SessionId,
        initial_tab_id: TabId,
    ) -> Self {
        Self {
            inner: Arc::new(WindowInner {
                session_id,
                initial_tab_id,
                connection,
                process: ProcessGuard::new(process),
                closed: AtomicBool::new(false),
                _profile: profile,
            }),
        }
    }

    /// Session id handed to the extension at startup.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.inner.session_id
    }

    /// Firefox process id, if the OS reported one.
    #[inline]
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.inner.process.pid
    }

    /// Returns `true` once [`Window::close`] has run.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// The tab Firefox opened at startup.
    #[must_use]
    pub fn tab(&self) -> Tab {
        Tab::new(self.inner.initial_tab_id, FrameId::main(), self.clone())
    }

    /// Shuts the connection and kills Firefox. Later calls do nothing.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        debug!(session_id = %self.inner.session_id, "Closing window");
        self.inner.connection.shutdown();
        self.inner.process.kill().await;
    }

    /// Routes the whole window through `proxy`, credentials included.
    ///
    /// # Errors
    ///
    /// Returns control-channel errors.
    pub async fn set_proxy(&self, proxy: &ProxyConfig) -> Result<()> {
        debug!(
            session_id = %self.inner.session_id,
            host = %proxy.host,
            port = proxy.port,
            "Setting window proxy"
        );

        let (username, password) = match proxy.credentials() {
            Some((user, pass)) => (Some(user.to_string()), Some(pass.to_string())),
            None => (None, None),
        };
        let command = Command::Proxy(ProxyCommand::SetWindowProxy {
            proxy_type: "http".to_string(),
            host: proxy.host.clone(),
            port: proxy.port,
            username,
            password,
        });

        self.send_to(self.inner.initial_tab_id, FrameId::main(), command)
            .await?;
        Ok(())
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.inner.connection
    }

    /// Sends a command and turns an error response into an `Err`.
    pub(crate) async fn send_to(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
        command: Command,
    ) -> Result<Response> {
        let request = Request::new(tab_id, frame_id, command);
        self.inner.connection.send(request).await?.check()
    }
}

// ============================================================================
// WindowBuilder
// ============================================================================

/// Launch settings for one window.
pub struct WindowBuilder<'a> {
    driver: &'a Driver,
    options: FirefoxOptions,
    proxy: Option<ProxyConfig>,
    block_images: bool,
}

impl<'a> WindowBuilder<'a> {
    pub(crate) fn new(driver: &'a Driver) -> Self {
        Self {
            driver,
            options: FirefoxOptions::new(),
            proxy: None,
            block_images: false,
        }
    }

    /// Runs without a visible window.
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.options = self.options.with_headless();
        self
    }

    /// Routes traffic through `proxy`.
    #[must_use]
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Turns image loading off.
    #[must_use]
    pub fn block_images(mut self, block: bool) -> Self {
        self.block_images = block;
        self
    }

    /// Starts Firefox and waits for the extension.
    ///
    /// # Errors
    ///
    /// See [`Driver::spawn_window`].
    pub async fn spawn(self) -> Result<Window> {
        self.driver
            .spawn_window(&self.options, self.proxy.as_ref(), self.block_images)
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::process::Stdio;

    use crate::error::Error;
    use crate::testing::{FakeExtension, process_exists, sleeper};

    #[tokio::test]
    async fn test_process_guard_kills_child() {
        let guard = ProcessGuard::new(sleeper());
        assert!(guard.pid.is_some());

        guard.kill().await;
        assert!(guard.child.lock().is_none());

        // Second kill has nothing left to do.
        guard.kill().await;
    }

    #[tokio::test]
    async fn test_process_guard_tolerates_exited_child() {
        let child = tokio::process::Command::new("true")
            .stdin(Stdio::null())
            .spawn()
            .expect("spawn true");
        let guard = ProcessGuard::new(child);

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        guard.kill().await;
        assert!(guard.child.lock().is_none());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (window, extension) = FakeExtension::window(sleeper(), &[]).await;
        let pid = window.pid().expect("pid");
        let other = window.clone();

        window.close().await;
        assert!(window.is_closed());
        assert!(other.is_closed());
        assert!(!process_exists(pid));

        other.close().await;
        assert!(extension.methods().is_empty());
    }

    #[tokio::test]
    async fn test_commands_fail_after_close() {
        let (window, _extension) = FakeExtension::window(sleeper(), &[]).await;
        window.close().await;

        let err = window.tab().current_url().await.expect_err("connection shut down");
        assert!(matches!(err, Error::ConnectionClosed));
    }

    #[test]
    fn test_window_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Window>();
    }
}
