//! Loopback WebSocket server the extension dials into.
//!
//! 1. [`PendingServer::bind`] picks a free port on the loopback interface.
//! 2. Firefox starts with an init page that carries [`PendingServer::ws_url`].
//! 3. [`PendingServer::accept`] takes the extension's connection and its
//!    READY handshake.

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::Connection;
use super::connection::ReadyData;

// ============================================================================
// Constants
// ============================================================================

/// Time Firefox has to start and connect.
const ACCEPT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// PendingServer
// ============================================================================

/// A bound listener waiting for the extension.
pub struct PendingServer {
    listener: TcpListener,
    port: u16,
}

impl PendingServer {
    /// Binds to `ip:port`; port 0 lets the OS choose.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(ip, port)).await?;
        let port = listener.local_addr()?.port();

        debug!(port, "WebSocket server bound");

        Ok(Self { listener, port })
    }

    /// Binds to a random loopback port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind_loopback() -> Result<Self> {
        Self::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await
    }

    /// Port the listener is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// URL handed to the extension.
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Accepts one connection and completes the READY handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if nobody connects in time
    /// - [`Error::Connection`] if the WebSocket upgrade fails
    /// - errors from the READY handshake
    pub async fn accept(self) -> Result<(Connection, ReadyData)> {
        let (stream, addr) = timeout(ACCEPT_TIMEOUT, self.listener.accept())
            .await
            .map_err(|_| Error::connection_timeout(ACCEPT_TIMEOUT.as_millis() as u64))??;

        debug!(%addr, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::connection(format!("WebSocket upgrade failed: {e}")))?;

        info!(port = self.port, "Extension connected");

        let (connection, ready_rx) = Connection::open(ws_stream);
        let ready = Connection::wait_ready(ready_rx).await?;

        Ok((connection, ready))
    }
}

// ============================================================================
// Tests
// ============================================================================
