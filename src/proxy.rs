//! HTTP proxy settings for a browser session.
//!
//! A proxy is applied in two places: routing goes into the profile's
//! `user.js`, and credentials (when both are given) are handed to the
//! extension after it connects, since Firefox preferences cannot carry
//! HTTP proxy authentication.
//!
//! # Example
//!
//! ```
//! use vehicle_history_reports::ProxyConfig;
//!
//! let proxy = ProxyConfig::new("proxy.example.com", 8080)
//!     .with_credentials("user", "secret");
//!
//! assert_eq!(proxy.credentials(), Some(("user", "secret")));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::driver::profile::{FirefoxPreference, PreferenceValue};
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// `network.proxy.type` value for manual proxy configuration.
const MANUAL_PROXY_TYPE: i32 = 1;

/// Hosts that always bypass the proxy. Keeps the extension's loopback
/// control connection direct.
const NO_PROXIES_ON: &str = "localhost, 127.0.0.1";

// ============================================================================
// ProxyConfig
// ============================================================================

/// Proxy host, port and optional credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy hostname or address.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Username, used only together with `password`.
    pub username: Option<String>,
    /// Password, used only together with `username`.
    pub password: Option<String>,
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

// ============================================================================
// ProxyConfig - Constructors
// ============================================================================

impl ProxyConfig {
    /// Creates a proxy without credentials.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    /// Builds an optional proxy from loose command-line values.
    ///
    /// No host means no proxy. A host needs a port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a host is given without a port.
    pub fn from_parts(
        host: Option<String>,
        port: Option<u16>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Option<Self>> {
        let Some(host) = host.filter(|h| !h.trim().is_empty()) else {
            return Ok(None);
        };
        let port = port.ok_or_else(|| Error::config(format!("Proxy host {host} needs a port")))?;

        Ok(Some(Self {
            host,
            port,
            username,
            password,
        }))
    }

    /// Sets both credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

// ============================================================================
// ProxyConfig - Accessors
// ============================================================================

impl ProxyConfig {
    /// Returns `(username, password)` when both are set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }

    /// Profile preferences routing HTTP and TLS traffic through this proxy.
    #[must_use]
    pub fn preferences(&self) -> Vec<FirefoxPreference> {
        use FirefoxPreference as Pref;
        use PreferenceValue as Val;

        let port = i32::from(self.port);

        vec![
            Pref::new("network.proxy.type", Val::Int(MANUAL_PROXY_TYPE))
                .with_comment("Manual proxy configuration"),
            Pref::new("signon.autologin.proxy", Val::Bool(true))
                .with_comment("Answer proxy auth prompts from stored credentials"),
            Pref::new("network.proxy.http", Val::String(self.host.clone())),
            Pref::new("network.proxy.http_port", Val::Int(port)),
            Pref::new("network.proxy.ssl", Val::String(self.host.clone())),
            Pref::new("network.proxy.ssl_port", Val::Int(port)),
            Pref::new(
                "network.proxy.no_proxies_on",
                Val::String(NO_PROXIES_ON.to_string()),
            ),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pref<'a>(prefs: &'a [FirefoxPreference], key: &str) -> Option<&'a PreferenceValue> {
        prefs.iter().find(|p| p.key == key).map(|p| &p.value)
    }

    #[test]
    fn test_from_parts_without_host() {
        let proxy = ProxyConfig::from_parts(None, Some(8080), None, None).expect("no error");
        assert!(proxy.is_none());

        let blank = ProxyConfig::from_parts(Some("  ".into()), Some(8080), None, None)
            .expect("no error");
        assert!(blank.is_none());
    }

    #[test]
    fn test_from_parts_requires_port() {
        let err = ProxyConfig::from_parts(Some("proxy.local".into()), None, None, None)
            .expect_err("port is required");
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let only_user = ProxyConfig::from_parts(
            Some("proxy.local".into()),
            Some(3128),
            Some("user".into()),
            None,
        )
        .expect("valid")
        .expect("proxy present");
        assert_eq!(only_user.credentials(), None);

        let both = ProxyConfig::new("proxy.local", 3128).with_credentials("user", "pw");
        assert_eq!(both.credentials(), Some(("user", "pw")));
    }

    #[test]
    fn test_preferences_route_http_and_ssl() {
        let prefs = ProxyConfig::new("10.0.0.5", 3128).preferences();

        assert_eq!(pref(&prefs, "network.proxy.type"), Some(&PreferenceValue::Int(1)));
        assert_eq!(
            pref(&prefs, "network.proxy.http"),
            Some(&PreferenceValue::String("10.0.0.5".into()))
        );
        assert_eq!(
            pref(&prefs, "network.proxy.ssl_port"),
            Some(&PreferenceValue::Int(3128))
        );
        assert_eq!(
            pref(&prefs, "network.proxy.no_proxies_on"),
            Some(&PreferenceValue::String("localhost, 127.0.0.1".into()))
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let proxy = ProxyConfig::new("proxy.local", 3128).with_credentials("user", "hunter2");
        let debug = format!("{proxy:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }
}
