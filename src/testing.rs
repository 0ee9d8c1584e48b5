//! Scripted pages and launchers for poller and reporter tests, plus a
//! stand-in extension for tests that drive a real [`Window`].

use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::process::Child;
use tokio_tungstenite::tungstenite::Message;

use crate::browser::{By, Key, Window};
use crate::config::ReportConfig;
use crate::driver::Profile;
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::page::{ReportPage, SessionLauncher};
use crate::site;
use crate::transport::PendingServer;

/// Config with every wait cut to (almost) nothing.
pub(crate) fn fast_config() -> ReportConfig {
    ReportConfig::new()
        .with_element_timeout(Duration::from_millis(10))
        .with_poll_interval(Duration::ZERO)
        .with_submit_delay(Duration::ZERO)
}

/// Report page with a two-row decoded-details table and nothing else.
pub(crate) const HONDA_PAGE: &str = r#"<html><body>
<div id="nhtsa-26">Honda Accord</div>
<table class="tableinfo"><tbody></tbody></table>
<table class="table table-striped"><tbody>
<tr>
<td>Make</td>
<td>Honda</td>
</tr>
<tr>
<td>Model</td>
<td>Accord</td>
</tr>
</tbody></table>
<div id="report_extra"><table><tbody></tbody></table></div>
<div id="recalls"></div>
<div id="complaints"></div>
</body></html>"#;

// ============================================================================
// PageScript
// ============================================================================

/// What a [`MockPage`] answers.
#[derive(Debug, Clone)]
pub(crate) struct PageScript {
    vin_input: bool,
    /// Results text per poll; the last entry repeats. `None` means the
    /// results region is missing.
    results: Vec<Option<String>>,
    source: String,
    source_readable: bool,
    url: String,
}

impl PageScript {
    pub(crate) fn ready(results: &str) -> Self {
        Self {
            vin_input: true,
            results: vec![Some(results.to_string())],
            source: "<html><body></body></html>".to_string(),
            source_readable: true,
            url: site::REPORT_URL.to_string(),
        }
    }

    pub(crate) fn with_results<'a, I>(mut self, results: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<&'a str>>,
    {
        self.results = results
            .into_iter()
            .map(|r| r.into().map(str::to_string))
            .collect();
        self
    }

    pub(crate) fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// `page_source` fails as if the control connection dropped.
    pub(crate) fn with_unreadable_source(mut self) -> Self {
        self.source_readable = false;
        self
    }

    pub(crate) fn without_vin_input(mut self) -> Self {
        self.vin_input = false;
        self
    }
}

// ============================================================================
// MockPage
// ============================================================================

/// Everything a [`MockPage`] was asked to do.
#[derive(Debug, Clone, Default)]
pub(crate) struct PageLog {
    pub(crate) typed: Vec<(String, String)>,
    pub(crate) keys: Vec<Key>,
    pub(crate) polls: usize,
    pub(crate) sources: usize,
    pub(crate) closes: usize,
}

pub(crate) struct MockPage {
    script: PageScript,
    log: Arc<Mutex<PageLog>>,
    closed: bool,
}

impl MockPage {
    pub(crate) fn new(script: PageScript) -> Self {
        Self::with_log(script, Arc::default())
    }

    fn with_log(script: PageScript, log: Arc<Mutex<PageLog>>) -> Self {
        Self {
            script,
            log,
            closed: false,
        }
    }

    pub(crate) fn log(&self) -> PageLog {
        self.log.lock().clone()
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::SessionClosed);
        }
        Ok(())
    }

    fn find_input(&self, by: &By, timeout: Duration) -> Result<()> {
        if by.value() == site::VIN_INPUT_ID && self.script.vin_input {
            return Ok(());
        }
        Err(Error::element_not_found(by.to_string(), timeout.as_millis() as u64))
    }
}

#[async_trait]
impl ReportPage for MockPage {
    async fn type_into(&mut self, by: &By, text: &str, timeout: Duration) -> Result<()> {
        self.check_open()?;
        self.find_input(by, timeout)?;
        self.log.lock().typed.push((by.to_string(), text.to_string()));
        Ok(())
    }

    async fn press_key(&mut self, by: &By, key: Key, timeout: Duration) -> Result<()> {
        self.check_open()?;
        self.find_input(by, timeout)?;
        self.log.lock().keys.push(key);
        Ok(())
    }

    async fn wait_for_text(&mut self, by: &By, timeout: Duration) -> Result<String> {
        self.check_open()?;
        let poll = {
            let mut log = self.log.lock();
            log.polls += 1;
            log.polls - 1
        };

        self.script
            .results
            .get(poll)
            .or_else(|| self.script.results.last())
            .cloned()
            .flatten()
            .ok_or_else(|| Error::element_not_found(by.to_string(), timeout.as_millis() as u64))
    }

    async fn page_source(&mut self) -> Result<String> {
        self.check_open()?;
        self.log.lock().sources += 1;
        if !self.script.source_readable {
            return Err(Error::ConnectionClosed);
        }
        Ok(self.script.source.clone())
    }

    async fn current_url(&mut self) -> Result<String> {
        self.check_open()?;
        Ok(self.script.url.clone())
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.log.lock().closes += 1;
        }
        Ok(())
    }
}

// ============================================================================
// MockLauncher
// ============================================================================

/// Hands out one scripted page per `open`, in order. `None` entries fail
/// to launch.
pub(crate) struct MockLauncher {
    scripts: Mutex<VecDeque<Option<PageScript>>>,
    logs: Mutex<Vec<Arc<Mutex<PageLog>>>>,
}

impl MockLauncher {
    pub(crate) fn new(scripts: impl IntoIterator<Item = Option<PageScript>>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Logs of every page opened so far.
    pub(crate) fn logs(&self) -> Vec<PageLog> {
        self.logs.lock().iter().map(|log| log.lock().clone()).collect()
    }
}

#[async_trait]
impl SessionLauncher for MockLauncher {
    type Page = MockPage;

    async fn open(&self, _config: &ReportConfig) -> Result<MockPage> {
        let script = self
            .scripts
            .lock()
            .pop_front()
            .ok_or_else(|| Error::connection("no scripted page left"))?
            .ok_or_else(|| Error::ProcessLaunchFailed {
                message: "scripted launch failure".to_string(),
            })?;

        let log = Arc::<Mutex<PageLog>>::default();
        self.logs.lock().push(Arc::clone(&log));
        Ok(MockPage::with_log(script, log))
    }
}

// ============================================================================
// FakeExtension
// ============================================================================

/// Long-running child standing in for Firefox.
pub(crate) fn sleeper() -> Child {
    tokio::process::Command::new("sleep")
        .arg("30")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("spawn sleep")
}

/// Returns `true` while `pid` has not been reaped.
pub(crate) fn process_exists(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

/// Answers control commands the way the extension does and records every
/// method it receives.
pub(crate) struct FakeExtension {
    methods: Arc<Mutex<Vec<String>>>,
}

impl FakeExtension {
    /// Builds a [`Window`] around `child` whose connection is served by a
    /// fake extension. Methods listed in `failing` get an error response.
    pub(crate) async fn window(child: Child, failing: &'static [&'static str]) -> (Window, Self) {
        Self::spawn(child, failing, &[]).await
    }

    /// Like [`FakeExtension::window`], but methods listed in `unanswered`
    /// are recorded and never replied to.
    pub(crate) async fn unanswered(
        child: Child,
        unanswered: &'static [&'static str],
    ) -> (Window, Self) {
        Self::spawn(child, &[], unanswered).await
    }

    async fn spawn(
        child: Child,
        failing: &'static [&'static str],
        unanswered: &'static [&'static str],
    ) -> (Window, Self) {
        let server = PendingServer::bind_loopback().await.expect("bind");
        let methods = Arc::new(Mutex::new(Vec::new()));
        tokio::spawn(serve(
            server.ws_url(),
            Arc::clone(&methods),
            failing,
            unanswered,
        ));

        let (connection, ready) = server.accept().await.expect("accept");
        let profile = Profile::new_temp().expect("profile");
        let window = Window::new(connection, child, profile, SessionId::next(), ready.tab_id);

        (window, Self { methods })
    }

    /// Methods received so far, in order.
    pub(crate) fn methods(&self) -> Vec<String> {
        self.methods.lock().clone()
    }

    /// How often `method` was received.
    pub(crate) fn count(&self, method: &str) -> usize {
        self.methods.lock().iter().filter(|m| *m == method).count()
    }
}

async fn serve(
    ws_url: String,
    methods: Arc<Mutex<Vec<String>>>,
    failing: &'static [&'static str],
    unanswered: &'static [&'static str],
) {
    let (mut ws, _) = tokio_tungstenite::connect_async(ws_url.as_str())
        .await
        .expect("connect");
    let ready = json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "type": "success",
        "result": {"tabId": 1, "sessionId": 1}
    });
    ws.send(Message::Text(ready.to_string().into()))
        .await
        .expect("ready");

    while let Some(Ok(message)) = ws.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let request: Value = serde_json::from_str(text.as_str()).expect("request json");
        let method = request["method"].as_str().unwrap_or_default().to_string();
        methods.lock().push(method.clone());
        if unanswered.contains(&method.as_str()) {
            continue;
        }

        let response = if failing.contains(&method.as_str()) {
            json!({
                "id": request["id"],
                "type": "error",
                "error": "unknown error",
                "message": format!("{method} rejected")
            })
        } else {
            json!({
                "id": request["id"],
                "type": "success",
                "result": {"value": "<html><body></body></html>"}
            })
        };
        if ws.send(Message::Text(response.to_string().into())).await.is_err() {
            break;
        }
    }
}
