//! Handle to a DOM element held by the extension's content script.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::ElementId;
use crate::protocol::{Command, ElementCommand, InputCommand, Response};

use super::Tab;
use super::keyboard::Key;

// ============================================================================
// Element
// ============================================================================

/// A located element in a [`Tab`].
#[derive(Clone)]
pub struct Element {
    id: ElementId,
    tab: Tab,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tab_id", &self.tab.tab_id())
            .finish()
    }
}

impl Element {
    pub(crate) fn new(id: ElementId, tab: Tab) -> Self {
        Self { id, tab }
    }

    /// Element handle.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }
}

// ============================================================================
// Element - Properties
// ============================================================================

impl Element {
    /// Reads `element[name]`.
    ///
    /// # Errors
    ///
    /// Returns control-channel errors.
    pub async fn property(&self, name: &str) -> Result<Value> {
        let command = Command::Element(ElementCommand::GetProperty {
            element_id: self.id.clone(),
            name: name.to_string(),
        });

        let response = self.send_command(command).await?;
        Ok(response
            .result
            .and_then(|mut v| v.get_mut("value").map(Value::take))
            .unwrap_or(Value::Null))
    }

    /// `textContent`, or empty when it is not a string.
    ///
    /// # Errors
    ///
    /// Returns control-channel errors.
    pub async fn text(&self) -> Result<String> {
        let value = self.property("textContent").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

// ============================================================================
// Element - Keyboard
// ============================================================================

impl Element {
    /// Types `text` one character at a time.
    ///
    /// # Errors
    ///
    /// Returns control-channel errors.
    pub async fn type_text(&self, text: &str) -> Result<()> {
        debug!(element_id = %self.id, text_len = text.len(), "Typing text");

        let command = Command::Input(InputCommand::TypeText {
            element_id: self.id.clone(),
            text: text.to_string(),
        });

        self.send_command(command).await?;
        Ok(())
    }

    /// Presses a control key.
    ///
    /// # Errors
    ///
    /// Returns control-channel errors.
    pub async fn press(&self, key: Key) -> Result<()> {
        let (key_str, code, key_code, printable) = key.properties();
        debug!(element_id = %self.id, key = key_str, "Pressing key");

        let command = Command::Input(InputCommand::TypeKey {
            element_id: self.id.clone(),
            key: key_str.to_string(),
            code: code.to_string(),
            key_code,
            printable,
        });

        self.send_command(command).await?;
        Ok(())
    }
}

impl Element {
    async fn send_command(&self, command: Command) -> Result<Response> {
        self.tab.send_command(command).await
    }
}
