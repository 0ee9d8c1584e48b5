//! Element lookup and waiting.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::debug;

use crate::browser::Element;
use crate::browser::selector::By;
use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::protocol::{Command, ElementCommand, Event, ParsedEvent};

use super::Tab;

impl Tab {
    /// Waits until an element matching `by` exists.
    ///
    /// The extension answers immediately when the element is already present
    /// and otherwise pushes `element.added` once a mutation produces it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] when `wait` elapses first.
    pub async fn wait_for_element_timeout(&self, by: &By, wait: Duration) -> Result<Element> {
        let timeout_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        debug!(tab_id = %self.inner.tab_id, locator = %by, timeout_ms, "Waiting for element");

        let connection = self.inner.window.connection();

        let (tx, rx) = oneshot::channel::<String>();
        let tx = Arc::new(Mutex::new(Some(tx)));
        let expected_strategy = by.strategy().to_string();
        let expected_value = by.value().to_string();

        connection.set_event_handler(Box::new(move |event: Event| {
            if let ParsedEvent::ElementAdded {
                strategy,
                value,
                element_id,
                ..
            } = event.parse()
                && strategy == expected_strategy
                && value == expected_value
                && let Some(tx) = tx.lock().take()
            {
                let _ = tx.send(element_id);
            }
        }));

        let command = Command::Element(ElementCommand::Subscribe {
            strategy: by.strategy().to_string(),
            value: by.value().to_string(),
            one_shot: true,
            timeout: Some(timeout_ms),
        });

        let subscribed = self.send_command(command).await;
        let element_id = match subscribed {
            Ok(response) if !response.get_string("elementId").is_empty() => {
                Ok(response.get_string("elementId"))
            }
            Ok(_) => match timeout(wait, rx).await {
                Ok(Ok(element_id)) => Ok(element_id),
                Ok(Err(_)) => Err(Error::ConnectionClosed),
                Err(_) => Err(Error::element_not_found(by.to_string(), timeout_ms)),
            },
            Err(e) => Err(e),
        };

        connection.clear_event_handler();

        Ok(Element::new(ElementId::new(element_id?), self.clone()))
    }
}
