//! Navigation and page state.

use tracing::debug;

use crate::error::Result;
use crate::protocol::{BrowsingContextCommand, Command};

use super::Tab;

impl Tab {
    /// Navigates to `url`.
    ///
    /// # Errors
    ///
    /// Returns control-channel errors or the extension's navigation error.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(%url, tab_id = %self.inner.tab_id, "Navigating");

        let command = Command::BrowsingContext(BrowsingContextCommand::Navigate {
            url: url.to_string(),
        });
        self.send_command(command).await?;
        Ok(())
    }

    /// URL currently loaded in the tab.
    ///
    /// # Errors
    ///
    /// Returns control-channel errors.
    pub async fn current_url(&self) -> Result<String> {
        let command = Command::BrowsingContext(BrowsingContextCommand::GetUrl);
        let response = self.send_command(command).await?;
        Ok(response.get_string("url"))
    }

    /// Serialized DOM of the whole document.
    ///
    /// # Errors
    ///
    /// Returns control-channel or script errors.
    pub async fn page_source(&self) -> Result<String> {
        let value = self
            .execute_script("return document.documentElement.outerHTML")
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Closes the tab.
    ///
    /// # Errors
    ///
    /// Returns control-channel errors.
    pub async fn close(&self) -> Result<()> {
        debug!(tab_id = %self.inner.tab_id, "Closing tab");
        let command = Command::BrowsingContext(BrowsingContextCommand::CloseTab);
        self.send_command(command).await?;
        Ok(())
    }
}
