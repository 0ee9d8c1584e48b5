//! Script evaluation.

use serde_json::Value;

use crate::error::Result;
use crate::protocol::{Command, ScriptCommand};

use super::Tab;

impl Tab {
    /// Runs a synchronous script body and returns its `return` value.
    ///
    /// # Errors
    ///
    /// Returns control-channel errors or the script's exception.
    pub async fn execute_script(&self, script: &str) -> Result<Value> {
        let command = Command::Script(ScriptCommand::Evaluate {
            script: script.to_string(),
            args: Vec::new(),
        });

        let response = self.send_command(command).await?;
        Ok(response
            .result
            .and_then(|mut v| v.get_mut("value").map(Value::take))
            .unwrap_or(Value::Null))
    }
}
