//! JavaScript evaluation and selector queries.

use serde_json::{Value, json};

use crate::cdp::error::CdpError;

use super::core::PageSession;

/// Render `selector` as a JavaScript string literal.
pub(super) fn js_string(selector: &str) -> Result<String, CdpError> {
    Ok(serde_json::to_string(selector)?)
}

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            // The description carries the actual message ("SyntaxError: ...");
            // `text` is usually just "Uncaught".
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Number of elements matching `selector`.
    pub async fn count(&self, selector: &str) -> Result<usize, CdpError> {
        let expression = format!("document.querySelectorAll({}).length", js_string(selector)?);
        let value = self.evaluate(&expression).await?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| CdpError::InvalidResponse(format!("Expected a count, got {}", value)))
    }

    /// Text content of the first element matching `selector`.
    pub async fn first_text(&self, selector: &str) -> Result<Option<String>, CdpError> {
        let expression = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.textContent : null; }})()",
            js_string(selector)?
        );
        match self.evaluate(&expression).await? {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(text)),
            other => Err(CdpError::InvalidResponse(format!("Expected text, got {}", other))),
        }
    }
}
