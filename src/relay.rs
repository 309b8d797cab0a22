//! Outbound delivery to the configured chat sink
//!
//! Two payload shapes: the text verbatim, or the WeCom markdown
//! envelope. No retry; a failed delivery is echoed back to the caller
//! with the destination's status and body for diagnosis.

use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use std::time::Duration;

use crate::config::{DeliveryShape, Route};
use crate::error::RelayError;

/// How much destination body to echo back on failure
const BODY_SNIPPET_LEN: usize = 300;

pub struct RelayClient {
    client: reqwest::Client,
}

impl RelayClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create relay HTTP client")?;
        Ok(Self { client })
    }

    /// Deliver the final message text to a route's destination.
    pub async fn deliver(&self, route: &Route, text: &str) -> Result<(), RelayError> {
        let request = match route.shape {
            DeliveryShape::Raw => self
                .client
                .post(&route.url)
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(text.to_string()),
            DeliveryShape::Wecom => self.client.post(&route.url).json(&wecom_envelope(text)),
        };

        let response = request
            .send()
            .await
            .map_err(|e| RelayError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Relay {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        tracing::info!(url = %route.url, shape = ?route.shape, "message relayed");
        Ok(())
    }
}

fn snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        return body.to_string();
    }
    let mut end = BODY_SNIPPET_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

/// Build the WeCom envelope for a message (exposed for tests)
pub fn wecom_envelope(text: &str) -> serde_json::Value {
    json!({
        "msgtype": "markdown",
        "markdown": { "content": text }
    })
}
