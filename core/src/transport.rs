//! Request/response exchange with the chat endpoint.
//!
//! The endpoint accepts `{message, session_id}` and answers with an object
//! whose fields are all optional:
//!
//! ```json
//! {
//!   "response": "text to show",
//!   "show_form": true,
//!   "state": { "full_name": "...", "product_interest": "...", "quantity": 1 },
//!   "meta": { "form_mode": "edit" | "confirm" },
//!   "error": "server-side problem"
//! }
//! ```
//!
//! Unknown fields are ignored, and a `meta` that is not an object reads as
//! edit mode.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::form::FormMode;
use crate::form::FormPrefill;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyMeta {
    pub form_mode: FormMode,
}

impl<'de> Deserialize<'de> for ReplyMeta {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let form_mode = value.get("form_mode").and_then(Value::as_str);
        Ok(Self {
            form_mode: FormMode::parse(form_mode),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub show_form: Option<bool>,
    #[serde(default)]
    pub state: Option<FormPrefill>,
    #[serde(default)]
    pub meta: Option<ReplyMeta>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Self::default()
        }
    }

    pub fn wants_form(&self) -> bool {
        self.show_form.unwrap_or(false)
    }

    pub fn form_mode(&self) -> FormMode {
        self.meta.as_ref().map(|m| m.form_mode).unwrap_or_default()
    }

    /// Prefill for the requested form; a missing `state` means every field
    /// takes its default.
    pub fn prefill(&self) -> FormPrefill {
        self.state.clone().unwrap_or_default()
    }
}

/// Ways an exchange can fail before a reply object is available.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error: HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("malformed reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One request, one reply. Implementations must not retry on their own.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn exchange(&self, request: &ChatRequest) -> Result<ChatReply, TransportError>;
}

/// JSON-over-HTTP transport posting to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport. `timeout` of `None` waits indefinitely.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn exchange(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
