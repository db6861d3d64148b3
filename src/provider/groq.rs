//! Groq backend: rig-core agent plus a raw chat-completions client.
//!
//! Groq speaks the OpenAI chat-completions protocol, so besides the rig-core
//! agent the handle carries [`GroqCompletions`], a thin reqwest client whose
//! `create` returns the provider's JSON verbatim.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::client::RigBackend;
use super::handle::{BackendHandle, Capability, CompletionsClient};
use super::kind::ProviderKind;
use crate::config::{BackendSettings, Settings};
use crate::constants;
use crate::error::ConstructionFailure;
use crate::message::Message;

/// Builds the Groq handle: direct and generate via rig-core, plus the raw
/// completions client.
pub fn build(
    settings: &Settings,
    system_prompt: Option<&str>,
) -> Result<BackendHandle, ConstructionFailure> {
    let fail = |e: anyhow::Error| ConstructionFailure::new(ProviderKind::Groq, format!("{e:#}"));
    let backend = &settings.groq;
    if !backend.enabled {
        return Err(ConstructionFailure::new(
            ProviderKind::Groq,
            "disabled in config",
        ));
    }

    let rig = Arc::new(RigBackend::new(ProviderKind::Groq, backend, system_prompt).map_err(fail)?);
    let completions = Arc::new(GroqCompletions::new(backend, system_prompt).map_err(fail)?);

    Ok(BackendHandle::new(ProviderKind::Groq, &backend.model)
        .with(Capability::LowLevelClient(completions))
        .with(Capability::DirectCallable(rig.clone()))
        .with(Capability::Generative(rig)))
}

/// Raw OpenAI-compatible chat-completions client for Groq.
pub struct GroqCompletions {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    temperature: f64,
    max_retries: u32,
    system_prompt: Option<String>,
}

/// Result of one HTTP round trip.
enum SendOutcome {
    Done(Value),
    Retryable(String),
}

impl GroqCompletions {
    pub fn new(settings: &BackendSettings, system_prompt: Option<&str>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(constants::HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        let base = settings
            .base_url
            .as_deref()
            .unwrap_or(constants::GROQ_BASE_URL);
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
            temperature: settings.temperature,
            max_retries: settings.max_retries,
            system_prompt: system_prompt.map(String::from),
        })
    }

    /// Request body for a completion. The configured system prompt, if any,
    /// precedes the caller's messages.
    fn body(&self, model: &str, messages: &[Message]) -> Value {
        let mut all = Vec::with_capacity(messages.len() + 1);
        if let Some(ref sys) = self.system_prompt {
            all.push(Message::system(sys.clone()));
        }
        all.extend_from_slice(messages);
        json!({
            "model": model,
            "messages": all,
            "temperature": self.temperature,
        })
    }

    async fn send_once(&self, body: &Value) -> Result<SendOutcome> {
        let response = match self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() || e.is_connect() => {
                return Ok(SendOutcome::Retryable(e.to_string()))
            }
            Err(e) => return Err(e).context("Groq request failed"),
        };

        let status = response.status();
        if status.is_success() {
            let value = response.json().await.context("Groq response parse failed")?;
            return Ok(SendOutcome::Done(value));
        }

        let text = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 || status.is_server_error() {
            return Ok(SendOutcome::Retryable(format!("{}: {}", status.as_u16(), text)));
        }
        anyhow::bail!("Groq non-success status {}: {}", status.as_u16(), text)
    }
}

#[async_trait]
impl CompletionsClient for GroqCompletions {
    async fn create(&self, model: &str, messages: &[Message]) -> Result<Value> {
        let body = self.body(model, messages);
        let mut last = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(250 * u64::from(attempt))).await;
            }
            match self.send_once(&body).await? {
                SendOutcome::Done(value) => return Ok(value),
                SendOutcome::Retryable(reason) => {
                    tracing::debug!(attempt, %reason, "transient Groq error");
                    last = reason;
                }
            }
        }
        anyhow::bail!(
            "Groq request failed after {} tries: {}",
            self.max_retries + 1,
            last
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_prepends_system_prompt() {
        let settings = Settings::new("g", "q");
        let client = GroqCompletions::new(&settings.groq, Some("classify")).unwrap();
        let body = client.body("llama", &[Message::user("hi")]);
        assert_eq!(
            body,
            json!({
                "model": "llama",
                "messages": [
                    {"role": "system", "content": "classify"},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn endpoint_honours_base_url() {
        let mut settings = Settings::new("g", "q");
        settings.groq.base_url = Some("http://localhost:9000/v1/".into());
        let client = GroqCompletions::new(&settings.groq, None).unwrap();
        assert_eq!(client.endpoint, "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn disabled_backend_fails_construction() {
        let mut settings = Settings::new("g", "q");
        settings.groq.enabled = false;
        let err = build(&settings, None).unwrap_err();
        assert_eq!(err.provider, ProviderKind::Groq);
        assert!(err.reason.contains("disabled"));
    }
}
