//! rig-core backed chat clients for Gemini and Groq.
//!
//! Contains [`RigBackend`], which wraps the provider-specific rig-core
//! clients behind enum dispatch and exposes them as [`DirectCall`] and
//! [`Generate`] capabilities. Agents are constructed on each call since they
//! are cheap to create.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::{Chat, Prompt};
use rig::message::Message as RigMessage;
use rig::providers::{gemini, groq};
use serde_json::{json, Value};

use super::handle::{DirectCall, Generate, GenerateInput};
use super::kind::ProviderKind;
use crate::config::BackendSettings;
use crate::message::{Message, Role};

/// Internal enum wrapping provider-specific clients.
enum ClientKind {
    Gemini(gemini::Client),
    Groq(groq::Client),
}

/// A configured rig-core client plus the model and sampling settings.
pub struct RigBackend {
    client: ClientKind,
    model: String,
    temperature: f64,
    system_prompt: Option<String>,
}

/// Builds an agent from the given client, model, temperature and optional
/// system prompt, then executes the provided block with the agent bound to
/// `$agent`.
macro_rules! with_agent {
    ($client:expr, $model:expr, $temp:expr, $sys:expr, |$agent:ident| $body:expr) => {{
        let $agent = if let Some(sys) = $sys {
            $client
                .agent($model)
                .preamble(sys)
                .temperature($temp)
                .max_tokens(crate::constants::MAX_TOKENS)
                .build()
        } else {
            $client
                .agent($model)
                .temperature($temp)
                .max_tokens(crate::constants::MAX_TOKENS)
                .build()
        };
        $body
    }};
}

/// Dispatches an operation across provider-specific clients.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::Gemini($client) => $body,
            ClientKind::Groq($client) => $body,
        }
    };
}

impl RigBackend {
    /// Creates a rig-core backend for `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error for the local stub (which has no rig client) or if
    /// client construction fails.
    pub fn new(
        provider: ProviderKind,
        settings: &BackendSettings,
        system_prompt: Option<&str>,
    ) -> Result<Self> {
        let client = match provider {
            ProviderKind::Google => ClientKind::Gemini(
                gemini::Client::new(&settings.api_key)
                    .context("Failed to create Gemini client")?,
            ),
            ProviderKind::Groq => ClientKind::Groq(
                groq::Client::new(&settings.api_key).context("Failed to create Groq client")?,
            ),
            ProviderKind::Local => anyhow::bail!("the local stub has no rig-core client"),
        };
        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            system_prompt: system_prompt.map(String::from),
        })
    }

    /// Sends a single prompt and returns the full response text.
    async fn prompt(&self, prompt_text: &str) -> Result<String> {
        let sys = self.system_prompt.as_deref();
        dispatch!(self, |client| {
            let response = with_agent!(client, &self.model, self.temperature, sys, |agent| {
                agent.prompt(prompt_text).await
            });
            Ok(response?)
        })
    }

    /// Sends a prompt with prior conversation turns as chat history.
    async fn chat(&self, prompt_text: &str, history: Vec<RigMessage>) -> Result<String> {
        let sys = self.system_prompt.as_deref();
        dispatch!(self, |client| {
            let response = with_agent!(client, &self.model, self.temperature, sys, |agent| {
                agent.chat(prompt_text, history.clone()).await
            });
            Ok(response?)
        })
    }
}

/// Splits one conversation into (prompt, history) for rig-core.
///
/// The last message becomes the prompt; earlier user/assistant turns become
/// history. System messages are dropped since the preamble carries them.
fn split_conversation(conversation: &[Message]) -> (String, Vec<RigMessage>) {
    let prompt = conversation.last().map(Message::text).unwrap_or_default();
    let history = conversation
        .iter()
        .take(conversation.len().saturating_sub(1))
        .filter_map(|m| match m.role {
            Role::User => Some(RigMessage::user(m.text())),
            Role::Assistant => Some(RigMessage::assistant(m.text())),
            Role::System => None,
        })
        .collect();
    (prompt, history)
}

/// Converts the simplified `{"type", "content"}` form into typed messages.
fn simplified_to_messages(conversation: &[Value]) -> Result<Vec<Message>> {
    conversation
        .iter()
        .map(|v| {
            let content = v
                .get("content")
                .and_then(Value::as_str)
                .context("simplified message has no string content")?;
            let kind = v.get("type").and_then(Value::as_str).unwrap_or("human");
            Ok(match kind {
                "ai" | "assistant" => Message::assistant(content),
                "system" => Message::system(content),
                _ => Message::user(content),
            })
        })
        .collect()
}

#[async_trait]
impl DirectCall for RigBackend {
    async fn call(&self, prompt: &str) -> Result<Value> {
        Ok(Value::String(self.prompt(prompt).await?))
    }
}

#[async_trait]
impl Generate for RigBackend {
    /// Runs every conversation in the batch and reports one choice each.
    async fn generate(&self, input: &GenerateInput) -> Result<Value> {
        let conversations: Vec<Vec<Message>> = match input {
            GenerateInput::Typed(batch) => batch.clone(),
            GenerateInput::Simplified(batch) => batch
                .iter()
                .map(|c| simplified_to_messages(c))
                .collect::<Result<_>>()?,
        };
        anyhow::ensure!(!conversations.is_empty(), "generate called with an empty batch");

        let mut choices = Vec::with_capacity(conversations.len());
        for conversation in &conversations {
            let (prompt, history) = split_conversation(conversation);
            let text = self.chat(&prompt, history).await?;
            choices.push(json!({"message": {"role": "assistant", "content": text}}));
        }
        Ok(json!({"model": self.model, "choices": choices}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_uses_last_message_as_prompt() {
        let conversation = vec![
            Message::system("be brief"),
            Message::user("first"),
            Message::assistant("reply"),
            Message::user("second"),
        ];
        let (prompt, history) = split_conversation(&conversation);
        assert_eq!(prompt, "second");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn simplified_messages_map_roles() {
        let converted = simplified_to_messages(&[
            json!({"type": "human", "content": "hi"}),
            json!({"type": "ai", "content": "hello"}),
        ])
        .unwrap();
        assert_eq!(converted, vec![Message::user("hi"), Message::assistant("hello")]);
    }

    #[test]
    fn simplified_message_without_content_is_rejected() {
        assert!(simplified_to_messages(&[json!({"type": "human"})]).is_err());
    }

    #[test]
    fn local_stub_has_no_rig_client() {
        let settings = crate::config::Settings::new("g", "q");
        assert!(RigBackend::new(ProviderKind::Local, &settings.groq, None).is_err());
    }
}
