//! Backend handles and the capabilities they expose.
//!
//! Different LLM client libraries are called in different ways. Instead of
//! probing at call time, every backend declares up front which of three
//! calling conventions it supports as [`Capability`] variants, and the
//! dispatcher matches on them.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::kind::ProviderKind;
use crate::message::Message;

/// A backend invoked directly with a prompt string.
#[async_trait]
pub trait DirectCall: Send + Sync {
    /// Whether [`DirectCall::predict`] should be preferred over [`DirectCall::call`].
    fn supports_predict(&self) -> bool {
        false
    }

    /// Predict-style invocation. Defaults to [`DirectCall::call`].
    async fn predict(&self, prompt: &str) -> Result<Value> {
        self.call(prompt).await
    }

    /// Plain invocation with the prompt string.
    async fn call(&self, prompt: &str) -> Result<Value>;
}

/// Input to a structured generate call: a batch of conversations.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateInput {
    /// Conversations of typed messages.
    Typed(Vec<Vec<Message>>),
    /// Conversations of loosely shaped JSON messages (`{"type", "content"}`).
    Simplified(Vec<Vec<Value>>),
}

impl GenerateInput {
    /// One single-turn conversation holding a typed user message.
    pub fn single_turn(prompt: &str) -> Self {
        Self::Typed(vec![vec![Message::user(prompt)]])
    }

    /// One single-turn conversation in the simplified representation.
    pub fn single_turn_simplified(prompt: &str) -> Self {
        Self::Simplified(vec![vec![json!({"type": "human", "content": prompt})]])
    }

    /// Text of the last message of the last conversation, if any.
    pub fn last_text(&self) -> Option<String> {
        match self {
            GenerateInput::Typed(batch) => batch.last()?.last().map(Message::text),
            GenerateInput::Simplified(batch) => batch
                .last()?
                .last()?
                .get("content")?
                .as_str()
                .map(String::from),
        }
    }

    /// Best-effort string form of the whole input.
    pub fn describe(&self) -> String {
        match self {
            GenerateInput::Typed(batch) => serde_json::to_string(batch),
            GenerateInput::Simplified(batch) => serde_json::to_string(batch),
        }
        .unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// A backend exposing a structured "generate" call over message batches.
#[async_trait]
pub trait Generate: Send + Sync {
    async fn generate(&self, input: &GenerateInput) -> Result<Value>;
}

/// A low-level chat-completions client (`create(model, messages)`).
#[async_trait]
pub trait CompletionsClient: Send + Sync {
    async fn create(&self, model: &str, messages: &[Message]) -> Result<Value>;
}

/// One calling convention a backend supports.
#[derive(Clone)]
pub enum Capability {
    DirectCallable(Arc<dyn DirectCall>),
    Generative(Arc<dyn Generate>),
    LowLevelClient(Arc<dyn CompletionsClient>),
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Capability::DirectCallable(_) => "DirectCallable",
            Capability::Generative(_) => "Generative",
            Capability::LowLevelClient(_) => "LowLevelClient",
        };
        f.write_str(name)
    }
}

/// A resolved backend: where it came from, its model, and how to call it.
///
/// Immutable once built; cheap to clone and to rebuild.
#[derive(Debug, Clone)]
pub struct BackendHandle {
    provider: ProviderKind,
    model: String,
    capabilities: Vec<Capability>,
}

impl BackendHandle {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            capabilities: Vec::new(),
        }
    }

    /// Adds a capability. Later duplicates of the same kind are ignored.
    #[must_use]
    pub fn with(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn direct(&self) -> Option<&Arc<dyn DirectCall>> {
        self.capabilities.iter().find_map(|c| match c {
            Capability::DirectCallable(d) => Some(d),
            _ => None,
        })
    }

    pub fn generative(&self) -> Option<&Arc<dyn Generate>> {
        self.capabilities.iter().find_map(|c| match c {
            Capability::Generative(g) => Some(g),
            _ => None,
        })
    }

    pub fn client(&self) -> Option<&Arc<dyn CompletionsClient>> {
        self.capabilities.iter().find_map(|c| match c {
            Capability::LowLevelClient(c) => Some(c),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_text_reads_both_representations() {
        assert_eq!(
            GenerateInput::single_turn("hello").last_text().as_deref(),
            Some("hello")
        );
        assert_eq!(
            GenerateInput::single_turn_simplified("hello")
                .last_text()
                .as_deref(),
            Some("hello")
        );
        assert_eq!(GenerateInput::Typed(vec![]).last_text(), None);
    }

    #[test]
    fn empty_handle_has_no_capabilities() {
        let handle = BackendHandle::new(ProviderKind::Groq, "m");
        assert!(handle.direct().is_none());
        assert!(handle.generative().is_none());
        assert!(handle.client().is_none());
    }
}
