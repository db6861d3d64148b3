//! Deterministic rule-based backend used as the last resort.
//!
//! Keeps the assistant operable without any reachable provider. It answers
//! every calling convention with the same keyword classification.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::handle::{
    BackendHandle, Capability, CompletionsClient, DirectCall, Generate, GenerateInput,
};
use super::kind::ProviderKind;
use crate::message::{Message, Role};

/// Classifies a prompt into an action name by keyword.
///
/// Rules are checked in priority order: cancel, availability, search.
pub fn classify(prompt: &str) -> &'static str {
    let p = prompt.to_lowercase();
    if p.contains("cancel") {
        return "cancellation_policy";
    }
    if p.contains("availability") || p.contains("available") {
        return "check_availability";
    }
    if p.contains("search") || (p.contains("from") && p.contains("to")) || p.contains("find trains")
    {
        return "search_trains";
    }
    "general_chat"
}

fn completion(action: &str) -> Value {
    json!({"choices": [{"message": {"content": action}}]})
}

/// The stub backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClassifier;

impl LocalClassifier {
    /// A handle exposing all three capabilities.
    pub fn handle() -> BackendHandle {
        let stub = Arc::new(LocalClassifier);
        BackendHandle::new(ProviderKind::Local, crate::constants::LOCAL_STUB_MODEL)
            .with(Capability::DirectCallable(stub.clone()))
            .with(Capability::Generative(stub.clone()))
            .with(Capability::LowLevelClient(stub))
    }
}

#[async_trait]
impl DirectCall for LocalClassifier {
    fn supports_predict(&self) -> bool {
        true
    }

    async fn call(&self, prompt: &str) -> Result<Value> {
        Ok(Value::String(classify(prompt).to_string()))
    }
}

#[async_trait]
impl Generate for LocalClassifier {
    async fn generate(&self, input: &GenerateInput) -> Result<Value> {
        let text = input.last_text().unwrap_or_else(|| input.describe());
        Ok(completion(classify(&text)))
    }
}

#[async_trait]
impl CompletionsClient for LocalClassifier {
    async fn create(&self, _model: &str, messages: &[Message]) -> Result<Value> {
        let text = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(Message::text)
            .unwrap_or_default();
        Ok(completion(classify(&text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_action() {
        assert_eq!(classify("Show CANCELLATION policy"), "cancellation_policy");
        assert_eq!(classify("Is 12301 available?"), "check_availability");
        assert_eq!(classify("Check availability for 12301"), "check_availability");
        assert_eq!(classify("search trains please"), "search_trains");
        assert_eq!(classify("trains from Pune to Goa"), "search_trains");
        assert_eq!(classify("find trains"), "search_trains");
        assert_eq!(classify("hello there"), "general_chat");
        assert_eq!(classify(""), "general_chat");
    }

    #[test]
    fn cancel_beats_search() {
        assert_eq!(
            classify("search for how to cancel my ticket"),
            "cancellation_policy"
        );
    }

    #[test]
    fn availability_beats_search() {
        assert_eq!(classify("search availability"), "check_availability");
    }

    #[tokio::test]
    async fn every_capability_agrees() {
        let handle = LocalClassifier::handle();
        let prompt = "Show cancellation policy please";

        let direct = handle.direct().unwrap();
        assert!(direct.supports_predict());
        assert_eq!(direct.predict(prompt).await.unwrap(), json!("cancellation_policy"));
        assert_eq!(direct.call(prompt).await.unwrap(), json!("cancellation_policy"));

        let generated = handle
            .generative()
            .unwrap()
            .generate(&GenerateInput::single_turn(prompt))
            .await
            .unwrap();
        assert_eq!(generated, completion("cancellation_policy"));

        let simplified = handle
            .generative()
            .unwrap()
            .generate(&GenerateInput::single_turn_simplified(prompt))
            .await
            .unwrap();
        assert_eq!(simplified, completion("cancellation_policy"));

        let created = handle
            .client()
            .unwrap()
            .create("local-rules", &[Message::user_parts(prompt)])
            .await
            .unwrap();
        assert_eq!(created, completion("cancellation_policy"));
    }
}
