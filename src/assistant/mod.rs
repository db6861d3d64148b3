//! The IRCTC assistant: classify a message with the LLM, then run the
//! matching lookup.

mod action;
mod extract;

use serde::Serialize;
use serde_json::Value;

use crate::constants::{DEFAULT_ROUTE, DEFAULT_TRAIN_NUMBER, GENERAL_CHAT_REPLY, PLANNER_PROMPT};
use crate::error::InvocationError;
use crate::llm::{ChatOptions, Dispatcher};
use crate::services;

pub use action::Action;
#[allow(unused_imports)]
pub use extract::{route, train_number};

/// What the assistant answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub action: Action,
    /// Human-readable answer.
    pub text: String,
    /// Structured result of the lookup, if one ran.
    pub data: Option<Value>,
}

#[derive(Clone)]
pub struct Assistant {
    dispatcher: Dispatcher,
    provider: Option<String>,
}

impl Assistant {
    /// An assistant using the process-wide provider preference.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            provider: None,
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Option<String>) -> Self {
        self.provider = provider;
        self
    }

    fn options(&self) -> ChatOptions {
        self.dispatcher
            .default_options()
            .provider(self.provider.clone())
            .save(false)
            .system_prompt(PLANNER_PROMPT)
    }

    /// Decides which action a message calls for.
    pub async fn classify(&self, user_text: &str) -> Result<Action, InvocationError> {
        let result = self.dispatcher.llm_chat(user_text, &self.options()).await?;
        let action = Action::parse(&result.text);
        tracing::debug!(raw = %result.text, %action, "classified message");
        Ok(action)
    }

    /// Classifies `user_text` and runs the chosen lookup.
    pub async fn respond(&self, user_text: &str) -> Result<AssistantReply, InvocationError> {
        let action = self.classify(user_text).await?;
        Ok(run(action, user_text))
    }
}

/// Executes an action against the canned services.
pub fn run(action: Action, user_text: &str) -> AssistantReply {
    match action {
        Action::SearchTrains => {
            let (source, destination) = route(user_text).unwrap_or_else(|| {
                (DEFAULT_ROUTE.0.to_string(), DEFAULT_ROUTE.1.to_string())
            });
            let trains = services::search_trains(&source, &destination);
            let text = format!("{} trains from {source} to {destination}", trains.len());
            AssistantReply {
                action,
                text,
                data: serde_json::to_value(&trains).ok(),
            }
        }
        Action::CheckAvailability => {
            let number = train_number(user_text).unwrap_or(DEFAULT_TRAIN_NUMBER);
            let availability = services::check_availability(number);
            AssistantReply {
                action,
                text: format!("Seat availability for train {number}"),
                data: serde_json::to_value(&availability).ok(),
            }
        }
        Action::CancellationPolicy => AssistantReply {
            action,
            text: services::cancellation_policy().to_string(),
            data: None,
        },
        Action::GeneralChat => AssistantReply {
            action,
            text: GENERAL_CHAT_REPLY.to_string(),
            data: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Settings;
    use crate::provider::ProviderResolver;

    fn offline_assistant() -> Assistant {
        let resolver = ProviderResolver::with_constructors(Arc::new(Settings::new("g", "q")), vec![]);
        Assistant::new(Dispatcher::with_resolver(resolver))
    }

    #[tokio::test]
    async fn searches_the_named_route() {
        let reply = offline_assistant()
            .respond("Find trains from Pune to Goa")
            .await
            .unwrap();
        assert_eq!(reply.action, Action::SearchTrains);
        assert_eq!(reply.text, "2 trains from Pune to Goa");
        assert_eq!(reply.data.unwrap()[0]["train_name"], "Rajdhani Express");
    }

    #[tokio::test]
    async fn checks_availability_for_mentioned_train() {
        let reply = offline_assistant()
            .respond("Is 12002 available on Friday?")
            .await
            .unwrap();
        assert_eq!(reply.action, Action::CheckAvailability);
        assert_eq!(reply.data.unwrap()["train_number"], "12002");
    }

    #[tokio::test]
    async fn cancel_wins_over_other_keywords() {
        let reply = offline_assistant()
            .respond("cancel my ticket from Pune to Goa")
            .await
            .unwrap();
        assert_eq!(reply.action, Action::CancellationPolicy);
        assert!(reply.text.contains("No refund"));
        assert!(reply.data.is_none());
    }

    #[tokio::test]
    async fn small_talk_gets_help_text() {
        let reply = offline_assistant().respond("hello").await.unwrap();
        assert_eq!(reply.action, Action::GeneralChat);
        assert_eq!(reply.text, GENERAL_CHAT_REPLY);
    }

    #[test]
    fn defaults_fill_missing_details() {
        let reply = run(Action::SearchTrains, "search trains please");
        assert_eq!(reply.text, "2 trains from Hyderabad to Delhi");

        let reply = run(Action::CheckAvailability, "is it available");
        assert_eq!(reply.data.unwrap()["train_number"], DEFAULT_TRAIN_NUMBER);
    }
}
