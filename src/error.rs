//! Typed failures for the LLM invocation layer.
//!
//! Only [`InvocationError`] ever reaches callers of `llm_chat`; the other
//! kinds are recovered locally and kept around for logging.

use thiserror::Error;

use crate::provider::ProviderKind;

/// Fatal configuration problems detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} not found in environment; check .env and spelling")]
    MissingSecret { var: &'static str },
}

/// A backend could not be built. The resolver moves on to the next one.
#[derive(Debug, Clone, Error)]
#[error("could not construct {provider} backend: {reason}")]
pub struct ConstructionFailure {
    pub provider: ProviderKind,
    pub reason: String,
}

impl ConstructionFailure {
    pub fn new(provider: ProviderKind, reason: impl Into<String>) -> Self {
        Self {
            provider,
            reason: reason.into(),
        }
    }
}

/// The calling conventions the dispatcher knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `create` on the low-level client with plain text content.
    ClientText,
    /// `create` on the low-level client with typed content parts.
    ClientParts,
    /// Predict-style method on a direct callable.
    Predict,
    /// Plain call on a direct callable.
    Call,
    /// Generate with typed messages.
    Generate,
    /// Generate with the simplified message representation.
    GenerateSimplified,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::ClientText => "client.create (text)",
            Strategy::ClientParts => "client.create (parts)",
            Strategy::Predict => "predict",
            Strategy::Call => "call",
            Strategy::Generate => "generate",
            Strategy::GenerateSimplified => "generate (simplified)",
        };
        f.write_str(name)
    }
}

/// One calling convention failed; the dispatcher tries the next.
#[derive(Debug, Clone, Error)]
#[error("{strategy} failed: {error}")]
pub struct StrategyFailure {
    pub strategy: Strategy,
    pub error: String,
}

impl StrategyFailure {
    pub fn new(strategy: Strategy, error: &anyhow::Error) -> Self {
        Self {
            strategy,
            error: format!("{error:#}"),
        }
    }
}

/// Why a single attempt produced no payload.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    #[error("Groq client.create failed (tried two payload shapes). errors: {text} | {parts}")]
    ClientPayloadShapes { text: String, parts: String },
    #[error("client.create failed: {0}")]
    Client(String),
    #[error("Unable to call LLM: no compatible interface found{}", format_failures(.failures))]
    NoCompatibleInterface { failures: Vec<StrategyFailure> },
}

fn format_failures(failures: &[StrategyFailure]) -> String {
    if failures.is_empty() {
        return String::new();
    }
    let joined = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!(" ({joined})")
}

/// Terminal failure of `llm_chat` after every attempt was used up.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("LLM call failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: AttemptError,
    },
}

impl InvocationError {
    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            InvocationError::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// The error observed on the final attempt.
    pub fn last_error(&self) -> &AttemptError {
        match self {
            InvocationError::Exhausted { last, .. } => last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_carries_attempts_and_cause() {
        let err = InvocationError::Exhausted {
            attempts: 3,
            last: AttemptError::Client("connection reset".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("after 3 attempts"));
        assert!(msg.contains("connection reset"));
        assert_eq!(err.attempts(), 3);
    }

    #[test]
    fn no_interface_lists_strategy_failures() {
        let err = AttemptError::NoCompatibleInterface {
            failures: vec![StrategyFailure {
                strategy: Strategy::Call,
                error: "boom".into(),
            }],
        };
        assert_eq!(
            err.to_string(),
            "Unable to call LLM: no compatible interface found (call failed: boom)"
        );

        let bare = AttemptError::NoCompatibleInterface { failures: vec![] };
        assert_eq!(
            bare.to_string(),
            "Unable to call LLM: no compatible interface found"
        );
    }
}
