//! The invocation dispatcher behind `llm_chat`.
//!
//! Resolves a backend once per call, then per attempt tries each calling
//! convention the backend declares, in a fixed priority order, until one
//! yields a payload. Failed attempts back off exponentially.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use super::normalize::extract_text;
use super::retry::{RetryPolicy, RetryState};
use super::transcript::TranscriptStore;
use crate::config::Settings;
use crate::constants;
use crate::error::{AttemptError, InvocationError, Strategy, StrategyFailure};
use crate::message::Message;
use crate::provider::{
    BackendHandle, CompletionsClient, DirectCall, GenerateInput, ProviderKind, ProviderResolver,
};

/// Per-call options for [`Dispatcher::llm_chat`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    /// Provider preference; `None` defers to the process-wide override.
    pub provider: Option<String>,
    /// Number of attempts before giving up.
    pub max_retries: u32,
    /// Whether to write a transcript on success.
    pub save: bool,
    /// System prompt the backend carries on every request.
    pub system_prompt: Option<String>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            provider: Some(constants::DEFAULT_CHAT_PROVIDER.to_string()),
            max_retries: constants::DEFAULT_MAX_RETRIES,
            save: true,
            system_prompt: None,
        }
    }
}

impl ChatOptions {
    #[must_use]
    pub fn provider(mut self, provider: Option<impl Into<String>>) -> Self {
        self.provider = provider.map(Into::into);
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Normalized text plus the raw payload it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationResult {
    pub text: String,
    pub raw: Value,
}

/// Calls LLM backends with strategy fallback, retries and transcripts.
#[derive(Clone)]
pub struct Dispatcher {
    resolver: ProviderResolver,
    transcripts: TranscriptStore,
    backoff_unit: Duration,
}

impl Dispatcher {
    /// A dispatcher over the real backends, writing transcripts to the
    /// configured directory.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_resolver(ProviderResolver::new(settings))
    }

    pub fn with_resolver(resolver: ProviderResolver) -> Self {
        let transcripts = TranscriptStore::new(resolver.settings().transcript_dir.clone());
        Self {
            resolver,
            transcripts,
            backoff_unit: constants::BACKOFF_UNIT,
        }
    }

    #[must_use]
    pub fn with_transcripts(mut self, transcripts: TranscriptStore) -> Self {
        self.transcripts = transcripts;
        self
    }

    #[must_use]
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub fn resolver(&self) -> &ProviderResolver {
        &self.resolver
    }

    /// Default options with the configured attempt count.
    pub fn default_options(&self) -> ChatOptions {
        ChatOptions::default().max_retries(self.resolver.settings().max_retries)
    }

    /// Sends `prompt` to the preferred backend and returns its normalized
    /// response.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::Exhausted`] once every attempt has failed.
    #[instrument(
        name = "llm_chat",
        skip_all,
        fields(
            invocation_id = %uuid::Uuid::new_v4(),
            provider = options.provider.as_deref().unwrap_or("<default>"),
            backend = tracing::field::Empty,
        )
    )]
    pub async fn llm_chat(
        &self,
        prompt: &str,
        options: &ChatOptions,
    ) -> Result<InvocationResult, InvocationError> {
        let resolution = self.resolver.resolve_detailed(
            options.provider.as_deref(),
            options.system_prompt.as_deref(),
        );
        let preference = resolution.preference;
        let handle = resolution.handle;
        tracing::Span::current().record("backend", handle.provider().name());
        if !resolution.failures.is_empty() {
            tracing::debug!(skipped = resolution.failures.len(), "fell back past unavailable backends");
        }

        let policy = RetryPolicy::new(options.max_retries).with_backoff_unit(self.backoff_unit);
        let mut state = RetryState::new(policy);

        while let Some(attempt) = state.next_attempt() {
            match attempt_once(&handle, preference, prompt).await {
                Ok((payload, strategy)) => {
                    tracing::info!(attempt, %strategy, "LLM call succeeded");
                    let text = extract_text(&payload);
                    if options.save {
                        self.persist(prompt, &payload);
                    }
                    return Ok(InvocationResult { text, raw: payload });
                }
                Err(error) => {
                    tracing::warn!(attempt, max_retries = policy.max_retries(), %error, "LLM attempt failed");
                    if let Some(delay) = state.fail(error) {
                        tracing::debug!(?delay, "backing off");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        let attempts = state.attempts();
        let last = state
            .into_last_error()
            .unwrap_or(AttemptError::NoCompatibleInterface { failures: vec![] });
        Err(InvocationError::Exhausted { attempts, last })
    }

    /// Best-effort transcript write; a failure never loses the result.
    fn persist(&self, prompt: &str, payload: &Value) {
        match self.transcripts.write(prompt, payload) {
            Ok(path) => tracing::debug!(path = %path.display(), "transcript written"),
            Err(e) => tracing::warn!(error = %format!("{e:#}"), "transcript not written"),
        }
    }
}

/// A payload only counts when it is present.
fn accept(payload: Value) -> Option<Value> {
    (!payload.is_null()).then_some(payload)
}

/// One attempt: every strategy in priority order.
async fn attempt_once(
    handle: &BackendHandle,
    preference: ProviderKind,
    prompt: &str,
) -> Result<(Value, Strategy), AttemptError> {
    let mut failures = Vec::new();

    // Groq fast path: both content encodings must be tried before giving up.
    if preference == ProviderKind::Groq {
        if let Some(client) = handle.client() {
            if let Some(found) = create_with_fallback(client.as_ref(), handle.model(), prompt).await? {
                return Ok(found);
            }
        }
    }

    if let Some(direct) = handle.direct() {
        if let Some(found) = call_direct(direct.as_ref(), prompt, &mut failures).await {
            return Ok(found);
        }
    }

    if let Some(generative) = handle.generative() {
        let typed = GenerateInput::single_turn(prompt);
        match generative.generate(&typed).await {
            Ok(payload) => {
                if let Some(payload) = accept(payload) {
                    return Ok((payload, Strategy::Generate));
                }
            }
            Err(e) => {
                failures.push(StrategyFailure::new(Strategy::Generate, &e));
                let simplified = GenerateInput::single_turn_simplified(prompt);
                match generative.generate(&simplified).await {
                    Ok(payload) => {
                        if let Some(payload) = accept(payload) {
                            return Ok((payload, Strategy::GenerateSimplified));
                        }
                    }
                    Err(e) => failures.push(StrategyFailure::new(Strategy::GenerateSimplified, &e)),
                }
            }
        }
    }

    if let Some(direct) = handle.direct() {
        if let Some(found) = call_direct(direct.as_ref(), prompt, &mut failures).await {
            return Ok(found);
        }
    }

    if let Some(client) = handle.client() {
        let payload = client
            .create(handle.model(), &[Message::user(prompt)])
            .await
            .map_err(|e| AttemptError::Client(format!("{e:#}")))?;
        if let Some(payload) = accept(payload) {
            return Ok((payload, Strategy::ClientText));
        }
    }

    Err(AttemptError::NoCompatibleInterface { failures })
}

/// Low-level client with plain text content, then with typed parts.
async fn create_with_fallback(
    client: &dyn CompletionsClient,
    model: &str,
    prompt: &str,
) -> Result<Option<(Value, Strategy)>, AttemptError> {
    let text_error = match client.create(model, &[Message::user(prompt)]).await {
        Ok(payload) => return Ok(accept(payload).map(|p| (p, Strategy::ClientText))),
        Err(e) => e,
    };
    tracing::debug!(error = %text_error, "plain content rejected, retrying with typed parts");

    match client.create(model, &[Message::user_parts(prompt)]).await {
        Ok(payload) => Ok(accept(payload).map(|p| (p, Strategy::ClientParts))),
        Err(parts_error) => Err(AttemptError::ClientPayloadShapes {
            text: format!("{text_error:#}"),
            parts: format!("{parts_error:#}"),
        }),
    }
}

/// Predict if supported, else a plain call. Errors are recorded, not raised.
async fn call_direct(
    direct: &dyn DirectCall,
    prompt: &str,
    failures: &mut Vec<StrategyFailure>,
) -> Option<(Value, Strategy)> {
    let (strategy, outcome) = if direct.supports_predict() {
        (Strategy::Predict, direct.predict(prompt).await)
    } else {
        (Strategy::Call, direct.call(prompt).await)
    };
    match outcome {
        Ok(payload) => accept(payload).map(|p| (p, strategy)),
        Err(e) => {
            tracing::debug!(%strategy, error = %e, "strategy failed");
            failures.push(StrategyFailure::new(strategy, &e));
            None
        }
    }
}
