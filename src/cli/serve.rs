//! HTTP surface: `POST /llm_chat`.

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::constants::DEFAULT_CHAT_PROVIDER;
use crate::llm::Dispatcher;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_provider() -> String {
    DEFAULT_CHAT_PROVIDER.to_string()
}

pub fn build_router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/llm_chat", post(llm_chat))
        .with_state(dispatcher)
}

async fn llm_chat(State(dispatcher): State<Dispatcher>, Json(req): Json<ChatRequest>) -> Response {
    let options = dispatcher.default_options().provider(Some(req.provider));
    match dispatcher.llm_chat(&req.prompt, &options).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::error!(attempts = e.attempts(), error = %e, "llm_chat request failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Serves until Ctrl+C.
pub async fn serve(dispatcher: Dispatcher, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!(bind = %bind, "llm_chat endpoint listening");

    axum::serve(listener, build_router(dispatcher))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::Value;

    use crate::config::Settings;
    use crate::llm::TranscriptStore;
    use crate::provider::{BackendConstructor, BackendHandle, ProviderKind, ProviderResolver};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(prompt: &str) -> Json<ChatRequest> {
        Json(serde_json::from_value(serde_json::json!({ "prompt": prompt })).unwrap())
    }

    #[test]
    fn provider_defaults_to_groq() {
        let Json(req) = request("hi");
        assert_eq!(req.provider, "groq");
    }

    #[tokio::test]
    async fn returns_text_and_raw() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ProviderResolver::with_constructors(Arc::new(Settings::new("g", "q")), vec![]);
        let dispatcher =
            Dispatcher::with_resolver(resolver).with_transcripts(TranscriptStore::new(dir.path()));

        let response = llm_chat(State(dispatcher), request("cancel my ticket")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["text"], "cancellation_policy");
        assert_eq!(body["raw"]["choices"][0]["message"]["content"], "cancellation_policy");
    }

    #[tokio::test]
    async fn exhausted_invocation_is_bad_gateway() {
        let empty: BackendConstructor = Arc::new(|_: &Settings, _: Option<&str>| {
            Ok(BackendHandle::new(ProviderKind::Groq, "m"))
        });
        let mut settings = Settings::new("g", "q");
        settings.max_retries = 1;
        let resolver = ProviderResolver::with_constructors(
            Arc::new(settings),
            vec![(ProviderKind::Groq, empty)],
        );

        let response = llm_chat(State(Dispatcher::with_resolver(resolver)), request("hi")).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("no compatible interface found"));
    }
}
